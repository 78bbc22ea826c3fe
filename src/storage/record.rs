//! JSON serialization of recipe files.

use std::{
    ffi::OsStr,
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tempfile::NamedTempFile;

use crate::Recipe;

/// The extension of recipe files.
pub const EXTENSION: &str = "json";

/// The path of the file a recipe called `name` is stored in.
#[must_use]
pub fn path_for(root: &Path, name: &str) -> PathBuf {
    root.join(format!("{name}.{EXTENSION}"))
}

/// Whether `path` looks like a recipe file.
#[must_use]
pub fn is_recipe_file(path: &Path) -> bool {
    path.extension() == Some(OsStr::new(EXTENSION))
}

/// Reads a recipe from the file at `path`.
///
/// # Errors
///
/// Returns an error if the file doesn't exist, can't be read, or doesn't
/// contain a valid recipe.
pub fn read(path: &Path) -> Result<Recipe, LoadError> {
    let file = File::open(path).map_err(|io_error| match io_error.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound,
        _ => LoadError::Io(io_error),
    })?;

    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}

/// Writes `recipe` to a new file in `root`.
///
/// The recipe is first written in full to a temporary file in the same
/// directory, then moved into place only if no file of that name exists.
/// Readers never observe a partially written recipe, and an existing recipe
/// is never overwritten.
///
/// # Errors
///
/// Returns [`SaveError::AlreadyExists`] if the target file exists, or an
/// I/O error if writing fails.
pub fn create(root: &Path, recipe: &Recipe) -> Result<PathBuf, SaveError> {
    let path = path_for(root, &recipe.name);

    let mut tmp = NamedTempFile::new_in(root)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        write(&mut writer, recipe)?;
        writer.flush()?;
    }

    tmp.persist_noclobber(&path).map_err(|e| {
        if e.error.kind() == io::ErrorKind::AlreadyExists {
            SaveError::AlreadyExists(path.clone())
        } else {
            SaveError::Io(e.error)
        }
    })?;

    Ok(path)
}

fn write<W: Write>(writer: &mut W, recipe: &Recipe) -> Result<(), SaveError> {
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut *writer, PrettyFormatter::with_indent(b"    "));
    recipe.serialize(&mut serializer)?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Errors that can occur when loading a recipe file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The recipe file was not found.
    #[error("file not found")]
    NotFound,
    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The file is not a valid recipe.
    #[error("invalid recipe JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur when saving a recipe file.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// A file for this recipe already exists.
    #[error("{} already exists", .0.display())]
    AlreadyExists(PathBuf),
    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The recipe could not be serialized.
    #[error("failed to serialize recipe: {0}")]
    Json(#[from] serde_json::Error),
}
