//! A filesystem backed store of recipes
//!
//! The [`Directory`] keeps one JSON file per recipe in a single folder. It
//! holds no cached state: every query scans and parses every recipe file.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt, io,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use walkdir::WalkDir;

use crate::{
    NewRecipe, Recipe,
    domain::{
        EmptyQuery, NameError, Term,
        recipe::{normalise_name, validate_name},
    },
    storage::record::{self, LoadError, SaveError},
};

/// A filesystem backed store of recipes.
#[derive(Debug)]
pub struct Directory {
    /// The folder recipes are stored in.
    root: PathBuf,
    /// Serialises the duplicate check and the write in [`Directory::add`].
    write_lock: Mutex<()>,
}

impl Directory {
    /// Opens the store at `root`, creating the folder if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the folder cannot be created.
    pub fn open(root: PathBuf) -> io::Result<Self> {
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    /// The folder recipes are stored in.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lists recipe names, taken from the file stems of recipe files.
    ///
    /// Names are returned in filesystem enumeration order. Files are not
    /// parsed.
    ///
    /// # Errors
    ///
    /// Returns an error if the folder cannot be read.
    pub fn list_names(&self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .recipe_paths()?
            .iter()
            .filter_map(|path| path.file_stem())
            .map(|stem| stem.to_string_lossy().into_owned())
            .collect())
    }

    /// Loads every recipe in the store, in filesystem enumeration order.
    ///
    /// # Errors
    ///
    /// Fails if the folder cannot be read, or if any recipe file cannot be
    /// read or parsed. A single corrupt file fails the whole scan.
    pub fn recipes(&self) -> Result<Vec<Recipe>, StoreError> {
        let paths = self.recipe_paths()?;

        let recipes = paths
            .par_iter()
            .map(|path| {
                record::read(path).map_err(|source| StoreError::Load {
                    path: path.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            "Scanned {} recipes in {}",
            recipes.len(),
            self.root.display()
        );
        Ok(recipes)
    }

    /// Looks up a recipe by name.
    ///
    /// The stored `name` field is compared with `name` case-insensitively,
    /// ignoring surrounding whitespace. The file name plays no part. If
    /// several files carry the same name the first one enumerated wins.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no recipe has that name, or a scan
    /// error.
    pub fn get(&self, name: &str) -> Result<Recipe, StoreError> {
        self.recipes()?
            .into_iter()
            .find(|recipe| recipe.is_named(name))
            .ok_or_else(|| StoreError::NotFound(name.trim().to_string()))
    }

    /// Finds recipes with an ingredient whose name contains `term`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NoMatches`] if nothing matches, an error if
    /// `term` is blank, or a scan error.
    pub fn find_by_ingredient(&self, term: &str) -> Result<Vec<Recipe>, StoreError> {
        let term = Term::new(term)?;
        let matches = self.filter(|recipe| recipe.has_ingredient(&term))?;
        non_empty(matches, Criterion::Ingredient(term))
    }

    /// Finds recipes containing every ingredient in a comma separated list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NoMatches`] if nothing matches, an error if the
    /// list holds no terms, or a scan error.
    pub fn find_by_all_ingredients(&self, terms: &str) -> Result<Vec<Recipe>, StoreError> {
        let terms = Term::parse_list(terms)?;
        let matches = self.filter(|recipe| recipe.has_all_ingredients(&terms))?;
        non_empty(matches, Criterion::Ingredients(terms))
    }

    /// Finds recipes whose glass type contains `term`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NoMatches`] if nothing matches, an error if
    /// `term` is blank, or a scan error.
    pub fn find_by_glass(&self, term: &str) -> Result<Vec<Recipe>, StoreError> {
        let term = Term::new(term)?;
        let matches = self.filter(|recipe| recipe.matches_glass(&term))?;
        non_empty(matches, Criterion::Glass(term))
    }

    /// Lists the distinct ingredient names used across all recipes, sorted.
    ///
    /// # Errors
    ///
    /// Returns a scan error.
    pub fn list_ingredients(&self) -> Result<Vec<String>, StoreError> {
        let names: BTreeSet<String> = self
            .recipes()?
            .iter()
            .flat_map(Recipe::ingredient_names)
            .map(str::to_string)
            .collect();
        Ok(names.into_iter().collect())
    }

    /// Lists the distinct glass types used across all recipes, sorted.
    ///
    /// # Errors
    ///
    /// Returns a scan error.
    pub fn list_glass_types(&self) -> Result<Vec<String>, StoreError> {
        let glasses: BTreeSet<String> = self
            .recipes()?
            .into_iter()
            .map(|recipe| recipe.glass_type)
            .collect();
        Ok(glasses.into_iter().collect())
    }

    /// Adds a new recipe to the store.
    ///
    /// # Errors
    ///
    /// This method can fail if:
    ///
    /// - the recipe name can't be used as a file name
    /// - a recipe with the same name (ignoring case) already exists
    /// - the existing recipes cannot be scanned
    /// - the recipe file cannot be written
    pub fn add(&self, recipe: NewRecipe) -> Result<Recipe, StoreError> {
        validate_name(&recipe.name)?;
        let recipe = Recipe::from(recipe);

        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if self.recipes()?.iter().any(|r| r.is_named(&recipe.name)) {
            return Err(StoreError::Conflict(recipe.name));
        }

        match record::create(&self.root, &recipe) {
            Ok(path) => {
                tracing::info!("Added recipe {} at {}", recipe.name, path.display());
                Ok(recipe)
            }
            Err(SaveError::AlreadyExists(_)) => Err(StoreError::Conflict(recipe.name)),
            Err(source) => Err(StoreError::Save {
                name: recipe.name,
                source,
            }),
        }
    }

    /// Checks every recipe file without failing fast.
    ///
    /// Unlike the query methods, this reads every file even when some are
    /// broken, and reports all failures together with any names that are
    /// shared by more than one file.
    ///
    /// # Errors
    ///
    /// Returns an error only if the folder itself cannot be read.
    pub fn check(&self) -> Result<CheckReport, StoreError> {
        let paths = self.recipe_paths()?;

        let (loaded, failures): (Vec<_>, Vec<_>) = paths
            .par_iter()
            .map(|path| match record::read(path) {
                Ok(recipe) => Ok((path.clone(), recipe)),
                Err(e) => Err((path.clone(), e)),
            })
            .partition(Result::is_ok);

        let loaded: Vec<_> = loaded.into_iter().filter_map(Result::ok).collect();
        let failures: Vec<_> = failures.into_iter().filter_map(Result::err).collect();

        let mut by_name: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
        for (path, recipe) in &loaded {
            by_name
                .entry(normalise_name(&recipe.name))
                .or_default()
                .push(path.clone());
        }
        let duplicates = by_name
            .into_iter()
            .filter(|(_, paths)| paths.len() > 1)
            .collect();

        Ok(CheckReport {
            recipes: loaded.len(),
            failures,
            duplicates,
        })
    }

    fn filter(&self, predicate: impl Fn(&Recipe) -> bool) -> Result<Vec<Recipe>, StoreError> {
        Ok(self
            .recipes()?
            .into_iter()
            .filter(|recipe| predicate(recipe))
            .collect())
    }

    fn recipe_paths(&self) -> Result<Vec<PathBuf>, StoreError> {
        let mut paths = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|source| StoreError::Directory {
                path: self.root.clone(),
                source,
            })?;
            // follows symlinks, so linked recipe files are included
            if entry.path().is_file() && record::is_recipe_file(entry.path()) {
                paths.push(entry.into_path());
            }
        }
        Ok(paths)
    }
}

/// An empty search result is reported as an error rather than an empty list.
fn non_empty(recipes: Vec<Recipe>, criterion: Criterion) -> Result<Vec<Recipe>, StoreError> {
    if recipes.is_empty() {
        Err(StoreError::NoMatches(criterion))
    } else {
        Ok(recipes)
    }
}

/// The outcome of [`Directory::check`].
#[derive(Debug)]
pub struct CheckReport {
    /// How many recipe files parsed successfully.
    pub recipes: usize,
    /// Files that could not be read or parsed.
    pub failures: Vec<(PathBuf, LoadError)>,
    /// Normalised names that appear in more than one file.
    pub duplicates: Vec<(String, Vec<PathBuf>)>,
}

impl CheckReport {
    /// Whether the store is free of problems.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.failures.is_empty() && self.duplicates.is_empty()
    }
}

/// What a search was looking for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criterion {
    /// A single ingredient.
    Ingredient(Term),
    /// Several ingredients, all of which must be present.
    Ingredients(Vec<Term>),
    /// A glass type.
    Glass(Term),
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ingredient(term) => write!(f, "ingredient {term}"),
            Self::Ingredients(terms) => {
                write!(f, "ingredients ")?;
                for (i, term) in terms.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{term}")?;
                }
                Ok(())
            }
            Self::Glass(term) => write!(f, "glass {term}"),
        }
    }
}

/// Errors returned by [`Directory`] operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No recipe has the requested name.
    #[error("Cocktail {0} not found")]
    NotFound(String),
    /// A search matched no recipes.
    #[error("No cocktails found with {0}")]
    NoMatches(Criterion),
    /// A recipe with this name already exists.
    #[error("Cocktail {0} already exists")]
    Conflict(String),
    /// The recipe name can't be stored.
    #[error(transparent)]
    InvalidName(#[from] NameError),
    /// A search had nothing to search for.
    #[error(transparent)]
    EmptyQuery(#[from] EmptyQuery),
    /// The store folder could not be listed.
    #[error("failed to read {}: {source}", path.display())]
    Directory {
        /// The store folder.
        path: PathBuf,
        /// The underlying error.
        source: walkdir::Error,
    },
    /// A recipe file could not be read or parsed.
    #[error("failed to load {}: {source}", path.display())]
    Load {
        /// The offending file.
        path: PathBuf,
        /// The underlying error.
        source: LoadError,
    },
    /// A recipe file could not be written.
    #[error("failed to save {name}: {source}")]
    Save {
        /// The recipe being saved.
        name: String,
        /// The underlying error.
        source: SaveError,
    },
}
