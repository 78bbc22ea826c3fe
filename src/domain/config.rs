use std::{
    net::{Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

/// Runtime configuration for the recipe server.
///
/// Passed explicitly into the store and the HTTP router at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The directory holding one JSON file per recipe.
    pub data_directory: PathBuf,

    /// The address the HTTP server listens on.
    pub bind: SocketAddr,

    /// The secret that callers must present in the `X-API-Key` header to add
    /// recipes.
    ///
    /// When unset, every add request is refused.
    pub api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_directory: default_data_directory(),
            bind: default_bind(),
            api_key: None,
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Overrides fields with any values given on the command line or in the
    /// environment.
    #[must_use]
    pub fn with_overrides(
        mut self,
        data_directory: Option<PathBuf>,
        bind: Option<SocketAddr>,
        api_key: Option<String>,
    ) -> Self {
        if let Some(data_directory) = data_directory {
            self.data_directory = data_directory;
        }
        if let Some(bind) = bind {
            self.bind = bind;
        }
        if api_key.is_some() {
            self.api_key = api_key;
        }
        self
    }
}

fn default_data_directory() -> PathBuf {
    PathBuf::from("data")
}

const fn default_bind() -> SocketAddr {
    SocketAddr::new(std::net::IpAddr::V4(Ipv4Addr::LOCALHOST), 8000)
}

/// The serialized versions of the configuration.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_data_directory")]
        data_directory: PathBuf,

        #[serde(default = "default_bind")]
        bind: SocketAddr,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        api_key: Option<String>,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                data_directory,
                bind,
                api_key,
            } => Self {
                data_directory,
                bind,
                api_key,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            data_directory: config.data_directory,
            bind: config.bind,
            api_key: config.api_key,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\ndata_directory = \"/srv/recipes\"\nbind = \"0.0.0.0:9000\"\napi_key = \"s3cret\"\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.data_directory, PathBuf::from("/srv/recipes"));
        assert_eq!(config.bind, "0.0.0.0:9000".parse().unwrap());
        assert_eq!(config.api_key.as_deref(), Some("s3cret"));
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nbind = \"not an address\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let config = Config {
            api_key: Some("from-file".to_string()),
            ..Config::default()
        }
        .with_overrides(Some(PathBuf::from("recipes")), None, None);

        assert_eq!(config.data_directory, PathBuf::from("recipes"));
        assert_eq!(config.bind, default_bind());
        assert_eq!(config.api_key.as_deref(), Some("from-file"));
    }
}
