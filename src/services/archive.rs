//! Runtime archive configuration.
//!
//! The artifact is a TOML file that operators may edit while the server runs.
//! It is re-read and re-parsed on every request; each load produces a fresh,
//! immutable snapshot and nothing is cached between requests.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse error in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid archive base_url in {}: {source}", .path.display())]
    InvalidBaseUrl {
        path: PathBuf,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArchiveConfig {
    pub name: String,
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_send_frequency")]
    pub send_frequency: String,
}

fn default_send_frequency() -> String {
    "none".to_string()
}

#[derive(Debug, Deserialize)]
struct RawArchiveFile {
    archive: ArchiveConfig,
}

/// Parses the artifact contents. `path` is only used in error messages.
pub fn parse(source: &str, path: &Path) -> Result<ArchiveConfig, ArchiveConfigError> {
    let raw: RawArchiveFile = toml::from_str(source).map_err(|source| ArchiveConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let config = raw.archive;

    // An enabled archive must point somewhere real.
    if config.enabled {
        url::Url::parse(&config.base_url).map_err(|source| ArchiveConfigError::InvalidBaseUrl {
            path: path.to_path_buf(),
            source,
        })?;
    }

    Ok(config)
}

/// Location of the archive configuration artifact.
#[derive(Debug, Clone)]
pub struct ArchiveConfigSource {
    path: Arc<PathBuf>,
}

impl ArchiveConfigSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and parses the artifact from scratch.
    pub async fn load(&self) -> Result<Arc<ArchiveConfig>, ArchiveConfigError> {
        let source =
            tokio::fs::read_to_string(self.path.as_path())
                .await
                .map_err(|source| ArchiveConfigError::Read {
                    path: self.path.to_path_buf(),
                    source,
                })?;

        parse(&source, &self.path).map(Arc::new)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    const DISABLED: &str = r#"
[archive]
name = "none"
"#;

    fn write_toml(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn defaults_fill_missing_fields() {
        let config = parse(DISABLED, Path::new("archive.toml")).unwrap();
        assert_eq!(config.name, "none");
        assert!(!config.enabled);
        assert_eq!(config.send_frequency, "none");
        assert_eq!(config.password, None);
    }

    #[test]
    fn enabled_archive_requires_a_valid_base_url() {
        let err = parse(
            "[archive]\nname = \"hydro\"\nenabled = true\nbase_url = \"not a url\"\n",
            Path::new("archive.toml"),
        )
        .unwrap_err();
        assert!(matches!(err, ArchiveConfigError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = parse("[archive\nname=", Path::new("archive.toml")).unwrap_err();
        assert!(matches!(err, ArchiveConfigError::Parse { .. }));
    }

    #[tokio::test]
    async fn every_load_observes_the_latest_file() {
        let f = write_toml(DISABLED);
        let source = ArchiveConfigSource::new(f.path());

        let first = source.load().await.unwrap();
        assert!(!first.enabled);

        std::fs::write(
            f.path(),
            "[archive]\nname = \"hydro\"\nenabled = true\nbase_url = \"https://archive.example.org/\"\n",
        )
        .unwrap();

        let second = source.load().await.unwrap();
        assert!(second.enabled);
        assert_eq!(second.name, "hydro");
        // The earlier snapshot is untouched.
        assert_eq!(first.name, "none");
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = ArchiveConfigSource::new(dir.path().join("absent.toml"));
        let err = source.load().await.unwrap_err();
        assert!(matches!(err, ArchiveConfigError::Read { .. }));
    }
}
