//! Application manifest (`package.json`) under the working root.

use kinfo_version::{Version, VersionError};
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};
use std::path::{Path, PathBuf};

pub const PROJECT_MANIFEST_FILE: &str = "package.json";

/// Name and version the application declares. Other fields are kept as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectManifest {
    pub name: Option<String>,
    pub version: Version,
    pub extra: Map<String, JsonValue>,
}

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to read manifest {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid manifest JSON in {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("manifest {path:?} declares invalid version: {source}")]
    InvalidVersion {
        path: PathBuf,
        #[source]
        source: VersionError,
    },
}

#[derive(Deserialize)]
struct RawManifest {
    #[serde(default)]
    name: Option<String>,
    version: String,
    #[serde(flatten)]
    extra: Map<String, JsonValue>,
}

pub fn load_project_manifest(root: impl AsRef<Path>) -> Result<ProjectManifest, ManifestError> {
    let path = root.as_ref().join(PROJECT_MANIFEST_FILE);
    let bytes = std::fs::read(&path).map_err(|source| ManifestError::Io {
        path: path.clone(),
        source,
    })?;
    parse_project_manifest(&bytes, &path)
}

pub fn parse_project_manifest(bytes: &[u8], path: &Path) -> Result<ProjectManifest, ManifestError> {
    let raw: RawManifest = serde_json::from_slice(bytes).map_err(|source| ManifestError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let version = raw
        .version
        .parse()
        .map_err(|source| ManifestError::InvalidVersion {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(ProjectManifest {
        name: raw.name,
        version,
        extra: raw.extra,
    })
}

impl ProjectManifest {
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        Self {
            name: Some(name.into()),
            version,
            extra: Map::new(),
        }
    }
}
