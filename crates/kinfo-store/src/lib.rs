//! Disk-persisted kernel data plus the data-version compatibility gate.

pub mod arch;
mod backing;
pub mod env;
pub mod gate;
mod kernel;
mod kernel_store;
pub mod manifest;

pub use arch::{ArchVersion, KERNEL_ARCH_VERSIONS, arch_version};
pub use backing::{Backing, FileBacking, MemBacking};
pub use env::{KernelEnv, is_windows_env, resolve_file_uri_path};
pub use gate::{
    GateFailure, GateOptions, GateStatus, check_data_system_version,
    check_data_system_version_to,
};
pub use kernel::{KernelInfo, KernelInfoError};
pub use kernel_store::{KernelStore, RESERVED_KEYS, is_reserved};
pub use manifest::{ManifestError, PROJECT_MANIFEST_FILE, ProjectManifest, load_project_manifest};

pub use kinfo_cbor::Value;

use std::{collections::BTreeMap, io, path::PathBuf};

/// File name of the kernel data file under the working root.
pub const KERNEL_DATA_FILE: &str = ".kernel.bes";

/// Key under which the data schema version is recorded.
pub const VERSION_KEY: &str = "version";

/// The persisted mapping. Always a map at the top level.
pub type KernelData = BTreeMap<String, Value>;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("CBOR serialization error: {0}")]
    Cbor(#[from] kinfo_cbor::CodecError),
    #[error("stored data in {path:?} must be a mapping, found {found}")]
    Schema { path: PathBuf, found: String },
}

pub(crate) fn io_error(path: impl Into<PathBuf>, err: io::Error) -> StoreError {
    StoreError::Io {
        path: path.into(),
        source: err,
    }
}
