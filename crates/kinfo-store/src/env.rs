//! Process environment: working root, platform, and pass-through launch arguments.

use std::{
    io,
    path::{Path, PathBuf},
};

const FILE_URI_SCHEME: &str = "file://";

pub fn is_windows_env() -> bool {
    cfg!(windows)
}

/// Strip a `file://` scheme from `url`. Anything else is returned unchanged.
pub fn resolve_file_uri_path(url: &str) -> String {
    resolve_file_uri_path_for(url, is_windows_env())
}

fn resolve_file_uri_path_for(url: &str, windows: bool) -> String {
    let Some(rest) = url.strip_prefix(FILE_URI_SCHEME) else {
        return url.to_string();
    };
    // file:///C:/dir -> C:/dir on Windows, file:///dir -> /dir elsewhere.
    if windows {
        rest.strip_prefix('/').unwrap_or(rest).to_string()
    } else {
        rest.to_string()
    }
}

/// Directory holding the running executable.
pub fn executable_root() -> io::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("executable path {} has no parent", exe.display()),
        )
    })
}

/// Where the kernel lives and what it was launched with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelEnv {
    working_root: PathBuf,
    cli_args: Vec<String>,
}

impl KernelEnv {
    pub fn new(working_root: impl Into<PathBuf>, cli_args: Vec<String>) -> Self {
        Self {
            working_root: working_root.into(),
            cli_args,
        }
    }

    /// Environment of the current process: the executable's directory and
    /// every argument after the first `skip` ones.
    pub fn from_process(skip: usize) -> io::Result<Self> {
        Ok(Self::new(
            executable_root()?,
            std::env::args().skip(skip).collect(),
        ))
    }

    pub fn working_root(&self) -> &Path {
        &self.working_root
    }

    /// Launch arguments, as an owned copy.
    pub fn cli_args(&self) -> Vec<String> {
        self.cli_args.clone()
    }

    pub fn is_windows(&self) -> bool {
        is_windows_env()
    }
}
