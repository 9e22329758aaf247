//! Data version gate: is the persisted kernel data usable by this build?
//!
//! The gate never terminates the process itself. A failed check yields a
//! [`GateStatus`] carrying the exit code the caller should use when
//! `auto_exit` was requested, so the entry point can flush its output and
//! exit synchronously.

use crate::{Backing, KernelStore, ProjectManifest, VERSION_KEY, Value};
use kinfo_version::Version;
use std::io::{self, Write};

/// Exit status requested by a failed check.
pub const GATE_EXIT_CODE: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateOptions {
    /// Request process termination when the check fails.
    pub auto_exit: bool,
    /// Write operator diagnostics on failure.
    pub verbose: bool,
}

impl Default for GateOptions {
    fn default() -> Self {
        Self {
            auto_exit: true,
            verbose: true,
        }
    }
}

impl GateOptions {
    pub fn new(auto_exit: bool, verbose: bool) -> Self {
        Self { auto_exit, verbose }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateFailure {
    #[error("kernel data has no version; system is not initialized")]
    NotInitialized,
    #[error("data version {stored} is older than system version {system}")]
    StaleData { stored: String, system: String },
    #[error("stored data version '{stored}' is malformed")]
    InvalidVersion { stored: String },
}

impl GateFailure {
    /// The two lines shown to the operator.
    pub fn diagnostics(&self) -> [String; 2] {
        match self {
            GateFailure::NotInitialized => [
                "System is not initialized yet!".into(),
                "Please initialize your system via update tool!".into(),
            ],
            GateFailure::StaleData { .. } => [
                "Data version is older than system version!".into(),
                "Please update your system using update tool!".into(),
            ],
            GateFailure::InvalidVersion { stored } => [
                format!("Stored data version '{stored}' is malformed!"),
                "Please re-initialize your system via update tool!".into(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateStatus {
    Compatible,
    Incompatible {
        failure: GateFailure,
        /// Set when the caller asked for `auto_exit`.
        exit_code: Option<i32>,
    },
}

impl GateStatus {
    pub fn is_compatible(&self) -> bool {
        matches!(self, GateStatus::Compatible)
    }

    pub fn failure(&self) -> Option<&GateFailure> {
        match self {
            GateStatus::Compatible => None,
            GateStatus::Incompatible { failure, .. } => Some(failure),
        }
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            GateStatus::Compatible => None,
            GateStatus::Incompatible { exit_code, .. } => *exit_code,
        }
    }
}

/// Check the stored `version` against the manifest, writing diagnostics to stderr.
pub fn check_data_system_version<B: Backing>(
    store: &KernelStore<B>,
    manifest: &ProjectManifest,
    opts: GateOptions,
) -> GateStatus {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    check_data_system_version_to(store, manifest, opts, &mut out)
}

/// Same as [`check_data_system_version`] with diagnostics written to `out`.
pub fn check_data_system_version_to<B: Backing, W: Write>(
    store: &KernelStore<B>,
    manifest: &ProjectManifest,
    opts: GateOptions,
    out: &mut W,
) -> GateStatus {
    let failure = match evaluate(store, &manifest.version) {
        Ok(()) => return GateStatus::Compatible,
        Err(failure) => failure,
    };
    if opts.verbose {
        log::warn!("data version check failed: {failure}");
        for line in failure.diagnostics() {
            // Diagnostics are best effort; the status is the signal.
            let _ = writeln!(out, "{line}");
        }
        let _ = out.flush();
    } else {
        log::debug!("data version check failed: {failure}");
    }
    GateStatus::Incompatible {
        failure,
        exit_code: opts.auto_exit.then_some(GATE_EXIT_CODE),
    }
}

fn evaluate<B: Backing>(store: &KernelStore<B>, system: &Version) -> Result<(), GateFailure> {
    let stored = match store.get(VERSION_KEY) {
        None | Some(Value::Null) | Some(Value::Bool(false)) | Some(Value::Integer(0)) => {
            return Err(GateFailure::NotInitialized);
        }
        Some(Value::Float(f)) if *f == 0.0 || f.is_nan() => {
            return Err(GateFailure::NotInitialized);
        }
        Some(Value::Text(text)) if text.is_empty() => return Err(GateFailure::NotInitialized),
        Some(Value::Text(text)) => text,
        Some(other) => {
            return Err(GateFailure::InvalidVersion {
                stored: format!("<{}>", kinfo_cbor::value_kind(other)),
            });
        }
    };
    let version: Version = stored.parse().map_err(|_| GateFailure::InvalidVersion {
        stored: stored.clone(),
    })?;
    if !version.satisfies(system) {
        return Err(GateFailure::StaleData {
            stored: stored.clone(),
            system: system.to_string(),
        });
    }
    Ok(())
}
