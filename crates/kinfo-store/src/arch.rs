//! Architecture descriptors: which subsystems this build carries and the
//! minimum data-schema version each of them expects.

/// One subsystem and the data-schema version it expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArchVersion {
    pub identifier: &'static str,
    pub version: &'static str,
}

/// Declared once; never mutated at runtime.
///
/// Applications layering additional subsystems on the kernel append their own
/// entries here.
pub const KERNEL_ARCH_VERSIONS: &[ArchVersion] = &[ArchVersion {
    identifier: "kinfo.kernel",
    version: "1.3.4",
}];

pub fn arch_version(identifier: &str) -> Option<&'static ArchVersion> {
    KERNEL_ARCH_VERSIONS
        .iter()
        .find(|arch| arch.identifier == identifier)
}
