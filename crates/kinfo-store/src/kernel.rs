use crate::{
    ArchVersion, FileBacking, GateOptions, GateStatus, KERNEL_ARCH_VERSIONS, KernelEnv,
    KernelStore, ManifestError, ProjectManifest, StoreError, StoreResult,
    check_data_system_version, load_project_manifest,
};

#[derive(Debug, thiserror::Error)]
pub enum KernelInfoError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Everything the host application needs at startup: its environment, its
/// manifest, and the kernel data loaded from the working root.
#[derive(Debug)]
pub struct KernelInfo {
    env: KernelEnv,
    manifest: ProjectManifest,
    store: KernelStore<FileBacking>,
}

impl KernelInfo {
    /// Read the manifest and load kernel data from the working root.
    pub fn init(env: KernelEnv) -> Result<Self, KernelInfoError> {
        let manifest = load_project_manifest(env.working_root())?;
        let mut store = KernelStore::open(env.working_root());
        store.load()?;
        log::debug!(
            "kernel info ready at {} (system version {})",
            env.working_root().display(),
            manifest.version
        );
        Ok(Self {
            env,
            manifest,
            store,
        })
    }

    pub fn env(&self) -> &KernelEnv {
        &self.env
    }

    pub fn manifest(&self) -> &ProjectManifest {
        &self.manifest
    }

    pub fn store(&self) -> &KernelStore<FileBacking> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut KernelStore<FileBacking> {
        &mut self.store
    }

    pub fn cli_args(&self) -> Vec<String> {
        self.env.cli_args()
    }

    pub fn arch_versions(&self) -> &'static [ArchVersion] {
        KERNEL_ARCH_VERSIONS
    }

    pub fn check_data_system_version(&self, opts: GateOptions) -> GateStatus {
        check_data_system_version(&self.store, &self.manifest, opts)
    }

    pub fn save(&self) -> StoreResult<()> {
        self.store.save()
    }
}
