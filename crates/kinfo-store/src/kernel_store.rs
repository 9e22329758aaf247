use crate::{
    KERNEL_DATA_FILE, KernelData, StoreError, StoreResult, Value,
    backing::{Backing, FileBacking},
};
use kinfo_cbor::{from_cbor_slice, to_canonical_cbor, value_kind};
use serde::{Serialize, de::DeserializeOwned};
use std::{fmt, path::Path};

/// Identifiers that belong to the store's control surface, not to the data.
pub const RESERVED_KEYS: &[&str] = &["save", "load", "cli_args"];

pub fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// Kernel data held in memory and persisted on explicit request.
///
/// Nothing is read until [`KernelStore::load`] and nothing is written until
/// [`KernelStore::save`]. Dropping the store does not flush.
pub struct KernelStore<B: Backing = FileBacking> {
    backing: B,
    data: KernelData,
}

impl<B: Backing> fmt::Debug for KernelStore<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KernelStore")
            .field("location", &self.backing.location())
            .field("keys", &self.data.len())
            .finish()
    }
}

impl KernelStore<FileBacking> {
    /// Store backed by `<root>/.kernel.bes`. Does not touch the filesystem.
    pub fn open(root: impl AsRef<Path>) -> Self {
        Self::with_backing(FileBacking::new(root.as_ref().join(KERNEL_DATA_FILE)))
    }

    pub fn path(&self) -> &Path {
        self.backing.path()
    }
}

impl<B: Backing> KernelStore<B> {
    pub fn with_backing(backing: B) -> Self {
        Self {
            backing,
            data: KernelData::new(),
        }
    }

    pub fn backing(&self) -> &B {
        &self.backing
    }

    /// Replace the in-memory data with the persisted contents.
    ///
    /// A missing file leaves the current data as it is. On any error the
    /// in-memory data is left untouched.
    pub fn load(&mut self) -> StoreResult<()> {
        let location = self.backing.location();
        let Some(bytes) = self.backing.read()? else {
            log::debug!("no kernel data at {}, keeping current state", location.display());
            return Ok(());
        };
        let value = from_cbor_slice(&bytes)?;
        let data = into_kernel_data(value).map_err(|found| StoreError::Schema {
            path: location.clone(),
            found,
        })?;
        log::debug!("loaded {} kernel data keys from {}", data.len(), location.display());
        self.data = data;
        Ok(())
    }

    /// Overwrite the persisted contents with the in-memory data.
    pub fn save(&self) -> StoreResult<()> {
        let bytes = to_canonical_cbor(&self.data)?;
        self.backing.write(&bytes)?;
        log::debug!(
            "saved {} kernel data keys ({} bytes) to {}",
            self.data.len(),
            bytes.len(),
            self.backing.location().display()
        );
        Ok(())
    }

    /// Value under `key`. Reserved identifiers never resolve to data.
    pub fn get(&self, key: &str) -> Option<&Value> {
        if is_reserved(key) {
            return None;
        }
        self.data.get(key)
    }

    /// Decode the value under `key` into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        match self.get(key) {
            Some(value) => Ok(Some(kinfo_cbor::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    /// Byte string stored under `key`, if the value is one.
    pub fn get_bytes(&self, key: &str) -> Option<&[u8]> {
        match self.get(key)? {
            Value::Bytes(bytes) => Some(bytes.as_slice()),
            _ => None,
        }
    }

    /// Insert or overwrite `key`. Returns `false` without touching the data
    /// when `key` is reserved.
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> bool {
        let key = key.into();
        if is_reserved(&key) {
            log::warn!("refusing to assign reserved kernel data key '{key}'");
            return false;
        }
        self.data.insert(key, value);
        true
    }

    pub fn set_serialized<T: Serialize>(&mut self, key: impl Into<String>, value: &T) -> StoreResult<bool> {
        let value = kinfo_cbor::to_value(value)?;
        Ok(self.set(key, value))
    }

    pub fn set_bytes(&mut self, key: impl Into<String>, bytes: &[u8]) -> bool {
        self.set(key, Value::Bytes(bytes.to_vec()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &KernelData {
        &self.data
    }
}

/// Err carries a description of the offending shape.
fn into_kernel_data(value: Value) -> Result<KernelData, String> {
    let entries = match value {
        Value::Map(entries) => entries,
        other => return Err(value_kind(&other).to_string()),
    };
    let mut data = KernelData::new();
    for (key, value) in entries {
        match key {
            Value::Text(key) => {
                data.insert(key, value);
            }
            other => return Err(format!("map with {} key", value_kind(&other))),
        }
    }
    Ok(data)
}
