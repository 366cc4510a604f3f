use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const FILE_NAME: &str = "sprig-lock.json";

/// The recorded outcome of one package's resolution: the concrete version
/// and the exact tarball that was fetched.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LockedDependency {
    pub version: String,
    pub resolved: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Lockfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub dependencies: BTreeMap<String, LockedDependency>,
    #[serde(default, rename = "devDependencies")]
    pub dev_dependencies: BTreeMap<String, LockedDependency>,
}

impl Lockfile {
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            load(path)
        } else {
            Ok(Self::default())
        }
    }
}

pub fn load(path: &Path) -> Result<Lockfile> {
    let data = fs::read_to_string(path)?;
    let lock: Lockfile = serde_json::from_str(&data)?;
    Ok(lock)
}

pub fn write(lock: &Lockfile, path: &Path) -> Result<()> {
    let data = serde_json::to_string_pretty(lock)?;
    fs::write(path, data)?;
    Ok(())
}
