use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const FILE_NAME: &str = "package.json";

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    #[serde(default, rename = "devDependencies")]
    pub dev_dependencies: BTreeMap<String, String>,
    #[serde(default)]
    pub scripts: BTreeMap<String, String>,
}

impl Manifest {
    pub fn new(name: String, version: String) -> Self {
        Self { name, version, ..Default::default() }
    }
}

pub fn load(path: &Path) -> Result<Manifest> {
    let data = fs::read_to_string(path)?;
    let manifest: Manifest = serde_json::from_str(&data)?;
    Ok(manifest)
}

pub fn write(manifest: &Manifest, path: &Path) -> Result<()> {
    let data = serde_json::to_string_pretty(manifest)?;
    fs::write(path, data)?;
    Ok(())
}
