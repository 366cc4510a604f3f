use crate::colors::*;
use crate::manifest::{self, Manifest};
use anyhow::{bail, Result};
use std::path::PathBuf;

pub fn cmd_init(name: Option<String>, version: Option<String>) -> Result<()> {
    let path = PathBuf::from(manifest::FILE_NAME);
    if path.exists() {
        bail!("package.json already exists");
    }
    let default_name = || {
        std::env::current_dir()
            .ok()
            .and_then(|d| d.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "app".to_string())
    };
    let manifest = Manifest::new(
        name.unwrap_or_else(default_name),
        version.unwrap_or_else(|| "1.0.0".into()),
    );
    manifest::write(&manifest, &path)?;
    println!(
        "{C_GRAY}[sprig]{C_RESET} {C_GREEN}init{C_RESET} created {}@{}",
        manifest.name, manifest.version
    );
    Ok(())
}
