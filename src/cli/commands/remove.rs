use crate::colors::*;
use crate::fsutil::safe_join;
use crate::installer::MODULES_DIR;
use crate::lockfile;
use crate::manifest;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::PathBuf;

pub fn cmd_remove(packages: Vec<String>) -> Result<()> {
    let manifest_path = PathBuf::from(manifest::FILE_NAME);
    if !manifest_path.exists() {
        bail!("no package.json found");
    }
    let mut manifest = manifest::load(&manifest_path).context("load package.json")?;
    let lock_path = PathBuf::from(lockfile::FILE_NAME);
    let mut lock = lockfile::load(&lock_path).ok();

    let modules = PathBuf::from(MODULES_DIR);
    let mut changed = false;
    for name in &packages {
        if manifest.dependencies.remove(name).is_some() {
            changed = true;
        }
        if manifest.dev_dependencies.remove(name).is_some() {
            changed = true;
        }
        if let Some(lock) = lock.as_mut() {
            if lock.dependencies.remove(name).is_some()
                || lock.dev_dependencies.remove(name).is_some()
            {
                changed = true;
            }
        }
        match safe_join(&modules, name) {
            Some(dir) if dir.exists() => {
                fs::remove_dir_all(&dir).with_context(|| format!("remove {}", dir.display()))?;
                println!("{C_GRAY}[sprig]{C_RESET} removed {name}");
            }
            Some(_) => {}
            None => {
                eprintln!(
                    "{C_GRAY}[sprig]{C_RESET} {C_YELLOW}warn{C_RESET} refusing path '{name}'"
                );
            }
        }
    }

    if changed {
        manifest::write(&manifest, &manifest_path).context("write package.json")?;
        if let Some(lock) = &lock {
            lockfile::write(lock, &lock_path).context("write lockfile")?;
        }
    }
    Ok(())
}
