use super::render_chain;
use crate::colors::*;
use crate::fetch::Fetcher;
use crate::installer::{Installer, MODULES_DIR};
use crate::lockfile;
use crate::manifest;
use anyhow::{bail, Context, Result};
use std::path::PathBuf;

pub fn cmd_install(registry: Option<String>) -> Result<()> {
    let manifest_path = PathBuf::from(manifest::FILE_NAME);
    if !manifest_path.exists() {
        bail!("no package.json found. Run 'sprig init' first");
    }
    let manifest = manifest::load(&manifest_path).context("load package.json")?;

    let installer = Installer::new(Fetcher::new(registry), MODULES_DIR);
    match installer.install_all(&manifest) {
        Ok(lock) => {
            lockfile::write(&lock, &PathBuf::from(lockfile::FILE_NAME))
                .context("write lockfile")?;
            println!(
                "{C_GRAY}[sprig]{C_RESET} {C_GREEN}ok{C_RESET} installed {} package(s), wrote {}",
                lock.dependencies.len() + lock.dev_dependencies.len(),
                lockfile::FILE_NAME
            );
            Ok(())
        }
        Err(failures) => {
            for failure in &failures {
                eprintln!(
                    "{C_GRAY}[sprig]{C_RESET} {C_RED}error{C_RESET} {}",
                    render_chain(failure)
                );
            }
            bail!("{} install task(s) failed; lockfile not written", failures.len());
        }
    }
}
