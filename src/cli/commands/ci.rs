use crate::colors::*;
use crate::fetch::Fetcher;
use crate::installer::{Installer, MODULES_DIR};
use crate::lockfile;
use anyhow::{bail, Context, Result};
use std::path::PathBuf;

pub fn cmd_ci(registry: Option<String>) -> Result<()> {
    let lock_path = PathBuf::from(lockfile::FILE_NAME);
    if !lock_path.exists() {
        bail!("no {} found. Run 'sprig install' first", lockfile::FILE_NAME);
    }
    let lock = lockfile::load(&lock_path).context("load lockfile")?;

    let installer = Installer::new(Fetcher::new(registry), MODULES_DIR);
    installer.install_locked(&lock).context("reproducible install")?;
    println!(
        "{C_GRAY}[sprig]{C_RESET} {C_GREEN}ok{C_RESET} installed {} locked package(s)",
        lock.dependencies.len() + lock.dev_dependencies.len()
    );
    Ok(())
}
