use super::render_chain;
use crate::colors::*;
use crate::fetch::Fetcher;
use crate::fsutil;
use crate::installer::{Installer, LockMap, MODULES_DIR};
use crate::lockfile::{self, Lockfile};
use crate::manifest;
use anyhow::{bail, Context, Result};
use std::path::PathBuf;

/// Split `name[@requirement]`, keeping scoped names (`@scope/pkg`) intact.
fn split_spec(spec: &str) -> (String, Option<String>) {
    if let Some(idx) = spec.rfind('@').filter(|&i| i > 0) {
        (spec[..idx].to_string(), Some(spec[idx + 1..].to_string()))
    } else {
        (spec.to_string(), None)
    }
}

pub fn cmd_add(specs: Vec<String>, dev: bool, registry: Option<String>) -> Result<()> {
    let manifest_path = PathBuf::from(manifest::FILE_NAME);
    if !manifest_path.exists() {
        bail!("no package.json found. Run 'sprig init' first");
    }
    let mut manifest = manifest::load(&manifest_path).context("load package.json")?;
    let lock_path = PathBuf::from(lockfile::FILE_NAME);
    let mut lock = Lockfile::load_or_default(&lock_path).context("load lockfile")?;

    let fetcher = Fetcher::new(registry);
    let installer = Installer::new(fetcher.clone(), MODULES_DIR);
    fsutil::ensure_dir(installer.modules_dir())?;

    let lock_map = LockMap::new();
    let mut failed = 0usize;
    let mut added: Vec<(String, String)> = Vec::new();

    for spec in &specs {
        let (name, requirement) = split_spec(spec);
        // `latest` resolves before install so the manifest records a concrete range.
        let (install_req, manifest_req) = match requirement {
            Some(req) if req != "latest" => (req.clone(), req),
            _ => {
                let meta = match fetcher.package_metadata(&name) {
                    Ok(meta) => meta,
                    Err(e) => {
                        eprintln!(
                            "{C_GRAY}[sprig]{C_RESET} {C_RED}error{C_RESET} {}",
                            render_chain(&e)
                        );
                        failed += 1;
                        continue;
                    }
                };
                let Some(latest) = meta.dist_tags.get("latest").cloned() else {
                    eprintln!(
                        "{C_GRAY}[sprig]{C_RESET} {C_RED}error{C_RESET} {name}: no latest dist-tag"
                    );
                    failed += 1;
                    continue;
                };
                (latest.clone(), format!("^{latest}"))
            }
        };
        if let Err(e) = installer.install_package(&name, &install_req, &lock_map, false) {
            eprintln!(
                "{C_GRAY}[sprig]{C_RESET} {C_RED}error{C_RESET} {}",
                render_chain(&e)
            );
            failed += 1;
            continue;
        }
        added.push((name, manifest_req));
    }

    if added.is_empty() {
        if failed > 0 {
            bail!("no packages added");
        }
        return Ok(());
    }

    let target = if dev { &mut manifest.dev_dependencies } else { &mut manifest.dependencies };
    for (name, requirement) in &added {
        target.insert(name.clone(), requirement.clone());
    }

    if lock.name.is_empty() {
        lock.name = manifest.name.clone();
        lock.version = manifest.version.clone();
    }
    // Transitive entries land in the same role as the package that pulled them in.
    let lock_target = if dev { &mut lock.dev_dependencies } else { &mut lock.dependencies };
    for (name, entry) in lock_map.into_entries() {
        lock_target.insert(name, entry);
    }

    manifest::write(&manifest, &manifest_path).context("write package.json")?;
    lockfile::write(&lock, &lock_path).context("write lockfile")?;
    println!(
        "{C_GRAY}[sprig]{C_RESET} {C_GREEN}ok{C_RESET} added {} package(s)",
        added.len()
    );
    if failed > 0 {
        println!("{C_GRAY}[sprig]{C_RESET} {C_YELLOW}warn{C_RESET} {failed} package(s) failed");
    }
    Ok(())
}
