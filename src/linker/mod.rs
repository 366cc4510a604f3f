use crate::error::Result;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// The `bin` field of an installed package manifest: a single path (named
/// after the package) or a map of command name to path.
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum BinField {
    Single(String),
    Map(BTreeMap<String, String>),
}

#[derive(Debug, Deserialize)]
struct InstalledManifest {
    name: Option<String>,
    #[serde(default)]
    bin: Option<BinField>,
}

/// Create `node_modules/.bin` wrappers for the bin entries of the package
/// materialized at `pkg_dir`. Packages without a manifest or a `bin` field
/// are skipped; an unparseable installed manifest is skipped, not fatal.
pub fn create_bin_links(modules_dir: &Path, package_name: &str, pkg_dir: &Path) -> Result<()> {
    let manifest_path = pkg_dir.join("package.json");
    if !manifest_path.exists() {
        return Ok(());
    }
    let txt = fs::read_to_string(&manifest_path)?;
    let Ok(manifest) = serde_json::from_str::<InstalledManifest>(&txt) else {
        return Ok(());
    };
    let Some(bin) = manifest.bin else {
        return Ok(());
    };

    let entries: Vec<(String, String)> = match bin {
        BinField::Single(path) => {
            let name = manifest.name.unwrap_or_else(|| package_name.to_string());
            vec![(name, path)]
        }
        BinField::Map(map) => map.into_iter().collect(),
    };

    let bin_dir = modules_dir.join(".bin");
    fs::create_dir_all(&bin_dir)?;

    for (mut bin_name, rel_path) in entries {
        if let Some(idx) = bin_name.rfind('/') {
            bin_name = bin_name[idx + 1..].to_string();
        }
        let target = normalize_rel_path(pkg_dir, &rel_path);
        if !target.exists() {
            continue;
        }
        // Relative path from .bin to the target script: ../<pkg>/<rel_path>
        let mut rel_from_bin = PathBuf::from("..");
        for part in package_name.split('/') {
            rel_from_bin.push(part);
        }
        for part in rel_path.split('/') {
            match part {
                "" | "." => {}
                ".." => {
                    rel_from_bin.pop();
                }
                _ => rel_from_bin.push(part),
            }
        }
        write_wrapper(&bin_dir, &bin_name, &rel_from_bin)?;
    }
    Ok(())
}

fn normalize_rel_path(base: &Path, rel: &str) -> PathBuf {
    let mut p = base.to_path_buf();
    for part in rel.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                p.pop();
            }
            _ => p.push(part),
        }
    }
    p
}

#[cfg(unix)]
fn write_wrapper(bin_dir: &Path, bin_name: &str, relative_target: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let dest = bin_dir.join(bin_name);
    if dest.exists() {
        let _ = fs::remove_file(&dest);
    }
    let script = format!(
        "#!/usr/bin/env sh\nbasedir=$(dirname \"$0\")\nexec node \"$basedir/{}\" \"$@\"\n",
        relative_target.to_string_lossy()
    );
    fs::write(&dest, script)?;
    let mut perms = fs::metadata(&dest)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&dest, perms)?;
    Ok(())
}

#[cfg(windows)]
fn write_wrapper(bin_dir: &Path, bin_name: &str, relative_target: &Path) -> Result<()> {
    let rel = relative_target.to_string_lossy().replace('/', "\\");
    let dest = bin_dir.join(format!("{bin_name}.cmd"));
    if dest.exists() {
        let _ = fs::remove_file(&dest);
    }
    let script = format!(
        "@IF EXIST \"%~dp0\\node.exe\" (\r\n  \"%~dp0\\node.exe\" \"%~dp0\\{rel}\" %*\r\n) ELSE (\r\n  node \"%~dp0\\{rel}\" %*\r\n)\r\n"
    );
    fs::write(&dest, script)?;
    Ok(())
}

#[cfg(not(any(unix, windows)))]
fn write_wrapper(_bin_dir: &Path, _bin_name: &str, _relative_target: &Path) -> Result<()> {
    Ok(())
}
