use crate::colors::*;
use crate::installer::MODULES_DIR;
use crate::manifest;
use anyhow::{bail, Context, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

fn path_with_bin_prefix(bin_dir: &Path) -> Option<OsString> {
    if !bin_dir.exists() {
        return None;
    }
    let sep = if cfg!(windows) { ";" } else { ":" };
    let mut prefixed = OsString::from(bin_dir.as_os_str());
    if let Some(current) = std::env::var_os("PATH") {
        prefixed.push(sep);
        prefixed.push(current);
    }
    Some(prefixed)
}

fn quote_arg(arg: &str) -> String {
    if !arg.is_empty()
        && arg.chars().all(|c| c.is_ascii_alphanumeric() || "-_./=".contains(c))
    {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

pub fn cmd_run(args: Vec<String>) -> Result<()> {
    if args.is_empty() {
        println!("Usage: sprig run <script> [args...]");
        return Ok(());
    }
    let script_name = &args[0];
    let pass_args = &args[1..];

    let manifest =
        manifest::load(&PathBuf::from(manifest::FILE_NAME)).context("load package.json")?;
    let Some(command) = manifest.scripts.get(script_name) else {
        let available: Vec<&str> = manifest.scripts.keys().map(|s| s.as_str()).collect();
        bail!(
            "script '{script_name}' not found in package.json (available: {})",
            available.join(", ")
        );
    };

    let mut full = command.clone();
    for arg in pass_args {
        full.push(' ');
        full.push_str(&quote_arg(arg));
    }

    println!("{C_GRAY}[sprig]{C_RESET} running script: {script_name} -> {full}");
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(&full);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(&full);
        c
    };
    let bin_dir = Path::new(MODULES_DIR).join(".bin");
    if let Some(path) = path_with_bin_prefix(&bin_dir) {
        cmd.env("PATH", &path);
        if cfg!(windows) {
            cmd.env("Path", &path);
        }
    }
    let status = cmd
        .status()
        .with_context(|| format!("spawn script {script_name}"))?;
    if !status.success() {
        bail!("script {script_name} failed");
    }
    Ok(())
}
