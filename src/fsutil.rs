use std::path::{Path, PathBuf};

pub fn ensure_dir(p: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(p)
}

/// Join `rel` under `base`, refusing path-traversal segments.
pub fn safe_join(base: &Path, rel: &str) -> Option<PathBuf> {
    if rel.split('/').any(|part| part == "..") {
        return None;
    }
    let mut p = base.to_path_buf();
    p.push(rel);
    Some(p)
}
