use crate::error::{Error, Result};
use crate::fetch::Fetcher;
use flate2::read::GzDecoder;
use std::fs;
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};
use tar::{Archive, EntryType};

/// Drop the synthetic top-level directory registry tarballs wrap around
/// package contents. Entries with fewer than two path segments carry no
/// package content and resolve to `None`.
pub fn strip_root_component(path: &Path) -> Option<PathBuf> {
    let mut components = path.components();
    components.next()?;
    let rest = components.as_path();
    if rest.as_os_str().is_empty() {
        None
    } else {
        Some(rest.to_path_buf())
    }
}

/// Stream a gzip-compressed tarball into `dest`, stripping the archive's
/// root directory from every entry. Directories are created recursively,
/// regular files are written (replacing whatever is at that path), all
/// other entry types are ignored. A failure mid-extraction leaves the
/// destination partially populated.
pub fn unpack<R: Read>(reader: R, url: &str, dest: &Path) -> Result<()> {
    let archive_err = |source: io::Error| Error::Archive { url: url.to_string(), source };

    let gz = GzDecoder::new(reader);
    let mut archive = Archive::new(gz);
    for entry in archive.entries().map_err(archive_err)? {
        let mut entry = entry.map_err(archive_err)?;
        let raw_path = entry.path().map_err(archive_err)?.into_owned();
        if raw_path.components().any(|c| matches!(c, Component::ParentDir)) {
            continue;
        }
        let Some(rel) = strip_root_component(&raw_path) else {
            continue;
        };
        let target = dest.join(rel);
        match entry.header().entry_type() {
            EntryType::Directory => {
                fs::create_dir_all(&target).map_err(archive_err)?;
            }
            t if t.is_file() => {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent).map_err(archive_err)?;
                }
                let mut out = fs::File::create(&target).map_err(archive_err)?;
                io::copy(&mut entry, &mut out).map_err(archive_err)?;
            }
            _ => {}
        }
    }
    Ok(())
}

/// Download `url` and materialize its contents under `dest`.
pub fn fetch_and_unpack(fetcher: &Fetcher, url: &str, dest: &Path) -> Result<()> {
    let body = fetcher.open_tarball(url)?;
    unpack(body, url, dest)
}
