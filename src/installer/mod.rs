use crate::archive;
use crate::colors::*;
use crate::error::{Error, Result};
use crate::fetch::Fetcher;
use crate::linker;
use crate::lockfile::{LockedDependency, Lockfile};
use crate::manifest::Manifest;
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

pub const MODULES_DIR: &str = "node_modules";

/// Per-run record of resolved installs for one dependency-set role, shared
/// by every task and recursive call operating on that role.
#[derive(Debug, Default)]
pub struct LockMap {
    inner: Mutex<LockMapInner>,
}

#[derive(Debug, Default)]
struct LockMapInner {
    entries: BTreeMap<String, LockedDependency>,
    /// Names claimed during this run. A claimed name is never re-entered,
    /// which also bounds recursion on dependency cycles.
    claimed: BTreeSet<String>,
}

impl LockMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from entries recorded by a previous run (the reproducible path).
    pub fn seeded(entries: BTreeMap<String, LockedDependency>) -> Self {
        Self {
            inner: Mutex::new(LockMapInner { entries, claimed: BTreeSet::new() }),
        }
    }

    /// Atomically claim `name` for installation. Returns false when the
    /// name was already claimed during this run, or carries an entry from a
    /// previous run and `force` is not set.
    fn begin(&self, name: &str, force: bool) -> bool {
        let mut inner = self.inner.lock();
        if inner.claimed.contains(name) {
            return false;
        }
        if !force && inner.entries.contains_key(name) {
            return false;
        }
        inner.claimed.insert(name.to_string());
        true
    }

    fn commit(&self, name: &str, entry: LockedDependency) {
        self.inner.lock().entries.insert(name.to_string(), entry);
    }

    /// Drop a failed claim so the name is not treated as installed.
    fn release(&self, name: &str) {
        self.inner.lock().claimed.remove(name);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.lock().entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<LockedDependency> {
        self.inner.lock().entries.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_entries(self) -> BTreeMap<String, LockedDependency> {
        self.inner.into_inner().entries
    }
}

/// Installs packages and their transitive dependencies into a local
/// modules directory.
#[derive(Debug)]
pub struct Installer {
    fetcher: Fetcher,
    modules_dir: PathBuf,
}

impl Installer {
    pub fn new(fetcher: Fetcher, modules_dir: impl Into<PathBuf>) -> Self {
        Self { fetcher, modules_dir: modules_dir.into() }
    }

    pub fn modules_dir(&self) -> &Path {
        &self.modules_dir
    }

    /// Install one package, then sequentially its transitive dependencies,
    /// sharing `lock` across the whole descent. A name already recorded in
    /// `lock` is a no-op unless `force` is set. The first failure aborts
    /// the entire subtree.
    pub fn install_package(
        &self,
        name: &str,
        requirement: &str,
        lock: &LockMap,
        force: bool,
    ) -> Result<()> {
        if !lock.begin(name, force) {
            return Ok(());
        }
        self.install_claimed(name, requirement, lock, force)
            .map_err(|source| {
                lock.release(name);
                Error::Install {
                    name: name.to_string(),
                    requirement: requirement.to_string(),
                    source: Box::new(source),
                }
            })
    }

    fn install_claimed(
        &self,
        name: &str,
        requirement: &str,
        lock: &LockMap,
        force: bool,
    ) -> Result<()> {
        println!("{C_GRAY}[sprig]{C_RESET} installing {name}@{requirement}");
        let meta = self.fetcher.package_metadata(name)?;
        let version = crate::resolver::resolve(requirement, &meta)?;
        let tarball = meta.tarball_url(&version)?.to_string();

        let dest = self.package_dir(name);
        archive::fetch_and_unpack(&self.fetcher, &tarball, &dest)?;
        linker::create_bin_links(&self.modules_dir, name, &dest)?;

        lock.commit(name, LockedDependency { version: version.clone(), resolved: tarball });

        if let Some(deps) = meta.dependencies_of(&version) {
            for (dep, dep_requirement) in deps {
                self.install_package(dep, dep_requirement, lock, force)?;
            }
        }
        Ok(())
    }

    fn package_dir(&self, name: &str) -> PathBuf {
        let mut dir = self.modules_dir.clone();
        for part in name.split('/') {
            dir.push(part);
        }
        dir
    }

    /// Install every top-level dependency declared in `manifest`, one
    /// concurrent task per package, each role against its own lock map.
    ///
    /// Failures are collected without stopping sibling tasks; any failure
    /// means no lockfile is assembled.
    pub fn install_all(&self, manifest: &Manifest) -> std::result::Result<Lockfile, Vec<Error>> {
        if let Err(e) = fs::create_dir_all(&self.modules_dir) {
            return Err(vec![Error::Io(e)]);
        }

        let prod = LockMap::new();
        let dev = LockMap::new();
        let failures: Mutex<Vec<Error>> = Mutex::new(Vec::new());

        rayon::scope(|scope| {
            let roles = [
                (&manifest.dependencies, &prod),
                (&manifest.dev_dependencies, &dev),
            ];
            for (deps, lock) in roles {
                for (name, requirement) in deps {
                    let failures = &failures;
                    scope.spawn(move |_| {
                        if let Err(e) = self.install_package(name, requirement, lock, false) {
                            failures.lock().push(e);
                        }
                    });
                }
            }
        });

        let mut failures = failures.into_inner();
        if !failures.is_empty() {
            failures.sort_by_key(|e| e.to_string());
            return Err(failures);
        }
        Ok(Lockfile {
            name: manifest.name.clone(),
            version: manifest.version.clone(),
            dependencies: prod.into_entries(),
            dev_dependencies: dev.into_entries(),
        })
    }

    /// Reproduce the exact state recorded in `lock`: the modules root is
    /// cleared and every entry reinstalled at its pinned version, the
    /// pinned version string acting as the requirement. Halts at the first
    /// failure, since a partial reproducible install is unsound.
    pub fn install_locked(&self, lock: &Lockfile) -> Result<()> {
        if self.modules_dir.exists() {
            fs::remove_dir_all(&self.modules_dir)?;
        }
        fs::create_dir_all(&self.modules_dir)?;

        let prod = LockMap::seeded(lock.dependencies.clone());
        for (name, dep) in &lock.dependencies {
            self.install_package(name, &dep.version, &prod, true)?;
        }
        let dev = LockMap::seeded(lock.dev_dependencies.clone());
        for (name, dep) in &lock.dev_dependencies {
            self.install_package(name, &dep.version, &dev, true)?;
        }
        Ok(())
    }
}
