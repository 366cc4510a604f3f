use crate::error::Error;
use crate::fetch::{DistInfo, RegistryMetadata, VersionMetadata};
use crate::resolver::{canonicalize_range, resolve};
use semver::VersionReq;
use std::collections::BTreeMap;

fn meta_with(versions: &[&str], latest: Option<&str>) -> RegistryMetadata {
    let mut meta = RegistryMetadata::default();
    for v in versions {
        meta.versions.insert(
            v.to_string(),
            VersionMetadata {
                dist: DistInfo { tarball: format!("https://registry.test/{v}.tgz") },
                dependencies: BTreeMap::new(),
            },
        );
    }
    if let Some(latest) = latest {
        meta.dist_tags.insert("latest".into(), latest.into());
    }
    meta
}

#[test]
fn caret_range_selects_highest_satisfying() {
    let meta = meta_with(&["1.0.0", "1.1.0", "1.3.0", "2.0.0"], None);
    assert_eq!(resolve("^1.0.0", &meta).unwrap(), "1.3.0");
}

#[test]
fn tilde_range_stays_within_minor() {
    let meta = meta_with(&["1.0.0", "1.1.0", "1.1.5", "1.2.0"], None);
    assert_eq!(resolve("~1.1.0", &meta).unwrap(), "1.1.5");
}

#[test]
fn star_uses_latest_dist_tag_not_version_ordering() {
    let meta = meta_with(&["1.0.0", "2.0.0", "3.0.0"], Some("2.0.0"));
    assert_eq!(resolve("*", &meta).unwrap(), "2.0.0");
    assert_eq!(resolve("latest", &meta).unwrap(), "2.0.0");
}

#[test]
fn latest_without_dist_tag_fails() {
    let meta = meta_with(&["1.0.0"], None);
    assert!(matches!(
        resolve("latest", &meta),
        Err(Error::MissingDistTag { .. })
    ));
}

#[test]
fn comparator_set_selects_highest_in_window() {
    let meta = meta_with(&["1.0.0", "1.1.0", "1.2.9", "1.3.0"], None);
    assert_eq!(resolve(">=1.1.0 <1.3.0", &meta).unwrap(), "1.2.9");
}

#[test]
fn hyphen_range_is_inclusive() {
    let meta = meta_with(&["0.9.0", "1.0.0", "1.1.0", "1.2.0"], None);
    assert_eq!(resolve("1.0.0 - 1.1.0", &meta).unwrap(), "1.1.0");
}

#[test]
fn wildcard_expands_to_major_window() {
    let meta = meta_with(&["0.9.0", "1.0.0", "1.4.2", "2.0.0"], None);
    assert_eq!(resolve("1.x", &meta).unwrap(), "1.4.2");
}

#[test]
fn exact_version_matches_literally() {
    let meta = meta_with(&["1.0.0", "1.1.0"], None);
    assert_eq!(resolve("1.1.0", &meta).unwrap(), "1.1.0");
}

#[test]
fn prefix_selects_highest_within_segment_boundary() {
    let meta = meta_with(&["1.0.0", "1.1.0", "1.1.5", "1.10.0"], None);
    // "1.1" means 1.1.x; it must not match 1.10.0.
    assert_eq!(resolve("1.1", &meta).unwrap(), "1.1.5");
}

#[test]
fn unsatisfiable_range_fails() {
    let meta = meta_with(&["1.0.0", "1.3.0"], None);
    assert!(matches!(
        resolve("^3.0.0", &meta),
        Err(Error::NoMatchingVersion { .. })
    ));
}

#[test]
fn unparseable_range_fails() {
    let meta = meta_with(&["1.0.0"], None);
    assert!(matches!(
        resolve("^not.a.version", &meta),
        Err(Error::InvalidRange { .. })
    ));
}

#[test]
fn non_semver_published_versions_are_ignored() {
    let meta = meta_with(&["banana", "1.0.0"], None);
    assert_eq!(resolve("^1.0.0", &meta).unwrap(), "1.0.0");
}

#[test]
fn unknown_prefix_fails() {
    let meta = meta_with(&["1.0.0"], None);
    assert!(matches!(
        resolve("4.2", &meta),
        Err(Error::NoMatchingVersion { .. })
    ));
}

#[test]
fn canonicalize_hyphen_range() {
    assert_eq!(canonicalize_range("1.2.3 - 2.3.4"), ">=1.2.3, <=2.3.4");
}

#[test]
fn canonicalize_spaced_comparators() {
    let out = canonicalize_range(">= 2.1.2 < 3.0.0");
    assert_eq!(out, ">=2.1.2, <3.0.0");
    assert!(VersionReq::parse(&out).is_ok());
}

#[test]
fn canonicalize_wildcards() {
    assert_eq!(canonicalize_range("1.x"), ">=1.0.0, <2.0.0");
    assert_eq!(canonicalize_range("1.2.x"), ">=1.2.0, <1.3.0");
}

#[test]
fn canonicalize_leaves_single_comparator() {
    assert_eq!(canonicalize_range("^2.0.0"), "^2.0.0");
    assert!(VersionReq::parse("^2.0.0").is_ok());
}
