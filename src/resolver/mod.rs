use crate::error::{Error, Result};
use crate::fetch::RegistryMetadata;
use semver::{Version, VersionReq};

const LATEST_TAG: &str = "latest";

/// Map a manifest requirement to one concrete published version.
///
/// Precedence: dist-tag sentinels (`latest`, `*`), then semver ranges
/// (highest satisfying version), then literal or prefix matches (highest
/// matching version). Pure with respect to its inputs.
pub fn resolve(requirement: &str, meta: &RegistryMetadata) -> Result<String> {
    let req = requirement.trim();
    if req.is_empty() || req == LATEST_TAG || req == "*" {
        return meta
            .dist_tags
            .get(LATEST_TAG)
            .cloned()
            .ok_or_else(|| Error::MissingDistTag { tag: LATEST_TAG.to_string() });
    }
    if is_range(req) {
        return resolve_range(req, meta);
    }
    resolve_prefix(req, meta)
}

fn is_range(req: &str) -> bool {
    req.starts_with(['^', '~', '>', '<', '='])
        || req.contains(" - ")
        || req.split_whitespace().nth(1).is_some()
        || has_wildcard(req)
}

fn has_wildcard(req: &str) -> bool {
    req.split('.').any(|part| part.eq_ignore_ascii_case("x") || part == "*")
}

fn resolve_range(requirement: &str, meta: &RegistryMetadata) -> Result<String> {
    let canonical = canonicalize_range(requirement);
    let req = VersionReq::parse(&canonical).map_err(|source| Error::InvalidRange {
        requirement: requirement.to_string(),
        source,
    })?;
    // Only keys that parse as valid semver participate in range matching.
    let mut published: Vec<Version> = meta
        .versions
        .keys()
        .filter_map(|raw| Version::parse(raw).ok())
        .collect();
    published.sort();
    published
        .iter()
        .rev()
        .find(|v| req.matches(v))
        .map(|v| v.to_string())
        .ok_or_else(|| Error::NoMatchingVersion { requirement: requirement.to_string() })
}

/// Exact published version, or the highest version under the requirement's
/// segment prefix ("1.2" matches 1.2.x but never 1.20.0).
fn resolve_prefix(requirement: &str, meta: &RegistryMetadata) -> Result<String> {
    let prefix = format!("{requirement}.");
    meta.versions
        .keys()
        .filter(|raw| raw.as_str() == requirement || raw.starts_with(&prefix))
        .max_by(|a, b| match (Version::parse(a.as_str()), Version::parse(b.as_str())) {
            (Ok(av), Ok(bv)) => av.cmp(&bv),
            _ => a.cmp(b),
        })
        .cloned()
        .ok_or_else(|| Error::NoMatchingVersion { requirement: requirement.to_string() })
}

/// Normalize npm range syntax the `semver` crate does not accept directly:
/// hyphen ranges, whitespace-separated comparator sets, and x-wildcards.
pub fn canonicalize_range(input: &str) -> String {
    let s = input.trim();

    // Hyphen range: "1.2.3 - 2.3.4" => ">=1.2.3, <=2.3.4"
    if let Some((left, right)) = s.split_once(" - ") {
        let (left, right) = (left.trim(), right.trim());
        if !left.is_empty() && !right.is_empty() {
            return format!(">={left}, <={right}");
        }
    }

    if has_wildcard(s) {
        return expand_wildcard(s);
    }

    // Comparator sets separated by spaces: ">=1.2.0 <2.0.0" => ">=1.2.0, <2.0.0"
    let tokens: Vec<&str> = s.split_whitespace().collect();
    if tokens.len() > 1 {
        let mut comparators: Vec<String> = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            let tok = tokens[i];
            if is_operator(tok) {
                // Operator split from its version: ">= 1.2.0"
                match tokens.get(i + 1) {
                    Some(ver) => {
                        comparators.push(format!("{tok}{ver}"));
                        i += 2;
                    }
                    None => return s.to_string(),
                }
            } else {
                comparators.push(tok.to_string());
                i += 1;
            }
        }
        return comparators.join(", ");
    }

    s.to_string()
}

fn is_operator(tok: &str) -> bool {
    matches!(tok, ">" | "<" | ">=" | "<=" | "=" | "^" | "~")
}

fn expand_wildcard(pattern: &str) -> String {
    let parts: Vec<&str> = pattern.split('.').collect();
    let is_x = |p: &str| p.eq_ignore_ascii_case("x") || p == "*";
    match parts.as_slice() {
        &[maj, rest] if is_x(rest) => {
            if let Ok(maj) = maj.parse::<u64>() {
                return format!(">={maj}.0.0, <{}.0.0", maj + 1);
            }
        }
        &[maj, min, rest] if is_x(rest) => {
            if let (Ok(maj), Ok(min)) = (maj.parse::<u64>(), min.parse::<u64>()) {
                return format!(">={maj}.{min}.0, <{maj}.{}.0", min + 1);
            }
        }
        _ => {}
    }
    pattern.to_string()
}
