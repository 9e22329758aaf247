//! Dotted version identifiers and the ordering used by the data version gate.
//!
//! A version is one or more dot-separated numeric components, optionally
//! prefixed with `v`, followed by an optional `-pre.release` list and optional
//! `+build` metadata (`1.3.4`, `v2.0`, `1.0.0-rc.1+20240101`).
//!
//! Two comparison modes exist. The non-strict mode treats missing trailing
//! components as zero and ignores build metadata, so `1.3` and `1.3.0+ci`
//! compare equal. The strict mode makes the component count significant and
//! orders build metadata lexically.

use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt, str::FromStr};

/// Parse both inputs and compare them.
pub fn compare(a: &str, b: &str, strict: bool) -> Result<Ordering, VersionError> {
    let a: Version = a.parse()?;
    let b: Version = b.parse()?;
    Ok(a.cmp_with(&b, strict))
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    components: Vec<u64>,
    pre: Vec<Identifier>,
    build: Option<String>,
}

/// One dot-separated pre-release identifier.
///
/// Numeric identifiers sort before alphanumeric ones, which is what the derived
/// ordering gives us from the variant order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Identifier {
    Numeric(u64),
    Alpha(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    #[error("version string is empty")]
    Empty,
    #[error("invalid numeric component '{component}' in version '{input}'")]
    InvalidComponent { input: String, component: String },
    #[error("invalid identifier '{identifier}' in version '{input}'")]
    InvalidIdentifier { input: String, identifier: String },
}

impl Version {
    pub fn new(components: impl Into<Vec<u64>>) -> Self {
        Self {
            components: components.into(),
            pre: Vec::new(),
            build: None,
        }
    }

    pub fn components(&self) -> &[u64] {
        &self.components
    }

    pub fn pre_release(&self) -> &[Identifier] {
        &self.pre
    }

    pub fn build(&self) -> Option<&str> {
        self.build.as_deref()
    }

    pub fn is_pre_release(&self) -> bool {
        !self.pre.is_empty()
    }

    /// Order `self` relative to `other`.
    pub fn cmp_with(&self, other: &Version, strict: bool) -> Ordering {
        let core = if strict {
            self.components.cmp(&other.components)
        } else {
            cmp_padded(&self.components, &other.components)
        };
        core.then_with(|| cmp_pre(&self.pre, &other.pre))
            .then_with(|| {
                if strict {
                    self.build.cmp(&other.build)
                } else {
                    Ordering::Equal
                }
            })
    }

    /// `self >= minimum` in non-strict mode: the check the version gate applies.
    pub fn satisfies(&self, minimum: &Version) -> bool {
        self.cmp_with(minimum, false) != Ordering::Less
    }
}

fn cmp_padded(a: &[u64], b: &[u64]) -> Ordering {
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| {
            let left = a.get(i).copied().unwrap_or(0);
            let right = b.get(i).copied().unwrap_or(0);
            left.cmp(&right)
        })
        .find(|ord| *ord != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

fn cmp_pre(a: &[Identifier], b: &[Identifier]) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => Ordering::Equal,
        // A release outranks any of its pre-releases.
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.cmp(b),
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let body = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);
        if body.is_empty() {
            return Err(VersionError::Empty);
        }

        let (rest, build) = match body.split_once('+') {
            Some((rest, build)) => {
                if !is_identifier(build.split('.')) {
                    return Err(VersionError::InvalidIdentifier {
                        input: input.to_string(),
                        identifier: build.to_string(),
                    });
                }
                (rest, Some(build.to_string()))
            }
            None => (body, None),
        };
        let (core, pre) = match rest.split_once('-') {
            Some((core, pre)) => (core, Some(pre)),
            None => (rest, None),
        };

        let components = core
            .split('.')
            .map(|part| {
                if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(VersionError::InvalidComponent {
                        input: input.to_string(),
                        component: part.to_string(),
                    });
                }
                part.parse::<u64>().map_err(|_| VersionError::InvalidComponent {
                    input: input.to_string(),
                    component: part.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let pre = match pre {
            Some(pre) => pre
                .split('.')
                .map(|part| parse_identifier(input, part))
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        Ok(Version {
            components,
            pre,
            build,
        })
    }
}

fn is_identifier<'a>(mut parts: impl Iterator<Item = &'a str>) -> bool {
    parts.all(|part| {
        !part.is_empty()
            && part
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-')
    })
}

fn parse_identifier(input: &str, part: &str) -> Result<Identifier, VersionError> {
    if !is_identifier(std::iter::once(part)) {
        return Err(VersionError::InvalidIdentifier {
            input: input.to_string(),
            identifier: part.to_string(),
        });
    }
    if part.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(n) = part.parse::<u64>() {
            return Ok(Identifier::Numeric(n));
        }
    }
    Ok(Identifier::Alpha(part.to_string()))
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Numeric(n) => write!(f, "{n}"),
            Identifier::Alpha(s) => f.write_str(s),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for component in &self.components {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{component}")?;
            first = false;
        }
        if !self.pre.is_empty() {
            f.write_str("-")?;
            for (i, ident) in self.pre.iter().enumerate() {
                if i > 0 {
                    f.write_str(".")?;
                }
                write!(f, "{ident}")?;
            }
        }
        if let Some(build) = &self.build {
            write!(f, "+{build}")?;
        }
        Ok(())
    }
}

impl TryFrom<String> for Version {
    type Error = VersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Version> for String {
    fn from(value: Version) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        s.parse().expect("version")
    }

    #[test]
    fn numeric_components_compare_numerically() {
        assert_eq!(compare("1.10.0", "1.9.9", false), Ok(Ordering::Greater));
        assert_eq!(compare("1.0.0", "1.3.4", false), Ok(Ordering::Less));
        assert_eq!(compare("2.0.0", "1.3.4", false), Ok(Ordering::Greater));
        assert_eq!(compare("1.3.4", "1.3.4", false), Ok(Ordering::Equal));
    }

    #[test]
    fn non_strict_pads_missing_components() {
        assert_eq!(compare("1.3", "1.3.0", false), Ok(Ordering::Equal));
        assert_eq!(compare("1.3", "1.3.1", false), Ok(Ordering::Less));
        assert_eq!(compare("v1.3.0", "1.3", false), Ok(Ordering::Equal));
    }

    #[test]
    fn strict_counts_components_and_build() {
        assert_eq!(compare("1.3", "1.3.0", true), Ok(Ordering::Less));
        assert_eq!(compare("1.3.0+b2", "1.3.0+b1", true), Ok(Ordering::Greater));
        assert_eq!(compare("1.3.0+b2", "1.3.0+b1", false), Ok(Ordering::Equal));
        assert_eq!(compare("1.3.0", "1.3.0+b1", true), Ok(Ordering::Less));
    }

    #[test]
    fn pre_releases_rank_below_release() {
        assert_eq!(compare("1.0.0-rc.1", "1.0.0", false), Ok(Ordering::Less));
        assert_eq!(compare("1.0.0-alpha", "1.0.0-alpha.1", false), Ok(Ordering::Less));
        assert_eq!(compare("1.0.0-alpha.1", "1.0.0-alpha.beta", false), Ok(Ordering::Less));
        assert_eq!(compare("1.0.0-rc.2", "1.0.0-rc.10", false), Ok(Ordering::Less));
        assert!(v("1.0.0-beta").is_pre_release());
    }

    #[test]
    fn satisfies_accepts_equal_and_newer() {
        let system = v("1.3.4");
        assert!(v("1.3.4").satisfies(&system));
        assert!(v("2.0.0").satisfies(&system));
        assert!(!v("1.0.0").satisfies(&system));
    }

    #[test]
    fn malformed_versions_are_rejected() {
        assert_eq!("".parse::<Version>(), Err(VersionError::Empty));
        assert_eq!("v".parse::<Version>(), Err(VersionError::Empty));
        assert!(matches!(
            "1..2".parse::<Version>(),
            Err(VersionError::InvalidComponent { .. })
        ));
        assert!(matches!(
            "1.x.2".parse::<Version>(),
            Err(VersionError::InvalidComponent { .. })
        ));
        assert!(matches!(
            "1.2.3-".parse::<Version>(),
            Err(VersionError::InvalidIdentifier { .. })
        ));
        assert!(compare("1.0", "nope", false).is_err());
    }

    #[test]
    fn display_and_serde_use_canonical_text() {
        let parsed = v("v1.2.3-rc.1+build.7");
        assert_eq!(parsed.components(), &[1, 2, 3]);
        assert_eq!(parsed.build(), Some("build.7"));
        assert_eq!(parsed.to_string(), "1.2.3-rc.1+build.7");

        let json = serde_json::to_string(&parsed).expect("serialize");
        assert_eq!(json, "\"1.2.3-rc.1+build.7\"");
        let back: Version = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, parsed);
        assert!(serde_json::from_str::<Version>("\"1.a\"").is_err());
    }
}
