use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::context::ContextBag;

static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)(?:\.(\d+))?(?:\.(\d+))?(?:[-.]([^+]+))?(?:\+(.+))?$")
        .expect("version pattern is valid")
});

/// A leniently parsed semantic version: `major[.minor[.patch]][-tag][+build]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticVersion {
    pub major: u64,
    pub minor: Option<u64>,
    pub patch: Option<u64>,
    pub tag: Option<String>,
    pub build: Option<String>,
}

impl SemanticVersion {
    pub fn parse(version: &str) -> Option<Self> {
        let caps = VERSION_PATTERN.captures(version.trim())?;
        let number = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u64>().ok());
        let text = |i: usize| caps.get(i).map(|m| m.as_str().to_string());

        Some(Self {
            major: number(1)?,
            minor: number(2),
            patch: number(3),
            tag: text(4),
            build: text(5),
        })
    }

    /// The numeric part, e.g. `1.2.3` for `1.2.3-RC1+42`.
    pub fn number(&self) -> String {
        let mut out = self.major.to_string();
        if let Some(minor) = self.minor {
            out.push_str(&format!(".{minor}"));
            if let Some(patch) = self.patch {
                out.push_str(&format!(".{patch}"));
            }
        }
        out
    }

    /// Writes `<prefix>Major`, `<prefix>Minor`, ... for the parts that exist.
    pub fn fill_props(&self, prefix: &str, bag: &mut ContextBag) {
        bag.insert(format!("{prefix}Major"), self.major);
        if let Some(minor) = self.minor {
            bag.insert(format!("{prefix}Minor"), minor);
        }
        if let Some(patch) = self.patch {
            bag.insert(format!("{prefix}Patch"), patch);
        }
        if let Some(tag) = &self.tag {
            bag.insert(format!("{prefix}Tag"), tag);
        }
        if let Some(build) = &self.build {
            bag.insert(format!("{prefix}Build"), build);
        }
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.number())?;
        if let Some(tag) = &self.tag {
            write!(f, "-{tag}")?;
        }
        if let Some(build) = &self.build {
            write!(f, "+{build}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextValue;

    #[test]
    fn test_full_version() {
        let v = SemanticVersion::parse("1.2.3-RC1+42").unwrap();
        assert_eq!(v.major, 1);
        assert_eq!(v.minor, Some(2));
        assert_eq!(v.patch, Some(3));
        assert_eq!(v.tag.as_deref(), Some("RC1"));
        assert_eq!(v.build.as_deref(), Some("42"));
        assert_eq!(v.number(), "1.2.3");
        assert_eq!(v.to_string(), "1.2.3-RC1+42");
    }

    #[test]
    fn test_partial_version() {
        let v = SemanticVersion::parse("17").unwrap();
        assert_eq!(v.minor, None);
        assert_eq!(v.number(), "17");

        let v = SemanticVersion::parse("1.0-SNAPSHOT").unwrap();
        assert_eq!(v.minor, Some(0));
        assert_eq!(v.patch, None);
        assert_eq!(v.tag.as_deref(), Some("SNAPSHOT"));
    }

    #[test]
    fn test_not_a_version() {
        assert!(SemanticVersion::parse("latest").is_none());
        assert!(SemanticVersion::parse("").is_none());
    }

    #[test]
    fn test_fill_props() {
        let mut bag = ContextBag::new();
        SemanticVersion::parse("2.5").unwrap().fill_props("projectVersion", &mut bag);
        assert_eq!(bag.get("projectVersionMajor"), Some(&ContextValue::Integer(2)));
        assert_eq!(bag.get("projectVersionMinor"), Some(&ContextValue::Integer(5)));
        assert!(!bag.contains_key("projectVersionPatch"));
        assert!(!bag.contains_key("projectVersionTag"));
    }
}
