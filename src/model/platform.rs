use std::collections::BTreeMap;

use serde::Deserialize;

use crate::merge::{merge_map, Mergeable};

/// Platform-string replacements (`osx` → `darwin`, `aarch_64` → `arm64`, ...).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Platform {
    pub replacements: BTreeMap<String, String>,
}

impl Mergeable for Platform {
    fn merge(&mut self, source: &Self) {
        merge_map(&mut self.replacements, &source.replacements);
    }
}

impl Platform {
    /// Applies replacements to an `os-arch` platform string.
    ///
    /// An entry for the whole string wins; otherwise the OS and arch parts are
    /// replaced independently.
    pub fn apply_replacements(&self, platform: &str) -> String {
        if let Some(replacement) = self.replacements.get(platform) {
            return replacement.clone();
        }

        match platform.split_once('-') {
            Some((os, arch)) => format!("{}-{}", self.replace(os), self.replace(arch)),
            None => self.replace(platform).to_string(),
        }
    }

    fn replace<'a>(&'a self, part: &'a str) -> &'a str {
        self.replacements.get(part).map(String::as_str).unwrap_or(part)
    }
}

/// Detected operating system details, normalized to release-artifact names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsInfo {
    pub name: String,
    pub arch: String,
    pub version: String,
}

impl Default for OsInfo {
    fn default() -> Self {
        Self::detect()
    }
}

impl OsInfo {
    pub fn new(name: impl Into<String>, arch: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arch: arch.into(),
            version: version.into(),
        }
    }

    pub fn detect() -> Self {
        Self {
            name: normalize_os(std::env::consts::OS).to_string(),
            arch: normalize_arch(std::env::consts::ARCH).to_string(),
            version: detect_version(),
        }
    }

    /// `os-arch`, e.g. `linux-x86_64` or `osx-aarch_64`.
    pub fn platform(&self) -> String {
        format!("{}-{}", self.name, self.arch)
    }
}

fn normalize_os(os: &str) -> &str {
    match os {
        "macos" | "ios" => "osx",
        other => other,
    }
}

fn normalize_arch(arch: &str) -> &str {
    match arch {
        "aarch64" => "aarch_64",
        "x86" => "x86_32",
        "arm" => "arm_32",
        "powerpc64" => "ppc_64",
        "s390x" => "s390_64",
        other => other,
    }
}

#[cfg(target_os = "linux")]
fn detect_version() -> String {
    std::fs::read_to_string("/proc/sys/kernel/osrelease")
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

#[cfg(not(target_os = "linux"))]
fn detect_version() -> String {
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn platform(entries: &[(&str, &str)]) -> Platform {
        Platform {
            replacements: entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_part_replacements() {
        let p = platform(&[("osx", "darwin"), ("aarch_64", "arm64")]);
        assert_eq!(p.apply_replacements("osx-aarch_64"), "darwin-arm64");
        assert_eq!(p.apply_replacements("linux-x86_64"), "linux-x86_64");
    }

    #[test]
    fn test_full_replacement_wins() {
        let p = platform(&[("osx-x86_64", "mac"), ("osx", "darwin")]);
        assert_eq!(p.apply_replacements("osx-x86_64"), "mac");
    }

    #[test]
    fn test_normalization() {
        assert_eq!(normalize_os("macos"), "osx");
        assert_eq!(normalize_arch("aarch64"), "aarch_64");
        assert_eq!(OsInfo::new("linux", "x86_64", "6.1").platform(), "linux-x86_64");
    }
}
