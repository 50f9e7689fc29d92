use std::fmt;

use serde::Deserialize;

/// When a target is active relative to the kind of release being made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Active {
    Always,
    Never,
    Release,
    Prerelease,
    ReleasePrerelease,
    Snapshot,
}

impl Active {
    pub fn check(self, snapshot: bool, prerelease: bool) -> bool {
        match self {
            Active::Always => true,
            Active::Never => false,
            Active::Release => !snapshot && !prerelease,
            Active::Prerelease => !snapshot && prerelease,
            Active::ReleasePrerelease => !snapshot,
            Active::Snapshot => snapshot,
        }
    }
}

impl fmt::Display for Active {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Active::Always => "ALWAYS",
            Active::Never => "NEVER",
            Active::Release => "RELEASE",
            Active::Prerelease => "PRERELEASE",
            Active::ReleasePrerelease => "RELEASE_PRERELEASE",
            Active::Snapshot => "SNAPSHOT",
        })
    }
}
