//! Well-known context keys.

pub const PROJECT_NAME: &str = "projectName";
pub const PROJECT_NAME_CAPITALIZED: &str = "projectNameCapitalized";
pub const PROJECT_VERSION: &str = "projectVersion";
pub const PROJECT_STEREOTYPE: &str = "projectStereotype";
pub const PROJECT_EFFECTIVE_VERSION: &str = "projectEffectiveVersion";
pub const PROJECT_SNAPSHOT: &str = "projectSnapshot";
pub const PROJECT_DESCRIPTION: &str = "projectDescription";
pub const PROJECT_LONG_DESCRIPTION: &str = "projectLongDescription";
pub const PROJECT_LICENSE: &str = "projectLicense";
pub const PROJECT_INCEPTION_YEAR: &str = "projectInceptionYear";
pub const PROJECT_COPYRIGHT: &str = "projectCopyright";
pub const PROJECT_VENDOR: &str = "projectVendor";
pub const PROJECT_LINK_PREFIX: &str = "projectLink";

pub const PROJECT_VERSION_PREFIX: &str = "projectVersion";
pub const PROJECT_VERSION_NUMBER: &str = "projectVersionNumber";
pub const PROJECT_VERSION_WITH_UNDERSCORES: &str = "projectVersionWithUnderscores";
pub const PROJECT_VERSION_WITH_DASHES: &str = "projectVersionWithDashes";

pub const PROJECT_JAVA_GROUP_ID: &str = "projectJavaGroupId";
pub const PROJECT_JAVA_ARTIFACT_ID: &str = "projectJavaArtifactId";
pub const PROJECT_JAVA_VERSION: &str = "projectJavaVersion";
pub const PROJECT_JAVA_MAIN_CLASS: &str = "projectJavaMainClass";

pub const OS_NAME: &str = "osName";
pub const OS_ARCH: &str = "osArch";
pub const OS_VERSION: &str = "osVersion";
pub const OS_PLATFORM: &str = "osPlatform";
pub const OS_PLATFORM_REPLACED: &str = "osPlatformReplaced";

pub const REPO_HOST: &str = "repoHost";
pub const REPO_OWNER: &str = "repoOwner";
pub const REPO_NAME: &str = "repoName";
pub const REPO_BRANCH: &str = "repoBranch";
pub const REVERSE_REPO_HOST: &str = "reverseRepoHost";
pub const CANONICAL_REPO_NAME: &str = "canonicalRepoName";
pub const TAG_NAME: &str = "tagName";
pub const RELEASE_NAME: &str = "releaseName";
pub const MILESTONE_NAME: &str = "milestoneName";

pub const REPO_URL: &str = "repoUrl";
pub const REPO_CLONE_URL: &str = "repoCloneUrl";
pub const COMMIT_URL: &str = "commitUrl";
pub const SRC_URL: &str = "srcUrl";
pub const RELEASE_NOTES_URL: &str = "releaseNotesUrl";
pub const LATEST_RELEASE_URL: &str = "latestReleaseUrl";
pub const ISSUE_TRACKER_URL: &str = "issueTrackerUrl";

pub const NOW: &str = "now";
