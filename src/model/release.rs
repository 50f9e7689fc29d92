use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::{export, matches_pattern, Active, Project, ReleaseModel};
use crate::config::env::{env_or, env_override, EnvProvider};
use crate::context::{keys, ContextBag, ContextBuilder};
use crate::merge::{merge_nested, merge_scalar, merge_set, Mergeable};
use crate::template::{render_optional, ResolvableField, TemplateError};

pub const DEFAULT_CONNECT_TIMEOUT: u32 = 20;
pub const DEFAULT_READ_TIMEOUT: u32 = 60;

const PREVIOUS_TAG_NAME_KEY: &str = "previousTagName";
const PRERELEASE_PATTERN_KEY: &str = "prereleasePattern";

/// The hosting service a releaser talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ReleaserKind {
    #[default]
    Github,
    Gitlab,
    Gitea,
    Codeberg,
    Generic,
}

impl ReleaserKind {
    pub const ALL: [ReleaserKind; 5] = [
        ReleaserKind::Github,
        ReleaserKind::Gitlab,
        ReleaserKind::Gitea,
        ReleaserKind::Codeberg,
        ReleaserKind::Generic,
    ];

    pub fn service_name(self) -> &'static str {
        match self {
            ReleaserKind::Github => "github",
            ReleaserKind::Gitlab => "gitlab",
            ReleaserKind::Gitea => "gitea",
            ReleaserKind::Codeberg => "codeberg",
            ReleaserKind::Generic => "generic",
        }
    }

    /// Generic git hosts can be tagged but have no release API.
    pub fn is_release_supported(self) -> bool {
        !matches!(self, ReleaserKind::Generic)
    }

    pub fn default_host(self) -> Option<&'static str> {
        match self {
            ReleaserKind::Github => Some("github.com"),
            ReleaserKind::Gitlab => Some("gitlab.com"),
            ReleaserKind::Codeberg => Some("codeberg.org"),
            ReleaserKind::Gitea | ReleaserKind::Generic => None,
        }
    }
}

impl fmt::Display for ReleaserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.service_name())
    }
}

/// One releaser per hosting service; at most one is normally configured.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Release {
    pub github: Option<Releaser>,
    pub gitlab: Option<Releaser>,
    pub gitea: Option<Releaser>,
    pub codeberg: Option<Releaser>,
    pub generic: Option<Releaser>,
}

impl Mergeable for Release {
    fn merge(&mut self, source: &Self) {
        merge_nested(&mut self.github, &source.github);
        merge_nested(&mut self.gitlab, &source.gitlab);
        merge_nested(&mut self.gitea, &source.gitea);
        merge_nested(&mut self.codeberg, &source.codeberg);
        merge_nested(&mut self.generic, &source.generic);
    }
}

impl Release {
    fn slot_mut(&mut self, kind: ReleaserKind) -> &mut Option<Releaser> {
        match kind {
            ReleaserKind::Github => &mut self.github,
            ReleaserKind::Gitlab => &mut self.gitlab,
            ReleaserKind::Gitea => &mut self.gitea,
            ReleaserKind::Codeberg => &mut self.codeberg,
            ReleaserKind::Generic => &mut self.generic,
        }
    }

    pub fn get(&self, kind: ReleaserKind) -> Option<&Releaser> {
        match kind {
            ReleaserKind::Github => self.github.as_ref(),
            ReleaserKind::Gitlab => self.gitlab.as_ref(),
            ReleaserKind::Gitea => self.gitea.as_ref(),
            ReleaserKind::Codeberg => self.codeberg.as_ref(),
            ReleaserKind::Generic => self.generic.as_ref(),
        }
    }

    pub fn get_mut(&mut self, kind: ReleaserKind) -> Option<&mut Releaser> {
        self.slot_mut(kind).as_mut()
    }

    /// The first configured releaser, in [`ReleaserKind::ALL`] order.
    pub fn releaser(&self) -> Option<&Releaser> {
        ReleaserKind::ALL.into_iter().find_map(|kind| self.get(kind))
    }

    pub fn releaser_mut(&mut self) -> Option<&mut Releaser> {
        let kind = ReleaserKind::ALL
            .into_iter()
            .find(|kind| self.get(*kind).is_some())?;
        self.get_mut(kind)
    }

    /// Stamps each releaser with the kind of the slot it was loaded into.
    pub(crate) fn assign_kinds(&mut self) {
        for kind in ReleaserKind::ALL {
            if let Some(releaser) = self.slot_mut(kind) {
                releaser.kind = kind;
            }
        }
    }

    /// Merges the built-in defaults of each configured releaser's kind.
    pub(crate) fn apply_defaults(&mut self) {
        for kind in ReleaserKind::ALL {
            if let Some(releaser) = self.slot_mut(kind) {
                debug!(service = %kind, "applying releaser defaults");
                releaser.merge(&Releaser::defaults(kind));
            }
        }
    }
}

/// A release target on a git hosting service.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Releaser {
    #[serde(skip)]
    kind: ReleaserKind,
    pub enabled: Option<bool>,
    pub host: Option<String>,
    pub owner: Option<String>,
    pub name: Option<String>,
    pub repo_url: Option<String>,
    pub repo_clone_url: Option<String>,
    pub commit_url: Option<String>,
    pub src_url: Option<String>,
    pub download_url: Option<String>,
    pub release_notes_url: Option<String>,
    pub latest_release_url: Option<String>,
    pub issue_tracker_url: Option<String>,
    pub username: Option<String>,
    pub token: Option<String>,
    pub tag_name: Option<String>,
    pub previous_tag_name: Option<String>,
    pub release_name: Option<String>,
    pub branch: Option<String>,
    pub sign: Option<bool>,
    pub skip_tag: Option<bool>,
    pub skip_release: Option<bool>,
    pub overwrite: Option<bool>,
    pub api_endpoint: Option<String>,
    pub connect_timeout: Option<u32>,
    pub read_timeout: Option<u32>,
    pub artifacts: Option<bool>,
    pub files: Option<bool>,
    pub checksums: Option<bool>,
    pub signatures: Option<bool>,
    pub upload_assets: Option<Active>,
    #[serde(skip)]
    upload_assets_enabled: Option<bool>,
    pub commit_author: CommitAuthor,
    pub update: Update,
    pub prerelease: Prerelease,
    pub changelog: Changelog,
    pub milestone: Milestone,
    pub issues: Issues,
    #[serde(skip)]
    cached_tag_name: ResolvableField,
    #[serde(skip)]
    cached_release_name: ResolvableField,
}

impl Mergeable for Releaser {
    fn merge(&mut self, source: &Self) {
        merge_scalar(&mut self.enabled, &source.enabled);
        merge_scalar(&mut self.host, &source.host);
        merge_scalar(&mut self.owner, &source.owner);
        merge_scalar(&mut self.name, &source.name);
        merge_scalar(&mut self.repo_url, &source.repo_url);
        merge_scalar(&mut self.repo_clone_url, &source.repo_clone_url);
        merge_scalar(&mut self.commit_url, &source.commit_url);
        merge_scalar(&mut self.src_url, &source.src_url);
        merge_scalar(&mut self.download_url, &source.download_url);
        merge_scalar(&mut self.release_notes_url, &source.release_notes_url);
        merge_scalar(&mut self.latest_release_url, &source.latest_release_url);
        merge_scalar(&mut self.issue_tracker_url, &source.issue_tracker_url);
        merge_scalar(&mut self.username, &source.username);
        merge_scalar(&mut self.token, &source.token);
        merge_scalar(&mut self.tag_name, &source.tag_name);
        merge_scalar(&mut self.previous_tag_name, &source.previous_tag_name);
        merge_scalar(&mut self.release_name, &source.release_name);
        merge_scalar(&mut self.branch, &source.branch);
        merge_scalar(&mut self.sign, &source.sign);
        merge_scalar(&mut self.skip_tag, &source.skip_tag);
        merge_scalar(&mut self.skip_release, &source.skip_release);
        merge_scalar(&mut self.overwrite, &source.overwrite);
        merge_scalar(&mut self.api_endpoint, &source.api_endpoint);
        merge_scalar(&mut self.connect_timeout, &source.connect_timeout);
        merge_scalar(&mut self.read_timeout, &source.read_timeout);
        merge_scalar(&mut self.artifacts, &source.artifacts);
        merge_scalar(&mut self.files, &source.files);
        merge_scalar(&mut self.checksums, &source.checksums);
        merge_scalar(&mut self.signatures, &source.signatures);
        merge_scalar(&mut self.upload_assets, &source.upload_assets);
        merge_scalar(&mut self.upload_assets_enabled, &source.upload_assets_enabled);
        self.commit_author.merge(&source.commit_author);
        self.update.merge(&source.update);
        self.prerelease.merge(&source.prerelease);
        self.changelog.merge(&source.changelog);
        self.milestone.merge(&source.milestone);
        self.issues.merge(&source.issues);
    }
}

impl Releaser {
    pub fn new(kind: ReleaserKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Built-in defaults for a hosting service: URL templates and naming.
    pub fn defaults(kind: ReleaserKind) -> Self {
        let mut defaults = Self::new(kind);
        defaults.tag_name = Some("v{{projectVersion}}".into());
        defaults.release_name = Some("Release {{tagName}}".into());
        defaults.branch = Some("main".into());
        defaults.milestone.name = Some("{{tagName}}".into());
        defaults.host = kind.default_host().map(str::to_string);

        let base = "https://{{repoHost}}/{{repoOwner}}/{{repoName}}";
        let separator = match kind {
            ReleaserKind::Gitlab => "/-",
            _ => "",
        };
        match kind {
            ReleaserKind::Github => {
                defaults.api_endpoint = Some("https://api.github.com".into());
            }
            ReleaserKind::Gitlab => {
                defaults.api_endpoint = Some("https://gitlab.com/api/v4".into());
            }
            ReleaserKind::Codeberg => {
                defaults.api_endpoint = Some("https://codeberg.org".into());
            }
            ReleaserKind::Gitea | ReleaserKind::Generic => {}
        }
        if kind.is_release_supported() {
            defaults.repo_url = Some(base.into());
            defaults.repo_clone_url = Some(format!("{base}.git"));
            defaults.commit_url = Some(format!("{base}{separator}/commits"));
            defaults.src_url = Some(format!("{base}{separator}/blob/{{{{repoBranch}}}}"));
            defaults.download_url = Some(format!(
                "{base}{separator}/releases/download/{{{{tagName}}}}/{{{{artifactFile}}}}"
            ));
            defaults.release_notes_url =
                Some(format!("{base}{separator}/releases/tag/{{{{tagName}}}}"));
            defaults.latest_release_url = Some(format!("{base}{separator}/releases/latest"));
            defaults.issue_tracker_url = Some(format!("{base}{separator}/issues"));
        }
        defaults
    }

    pub fn kind(&self) -> ReleaserKind {
        self.kind
    }

    pub fn service_name(&self) -> &'static str {
        self.kind.service_name()
    }

    pub fn is_release_supported(&self) -> bool {
        self.kind.is_release_supported()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(false)
    }

    pub fn is_sign(&self) -> bool {
        self.sign.unwrap_or(false)
    }

    pub fn is_skip_tag(&self) -> bool {
        self.skip_tag.unwrap_or(false)
    }

    pub fn is_skip_release(&self) -> bool {
        self.skip_release.unwrap_or(false)
    }

    pub fn is_overwrite(&self) -> bool {
        self.overwrite.unwrap_or(false)
    }

    pub fn is_artifacts(&self) -> bool {
        self.artifacts.unwrap_or(true)
    }

    pub fn is_files(&self) -> bool {
        self.files.unwrap_or(true)
    }

    pub fn is_checksums(&self) -> bool {
        self.checksums.unwrap_or(true)
    }

    pub fn is_signatures(&self) -> bool {
        self.signatures.unwrap_or(true)
    }

    pub fn connect_timeout(&self) -> u32 {
        self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT)
    }

    pub fn read_timeout(&self) -> u32 {
        self.read_timeout.unwrap_or(DEFAULT_READ_TIMEOUT)
    }

    pub fn is_prerelease(&self) -> bool {
        self.prerelease.is_enabled()
    }

    pub fn upload_assets_enabled(&self) -> Option<bool> {
        self.upload_assets_enabled
    }

    /// `owner/name`, or just `name` without an owner.
    pub fn canonical_repo_name(&self) -> String {
        let name = self.name.as_deref().unwrap_or_default();
        match self.owner.as_deref().filter(|o| !o.trim().is_empty()) {
            Some(owner) => format!("{owner}/{name}"),
            None => name.to_string(),
        }
    }

    /// The host with its labels reversed, `github.com` → `com.github`.
    pub fn reverse_repo_host(&self) -> Option<String> {
        let host = self.host.as_deref().or(self.kind.default_host())?;
        Some(host.split('.').rev().collect::<Vec<_>>().join("."))
    }

    pub fn configured_token(&self, env: &dyn EnvProvider) -> Option<String> {
        env_or(env, &[self.service_name(), "token"], self.token.as_deref())
    }

    pub fn configured_username(&self, env: &dyn EnvProvider) -> Option<String> {
        env_or(env, &[self.service_name(), "username"], self.username.as_deref())
    }

    pub fn configured_tag_name(&self, env: &dyn EnvProvider) -> Option<String> {
        env_or(env, &[keys::TAG_NAME], self.tag_name.as_deref())
    }

    pub fn configured_previous_tag_name(&self, env: &dyn EnvProvider) -> Option<String> {
        env_or(env, &[PREVIOUS_TAG_NAME_KEY], self.previous_tag_name.as_deref())
    }

    pub fn configured_release_name(&self, env: &dyn EnvProvider) -> Option<String> {
        env_or(env, &[keys::RELEASE_NAME], self.release_name.as_deref())
    }

    /// Resolves and caches the tag name. For snapshots the snapshot label is
    /// resolved first, since it stands in for `tagName` in every context.
    pub fn resolved_tag_name(
        &self,
        model: &ReleaseModel,
        env: &dyn EnvProvider,
    ) -> Result<String, TemplateError> {
        if model.project.is_snapshot(env) {
            model.project.snapshot.resolved_label(model, env)?;
        }
        self.cached_tag_name.resolve(
            || env_override(env, &[keys::TAG_NAME]),
            self.tag_name.as_deref(),
            || self.props(model, env),
        )
    }

    /// The snapshot label for snapshots, the cached tag name otherwise.
    pub fn effective_tag_name(&self, model: &ReleaseModel, env: &dyn EnvProvider) -> Option<String> {
        if model.project.is_snapshot(env) {
            return model.project.snapshot.effective_label(env);
        }
        self.cached_tag_name.cached()
    }

    /// Resolves and caches the release name. The tag name is resolved first
    /// since release names usually reference it.
    pub fn resolved_release_name(
        &self,
        model: &ReleaseModel,
        env: &dyn EnvProvider,
    ) -> Result<String, TemplateError> {
        self.resolved_tag_name(model, env)?;
        self.cached_release_name.resolve(
            || env_override(env, &[keys::RELEASE_NAME]),
            self.release_name.as_deref(),
            || self.props(model, env),
        )
    }

    pub fn effective_release_name(&self) -> Option<String> {
        self.cached_release_name.cached()
    }

    pub fn resolved_milestone_name(
        &self,
        model: &ReleaseModel,
        env: &dyn EnvProvider,
    ) -> Result<String, TemplateError> {
        self.resolved_tag_name(model, env)?;
        self.milestone.resolved_name(env, || self.props(model, env))
    }

    pub fn resolved_repo_url(
        &self,
        model: &ReleaseModel,
        env: &dyn EnvProvider,
    ) -> Result<String, TemplateError> {
        self.resolve_url(self.repo_url.as_deref(), model, env, &[])
    }

    /// The repository URL of another repository on the same service.
    pub fn resolved_repo_url_for(
        &self,
        model: &ReleaseModel,
        env: &dyn EnvProvider,
        owner: &str,
        name: &str,
    ) -> Result<String, TemplateError> {
        self.resolve_url(
            self.repo_url.as_deref(),
            model,
            env,
            &[(keys::REPO_OWNER, owner), (keys::REPO_NAME, name)],
        )
    }

    pub fn resolved_repo_clone_url(
        &self,
        model: &ReleaseModel,
        env: &dyn EnvProvider,
    ) -> Result<String, TemplateError> {
        self.resolve_url(self.repo_clone_url.as_deref(), model, env, &[])
    }

    pub fn resolved_repo_clone_url_for(
        &self,
        model: &ReleaseModel,
        env: &dyn EnvProvider,
        owner: &str,
        name: &str,
    ) -> Result<String, TemplateError> {
        self.resolve_url(
            self.repo_clone_url.as_deref(),
            model,
            env,
            &[(keys::REPO_OWNER, owner), (keys::REPO_NAME, name)],
        )
    }

    pub fn resolved_commit_url(
        &self,
        model: &ReleaseModel,
        env: &dyn EnvProvider,
    ) -> Result<String, TemplateError> {
        self.resolve_url(self.commit_url.as_deref(), model, env, &[])
    }

    pub fn resolved_src_url(
        &self,
        model: &ReleaseModel,
        env: &dyn EnvProvider,
    ) -> Result<String, TemplateError> {
        self.resolve_url(self.src_url.as_deref(), model, env, &[])
    }

    /// Download URLs reference per-artifact keys (`artifactFile`, ...), which
    /// the caller supplies.
    pub fn resolved_download_url(
        &self,
        model: &ReleaseModel,
        env: &dyn EnvProvider,
        artifact: &[(&str, &str)],
    ) -> Result<String, TemplateError> {
        self.resolve_url(self.download_url.as_deref(), model, env, artifact)
    }

    pub fn resolved_release_notes_url(
        &self,
        model: &ReleaseModel,
        env: &dyn EnvProvider,
    ) -> Result<String, TemplateError> {
        self.resolve_url(self.release_notes_url.as_deref(), model, env, &[])
    }

    pub fn resolved_latest_release_url(
        &self,
        model: &ReleaseModel,
        env: &dyn EnvProvider,
    ) -> Result<String, TemplateError> {
        self.resolve_url(self.latest_release_url.as_deref(), model, env, &[])
    }

    pub fn resolved_issue_tracker_url(
        &self,
        model: &ReleaseModel,
        env: &dyn EnvProvider,
        append_slash: bool,
    ) -> Result<String, TemplateError> {
        let mut url = self.resolve_url(self.issue_tracker_url.as_deref(), model, env, &[])?;
        if append_slash && !url.trim().is_empty() && !url.ends_with('/') {
            url.push('/');
        }
        Ok(url)
    }

    fn resolve_url(
        &self,
        template: Option<&str>,
        model: &ReleaseModel,
        env: &dyn EnvProvider,
        overrides: &[(&str, &str)],
    ) -> Result<String, TemplateError> {
        if !self.is_release_supported() || template.is_none() {
            return Ok(String::new());
        }
        self.resolved_tag_name(model, env)?;
        let mut context = self.props(model, env)?;
        context.extend(overrides.iter().copied());
        render_optional(template, &context)
    }

    /// Decides whether assets get uploaded and remembers the answer.
    ///
    /// An unset policy becomes [`Active::Always`].
    pub fn resolve_upload_assets_enabled(
        &mut self,
        project: &Project,
        env: &dyn EnvProvider,
    ) -> bool {
        let policy = *self.upload_assets.get_or_insert(Active::Always);
        let version = project.resolved_version(env).unwrap_or_default();
        let prerelease = self.prerelease.is_prerelease(&version, env);
        let enabled = policy.check(project.is_snapshot(env), prerelease);
        self.upload_assets_enabled = Some(enabled);
        enabled
    }

    /// The template context for this releaser.
    pub fn props(
        &self,
        model: &ReleaseModel,
        env: &dyn EnvProvider,
    ) -> Result<ContextBag, TemplateError> {
        ContextBuilder::new(model, env).for_releaser(self).build()
    }

    /// Writes identity keys and resolved URLs into an existing context.
    pub fn fill_props(
        &self,
        bag: &mut ContextBag,
        model: &ReleaseModel,
        env: &dyn EnvProvider,
    ) -> Result<(), TemplateError> {
        self.resolved_tag_name(model, env)?;
        self.fill_identity_props(bag, model, env);
        bag.insert(keys::REPO_URL, self.resolved_repo_url(model, env)?);
        bag.insert(keys::REPO_CLONE_URL, self.resolved_repo_clone_url(model, env)?);
        bag.insert(keys::COMMIT_URL, self.resolved_commit_url(model, env)?);
        bag.insert(keys::SRC_URL, self.resolved_src_url(model, env)?);
        bag.insert(keys::RELEASE_NOTES_URL, self.resolved_release_notes_url(model, env)?);
        bag.insert(keys::LATEST_RELEASE_URL, self.resolved_latest_release_url(model, env)?);
        bag.insert(
            keys::ISSUE_TRACKER_URL,
            self.resolved_issue_tracker_url(model, env, false)?,
        );
        Ok(())
    }

    /// Repository identity plus the cached tag, release and milestone names.
    ///
    /// Only cached values are used here: resolving would need this very
    /// context.
    pub(crate) fn fill_identity_props(
        &self,
        bag: &mut ContextBag,
        model: &ReleaseModel,
        env: &dyn EnvProvider,
    ) {
        bag.insert_some(keys::REPO_HOST, self.host.as_deref());
        bag.insert_some(keys::REPO_OWNER, self.owner.as_deref());
        bag.insert_some(keys::REPO_NAME, self.name.as_deref());
        bag.insert_some(keys::REPO_BRANCH, self.branch.as_deref());
        bag.insert_some(keys::REVERSE_REPO_HOST, self.reverse_repo_host());
        bag.insert(keys::CANONICAL_REPO_NAME, self.canonical_repo_name());
        bag.insert_some(keys::TAG_NAME, self.effective_tag_name(model, env));
        bag.insert_some(keys::RELEASE_NAME, self.effective_release_name());
        bag.insert_some(keys::MILESTONE_NAME, self.milestone.effective_name());
    }

    pub fn as_map(&self, full: bool) -> Map<String, Value> {
        let supported = self.is_release_supported();
        let mut map = Map::new();
        map.insert("enabled".into(), Value::from(self.is_enabled()));
        map.insert("host".into(), export::opt(self.host.as_deref()));
        map.insert("owner".into(), export::opt(self.owner.as_deref()));
        map.insert("name".into(), export::opt(self.name.as_deref()));
        map.insert("username".into(), export::opt(self.username.as_deref()));
        map.insert("token".into(), export::secret(self.token.as_deref()));
        if supported {
            map.insert("uploadAssets".into(), export::display(self.upload_assets.as_ref()));
            map.insert("artifacts".into(), Value::from(self.is_artifacts()));
            map.insert("files".into(), Value::from(self.is_files()));
            map.insert("checksums".into(), Value::from(self.is_checksums()));
            map.insert("signatures".into(), Value::from(self.is_signatures()));
            map.insert("repoUrl".into(), export::opt(self.repo_url.as_deref()));
            map.insert("repoCloneUrl".into(), export::opt(self.repo_clone_url.as_deref()));
            map.insert("commitUrl".into(), export::opt(self.commit_url.as_deref()));
            map.insert("srcUrl".into(), export::opt(self.src_url.as_deref()));
            map.insert("downloadUrl".into(), export::opt(self.download_url.as_deref()));
            map.insert(
                "releaseNotesUrl".into(),
                export::opt(self.release_notes_url.as_deref()),
            );
            map.insert(
                "latestReleaseUrl".into(),
                export::opt(self.latest_release_url.as_deref()),
            );
            map.insert(
                "issueTrackerUrl".into(),
                export::opt(self.issue_tracker_url.as_deref()),
            );
        }
        map.insert("tagName".into(), export::opt(self.tag_name.as_deref()));
        if supported {
            map.insert("releaseName".into(), export::opt(self.release_name.as_deref()));
        }
        map.insert("branch".into(), export::opt(self.branch.as_deref()));
        map.insert(
            "commitAuthor".into(),
            Value::Object(self.commit_author.as_map(full)),
        );
        map.insert("sign".into(), Value::from(self.is_sign()));
        map.insert("skipTag".into(), Value::from(self.is_skip_tag()));
        map.insert("skipRelease".into(), Value::from(self.is_skip_release()));
        map.insert("overwrite".into(), Value::from(self.is_overwrite()));
        if supported {
            map.insert("update".into(), Value::Object(self.update.as_map(full)));
            map.insert("apiEndpoint".into(), export::opt(self.api_endpoint.as_deref()));
            map.insert("connectTimeout".into(), Value::from(self.connect_timeout()));
            map.insert("readTimeout".into(), Value::from(self.read_timeout()));
        }
        map.insert("changelog".into(), Value::Object(self.changelog.as_map(full)));
        if supported {
            map.insert("milestone".into(), Value::Object(self.milestone.as_map(full)));
            map.insert("issues".into(), Value::Object(self.issues.as_map(full)));
        }
        map.insert("prerelease".into(), Value::Object(self.prerelease.as_map(full)));
        export::finish(map, full)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommitAuthor {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl Mergeable for CommitAuthor {
    fn merge(&mut self, source: &Self) {
        merge_scalar(&mut self.name, &source.name);
        merge_scalar(&mut self.email, &source.email);
    }
}

impl CommitAuthor {
    pub fn as_map(&self, full: bool) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("name".into(), export::opt(self.name.as_deref()));
        map.insert("email".into(), export::opt(self.email.as_deref()));
        export::finish(map, full)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpdateSection {
    Title,
    Body,
    Assets,
}

impl fmt::Display for UpdateSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UpdateSection::Title => "TITLE",
            UpdateSection::Body => "BODY",
            UpdateSection::Assets => "ASSETS",
        })
    }
}

/// Which parts of an existing release get updated.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Update {
    pub enabled: Option<bool>,
    pub sections: BTreeSet<UpdateSection>,
}

impl Mergeable for Update {
    fn merge(&mut self, source: &Self) {
        merge_scalar(&mut self.enabled, &source.enabled);
        merge_set(&mut self.sections, &source.sections);
    }
}

impl Update {
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(false)
    }

    pub fn as_map(&self, full: bool) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("enabled".into(), Value::from(self.is_enabled()));
        map.insert(
            "sections".into(),
            Value::from(
                self.sections
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>(),
            ),
        );
        export::finish(map, full)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Prerelease {
    pub enabled: Option<bool>,
    pub pattern: Option<String>,
}

impl Mergeable for Prerelease {
    fn merge(&mut self, source: &Self) {
        merge_scalar(&mut self.enabled, &source.enabled);
        merge_scalar(&mut self.pattern, &source.pattern);
    }
}

impl Prerelease {
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(false)
    }

    pub fn disable(&mut self) {
        self.enabled = Some(false);
    }

    pub fn configured_pattern(&self, env: &dyn EnvProvider) -> Option<String> {
        env_or(env, &[PRERELEASE_PATTERN_KEY], self.pattern.as_deref())
    }

    /// An explicit `enabled` wins; otherwise the version is matched against
    /// the configured pattern and the outcome is stored in `enabled`.
    pub fn is_prerelease(&mut self, version: &str, env: &dyn EnvProvider) -> bool {
        if let Some(enabled) = self.enabled {
            return enabled;
        }
        let enabled = self
            .configured_pattern(env)
            .filter(|pattern| !pattern.trim().is_empty())
            .is_some_and(|pattern| matches_pattern(&pattern, version));
        self.enabled = Some(enabled);
        enabled
    }

    pub fn as_map(&self, full: bool) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("enabled".into(), Value::from(self.is_enabled()));
        map.insert("pattern".into(), export::opt(self.pattern.as_deref()));
        export::finish(map, full)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sort {
    Asc,
    Desc,
}

/// Changelog presentation settings; content retrieval lives elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Changelog {
    pub enabled: Option<bool>,
    pub links: Option<bool>,
    pub skip_merge_commits: Option<bool>,
    pub sort: Option<Sort>,
    pub format: Option<String>,
    pub preset: Option<String>,
    pub external: Option<String>,
}

impl Mergeable for Changelog {
    fn merge(&mut self, source: &Self) {
        merge_scalar(&mut self.enabled, &source.enabled);
        merge_scalar(&mut self.links, &source.links);
        merge_scalar(&mut self.skip_merge_commits, &source.skip_merge_commits);
        merge_scalar(&mut self.sort, &source.sort);
        merge_scalar(&mut self.format, &source.format);
        merge_scalar(&mut self.preset, &source.preset);
        merge_scalar(&mut self.external, &source.external);
    }
}

impl Changelog {
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    pub fn sort(&self) -> Sort {
        self.sort.unwrap_or(Sort::Desc)
    }

    pub fn as_map(&self, full: bool) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("enabled".into(), Value::from(self.is_enabled()));
        map.insert("links".into(), Value::from(self.links.unwrap_or(false)));
        map.insert(
            "skipMergeCommits".into(),
            Value::from(self.skip_merge_commits.unwrap_or(false)),
        );
        let sort = match self.sort() {
            Sort::Asc => "ASC",
            Sort::Desc => "DESC",
        };
        map.insert("sort".into(), Value::from(sort));
        map.insert("format".into(), export::opt(self.format.as_deref()));
        map.insert("preset".into(), export::opt(self.preset.as_deref()));
        map.insert("external".into(), export::opt(self.external.as_deref()));
        export::finish(map, full)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Milestone {
    pub close: Option<bool>,
    pub name: Option<String>,
    #[serde(skip)]
    cached_name: ResolvableField,
}

impl Mergeable for Milestone {
    fn merge(&mut self, source: &Self) {
        merge_scalar(&mut self.close, &source.close);
        merge_scalar(&mut self.name, &source.name);
    }
}

impl Milestone {
    pub fn is_close(&self) -> bool {
        self.close.unwrap_or(true)
    }

    pub fn configured_name(&self, env: &dyn EnvProvider) -> Option<String> {
        env_or(env, &[keys::MILESTONE_NAME], self.name.as_deref())
    }

    /// Resolves and caches the milestone name against a caller-built context.
    pub fn resolved_name<C>(&self, env: &dyn EnvProvider, context: C) -> Result<String, TemplateError>
    where
        C: FnOnce() -> Result<ContextBag, TemplateError>,
    {
        self.cached_name.resolve(
            || env_override(env, &[keys::MILESTONE_NAME]),
            self.name.as_deref(),
            context,
        )
    }

    pub fn effective_name(&self) -> Option<String> {
        self.cached_name.cached()
    }

    pub fn as_map(&self, full: bool) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("name".into(), export::opt(self.name.as_deref()));
        map.insert("close".into(), Value::from(self.is_close()));
        export::finish(map, full)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Apply {
    Never,
    Always,
    Warn,
    Force,
}

impl fmt::Display for Apply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Apply::Never => "NEVER",
            Apply::Always => "ALWAYS",
            Apply::Warn => "WARN",
            Apply::Force => "FORCE",
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Issues {
    pub enabled: Option<bool>,
    pub comment: Option<String>,
    pub label: Label,
    pub apply_milestone: Option<Apply>,
}

impl Mergeable for Issues {
    fn merge(&mut self, source: &Self) {
        merge_scalar(&mut self.enabled, &source.enabled);
        merge_scalar(&mut self.comment, &source.comment);
        merge_scalar(&mut self.apply_milestone, &source.apply_milestone);
        self.label.merge(&source.label);
    }
}

impl Issues {
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(false)
    }

    pub fn as_map(&self, full: bool) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("enabled".into(), Value::from(self.is_enabled()));
        map.insert("comment".into(), export::opt(self.comment.as_deref()));
        map.insert("label".into(), Value::Object(self.label.as_map(full)));
        map.insert(
            "applyMilestone".into(),
            export::display(self.apply_milestone.as_ref()),
        );
        export::finish(map, full)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Label {
    pub name: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,
}

impl Mergeable for Label {
    fn merge(&mut self, source: &Self) {
        merge_scalar(&mut self.name, &source.name);
        merge_scalar(&mut self.color, &source.color);
        merge_scalar(&mut self.description, &source.description);
    }
}

impl Label {
    pub fn as_map(&self, full: bool) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("name".into(), export::opt(self.name.as_deref()));
        map.insert("color".into(), export::opt(self.color.as_deref()));
        map.insert("description".into(), export::opt(self.description.as_deref()));
        export::finish(map, full)
    }
}
