use std::collections::BTreeSet;

use serde_json::{Map, Value};

use super::{Immutable, Snapshot};
use crate::config::env::EnvProvider;
use crate::model::{
    Active, Apply, CommitAuthor, Issues, Label, Milestone, Prerelease, ReleaseModel, Releaser,
    ReleaserKind, Update, UpdateSection,
};
use crate::template::TemplateError;

/// Read-only view of a releaser.
///
/// Resolution still goes through the node's caches, so reading a tag name
/// through a view fills the same cache as reading it from the node.
#[derive(Debug, Clone, Copy)]
pub struct ReleaserView<'a> {
    releaser: &'a Releaser,
}

impl Immutable for Releaser {
    type View<'a> = ReleaserView<'a>;

    fn as_immutable(&self) -> ReleaserView<'_> {
        ReleaserView { releaser: self }
    }
}

impl<'a> ReleaserView<'a> {
    pub fn kind(&self) -> ReleaserKind {
        self.releaser.kind()
    }

    pub fn service_name(&self) -> &'static str {
        self.releaser.service_name()
    }

    pub fn is_enabled(&self) -> bool {
        self.releaser.is_enabled()
    }

    pub fn host(&self) -> Option<&'a str> {
        self.releaser.host.as_deref()
    }

    pub fn owner(&self) -> Option<&'a str> {
        self.releaser.owner.as_deref()
    }

    pub fn name(&self) -> Option<&'a str> {
        self.releaser.name.as_deref()
    }

    pub fn branch(&self) -> Option<&'a str> {
        self.releaser.branch.as_deref()
    }

    pub fn canonical_repo_name(&self) -> String {
        self.releaser.canonical_repo_name()
    }

    pub fn username(&self, env: &dyn EnvProvider) -> Option<String> {
        self.releaser.configured_username(env)
    }

    pub fn token(&self, env: &dyn EnvProvider) -> Option<String> {
        self.releaser.configured_token(env)
    }

    pub fn tag_name(&self, model: &ReleaseModel, env: &dyn EnvProvider) -> Result<String, TemplateError> {
        self.releaser.resolved_tag_name(model, env)
    }

    pub fn effective_tag_name(&self, model: &ReleaseModel, env: &dyn EnvProvider) -> Option<String> {
        self.releaser.effective_tag_name(model, env)
    }

    pub fn previous_tag_name(&self, env: &dyn EnvProvider) -> Option<String> {
        self.releaser.configured_previous_tag_name(env)
    }

    pub fn release_name(
        &self,
        model: &ReleaseModel,
        env: &dyn EnvProvider,
    ) -> Result<String, TemplateError> {
        self.releaser.resolved_release_name(model, env)
    }

    pub fn repo_url(&self, model: &ReleaseModel, env: &dyn EnvProvider) -> Result<String, TemplateError> {
        self.releaser.resolved_repo_url(model, env)
    }

    pub fn issue_tracker_url(
        &self,
        model: &ReleaseModel,
        env: &dyn EnvProvider,
        append_slash: bool,
    ) -> Result<String, TemplateError> {
        self.releaser.resolved_issue_tracker_url(model, env, append_slash)
    }

    pub fn is_sign(&self) -> bool {
        self.releaser.is_sign()
    }

    pub fn is_skip_tag(&self) -> bool {
        self.releaser.is_skip_tag()
    }

    pub fn is_skip_release(&self) -> bool {
        self.releaser.is_skip_release()
    }

    pub fn is_overwrite(&self) -> bool {
        self.releaser.is_overwrite()
    }

    pub fn is_artifacts(&self) -> bool {
        self.releaser.is_artifacts()
    }

    pub fn is_files(&self) -> bool {
        self.releaser.is_files()
    }

    pub fn is_checksums(&self) -> bool {
        self.releaser.is_checksums()
    }

    pub fn is_signatures(&self) -> bool {
        self.releaser.is_signatures()
    }

    pub fn upload_assets(&self) -> Option<Active> {
        self.releaser.upload_assets
    }

    pub fn api_endpoint(&self) -> Option<&'a str> {
        self.releaser.api_endpoint.as_deref()
    }

    pub fn connect_timeout(&self) -> u32 {
        self.releaser.connect_timeout()
    }

    pub fn read_timeout(&self) -> u32 {
        self.releaser.read_timeout()
    }

    pub fn commit_author(&self) -> CommitAuthorView<'a> {
        self.releaser.commit_author.as_immutable()
    }

    pub fn update(&self) -> UpdateView<'a> {
        self.releaser.update.as_immutable()
    }

    pub fn prerelease(&self) -> PrereleaseView<'a> {
        self.releaser.prerelease.as_immutable()
    }

    pub fn milestone(&self) -> MilestoneView<'a> {
        self.releaser.milestone.as_immutable()
    }

    pub fn issues(&self) -> IssuesView<'a> {
        self.releaser.issues.as_immutable()
    }

    pub fn as_map(&self, full: bool) -> Snapshot<Map<String, Value>> {
        Snapshot::new(self.releaser.as_map(full))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CommitAuthorView<'a> {
    author: &'a CommitAuthor,
}

impl Immutable for CommitAuthor {
    type View<'a> = CommitAuthorView<'a>;

    fn as_immutable(&self) -> CommitAuthorView<'_> {
        CommitAuthorView { author: self }
    }
}

impl<'a> CommitAuthorView<'a> {
    pub fn name(&self) -> Option<&'a str> {
        self.author.name.as_deref()
    }

    pub fn email(&self) -> Option<&'a str> {
        self.author.email.as_deref()
    }

    pub fn as_map(&self, full: bool) -> Snapshot<Map<String, Value>> {
        Snapshot::new(self.author.as_map(full))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct UpdateView<'a> {
    update: &'a Update,
}

impl Immutable for Update {
    type View<'a> = UpdateView<'a>;

    fn as_immutable(&self) -> UpdateView<'_> {
        UpdateView { update: self }
    }
}

impl UpdateView<'_> {
    pub fn is_enabled(&self) -> bool {
        self.update.is_enabled()
    }

    pub fn sections(&self) -> Snapshot<BTreeSet<UpdateSection>> {
        Snapshot::new(self.update.sections.clone())
    }

    pub fn as_map(&self, full: bool) -> Snapshot<Map<String, Value>> {
        Snapshot::new(self.update.as_map(full))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PrereleaseView<'a> {
    prerelease: &'a Prerelease,
}

impl Immutable for Prerelease {
    type View<'a> = PrereleaseView<'a>;

    fn as_immutable(&self) -> PrereleaseView<'_> {
        PrereleaseView { prerelease: self }
    }
}

impl<'a> PrereleaseView<'a> {
    pub fn is_enabled(&self) -> bool {
        self.prerelease.is_enabled()
    }

    pub fn pattern(&self, env: &dyn EnvProvider) -> Option<String> {
        self.prerelease.configured_pattern(env)
    }

    pub fn as_map(&self, full: bool) -> Snapshot<Map<String, Value>> {
        Snapshot::new(self.prerelease.as_map(full))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MilestoneView<'a> {
    milestone: &'a Milestone,
}

impl Immutable for Milestone {
    type View<'a> = MilestoneView<'a>;

    fn as_immutable(&self) -> MilestoneView<'_> {
        MilestoneView { milestone: self }
    }
}

impl<'a> MilestoneView<'a> {
    pub fn is_close(&self) -> bool {
        self.milestone.is_close()
    }

    pub fn name(&self, env: &dyn EnvProvider) -> Option<String> {
        self.milestone.configured_name(env)
    }

    pub fn effective_name(&self) -> Option<String> {
        self.milestone.effective_name()
    }

    pub fn as_map(&self, full: bool) -> Snapshot<Map<String, Value>> {
        Snapshot::new(self.milestone.as_map(full))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct IssuesView<'a> {
    issues: &'a Issues,
}

impl Immutable for Issues {
    type View<'a> = IssuesView<'a>;

    fn as_immutable(&self) -> IssuesView<'_> {
        IssuesView { issues: self }
    }
}

impl<'a> IssuesView<'a> {
    pub fn is_enabled(&self) -> bool {
        self.issues.is_enabled()
    }

    pub fn comment(&self) -> Option<&'a str> {
        self.issues.comment.as_deref()
    }

    pub fn apply_milestone(&self) -> Option<Apply> {
        self.issues.apply_milestone
    }

    pub fn label(&self) -> LabelView<'a> {
        self.issues.label.as_immutable()
    }

    pub fn as_map(&self, full: bool) -> Snapshot<Map<String, Value>> {
        Snapshot::new(self.issues.as_map(full))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LabelView<'a> {
    label: &'a Label,
}

impl Immutable for Label {
    type View<'a> = LabelView<'a>;

    fn as_immutable(&self) -> LabelView<'_> {
        LabelView { label: self }
    }
}

impl<'a> LabelView<'a> {
    pub fn name(&self) -> Option<&'a str> {
        self.label.name.as_deref()
    }

    pub fn color(&self) -> Option<&'a str> {
        self.label.color.as_deref()
    }

    pub fn description(&self) -> Option<&'a str> {
        self.label.description.as_deref()
    }

    pub fn as_map(&self, full: bool) -> Snapshot<Map<String, Value>> {
        Snapshot::new(self.label.as_map(full))
    }
}
