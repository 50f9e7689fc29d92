use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::{Immutable, Snapshot};
use crate::config::env::EnvProvider;
use crate::model::{Active, Authorization, MavenDeployer, ReleaseModel};
use crate::template::TemplateError;

#[derive(Debug, Clone, Copy)]
pub struct MavenDeployerView<'a> {
    deployer: &'a MavenDeployer,
}

impl Immutable for MavenDeployer {
    type View<'a> = MavenDeployerView<'a>;

    fn as_immutable(&self) -> MavenDeployerView<'_> {
        MavenDeployerView { deployer: self }
    }
}

impl<'a> MavenDeployerView<'a> {
    pub fn name(&self) -> &'a str {
        self.deployer.name()
    }

    pub fn active(&self) -> Option<Active> {
        self.deployer.active
    }

    pub fn is_active(&self, snapshot: bool, prerelease: bool) -> bool {
        self.deployer.is_active(snapshot, prerelease)
    }

    pub fn url(&self, model: &ReleaseModel, env: &dyn EnvProvider) -> Result<String, TemplateError> {
        self.deployer.resolved_url(model, env)
    }

    pub fn username(&self, env: &dyn EnvProvider) -> Option<String> {
        self.deployer.configured_username(env)
    }

    pub fn password(&self, env: &dyn EnvProvider) -> Option<String> {
        self.deployer.configured_password(env)
    }

    pub fn authorization(&self) -> Option<Authorization> {
        self.deployer.authorization
    }

    pub fn is_sign(&self) -> bool {
        self.deployer.is_sign()
    }

    pub fn is_verify_pom(&self) -> bool {
        self.deployer.is_verify_pom()
    }

    pub fn is_apply_maven_central_rules(&self) -> bool {
        self.deployer.is_apply_maven_central_rules()
    }

    pub fn staging_repositories(&self) -> Snapshot<Vec<String>> {
        Snapshot::new(self.deployer.staging_repositories.clone())
    }

    pub fn extra_properties(&self) -> Snapshot<BTreeMap<String, String>> {
        Snapshot::new(self.deployer.extra_properties.clone())
    }

    pub fn connect_timeout(&self) -> u32 {
        self.deployer.connect_timeout()
    }

    pub fn read_timeout(&self) -> u32 {
        self.deployer.read_timeout()
    }

    pub fn as_map(&self, full: bool) -> Snapshot<Map<String, Value>> {
        Snapshot::new(self.deployer.as_map(full))
    }
}
