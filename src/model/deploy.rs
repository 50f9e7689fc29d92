use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};

use super::{export, Active, ReleaseModel};
use crate::config::env::{env_or, EnvProvider};
use crate::merge::{merge_list, merge_map, merge_named, merge_scalar, Mergeable};
use crate::template::{render_optional, TemplateError};

const DEPLOYER_USERNAME: &str = "username";
const DEPLOYER_OWNER: &str = "owner";
const DEPLOYER_REPOSITORY: &str = "repository";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Deploy {
    pub maven: Maven,
}

impl Mergeable for Deploy {
    fn merge(&mut self, source: &Self) {
        self.maven.merge(&source.maven);
    }
}

impl Deploy {
    pub(crate) fn assign_names(&mut self) {
        self.maven.assign_names();
    }

    pub fn as_map(&self, full: bool) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("maven".into(), Value::Object(self.maven.as_map(full)));
        map
    }
}

/// Maven deployers keyed by flavour, then by deployer name.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Maven {
    pub github: BTreeMap<String, MavenDeployer>,
}

impl Mergeable for Maven {
    fn merge(&mut self, source: &Self) {
        merge_named(&mut self.github, &source.github);
    }
}

impl Maven {
    fn assign_names(&mut self) {
        for (name, deployer) in &mut self.github {
            deployer.name = name.clone();
        }
    }

    pub fn active_deployers(&self, snapshot: bool, prerelease: bool) -> Vec<&MavenDeployer> {
        self.github
            .values()
            .filter(|deployer| deployer.is_active(snapshot, prerelease))
            .collect()
    }

    pub fn as_map(&self, full: bool) -> Map<String, Value> {
        let deployers: Map<String, Value> = self
            .github
            .iter()
            .map(|(name, deployer)| (name.clone(), Value::Object(deployer.as_map(full))))
            .collect();
        let mut map = Map::new();
        map.insert("github".into(), Value::Object(deployers));
        map
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Authorization {
    None,
    Basic,
    Bearer,
}

impl fmt::Display for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Authorization::None => "NONE",
            Authorization::Basic => "BASIC",
            Authorization::Bearer => "BEARER",
        })
    }
}

/// Deploys staged Maven artifacts to GitHub Packages.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MavenDeployer {
    #[serde(skip)]
    name: String,
    pub active: Option<Active>,
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub authorization: Option<Authorization>,
    pub sign: Option<bool>,
    pub verify_pom: Option<bool>,
    pub apply_maven_central_rules: Option<bool>,
    pub staging_repositories: Vec<String>,
    pub connect_timeout: Option<u32>,
    pub read_timeout: Option<u32>,
    pub repository: Option<String>,
    pub extra_properties: BTreeMap<String, String>,
}

impl Mergeable for MavenDeployer {
    fn merge(&mut self, source: &Self) {
        merge_scalar(&mut self.active, &source.active);
        merge_scalar(&mut self.url, &source.url);
        merge_scalar(&mut self.username, &source.username);
        merge_scalar(&mut self.password, &source.password);
        merge_scalar(&mut self.authorization, &source.authorization);
        merge_scalar(&mut self.sign, &source.sign);
        merge_scalar(&mut self.verify_pom, &source.verify_pom);
        merge_scalar(
            &mut self.apply_maven_central_rules,
            &source.apply_maven_central_rules,
        );
        merge_list(&mut self.staging_repositories, &source.staging_repositories);
        merge_scalar(&mut self.connect_timeout, &source.connect_timeout);
        merge_scalar(&mut self.read_timeout, &source.read_timeout);
        merge_scalar(&mut self.repository, &source.repository);
        merge_map(&mut self.extra_properties, &source.extra_properties);
    }
}

impl MavenDeployer {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inactive unless configured otherwise.
    pub fn is_active(&self, snapshot: bool, prerelease: bool) -> bool {
        self.active.unwrap_or(Active::Never).check(snapshot, prerelease)
    }

    pub fn is_sign(&self) -> bool {
        self.sign.unwrap_or(false)
    }

    pub fn is_verify_pom(&self) -> bool {
        self.verify_pom.unwrap_or(true)
    }

    pub fn is_apply_maven_central_rules(&self) -> bool {
        self.apply_maven_central_rules.unwrap_or(false)
    }

    pub fn connect_timeout(&self) -> u32 {
        self.connect_timeout.unwrap_or(super::DEFAULT_CONNECT_TIMEOUT)
    }

    pub fn read_timeout(&self) -> u32 {
        self.read_timeout.unwrap_or(super::DEFAULT_READ_TIMEOUT)
    }

    fn env_segments<'a>(&'a self, key: &'a str) -> [&'a str; 5] {
        ["deploy", "maven", "github", self.name.as_str(), key]
    }

    pub fn configured_username(&self, env: &dyn EnvProvider) -> Option<String> {
        env_or(env, &self.env_segments("username"), self.username.as_deref())
    }

    pub fn configured_password(&self, env: &dyn EnvProvider) -> Option<String> {
        env_or(env, &self.env_segments("password"), self.password.as_deref())
    }

    /// GitHub Packages only accepts bearer tokens.
    pub fn resolve_authorization(&mut self) -> Authorization {
        self.authorization = Some(Authorization::Bearer);
        Authorization::Bearer
    }

    /// Renders the url against the model context. The deployer username is
    /// bound to both `username` and `owner`; `repository` is the deployer's
    /// own. Extra properties go on top.
    pub fn resolved_url(
        &self,
        model: &ReleaseModel,
        env: &dyn EnvProvider,
    ) -> Result<String, TemplateError> {
        let mut context = model.props(env)?;
        let username = self.configured_username(env);
        context.insert_some(DEPLOYER_USERNAME, username.as_deref());
        context.insert_some(DEPLOYER_OWNER, username);
        context.insert_some(DEPLOYER_REPOSITORY, self.repository.as_deref());
        context.extend(self.extra_properties.iter());
        render_optional(self.url.as_deref(), &context)
    }

    pub fn as_map(&self, full: bool) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("active".into(), export::display(self.active.as_ref()));
        map.insert("url".into(), export::opt(self.url.as_deref()));
        map.insert("username".into(), export::opt(self.username.as_deref()));
        map.insert("password".into(), export::secret(self.password.as_deref()));
        map.insert(
            "authorization".into(),
            export::display(self.authorization.as_ref()),
        );
        map.insert("sign".into(), Value::from(self.is_sign()));
        map.insert("verifyPom".into(), Value::from(self.is_verify_pom()));
        map.insert(
            "applyMavenCentralRules".into(),
            Value::from(self.is_apply_maven_central_rules()),
        );
        map.insert(
            "stagingRepositories".into(),
            Value::from(self.staging_repositories.clone()),
        );
        map.insert("connectTimeout".into(), Value::from(self.connect_timeout()));
        map.insert("readTimeout".into(), Value::from(self.read_timeout()));
        map.insert("repository".into(), export::opt(self.repository.as_deref()));
        map.insert(
            "extraProperties".into(),
            export::string_map(&self.extra_properties),
        );
        export::finish(map, full)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::env::MapEnv;
    use crate::model::{OsInfo, Releaser, ReleaserKind, HIDE};

    fn model() -> ReleaseModel {
        let mut model = ReleaseModel::default().with_os(OsInfo::new("linux", "x86_64", "6.1"));
        model.project.name = Some("widget".into());
        model.project.version = Some("1.0.0".into());
        let mut releaser = Releaser::defaults(ReleaserKind::Github);
        releaser.owner = Some("acme".into());
        releaser.name = Some("widget".into());
        model.release.github = Some(releaser);
        model
    }

    #[test]
    fn test_resolved_url() {
        let model = model();
        let mut deployer = MavenDeployer::named("app");
        deployer.url = Some("https://maven.pkg.github.com/{{owner}}/{{repository}}".into());
        deployer.username = Some("bot".into());
        deployer.repository = Some("w".into());
        assert_eq!(
            deployer.resolved_url(&model, &MapEnv::new()).unwrap(),
            "https://maven.pkg.github.com/bot/w"
        );

        deployer
            .extra_properties
            .insert("owner".into(), "other".into());
        assert_eq!(
            deployer.resolved_url(&model, &MapEnv::new()).unwrap(),
            "https://maven.pkg.github.com/other/w"
        );
    }

    #[test]
    fn test_resolved_url_owner_from_env_username() {
        let model = model();
        let mut deployer = MavenDeployer::named("app");
        deployer.url = Some("https://maven.pkg.github.com/{{owner}}/{{repoName}}".into());
        let env = MapEnv::new().with("JRELEASER_DEPLOY_MAVEN_GITHUB_APP_USERNAME", "ci-bot");
        assert_eq!(
            deployer.resolved_url(&model, &env).unwrap(),
            "https://maven.pkg.github.com/ci-bot/widget"
        );
    }

    #[test]
    fn test_resolved_url_repository_has_no_fallback() {
        let model = model();
        let mut deployer = MavenDeployer::named("app");
        deployer.url = Some("https://maven.pkg.github.com/{{owner}}/{{repository}}".into());
        deployer.username = Some("bot".into());
        let err = deployer.resolved_url(&model, &MapEnv::new()).unwrap_err();
        assert_eq!(err.missing_key(), Some("repository"));
    }

    #[test]
    fn test_credentials_from_env() {
        let deployer = MavenDeployer::named("app");
        let env = MapEnv::new()
            .with("JRELEASER_DEPLOY_MAVEN_GITHUB_APP_PASSWORD", "secret")
            .with("JRELEASER_DEPLOY_MAVEN_GITHUB_APP_USERNAME", "bot");
        assert_eq!(deployer.configured_password(&env).as_deref(), Some("secret"));
        assert_eq!(deployer.configured_username(&env).as_deref(), Some("bot"));
    }

    #[test]
    fn test_authorization_is_bearer() {
        let mut deployer = MavenDeployer::named("app");
        deployer.authorization = Some(Authorization::Basic);
        assert_eq!(deployer.resolve_authorization(), Authorization::Bearer);
        assert_eq!(deployer.authorization, Some(Authorization::Bearer));
    }

    #[test]
    fn test_inactive_by_default() {
        let mut deployer = MavenDeployer::named("app");
        assert!(!deployer.is_active(false, false));
        deployer.active = Some(Active::Release);
        assert!(deployer.is_active(false, false));
        assert!(!deployer.is_active(true, false));
    }

    #[test]
    fn test_merge_staging_repositories() {
        let mut target = MavenDeployer::named("app");
        let mut source = MavenDeployer::named("app");
        source.staging_repositories = vec!["build/staging".into()];
        target.merge(&source);
        assert_eq!(target.staging_repositories, vec!["build/staging".to_string()]);

        source.staging_repositories = vec!["elsewhere".into()];
        target.merge(&source);
        assert_eq!(target.staging_repositories, vec!["build/staging".to_string()]);
    }

    #[test]
    fn test_named_merge_clones_missing() {
        let mut target = Maven::default();
        let mut source = Maven::default();
        let mut deployer = MavenDeployer::named("app");
        deployer.url = Some("https://example.com".into());
        source.github.insert("app".into(), deployer);

        target.merge(&source);
        target.github.get_mut("app").unwrap().url = Some("changed".into());
        assert_eq!(source.github["app"].url.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn test_as_map_redacts_password() {
        let mut deployer = MavenDeployer::named("app");
        deployer.password = Some("hunter2".into());
        let map = deployer.as_map(false);
        assert_eq!(map["password"], Value::from(HIDE));
        assert!(!map.contains_key("url"));
    }
}
