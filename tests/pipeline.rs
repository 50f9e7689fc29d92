use std::io::Write;

use pretty_assertions::assert_eq;
use releaser_model::model::{OsInfo, HIDE, UNSET};
use releaser_model::{Immutable, MapEnv, ModelLoader, TemplateError};
use serde_json::Value;
use tempfile::NamedTempFile;

const GLOBAL: &str = r#"
[project]
name = "widget"
version = "1.4.0"
description = "A {{literal}} description"
authors = ["Ann"]

[project.extraProperties]
channel = "stable"

[release.github]
owner = "acme"
name = "widget"
token = "ghp-secret"
issueTrackerUrl = "https://github.com/{{repoOwner}}/{{repoName}}/issues"

[release.github.update]
sections = ["TITLE"]

[deploy.maven.github.app]
active = "RELEASE"
url = "https://maven.pkg.github.com/{{owner}}/{{repository}}"
username = "acme-bot"
repository = "widget-packages"
stagingRepositories = ["build/staging"]
"#;

const OVERRIDE: &str = r#"
[release.github]
tagName = "release-{{projectVersion}}"

[release.github.update]
sections = ["ASSETS"]

[deploy.maven.github.app]
stagingRepositories = ["build/override"]
"#;

fn load() -> releaser_model::ReleaseModel {
    let mut global = NamedTempFile::new().unwrap();
    write!(global, "{GLOBAL}").unwrap();

    ModelLoader::builder()
        .with_file(global.path(), true)
        .with_toml(OVERRIDE)
        .build()
        .unwrap()
        .with_os(OsInfo::new("linux", "x86_64", "6.1"))
}

#[test]
fn test_merged_model_resolves_names_and_urls() {
    let model = load();
    let env = MapEnv::new();
    let releaser = model.releaser().unwrap();

    assert_eq!(releaser.resolved_tag_name(&model, &env).unwrap(), "release-1.4.0");
    assert_eq!(
        releaser.resolved_release_name(&model, &env).unwrap(),
        "Release release-1.4.0"
    );
    assert_eq!(
        releaser.resolved_issue_tracker_url(&model, &env, true).unwrap(),
        "https://github.com/acme/widget/issues/"
    );
    assert_eq!(
        releaser.resolved_release_notes_url(&model, &env).unwrap(),
        "https://github.com/acme/widget/releases/tag/release-1.4.0"
    );
}

#[test]
fn test_merge_rules_across_fragments() {
    let model = load();
    let releaser = model.releaser().unwrap();
    let view = releaser.as_immutable();

    let sections: Vec<String> = view
        .update()
        .sections()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(sections, vec!["TITLE", "ASSETS"]);

    let deployer = model.deploy.maven.github["app"].as_immutable();
    assert_eq!(deployer.name(), "app");
    assert_eq!(*deployer.staging_repositories(), vec!["build/override".to_string()]);
    assert!(deployer.is_active(false, false));
}

#[test]
fn test_env_override_beats_configuration() {
    let model = load();
    let env = MapEnv::new()
        .with("JRELEASER_TAG_NAME", "v{{projectVersionMajor}}")
        .with("JRELEASER_PROJECT_VERSION", "2.0.0");
    let releaser = model.releaser().unwrap();

    assert_eq!(releaser.resolved_tag_name(&model, &env).unwrap(), "v2");
    // Cached: a different environment no longer matters.
    assert_eq!(
        releaser.resolved_tag_name(&model, &MapEnv::new()).unwrap(),
        "v2"
    );
}

#[test]
fn test_deployer_url() {
    let model = load();
    let env = MapEnv::new();
    let deployer = &model.deploy.maven.github["app"];
    assert_eq!(
        deployer.resolved_url(&model, &env).unwrap(),
        "https://maven.pkg.github.com/acme-bot/widget-packages"
    );
}

#[test]
fn test_snapshot_release_resolves_without_priming() {
    let model = load();
    let env = MapEnv::new().with("JRELEASER_PROJECT_VERSION", "1.5.0-SNAPSHOT");
    let releaser = model.releaser().unwrap();

    assert_eq!(
        releaser.resolved_release_name(&model, &env).unwrap(),
        "Release early-access"
    );
    assert_eq!(
        releaser.resolved_release_notes_url(&model, &env).unwrap(),
        "https://github.com/acme/widget/releases/tag/early-access"
    );
    let bag = model.props(&env).unwrap();
    assert_eq!(
        bag.get("projectEffectiveVersion").map(ToString::to_string).as_deref(),
        Some("early-access")
    );
}

#[test]
fn test_missing_placeholder_is_reported() {
    let mut model = load();
    model.release.github.as_mut().unwrap().tag_name = Some("{{missing}}".into());
    let releaser = model.releaser().unwrap();

    let err = releaser.resolved_tag_name(&model, &MapEnv::new()).unwrap_err();
    assert!(matches!(err, TemplateError::UnresolvedPlaceholder { ref key, .. } if key == "missing"));
}

#[test]
fn test_export_redacts_secrets() {
    let model = load();
    let map = model.as_map(false);

    let github = &map["release"]["github"];
    assert_eq!(github["token"], Value::from(HIDE));
    assert_eq!(github["owner"], Value::from("acme"));

    let app = &map["deploy"]["maven"]["github"]["app"];
    assert_eq!(app["password"], Value::from(UNSET));

    let project = &map["project"];
    assert_eq!(project["authors"], serde_json::json!(["Ann"]));
    assert!(project.get("license").is_none());
}

#[test]
fn test_context_carries_everything() {
    let model = load();
    let env = MapEnv::new();
    let bag = model.props(&env).unwrap();

    assert_eq!(bag.get("projectChannel").map(ToString::to_string).as_deref(), Some("stable"));
    assert_eq!(bag.get("canonicalRepoName").map(ToString::to_string).as_deref(), Some("acme/widget"));
    assert_eq!(bag.get("osPlatform").map(ToString::to_string).as_deref(), Some("linux-x86_64"));
    assert!(bag.get("projectDescription").unwrap().is_pass_through());
    assert!(bag.contains_key("now"));
}
