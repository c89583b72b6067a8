// ABOUTME: Integration tests for configuration resolution.
// ABOUTME: Covers the repository document format, merging, and command-line defaults.

use gke_deploy::config::{CliOverrides, ConfigError, EffectiveConfig, RepoConfig};
use proptest::prelude::*;
use tempfile::TempDir;

fn base() -> EffectiveConfig {
    EffectiveConfig::resolve(CliOverrides {
        project: Some("acme".to_string()),
        ..Default::default()
    })
    .unwrap()
}

mod repo_document {
    use super::*;

    #[test]
    fn parses_every_recognized_key() {
        let repo = RepoConfig::from_json(
            r#"{
                "version": "v2",
                "cluster": "c1",
                "num-nodes": 3,
                "node-type": "n1-highmem-2",
                "zone": "asia-east1-a",
                "deployment": "web",
                "config-changes": {"port.http": "8080"}
            }"#,
        )
        .unwrap();

        assert_eq!(repo.version.unwrap().as_str(), "v2");
        assert_eq!(repo.cluster.unwrap().as_str(), "c1");
        assert_eq!(repo.num_nodes.unwrap().get(), 3);
        assert_eq!(repo.node_type.as_deref(), Some("n1-highmem-2"));
        assert_eq!(repo.zone.as_deref(), Some("asia-east1-a"));
        assert_eq!(repo.deployment.unwrap().as_str(), "web");
        assert_eq!(repo.config_changes.unwrap()["port.http"], "8080");
    }

    #[test]
    fn node_count_may_be_a_string() {
        let repo = RepoConfig::from_json(r#"{"num-nodes": "5"}"#).unwrap();
        assert_eq!(repo.num_nodes.unwrap().get(), 5);
    }

    #[test]
    fn numeric_version_becomes_tag() {
        let repo = RepoConfig::from_json(r#"{"version": 2}"#).unwrap();
        let merged = base().merge_repo(repo);

        assert_eq!(merged.version.as_str(), "2");
        assert_eq!(merged.image_target().to_string(), "gcr.io/acme/loklak:2");
    }

    #[test]
    fn zero_nodes_is_rejected() {
        assert!(RepoConfig::from_json(r#"{"num-nodes": 0}"#).is_err());
        assert!(RepoConfig::from_json(r#"{"num-nodes": "0"}"#).is_err());
        assert!(RepoConfig::from_json(r#"{"num-nodes": "many"}"#).is_err());
    }

    #[test]
    fn config_changes_keep_document_order() {
        let repo = RepoConfig::from_json(
            r#"{"config-changes": {"zeta": "1", "alpha": 2, "mid": true}}"#,
        )
        .unwrap();

        let changes = repo.config_changes.unwrap();
        let pairs: Vec<(&str, &str)> = changes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(pairs, vec![("zeta", "1"), ("alpha", "2"), ("mid", "true")]);
    }

    #[test]
    fn config_changes_reject_nested_values() {
        assert!(RepoConfig::from_json(r#"{"config-changes": {"a": {"b": 1}}}"#).is_err());
        assert!(RepoConfig::from_json(r#"{"config-changes": {"a": "x\ny"}}"#).is_err());
        assert!(RepoConfig::from_json(r#"{"config-changes": {"a=b": "c"}}"#).is_err());
    }

    #[test]
    fn invalid_names_are_rejected() {
        assert!(RepoConfig::from_json(r#"{"cluster": "Prod_Cluster"}"#).is_err());
        assert!(RepoConfig::from_json(r#"{"deployment": "-web"}"#).is_err());
        assert!(RepoConfig::from_json(r#"{"version": "v1 beta"}"#).is_err());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let repo = RepoConfig::from_json(r#"{"replicas": 4, "zone": "us-east1-b"}"#).unwrap();
        assert_eq!(repo.zone.as_deref(), Some("us-east1-b"));
        assert_eq!(repo.summary(), "zone=us-east1-b");
    }

    #[test]
    fn empty_document_has_no_overrides() {
        let repo = RepoConfig::from_json("{}").unwrap();
        assert_eq!(repo, RepoConfig::default());
        assert_eq!(repo.summary(), "no overrides");
    }
}

mod loading {
    use super::*;

    #[tokio::test]
    async fn missing_file_is_recoverable() {
        let dir = TempDir::new().unwrap();
        let err = RepoConfig::load(&dir.path().join("config.json")).await.unwrap_err();

        assert!(matches!(err, ConfigError::RepoConfigUnreadable { .. }));
        assert!(!err.is_fatal());
        assert!(err.to_string().starts_with("unable to open file"));
    }

    #[tokio::test]
    async fn malformed_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"version": "#).unwrap();

        let err = RepoConfig::load(&path).await.unwrap_err();

        assert!(matches!(err, ConfigError::InvalidRepoConfig { .. }));
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn valid_file_is_loaded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"deployment": "loklak-canary"}"#).unwrap();

        let repo = RepoConfig::load(&path).await.unwrap();
        assert_eq!(repo.deployment.unwrap().as_str(), "loklak-canary");
    }
}

mod merging {
    use super::*;

    #[test]
    fn document_values_win() {
        let repo = RepoConfig::from_json(r#"{"cluster": "other", "num-nodes": 6}"#).unwrap();
        let merged = base().merge_repo(repo);

        assert_eq!(merged.cluster.as_str(), "other");
        assert_eq!(merged.num_nodes.get(), 6);
        assert_eq!(merged.zone, "us-central1-a");
        assert_eq!(merged.project, "acme");
    }

    #[test]
    fn command_line_fields_survive_merge() {
        let config = EffectiveConfig::resolve(CliOverrides {
            project: Some("acme".to_string()),
            user: Some("octocat".to_string()),
            branch: Some("main".to_string()),
            create_cluster: true,
        })
        .unwrap();
        let repo = RepoConfig::from_json(r#"{"version": "v9"}"#).unwrap();

        let merged = config.merge_repo(repo);

        assert_eq!(merged.user, "octocat");
        assert_eq!(merged.branch, "main");
        assert!(merged.create_cluster);
        assert_eq!(merged.image_target().to_string(), "gcr.io/acme/loklak:v9");
    }
}

#[test]
fn missing_project_is_an_error() {
    let err = EffectiveConfig::resolve(CliOverrides::default()).unwrap_err();
    assert!(matches!(err, ConfigError::MissingProject));
}

proptest! {
    #[test]
    fn unset_user_and_branch_use_defaults(project in "[a-z][a-z0-9-]{0,20}", new in any::<bool>()) {
        let config = EffectiveConfig::resolve(CliOverrides {
            project: Some(project.clone()),
            create_cluster: new,
            ..Default::default()
        })
        .unwrap();

        prop_assert_eq!(config.project, project);
        prop_assert_eq!(config.user, "loklak");
        prop_assert_eq!(config.branch, "development");
        prop_assert_eq!(config.create_cluster, new);
    }

    #[test]
    fn supplied_user_and_branch_are_kept(user in "[A-Za-z0-9-]{1,12}", branch in "[a-z0-9/._-]{1,20}") {
        let config = EffectiveConfig::resolve(CliOverrides {
            project: Some("p".to_string()),
            user: Some(user.clone()),
            branch: Some(branch.clone()),
            create_cluster: false,
        })
        .unwrap();

        prop_assert_eq!(config.user, user);
        prop_assert_eq!(config.branch, branch);
    }
}
