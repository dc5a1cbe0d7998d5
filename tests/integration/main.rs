//! Integration tests for profile-cache

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    const SNAPSHOT_V1: &str = r#"
profiles:
  - name: podinfo
    description: Podinfo Helm chart for Kubernetes
    availableVersions: ["6.0.0", "6.0.1"]
  - name: nginx
    availableVersions: ["1.0.0"]
values:
  podinfo:
    "6.0.1": |
      replicaCount: 1
"#;

    const SNAPSHOT_V2: &str = r#"
profiles:
  - name: podinfo
    availableVersions: ["6.0.0", "6.0.1", "6.1.0"]
values:
  podinfo:
    "6.1.0": |
      replicaCount: 2
"#;

    fn profile_cache() -> Command {
        cargo_bin_cmd!("profile-cache")
    }

    /// Command isolated from the user's config and cache
    fn isolated(temp: &TempDir) -> Command {
        let mut cmd = profile_cache();
        cmd.arg("--config")
            .arg(temp.path().join("config.toml"))
            .arg("--cache-dir")
            .arg(cache_root(temp));
        cmd
    }

    fn cache_root(temp: &TempDir) -> PathBuf {
        temp.path().join("cache")
    }

    fn write_snapshot(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn put(temp: &TempDir, snapshot: &str) -> assert_cmd::assert::Assert {
        let path = write_snapshot(temp.path(), "snapshot.yaml", snapshot);
        isolated(temp)
            .args(["put", "flux-system", "weaveworks", "--snapshot"])
            .arg(path)
            .assert()
    }

    #[test]
    fn help_displays() {
        profile_cache()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Helm profile cache"));
    }

    #[test]
    fn version_displays() {
        profile_cache()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("profile-cache"));
    }

    #[test]
    fn put_then_list() {
        let temp = TempDir::new().unwrap();
        put(&temp, SNAPSHOT_V1)
            .success()
            .stdout(predicate::str::contains("Cached 2 profile(s) and 1 values file(s)"));

        isolated(&temp)
            .args(["list", "flux-system", "weaveworks", "--format", "plain"])
            .assert()
            .success()
            .stdout("podinfo\nnginx\n");

        assert!(cache_root(&temp)
            .join("flux-system/weaveworks/profiles.yaml")
            .exists());
        assert!(cache_root(&temp).join("cache.lock").exists());
    }

    #[test]
    fn list_as_json() {
        let temp = TempDir::new().unwrap();
        put(&temp, SNAPSHOT_V1).success();

        let output = isolated(&temp)
            .args(["list", "flux-system", "weaveworks", "--format", "json"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(parsed[0]["name"], "podinfo");
        assert_eq!(parsed[0]["availableVersions"][1], "6.0.1");
    }

    #[test]
    fn values_are_printed_verbatim() {
        let temp = TempDir::new().unwrap();
        put(&temp, SNAPSHOT_V1).success();

        isolated(&temp)
            .args(["values", "flux-system", "weaveworks", "podinfo", "6.0.1"])
            .assert()
            .success()
            .stdout("replicaCount: 1\n");
    }

    #[test]
    fn values_for_version_without_values() {
        let temp = TempDir::new().unwrap();
        put(&temp, SNAPSHOT_V1).success();

        isolated(&temp)
            .args(["values", "flux-system", "weaveworks", "podinfo", "6.0.0"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("values.yaml not found"));
    }

    #[test]
    fn versions_listed_from_index() {
        let temp = TempDir::new().unwrap();
        put(&temp, SNAPSHOT_V1).success();

        isolated(&temp)
            .args(["versions", "flux-system", "weaveworks", "podinfo"])
            .assert()
            .success()
            .stdout("6.0.0\n6.0.1\n");

        isolated(&temp)
            .args(["versions", "flux-system", "weaveworks", "unknown"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("profile with name unknown not found"));
    }

    #[test]
    fn versions_before_put_are_empty() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(cache_root(&temp)).unwrap();

        isolated(&temp)
            .args(["versions", "flux-system", "weaveworks", "podinfo"])
            .assert()
            .success()
            .stdout("");
    }

    #[test]
    fn list_unknown_repository() {
        let temp = TempDir::new().unwrap();
        put(&temp, SNAPSHOT_V1).success();

        isolated(&temp)
            .args(["list", "not-found", "none"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("not-found/none/profiles.yaml"));
    }

    #[test]
    fn missing_cache_root() {
        let temp = TempDir::new().unwrap();

        isolated(&temp)
            .args(["list", "flux-system", "weaveworks"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("cache.lock"))
            .stderr(predicate::str::contains("Hint:"));

        assert!(!cache_root(&temp).exists());
    }

    #[test]
    fn delete_removes_repository() {
        let temp = TempDir::new().unwrap();
        put(&temp, SNAPSHOT_V1).success();

        isolated(&temp)
            .args(["delete", "flux-system", "weaveworks"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Removed cached data"));

        isolated(&temp)
            .args(["list", "flux-system", "weaveworks"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("not found"));

        assert!(cache_root(&temp).join("flux-system").exists());
    }

    #[test]
    fn put_reports_new_versions() {
        let temp = TempDir::new().unwrap();
        put(&temp, SNAPSHOT_V1)
            .success()
            .stdout(predicate::str::contains("New version available").not());

        put(&temp, SNAPSHOT_V2)
            .success()
            .stdout(predicate::str::contains("New version available for profile"))
            .stdout(predicate::str::contains("6.1.0"));

        // Values of versions dropped from the index stay readable
        isolated(&temp)
            .args(["values", "flux-system", "weaveworks", "podinfo", "6.0.1"])
            .assert()
            .success()
            .stdout("replicaCount: 1\n");
    }

    #[test]
    fn put_rejects_values_for_unlisted_version() {
        let temp = TempDir::new().unwrap();
        let snapshot = r#"
profiles:
  - name: podinfo
    availableVersions: ["6.0.0"]
values:
  podinfo:
    "9.9.9": "replicaCount: 1"
"#;

        put(&temp, snapshot)
            .failure()
            .stderr(predicate::str::contains("invalid snapshot"));
    }

    #[test]
    fn put_rejects_path_traversal() {
        let temp = TempDir::new().unwrap();
        let path = write_snapshot(temp.path(), "snapshot.yaml", SNAPSHOT_V1);

        isolated(&temp)
            .args(["put", "..", "weaveworks", "--snapshot"])
            .arg(path)
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid identifier"));
    }

    #[test]
    fn config_path() {
        let temp = TempDir::new().unwrap();

        isolated(&temp)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let temp = TempDir::new().unwrap();

        isolated(&temp)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[cache]"));
    }
}
