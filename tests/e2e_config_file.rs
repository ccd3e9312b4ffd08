/// End-to-end tests for config file loading and CLI option merging.
///
/// Models are copied into a temp directory together with their scripts so
/// that config auto-discovery next to the model can be exercised.
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Copy the shop model and its scripts into `dir`.
fn create_shop_project(dir: &Path) {
    let source = fixtures_path().join("shop");
    fs::copy(source.join("shop.yml"), dir.join("shop.yml")).unwrap();
    for script in [
        "dbms/create.sh",
        "db/configure.sh",
        "tomcat/create.sh",
        "tomcat/start.sh",
        "shop/deploy.sh",
    ] {
        let target = dir.join(script);
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::copy(source.join(script), target).unwrap();
    }
}

fn write_config(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
}

// ============================================================================
// Config File Auto-Discovery Tests
// ============================================================================

mod auto_discovery_tests {
    use super::*;

    #[test]
    fn test_auto_discovery_supplies_targets() {
        let dir = TempDir::new().unwrap();
        create_shop_project(dir.path());
        write_config(
            &dir.path().join("topology-transform.config.yml"),
            "targets: [ansible]\noutput_dir: generated\n",
        );

        let out = dir.path().join("generated");
        cargo_bin_cmd!("topology-transform")
            .arg("-m")
            .arg(dir.path().join("shop.yml"))
            .arg("-o")
            .arg(&out)
            .assert()
            .success();

        assert!(out.join("ansible/deployment.yml").exists());
        assert!(!out.join("heat").exists());
    }

    #[test]
    fn test_auto_discovery_backend_options() {
        let dir = TempDir::new().unwrap();
        create_shop_project(dir.path());
        write_config(
            &dir.path().join("topology-transform.config.yml"),
            "targets: [heat]\nbackends:\n  heat:\n    flavor: m1.large\n",
        );

        let out = TempDir::new().unwrap();
        cargo_bin_cmd!("topology-transform")
            .arg("-m")
            .arg(dir.path().join("shop.yml"))
            .arg("-o")
            .arg(out.path())
            .assert()
            .success();

        let template = fs::read_to_string(out.path().join("heat/shop.yaml")).unwrap();
        assert!(template.contains("m1.large"));
    }
}

// ============================================================================
// Explicit Config and Merging Tests
// ============================================================================

mod explicit_config_tests {
    use super::*;

    #[test]
    fn test_explicit_config_targets() {
        let out = TempDir::new().unwrap();
        cargo_bin_cmd!("topology-transform")
            .arg("-m")
            .arg(fixtures_path().join("shop/shop.yml"))
            .arg("-c")
            .arg(fixtures_path().join("configs/heat-and-ansible.yml"))
            .arg("-o")
            .arg(out.path())
            .assert()
            .success();

        assert!(out.path().join("heat/shop.yaml").exists());
        assert!(out.path().join("ansible/deployment.yml").exists());
    }

    #[test]
    fn test_cli_targets_override_config() {
        let out = TempDir::new().unwrap();
        cargo_bin_cmd!("topology-transform")
            .arg("-m")
            .arg(fixtures_path().join("shop/shop.yml"))
            .arg("-c")
            .arg(fixtures_path().join("configs/heat-and-ansible.yml"))
            .args(["-t", "azure", "-o"])
            .arg(out.path())
            .assert()
            .success();

        assert!(out.path().join("azure/shop.json").exists());
        assert!(!out.path().join("heat").exists());
        assert!(!out.path().join("ansible").exists());
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        cargo_bin_cmd!("topology-transform")
            .arg("-m")
            .arg(fixtures_path().join("shop/shop.yml"))
            .args(["-c", "/nonexistent/config.yml"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Failed to read config file"));
    }

    #[test]
    fn test_unknown_config_field_warns() {
        let out = TempDir::new().unwrap();
        cargo_bin_cmd!("topology-transform")
            .arg("-m")
            .arg(fixtures_path().join("shop/shop.yml"))
            .arg("-c")
            .arg(fixtures_path().join("configs/unknown-field.yml"))
            .arg("-o")
            .arg(out.path())
            .assert()
            .success()
            .stderr(predicate::str::contains(
                "Unknown config field 'format' will be ignored",
            ));
    }

    #[test]
    fn test_unknown_target_in_config_fails() {
        let out = TempDir::new().unwrap();
        cargo_bin_cmd!("topology-transform")
            .arg("-m")
            .arg(fixtures_path().join("shop/shop.yml"))
            .arg("-c")
            .arg(fixtures_path().join("configs/unknown-target.yml"))
            .arg("-o")
            .arg(out.path())
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Unknown target 'terraform'"));
    }
}
