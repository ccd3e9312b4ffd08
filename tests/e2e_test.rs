/// End-to-end tests for the CLI
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(path)
}

// Exit code tests for CLI
mod exit_code_tests {
    use super::*;

    /// Exit code 0: Success - every target generated
    #[test]
    fn test_exit_code_success() {
        let out = TempDir::new().unwrap();
        cargo_bin_cmd!("topology-transform")
            .arg("-m")
            .arg(fixture("shop/shop.yml"))
            .args(["-t", "heat", "-o"])
            .arg(out.path())
            .assert()
            .code(0);
    }

    /// Exit code 0: --help should return success
    #[test]
    fn test_exit_code_help() {
        cargo_bin_cmd!("topology-transform")
            .arg("--help")
            .assert()
            .code(0);
    }

    /// Exit code 0: --version should return success
    #[test]
    fn test_exit_code_version() {
        cargo_bin_cmd!("topology-transform")
            .arg("--version")
            .assert()
            .code(0)
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }

    /// Exit code 2: Invalid arguments
    #[test]
    fn test_exit_code_invalid_argument() {
        cargo_bin_cmd!("topology-transform")
            .arg("--invalid-option")
            .assert()
            .code(2);
    }

    /// Exit code 2: Model is required unless listing targets
    #[test]
    fn test_exit_code_missing_model() {
        cargo_bin_cmd!("topology-transform")
            .args(["-t", "heat"])
            .assert()
            .code(2);
    }

    /// Exit code 3: Model file does not exist
    #[test]
    fn test_exit_code_nonexistent_model() {
        let out = TempDir::new().unwrap();
        cargo_bin_cmd!("topology-transform")
            .args(["-m", "/nonexistent/model.yml", "-t", "heat", "-o"])
            .arg(out.path())
            .assert()
            .code(3)
            .stderr(predicate::str::contains("An error occurred"));
    }

    /// Exit code 3: Unknown target is rejected before any output is written
    #[test]
    fn test_exit_code_unknown_target() {
        let out = TempDir::new().unwrap();
        cargo_bin_cmd!("topology-transform")
            .arg("-m")
            .arg(fixture("shop/shop.yml"))
            .args(["-t", "heat", "-t", "terraform", "-o"])
            .arg(out.path())
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Unknown target 'terraform'"))
            .stderr(predicate::str::contains("kubernetes"));
        assert!(!out.path().join("heat").exists());
    }

    /// Exit code 3: Relation to a component that does not exist
    #[test]
    fn test_exit_code_invalid_model() {
        let out = TempDir::new().unwrap();
        cargo_bin_cmd!("topology-transform")
            .arg("-m")
            .arg(fixture("broken/invalid.yml"))
            .args(["-t", "heat", "-o"])
            .arg(out.path())
            .assert()
            .code(3)
            .stderr(predicate::str::contains("unknown component 'nowhere'"));
    }

    /// Exit code 3: No targets on the command line or in a config
    #[test]
    fn test_exit_code_no_targets() {
        let out = TempDir::new().unwrap();
        cargo_bin_cmd!("topology-transform")
            .arg("-m")
            .arg(fixture("shop/shop.yml"))
            .arg("-o")
            .arg(out.path())
            .assert()
            .code(3)
            .stderr(predicate::str::contains("No targets requested"));
    }
}

mod target_tests {
    use super::*;

    #[test]
    fn test_list_targets() {
        cargo_bin_cmd!("topology-transform")
            .arg("--list-targets")
            .assert()
            .code(0)
            .stdout("ansible\nazure\nheat\nkubernetes\n");
    }

    #[test]
    fn test_heat_template_written() {
        let out = TempDir::new().unwrap();
        cargo_bin_cmd!("topology-transform")
            .arg("-m")
            .arg(fixture("shop/shop.yml"))
            .args(["-t", "heat", "-o"])
            .arg(out.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("heat"));

        let template = fs::read_to_string(out.path().join("heat/shop.yaml")).unwrap();
        assert!(template.contains("heat_template_version"));
        assert!(template.contains("OS::Nova::Server"));
        assert!(template.contains("apt-get install -y mysql-server"));
    }

    #[test]
    fn test_kubernetes_stacks_written() {
        let out = TempDir::new().unwrap();
        cargo_bin_cmd!("topology-transform")
            .arg("-m")
            .arg(fixture("shop/shop.yml"))
            .args(["-t", "kubernetes", "-o"])
            .arg(out.path())
            .assert()
            .success();

        let root = out.path().join("kubernetes");
        let dockerfile = fs::read_to_string(root.join("vm/Dockerfile")).unwrap();
        assert!(dockerfile.starts_with("FROM ubuntu:latest"));
        assert!(root.join("vm/vm-deployment.yaml").exists());
        assert!(root.join("web-vm/Dockerfile").exists());
        assert!(root.join("web-vm/tomcat/start.sh").exists());
    }

    #[test]
    fn test_all_targets_in_one_run() {
        let out = TempDir::new().unwrap();
        cargo_bin_cmd!("topology-transform")
            .arg("-m")
            .arg(fixture("shop/shop.yml"))
            .args([
                "-t",
                "heat",
                "-t",
                "kubernetes",
                "-t",
                "ansible",
                "-t",
                "azure",
                "-o",
            ])
            .arg(out.path())
            .assert()
            .success();

        assert!(out.path().join("heat/shop.yaml").exists());
        assert!(out.path().join("kubernetes/vm/Dockerfile").exists());
        assert!(out.path().join("ansible/deployment.yml").exists());
        assert!(out.path().join("ansible/files/db/configure.sh").exists());
        assert!(out.path().join("azure/shop.json").exists());
        assert!(out.path().join("azure/scripts/db_configure.sh").exists());

        let arm: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.path().join("azure/shop.json")).unwrap())
                .unwrap();
        assert!(arm["resources"].as_array().unwrap().len() > 1);
    }

    /// A failing target does not stop the others, but fails the run
    #[test]
    fn test_missing_script_fails_only_that_run() {
        let out = TempDir::new().unwrap();
        cargo_bin_cmd!("topology-transform")
            .arg("-m")
            .arg(fixture("broken/missing-script.yml"))
            .args(["-t", "heat", "-t", "kubernetes", "-o"])
            .arg(out.path())
            .assert()
            .code(3)
            .stdout(predicate::str::contains("heat phase 'transform' failed"))
            .stdout(predicate::str::contains("kubernetes phase 'transform' failed"));
    }

    #[test]
    fn test_explicit_source_dir() {
        let out = TempDir::new().unwrap();
        let models = TempDir::new().unwrap();
        let model = models.path().join("shop.yml");
        fs::copy(fixture("shop/shop.yml"), &model).unwrap();

        cargo_bin_cmd!("topology-transform")
            .arg("-m")
            .arg(&model)
            .arg("-s")
            .arg(fixture("shop"))
            .args(["-t", "ansible", "-o"])
            .arg(out.path())
            .assert()
            .success();

        assert!(out.path().join("ansible/files/shop/deploy.sh").exists());
    }
}
