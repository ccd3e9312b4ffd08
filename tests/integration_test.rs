/// Integration tests for the application layer
mod test_utilities;

use std::path::PathBuf;
use std::sync::Arc;
use test_utilities::mocks::*;
use topology_transform::prelude::*;

const DATABASE_STACK: &str = r#"
description: Single database server
components:
  server:
    type: compute
    properties:
      machine_image: ubuntu
      public_key: ssh-rsa AAAA test
  mysql:
    type: mysql_dbms
    properties:
      root_password: secret
      port: 3306
    operations:
      create: ./mysql/create.sh
    relations:
      - hosted_on: server
  orders:
    type: mysql_database
    properties:
      schema_name: orders
    operations:
      configure: ./orders/configure.sh
    relations:
      - hosted_on: mysql
"#;

fn sources() -> MockFileAccess {
    MockFileAccess::new()
        .with_source("mysql/create.sh", "#!/bin/sh\napt-get install -y mysql-server\n")
        .with_source("orders/configure.sh", "#!/bin/sh\nmysql -e 'CREATE DATABASE orders'\n")
}

fn model() -> Arc<DeploymentModel> {
    let graph = MockModelReader::new(DATABASE_STACK)
        .read_model(&PathBuf::from("orders.yml"))
        .unwrap();
    Arc::new(ModelBuilder::build("orders", graph).unwrap())
}

fn context(target: &str, files: &MockFileAccess, settings: TargetSettings) -> TransformationContext {
    TransformationContext::new(
        target,
        model(),
        Box::new(files.clone()),
        Box::new(MockToolLocator::default()),
        settings,
    )
}

fn request(targets: &[&str]) -> TransformationRequest {
    TransformationRequest::new(
        PathBuf::from("models/orders.yml"),
        PathBuf::from("out"),
        targets.iter().map(|t| t.to_string()).collect(),
    )
}

#[test]
fn test_heat_database_stack() {
    let files = sources();
    let mut driver = LifecycleDriver::new(Box::new(HeatLifecycle::new(context(
        "heat",
        &files,
        TargetSettings::new(false),
    ))));

    driver.run().unwrap();

    let template: serde_yaml_ng::Value =
        serde_yaml_ng::from_str(&files.output("orders.yaml").unwrap()).unwrap();
    let resources = template["resources"].as_mapping().unwrap();
    assert_eq!(resources["server"]["type"], "OS::Nova::Server");
    assert_eq!(
        resources["mysql_create"]["type"],
        "OS::Heat::SoftwareDeployment"
    );
    assert_eq!(
        resources["orders_configure_config"]["properties"]["config"],
        "#!/bin/sh\nmysql -e 'CREATE DATABASE orders'\n"
    );
    let deployments: Vec<_> = resources
        .values()
        .filter(|r| r["type"] == "OS::Heat::SoftwareDeployment")
        .collect();
    assert_eq!(deployments.len(), 2);
    for deployment in deployments {
        let depends_on = deployment["depends_on"].as_sequence().unwrap();
        assert!(depends_on.iter().any(|d| d == "server"));
    }
    // the database inherits its DBMS's values
    let inputs = &resources["orders_configure"]["properties"]["input_values"];
    assert_eq!(inputs["MYSQL_ROOT_PASSWORD"], "secret");
    assert_eq!(inputs["ORDERS_SCHEMA_NAME"], "orders");

    assert_eq!(files.prepare_calls(), 1);
    assert_eq!(files.release_calls(), 1);
}

#[test]
fn test_heat_write_failure_still_cleans_up_once() {
    let files = sources().failing_writes_to("orders.yaml");
    let mut driver = LifecycleDriver::new(Box::new(HeatLifecycle::new(context(
        "heat",
        &files,
        TargetSettings::new(false),
    ))));

    let err = driver.run().unwrap_err();

    assert!(format!("{:#}", err).contains("injected I/O failure"));
    assert_eq!(files.release_calls(), 1);
    assert!(files.output("orders.yaml").is_none());
}

#[test]
fn test_driver_runs_phases_in_order() {
    let lifecycle = RecordingLifecycle::new(context(
        "recording",
        &MockFileAccess::new(),
        TargetSettings::new(false),
    ));
    let calls = lifecycle.calls();
    let mut driver = LifecycleDriver::new(Box::new(lifecycle));

    driver.run().unwrap();

    assert_eq!(*calls.lock().unwrap(), LifecyclePhase::ALL.to_vec());
}

#[test]
fn test_failed_transform_runs_cleanup() {
    let lifecycle = RecordingLifecycle::new(context(
        "recording",
        &MockFileAccess::new(),
        TargetSettings::new(false),
    ))
    .failing_in(LifecyclePhase::Transform);
    let calls = lifecycle.calls();
    let mut driver = LifecycleDriver::new(Box::new(lifecycle));

    let err = driver.run().unwrap_err();

    assert!(format!("{:#}", err).contains("injected failure in transform"));
    assert_eq!(
        calls.lock().unwrap().last(),
        Some(&LifecyclePhase::Cleanup)
    );
}

#[test]
fn test_failed_check_skips_prepare_and_cleanup() {
    let lifecycle = RecordingLifecycle::new(context(
        "recording",
        &MockFileAccess::new(),
        TargetSettings::new(false),
    ))
    .failing_in(LifecyclePhase::CheckModel);
    let calls = lifecycle.calls();
    let mut driver = LifecycleDriver::new(Box::new(lifecycle));

    assert!(driver.run().is_err());
    assert_eq!(
        *calls.lock().unwrap(),
        vec![LifecyclePhase::CheckEnvironment, LifecyclePhase::CheckModel]
    );
}

#[test]
fn test_missing_tool_fails_environment_check() {
    let files = sources();
    let ctx = TransformationContext::new(
        "ansible",
        model(),
        Box::new(files.clone()),
        Box::new(MockToolLocator::with_tools(&["docker"])),
        TargetSettings::new(true),
    );
    let mut driver = LifecycleDriver::new(Box::new(AnsibleLifecycle::new(ctx)));

    let err = driver.run().unwrap_err();

    assert!(format!("{:#}", err).contains("ansible-playbook"));
    assert_eq!(files.prepare_calls(), 0);
    assert_eq!(files.release_calls(), 0);
}

#[test]
fn test_use_case_generates_every_target() {
    let factory = MockFileAccessFactory::new(sources());
    let reporter = MockProgressReporter::new();
    let use_case = TransformModelUseCase::new(
        MockModelReader::new(DATABASE_STACK),
        factory.clone(),
        MockToolLocator::default(),
        reporter.clone(),
        BackendRegistry::with_defaults(),
    );

    let response = use_case
        .execute(request(&["heat", "kubernetes", "ansible", "azure"]))
        .unwrap();

    assert_eq!(response.model_name, "orders");
    assert!(response.all_succeeded(), "{:?}", response.failed_targets());
    assert!(factory.for_target("heat").unwrap().output("orders.yaml").is_some());
    assert!(factory
        .for_target("kubernetes")
        .unwrap()
        .output("server/Dockerfile")
        .is_some());
    assert!(factory
        .for_target("ansible")
        .unwrap()
        .output("deployment.yml")
        .is_some());
    assert!(factory.for_target("azure").unwrap().output("orders.json").is_some());

    assert_eq!(reporter.messages_starting_with("Target:").len(), 4);
    assert!(reporter.messages_starting_with("Error:").is_empty());
}

#[test]
fn test_use_case_reports_failing_target() {
    let factory = MockFileAccessFactory::new(sources().failing_writes_to("deployment.yml"));
    let reporter = MockProgressReporter::new();
    let use_case = TransformModelUseCase::new(
        MockModelReader::new(DATABASE_STACK),
        factory,
        MockToolLocator::default(),
        reporter.clone(),
        BackendRegistry::with_defaults(),
    );

    let response = use_case.execute(request(&["ansible", "heat"])).unwrap();

    assert_eq!(response.failed_targets(), vec!["ansible"]);
    let ansible = &response.outcomes[0];
    assert!(ansible
        .error
        .as_deref()
        .unwrap()
        .starts_with("ansible phase 'transform' failed"));
    assert!(response.outcomes[1].is_success());
    assert_eq!(reporter.messages_starting_with("Error:").len(), 1);
}

#[test]
fn test_use_case_rejects_invalid_model() {
    let use_case = TransformModelUseCase::new(
        MockModelReader::new(
            "components:\n  app:\n    type: software_component\n    relations:\n      - hosted_on: nowhere\n",
        ),
        MockFileAccessFactory::default(),
        MockToolLocator::default(),
        MockProgressReporter::new(),
        BackendRegistry::with_defaults(),
    );

    let err = use_case.execute(request(&["heat"])).unwrap_err();
    assert!(err.to_string().contains("unknown component 'nowhere'"));
}

#[test]
fn test_available_targets_through_port() {
    let use_case = TransformModelUseCase::new(
        MockModelReader::new(DATABASE_STACK),
        MockFileAccessFactory::default(),
        MockToolLocator::default(),
        MockProgressReporter::new(),
        BackendRegistry::with_defaults(),
    );
    let port: &dyn TransformationPort = &use_case;

    assert_eq!(
        port.available_targets(),
        vec!["ansible", "azure", "heat", "kubernetes"]
    );
}
