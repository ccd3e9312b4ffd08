//! topology-transform - deployment models to infrastructure-as-code
//!
//! This library reads a technology-neutral deployment model (components,
//! their types and the relations between them) and generates deployment
//! artifacts for several platforms: OpenStack Heat, Kubernetes, Ansible and
//! Azure Resource Manager.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Model** (`deployment_model`): Entity graph, typed components and
//!   relations, topology traversal and the visitor contract
//! - **Transformation** (`transformation`): Per-run context, lifecycle,
//!   output dependency graph and derived-value propagation
//! - **Application Layer** (`application`): Use cases, DTOs and the backend registry
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Model reader, file access, console and the backends
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use topology_transform::prelude::*;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<()> {
//! let use_case = TransformModelUseCase::new(
//!     YamlModelReader::new(),
//!     FileSystemAccessFactory::new("models", "output"),
//!     PathToolLocator::new(),
//!     StderrProgressReporter::new(),
//!     BackendRegistry::with_defaults(),
//! );
//!
//! let request = TransformationRequest::new(
//!     PathBuf::from("models/shop.yml"),
//!     PathBuf::from("output"),
//!     vec!["heat".to_string(), "kubernetes".to_string()],
//! );
//! let response = use_case.execute(request)?;
//! assert!(response.all_succeeded());
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod config;
pub mod deployment_model;
pub mod ports;
pub mod shared;
pub mod transformation;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::backends::{
        AnsibleLifecycle, AzureLifecycle, HeatLifecycle, KubernetesLifecycle,
    };
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::environment::PathToolLocator;
    pub use crate::adapters::outbound::filesystem::{
        FileSystemAccess, FileSystemAccessFactory, YamlModelReader,
    };
    pub use crate::application::dto::{TargetOutcome, TransformationRequest, TransformationResponse};
    pub use crate::application::factories::BackendRegistry;
    pub use crate::application::use_cases::TransformModelUseCase;
    pub use crate::deployment_model::domain::{
        Component, ComponentId, ComponentKind, DeploymentModel, EntityGraph, RelationKind,
        TopologyEdge, TopologyGraph,
    };
    pub use crate::deployment_model::services::{ModelBuilder, TopologyTraversal};
    pub use crate::deployment_model::visitor::{
        BackendVisitor, ComponentVisitor, RelationVisitor, VisitorHelper,
    };
    pub use crate::ports::inbound::TransformationPort;
    pub use crate::ports::outbound::{
        FileAccess, FileAccessFactory, ModelReader, ProgressReporter, ToolLocator,
    };
    pub use crate::shared::error::{ExitCode, TransformError};
    pub use crate::shared::Result;
    pub use crate::transformation::{
        Lifecycle, LifecycleDriver, LifecyclePhase, TargetSettings, TransformationContext,
    };
}
