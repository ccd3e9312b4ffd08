//! Backend-agnostic transformation machinery
//!
//! Per-run context, the five-phase lifecycle and its driver, the processed
//! set that keeps visitation idempotent, and the output dependency graph with
//! derived-value propagation that backends build their artifacts from.

mod context;
mod driver;
mod lifecycle;
mod output_graph;
mod processed;
pub mod propagation;

pub use context::{TargetSettings, TransformationContext};
pub use driver::{LifecycleDriver, LifecycleState};
pub use lifecycle::{Lifecycle, LifecyclePhase};
pub use output_graph::{NodeId, OutputEdge, OutputGraph, OutputNode, ResourceDescriptor};
pub use processed::ProcessedComponents;
