//! Kubernetes backend
//!
//! Each compute and the software it hosts becomes one component stack: a
//! Dockerfile plus a Deployment and, when ports are exposed, a Service.
//! Connects-To relations between stacks carry environment variables from
//! the target stack into the source stack.

mod stack;

pub use stack::ComponentStack;

use super::support::{component_env, operations_with_artifacts, require_tools, to_yaml};
use crate::deployment_model::domain::{Component, ComponentId, RelationKind, TopologyEdge};
use crate::deployment_model::services::TopologyTraversal;
use crate::deployment_model::visitor::{
    BackendVisitor, ComponentVisitor, RelationVisitor, VisitorHelper,
};
use crate::shared::error::TransformError;
use crate::shared::Result;
use crate::transformation::propagation::{collect_from_neighbors, merge_contributions};
use crate::transformation::{
    Lifecycle, NodeId, OutputEdge, OutputGraph, OutputNode, ProcessedComponents,
    TransformationContext,
};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Directory scripts are copied to inside the image
const SCRIPT_ROOT: &str = "/opt";

pub struct KubernetesLifecycle {
    context: TransformationContext,
}

impl KubernetesLifecycle {
    pub const TARGET: &'static str = "kubernetes";

    pub fn new(context: TransformationContext) -> Self {
        Self { context }
    }

    fn write_stack(&self, graph: &OutputGraph<ComponentStack>, id: NodeId) -> Result<()> {
        let stack = graph.node(id);
        let env = stack_environment(graph, id);

        let files = self.context.file_access();
        let dir = stack.name();
        files.write(&format!("{}/Dockerfile", dir), &stack.dockerfile())?;
        files.write(
            &format!("{}/{}.yaml", dir, stack.deployment_name()),
            &to_yaml(&stack.deployment_manifest(&env))?,
        )?;
        if !stack.ports().is_empty() {
            files.write(
                &format!("{}/{}.yaml", dir, stack.service_name()),
                &to_yaml(&stack.service_manifest())?,
            )?;
        }
        tracing::debug!(stack = dir, env = env.len(), "wrote component stack");
        Ok(())
    }
}

impl Lifecycle for KubernetesLifecycle {
    fn context(&self) -> &TransformationContext {
        &self.context
    }

    fn check_environment(&mut self) -> Result<()> {
        require_tools(&self.context, &["docker", "kubectl"])
    }

    /// Every software component must end up inside some compute's stack
    fn check_model(&mut self) -> Result<()> {
        let topology = self.context.topology();
        for (id, component) in topology.components() {
            if TopologyTraversal::resolve_hosting_component(topology, id)?.is_none() {
                return Err(TransformError::ModelCheck {
                    target: Self::TARGET.to_string(),
                    reason: format!("component '{}' is not hosted on a compute", component.name()),
                }
                .into());
            }
        }
        Ok(())
    }

    fn transform(&mut self) -> Result<()> {
        tracing::info!(
            model = self.context.model().name(),
            "begin transformation to Kubernetes"
        );
        let mut visitor = StackBuildingVisitor::new(&self.context);
        VisitorHelper::visit(self.context.topology(), &mut visitor)?;
        let graph = visitor.into_graph();

        for (id, _) in graph.nodes() {
            self.write_stack(&graph, id)?;
        }
        tracing::info!(stacks = graph.len(), "transformation to Kubernetes successful");
        Ok(())
    }
}

/// Builds one [`ComponentStack`] per compute and links stacks by Connects-To
pub struct StackBuildingVisitor<'a> {
    context: &'a TransformationContext,
    graph: OutputGraph<ComponentStack>,
    stacks: HashMap<ComponentId, NodeId>,
    processed: ProcessedComponents,
}

impl<'a> StackBuildingVisitor<'a> {
    pub fn new(context: &'a TransformationContext) -> Self {
        Self {
            context,
            graph: OutputGraph::new(),
            stacks: HashMap::new(),
            processed: ProcessedComponents::new(),
        }
    }

    pub fn into_graph(self) -> OutputGraph<ComponentStack> {
        self.graph
    }

    fn stack_of(&self, component: ComponentId) -> Result<NodeId> {
        let topology = self.context.topology();
        TopologyTraversal::resolve_hosting_component(topology, component)?
            .and_then(|compute| self.stacks.get(&compute).copied())
            .ok_or_else(|| {
                TransformError::MissingHost {
                    component: topology.component(component).name().to_string(),
                }
                .into()
            })
    }

    fn add_software(&mut self, id: ComponentId, component: &Component) -> Result<()> {
        if !self.processed.mark_transformed(id) {
            return Ok(());
        }
        let context = self.context;
        let stack_id = self.stack_of(id)?;
        let files = context.file_access();
        let stack_dir = self.graph.node(stack_id).name().to_string();

        let port = if let Some(dbms) = component.as_dbms() {
            dbms.port()?
        } else if let Some(web_server) = component.as_web_server() {
            web_server.port()?
        } else {
            None
        };

        let mut steps = Vec::new();
        for operation in operations_with_artifacts(component)? {
            for artifact in operation.artifacts() {
                let relative = format!("{}/{}", component.normalized_name(), artifact.file_name());
                let content = files.read_to_string(artifact.value())?;
                files.write(&format!("{}/{}", stack_dir, relative), &content)?;
                let destination = format!("{}/{}", SCRIPT_ROOT, relative);
                steps.push((operation.name().to_string(), relative, destination));
            }
        }

        let stack = self.graph.node_mut(stack_id);
        stack.add_env_vars(component_env(component)?);
        if let Some(port) = port {
            stack.add_port(port);
        }
        for (operation, source, destination) in steps {
            if operation == "start" {
                stack.set_start_step(&source, &destination);
            } else {
                stack.add_run_step(&source, &destination);
            }
        }
        Ok(())
    }
}

impl BackendVisitor for StackBuildingVisitor<'_> {
    fn target_name(&self) -> &str {
        KubernetesLifecycle::TARGET
    }
}

impl ComponentVisitor for StackBuildingVisitor<'_> {
    fn visit_compute(&mut self, id: ComponentId, component: &Component) -> Result<()> {
        if !self.processed.mark_transformed(id) {
            return Ok(());
        }
        let image = match self.context.settings().option("base_image") {
            Some(image) => image.to_string(),
            None => {
                let compute = component.as_compute().map(|c| c.machine_image()).transpose()?;
                format!("{}:latest", compute.flatten().unwrap_or_else(|| "ubuntu".to_string()))
            }
        };
        let name = ComponentStack::label(&component.normalized_name());
        let node = self.graph.add_node(ComponentStack::new(name, id, image))?;
        self.stacks.insert(id, node);
        Ok(())
    }

    fn visit_software_component(&mut self, id: ComponentId, component: &Component) -> Result<()> {
        self.add_software(id, component)
    }

    fn visit_database(&mut self, id: ComponentId, component: &Component) -> Result<()> {
        self.add_software(id, component)
    }

    fn visit_web_application(&mut self, id: ComponentId, component: &Component) -> Result<()> {
        self.add_software(id, component)
    }
}

impl RelationVisitor for StackBuildingVisitor<'_> {
    /// Placement and plain dependencies are already captured by the stacks
    fn visit_relation(&mut self, edge: &TopologyEdge) -> Result<()> {
        tracing::debug!(relation = %edge.kind(), "relation has no Kubernetes counterpart");
        Ok(())
    }

    fn visit_connects_to(&mut self, edge: &TopologyEdge) -> Result<()> {
        let source = self.stack_of(edge.source())?;
        let target = self.stack_of(edge.target())?;
        if source != target {
            self.graph
                .add_edge(source, target, OutputEdge::Relation(RelationKind::ConnectsTo));
            self.graph.add_dependency(source, target);
        }
        Ok(())
    }
}

/// Own variables of a stack, then those of every stack it connects to
pub fn stack_environment(graph: &OutputGraph<ComponentStack>, id: NodeId) -> IndexMap<String, String> {
    merge_contributions([
        graph.node(id).env_vars().clone(),
        collect_from_neighbors(graph, id, RelationKind::ConnectsTo, |target| {
            target.env_vars().clone()
        }),
    ])
}

/// Resolved environment of every stack, keyed by stack name
pub fn resolved_environments(
    graph: &OutputGraph<ComponentStack>,
) -> IndexMap<String, IndexMap<String, String>> {
    graph
        .nodes()
        .map(|(id, stack)| (stack.name().to_string(), stack_environment(graph, id)))
        .collect()
}
