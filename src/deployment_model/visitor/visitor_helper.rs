use super::{ComponentVisitor, RelationVisitor};
use crate::deployment_model::domain::TopologyGraph;
use crate::deployment_model::services::TopologyTraversal;
use crate::shared::Result;

/// VisitorHelper - walks a topology and dispatches every node and edge once
pub struct VisitorHelper;

impl VisitorHelper {
    /// Visits every component exactly once, hosts before hosted components
    ///
    /// # Errors
    /// Stops at the first visitor error, or fails up front on a hosting cycle.
    pub fn visit_components<V: ComponentVisitor + ?Sized>(
        graph: &TopologyGraph,
        visitor: &mut V,
    ) -> Result<()> {
        for id in TopologyTraversal::hosting_order(graph)? {
            let component = graph.component(id);
            tracing::debug!(
                target_name = visitor.target_name(),
                component = component.name(),
                kind = %component.kind(),
                "visiting component"
            );
            component.accept(id, visitor)?;
        }
        Ok(())
    }

    /// Visits every relation exactly once, in declaration order
    pub fn visit_relations<V: RelationVisitor + ?Sized>(
        graph: &TopologyGraph,
        visitor: &mut V,
    ) -> Result<()> {
        for edge in graph.edges() {
            edge.accept(visitor)?;
        }
        Ok(())
    }

    /// Components first, then relations
    pub fn visit<V: ComponentVisitor + RelationVisitor + ?Sized>(
        graph: &TopologyGraph,
        visitor: &mut V,
    ) -> Result<()> {
        Self::visit_components(graph, visitor)?;
        Self::visit_relations(graph, visitor)
    }
}
