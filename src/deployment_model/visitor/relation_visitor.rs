use super::BackendVisitor;
use crate::deployment_model::domain::{RelationKind, TopologyEdge};
use crate::shared::error::TransformError;
use crate::shared::Result;

/// Per-variant callbacks a backend implements for relations
///
/// Defaults fall back to the supertype handler, ending at
/// [`visit_relation`](Self::visit_relation), which rejects the variant.
pub trait RelationVisitor: BackendVisitor {
    fn visit_relation(&mut self, edge: &TopologyEdge) -> Result<()> {
        Err(TransformError::UnsupportedVariant {
            target: self.target_name().to_string(),
            variant: edge.kind().to_string(),
            entity: format!(
                "{} -> {}",
                edge.relation().source(),
                edge.relation().target()
            ),
        }
        .into())
    }

    fn visit_depends_on(&mut self, edge: &TopologyEdge) -> Result<()> {
        self.visit_relation(edge)
    }

    fn visit_hosted_on(&mut self, edge: &TopologyEdge) -> Result<()> {
        self.visit_depends_on(edge)
    }

    fn visit_connects_to(&mut self, edge: &TopologyEdge) -> Result<()> {
        self.visit_depends_on(edge)
    }
}

impl TopologyEdge {
    /// Dispatches to the visitor method matching this edge's relation variant
    pub fn accept<V: RelationVisitor + ?Sized>(&self, visitor: &mut V) -> Result<()> {
        match self.kind() {
            RelationKind::Generic => visitor.visit_relation(self),
            RelationKind::DependsOn => visitor.visit_depends_on(self),
            RelationKind::HostedOn => visitor.visit_hosted_on(self),
            RelationKind::ConnectsTo => visitor.visit_connects_to(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deployment_model::domain::ComponentKind;
    use crate::deployment_model::test_support::topology;

    #[derive(Default)]
    struct DependencyCounter {
        depends: usize,
        connects: usize,
    }

    impl BackendVisitor for DependencyCounter {
        fn target_name(&self) -> &str {
            "counter"
        }
    }

    impl RelationVisitor for DependencyCounter {
        fn visit_depends_on(&mut self, _edge: &TopologyEdge) -> Result<()> {
            self.depends += 1;
            Ok(())
        }

        fn visit_connects_to(&mut self, _edge: &TopologyEdge) -> Result<()> {
            self.connects += 1;
            Ok(())
        }
    }

    #[test]
    fn test_relation_dispatch() {
        let graph = topology(
            &[
                ("app", ComponentKind::WebApplication),
                ("db", ComponentKind::Database),
                ("vm", ComponentKind::Compute),
            ],
            &[
                ("app", RelationKind::HostedOn, "vm"),
                ("app", RelationKind::ConnectsTo, "db"),
                ("db", RelationKind::DependsOn, "vm"),
            ],
        );
        let mut counter = DependencyCounter::default();
        for edge in graph.edges() {
            edge.accept(&mut counter).unwrap();
        }
        assert_eq!(counter.depends, 2);
        assert_eq!(counter.connects, 1);
    }

    #[test]
    fn test_generic_relation_rejected() {
        let graph = topology(
            &[("a", ComponentKind::Compute), ("b", ComponentKind::Compute)],
            &[("a", RelationKind::Generic, "b")],
        );
        let mut counter = DependencyCounter::default();
        let edge = graph.edges().next().unwrap();
        assert!(edge.accept(&mut counter).is_err());
    }
}
