use crate::deployment_model::domain::ComponentId;
use std::collections::HashSet;

/// Components a backend has already transformed during the current run
///
/// Owned by one run, so concurrent runs over the same model never observe
/// each other's progress.
#[derive(Debug, Default, Clone)]
pub struct ProcessedComponents {
    done: HashSet<ComponentId>,
}

impl ProcessedComponents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_transformed(&self, id: ComponentId) -> bool {
        self.done.contains(&id)
    }

    /// Marks `id` as transformed; returns `false` if it already was
    pub fn mark_transformed(&mut self, id: ComponentId) -> bool {
        self.done.insert(id)
    }

    pub fn len(&self) -> usize {
        self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.done.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deployment_model::domain::ComponentKind;
    use crate::deployment_model::test_support::topology;

    #[test]
    fn test_mark_once() {
        let graph = topology(&[("vm", ComponentKind::Compute)], &[]);
        let vm = graph.component_id("vm").unwrap();

        let mut processed = ProcessedComponents::new();
        assert!(!processed.is_transformed(vm));
        assert!(processed.mark_transformed(vm));
        assert!(!processed.mark_transformed(vm));
        assert!(processed.is_transformed(vm));
        assert_eq!(processed.len(), 1);
    }
}
