use crate::adapters::outbound::backends::{
    AnsibleLifecycle, AzureLifecycle, HeatLifecycle, KubernetesLifecycle,
};
use crate::shared::error::TransformError;
use crate::shared::Result;
use crate::transformation::{Lifecycle, TransformationContext};
use std::collections::BTreeMap;

/// Creates a lifecycle for one target run
pub type LifecycleFactory = fn(TransformationContext) -> Box<dyn Lifecycle>;

/// Factory for backend lifecycles, keyed by target name
///
/// This factory belongs in the application layer: it selects the
/// infrastructure adapter that matches a requested target.
#[derive(Default)]
pub struct BackendRegistry {
    factories: BTreeMap<String, LifecycleFactory>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every bundled backend
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(HeatLifecycle::TARGET, |c| Box::new(HeatLifecycle::new(c)));
        registry.register(KubernetesLifecycle::TARGET, |c| {
            Box::new(KubernetesLifecycle::new(c))
        });
        registry.register(AnsibleLifecycle::TARGET, |c| Box::new(AnsibleLifecycle::new(c)));
        registry.register(AzureLifecycle::TARGET, |c| Box::new(AzureLifecycle::new(c)));
        registry
    }

    /// Registers a backend; returns the factory it replaced, if any
    pub fn register(
        &mut self,
        target: impl Into<String>,
        factory: LifecycleFactory,
    ) -> Option<LifecycleFactory> {
        self.factories.insert(target.into(), factory)
    }

    pub fn contains(&self, target: &str) -> bool {
        self.factories.contains_key(target)
    }

    /// Registered target names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Creates the lifecycle for the context's target
    ///
    /// # Errors
    /// Returns [`TransformError::UnknownTarget`] when nothing is registered
    /// under that name.
    pub fn create(&self, context: TransformationContext) -> Result<Box<dyn Lifecycle>> {
        match self.factories.get(context.target()) {
            Some(factory) => Ok(factory(context)),
            None => Err(TransformError::UnknownTarget {
                name: context.target().to_string(),
                available: self.names().join(", "),
            }
            .into()),
        }
    }

    /// Fails on the first name that is not registered
    pub fn validate(&self, targets: &[String]) -> Result<()> {
        match targets.iter().find(|t| !self.contains(t)) {
            Some(unknown) => Err(TransformError::UnknownTarget {
                name: unknown.clone(),
                available: self.names().join(", "),
            }
            .into()),
            None => Ok(()),
        }
    }
}
