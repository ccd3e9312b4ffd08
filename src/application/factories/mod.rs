mod backend_registry;

pub use backend_registry::{BackendRegistry, LifecycleFactory};
