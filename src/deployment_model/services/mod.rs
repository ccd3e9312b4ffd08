mod model_builder;
mod topology_traversal;

pub use model_builder::ModelBuilder;
pub use topology_traversal::TopologyTraversal;
