//! Deployment model intermediate representation
//!
//! Attributed entity graph, typed model entities with inheritance-aware
//! resolution, the topology graph and the visitor contract backends implement.

pub mod domain;
pub mod services;
pub mod visitor;

#[cfg(test)]
pub(crate) mod test_support;
