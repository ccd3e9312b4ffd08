//! Target backends, one lifecycle per infrastructure-as-code platform

pub mod ansible;
pub mod azure;
pub mod heat;
pub mod kubernetes;
mod support;

#[cfg(test)]
pub(crate) mod test_support;

pub use ansible::AnsibleLifecycle;
pub use azure::AzureLifecycle;
pub use heat::HeatLifecycle;
pub use kubernetes::KubernetesLifecycle;
