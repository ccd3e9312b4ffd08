/// Application layer - Use cases, DTOs and factories
///
/// This layer orchestrates the deployment-model services and the backends,
/// reaching infrastructure only through ports.
pub mod dto;
pub mod factories;
pub mod use_cases;
