/// Outbound adapters - Infrastructure implementations of outbound ports
pub mod backends;
pub mod console;
pub mod environment;
pub mod filesystem;
