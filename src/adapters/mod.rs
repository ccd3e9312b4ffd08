/// Adapters layer - Infrastructure implementations
///
/// This layer contains concrete implementations of the outbound ports and
/// the target backends that write infrastructure-as-code artifacts.
pub mod outbound;
