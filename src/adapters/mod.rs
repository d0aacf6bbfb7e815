/// Adapters - service-specific implementations
///
/// These modules implement the port traits for specific external services.
pub mod services;
