/// Application layer
///
/// Services that load definitions and accumulate the startup-config, and the
/// use cases that run actions and whole provisioning sessions.
pub mod services;
pub mod use_cases;
