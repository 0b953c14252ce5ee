/// Domain layer
///
/// Entities (actions, definitions, the startup-config artifact, agent
/// settings) and value objects (source URLs, outcome codes, session ids).
pub mod entities;
pub mod value_objects;
