// Concrete implementations for external systems: the ECS API and output sinks.

pub mod ecs;
pub mod output;
mod wire;
