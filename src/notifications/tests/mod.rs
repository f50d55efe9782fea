//! Test modules for the lifecycle event bus
