//! Integration test modules for siggen
//!
//! - engine: Engine lifecycle against the capture sink
//! - signal: Properties of the rendered tone
//! - generator: Control surface on top of the engine

pub mod generator;
