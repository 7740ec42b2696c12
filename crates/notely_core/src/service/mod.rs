//! Use-case services consumed by request-handling layers.
//!
//! # Responsibility
//! - Orchestrate repository calls into notebook use-cases.
//! - Return every outcome as an `Envelope`, mapping failures through the
//!   error code registry.

pub mod notebook_service;
