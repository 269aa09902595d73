//! Feature modules - Each feature follows Hexagonal Architecture
//!
//! Each feature contains:
//! - domain/     - Pure business logic (no external dependencies)
//! - ports/      - Interface definitions (traits)
//! - application/ - Use cases
//! - infrastructure/ - External dependency implementations
//!
//! Stages run in declaration order: lexing -> decoding -> kernel_boundary
//! -> correlation -> flow_graph, with resource_usage joined at the end.

pub mod lexing;
pub mod decoding;
pub mod kernel_boundary;
pub mod correlation;
pub mod flow_graph;
pub mod resource_usage;
