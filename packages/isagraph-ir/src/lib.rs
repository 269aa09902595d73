/*
 * isagraph IR - GPU ISA Disassembly Analysis Core
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Common models (Diagnostic, LineSpan, InstructionRange)
 * - features/    : Vertical slices (lexing → decoding → kernel_boundary → correlation → flow_graph, resource_usage)
 * - pipeline/    : Orchestration (per file, multi-file merge)
 * - config/      : Presets, YAML loading, validation
 *
 * Performance:
 * - Rayon work-stealing across files
 * - No shared state inside a file's analysis
 */

#![allow(clippy::module_inception)] // Module naming intentional
#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::should_implement_trait)] // from_str naming intentional

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models
pub mod shared;

/// Feature modules (one per analysis stage)
pub mod features;

/// Pipeline orchestration
pub mod pipeline;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{AnalysisConfig, Preset};
pub use errors::{IsaGraphError, Result};
pub use pipeline::{analyze_files, AnalysisSet, FileAnalysis, FileAnalyzer, FileInput, KernelEntry};
pub use shared::models::{Diagnostic, DiagnosticKind, DiagnosticLog, InstructionRange, LineSpan, Severity};

pub use features::correlation::{CorrelationMode, SourceCorrelation};
pub use features::decoding::{Instruction, InstructionFormat};
pub use features::flow_graph::{BasicBlock, EdgeKind, GraphStatistics, ProgramGraph};
pub use features::resource_usage::ResourceUsageRecord;
