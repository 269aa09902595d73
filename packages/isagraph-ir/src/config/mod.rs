//! Analysis configuration
//!
//! Three levels of control:
//! - Preset: one-liner defaults for every section
//! - Section override: closures on the builder
//! - YAML: versioned file with per-section overrides
//!
//! # Examples
//!
//! ```rust,ignore
//! use isagraph_ir::config::{AnalysisConfig, Preset};
//!
//! let config = AnalysisConfig::preset(Preset::Fast).build()?;
//!
//! let config = AnalysisConfig::preset(Preset::Balanced)
//!     .graph(|mut g| { g.default_loop_iterations = 16; g })
//!     .build()?;
//!
//! let config = AnalysisConfig::from_yaml("isagraph.yaml")?;
//! ```

pub mod analysis_config;
pub mod error;
pub mod io;
pub mod preset;
pub mod stage_configs;
pub mod validation;

// Re-exports
pub use analysis_config::AnalysisConfig;
pub use error::{ConfigError, ConfigResult};
pub use io::{ConfigExportV1, ConfigOverrides};
pub use preset::Preset;
pub use stage_configs::{
    parse_separator, GraphConfig, LexerConfig, ParallelConfig, ResourceUsageConfig,
};
pub use validation::Validatable;
