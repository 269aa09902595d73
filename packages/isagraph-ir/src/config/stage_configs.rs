//! Per-stage configuration sections
//!
//! Each section validates its own ranges and provides preset defaults.

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use super::validation::Validatable;
use serde::{Deserialize, Serialize};

// ============================================================================
// Lexer Configuration
// ============================================================================

/// Line lexer switches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LexerConfig {
    /// Treat `; 68000002` trailing comments as encoding annotations
    pub accept_llpc_annotations: bool,

    /// Only lex instructions between the `Disassembly` section marker and
    /// the end-of-code marker when the marker is present
    pub honor_section_markers: bool,
}

impl LexerConfig {
    pub fn from_preset(_preset: Preset) -> Self {
        Self {
            accept_llpc_annotations: true,
            honor_section_markers: true,
        }
    }
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}

impl Validatable for LexerConfig {
    fn validate(&self) -> ConfigResult<()> {
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "lexer"
    }
}

// ============================================================================
// Program Graph Configuration
// ============================================================================

/// Program graph construction and loop estimation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraphConfig {
    /// Detect natural loops with dominator analysis
    pub detect_loops: bool,

    /// Iteration estimate for an ordinary loop (1..=1_000_000)
    pub default_loop_iterations: u32,

    /// Iteration estimate for a lane-serialising loop (1..=1_000_000)
    pub hardware_loop_iterations: u32,

    /// Resolve numeric branch offsets through encoding annotations
    pub resolve_relative_branches: bool,
}

impl GraphConfig {
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Fast => Self {
                detect_loops: false,
                default_loop_iterations: 10,
                hardware_loop_iterations: 64,
                resolve_relative_branches: false,
            },
            Preset::Balanced | Preset::Thorough => Self {
                detect_loops: true,
                default_loop_iterations: 10,
                hardware_loop_iterations: 64,
                resolve_relative_branches: true,
            },
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}

impl Validatable for GraphConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.default_loop_iterations == 0 || self.default_loop_iterations > 1_000_000 {
            return Err(ConfigError::range_with_hint(
                "default_loop_iterations",
                self.default_loop_iterations,
                1,
                1_000_000,
                "Loops execute at least once",
            ));
        }

        if self.hardware_loop_iterations == 0 || self.hardware_loop_iterations > 1_000_000 {
            return Err(ConfigError::range_with_hint(
                "hardware_loop_iterations",
                self.hardware_loop_iterations,
                1,
                1_000_000,
                "Typically the wavefront size",
            ));
        }

        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "graph"
    }
}

// ============================================================================
// Resource Usage Configuration
// ============================================================================

/// Resource-usage report parsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResourceUsageConfig {
    /// Column separator; escape sequences `\t`, `\s` and `\\` are accepted
    pub separator: String,

    /// Reject reports whose first row is not the column header
    pub require_header: bool,
}

impl ResourceUsageConfig {
    pub fn from_preset(preset: Preset) -> Self {
        Self {
            separator: ",".to_string(),
            require_header: preset == Preset::Thorough,
        }
    }

    /// The separator after escape processing
    pub fn separator_char(&self) -> ConfigResult<char> {
        parse_separator(&self.separator)
    }
}

impl Default for ResourceUsageConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}

impl Validatable for ResourceUsageConfig {
    fn validate(&self) -> ConfigResult<()> {
        let separator = self.separator_char()?;
        if separator == '"' || separator == '\n' || separator == '\r' {
            return Err(ConfigError::Validation(format!(
                "separator {:?} conflicts with quoting or line breaks",
                separator
            )));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "resource_usage"
    }
}

/// Unescape a separator setting into exactly one character
pub fn parse_separator(raw: &str) -> ConfigResult<char> {
    let unescaped = match raw {
        "\\t" => "\t",
        "\\s" => " ",
        "\\\\" => "\\",
        other => other,
    };

    let mut chars = unescaped.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ConfigError::Validation(format!(
            "separator must be a single character, got {:?}",
            raw
        ))),
    }
}

// ============================================================================
// Parallel Configuration
// ============================================================================

/// Multi-file parallelism
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParallelConfig {
    /// Number of workers (0=auto, 1..=256)
    pub num_workers: usize,

    /// Use the rayon pool; `false` analyses files sequentially
    pub enable_rayon: bool,
}

impl ParallelConfig {
    pub fn from_preset(_preset: Preset) -> Self {
        Self {
            num_workers: 0,
            enable_rayon: true,
        }
    }

    /// Worker count with `0` resolved to 75% of the available cores
    pub fn effective_workers(&self) -> usize {
        if self.num_workers > 0 {
            self.num_workers
        } else {
            ((num_cpus::get() * 3) / 4).max(1)
        }
    }
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}

impl Validatable for ParallelConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.num_workers > 256 {
            return Err(ConfigError::range_with_hint(
                "num_workers",
                self.num_workers,
                0,
                256,
                "Number of workers must be reasonable (0=auto)",
            ));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "parallel"
    }
}
