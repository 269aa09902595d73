//! Top-level analysis configuration
//!
//! A preset picks every section's defaults; closures or a YAML file adjust
//! individual sections afterwards.

use super::error::{ConfigError, ConfigResult};
use super::io::{ConfigExportV1, ConfigOverrides, SUPPORTED_VERSIONS};
use super::preset::Preset;
use super::stage_configs::{GraphConfig, LexerConfig, ParallelConfig, ResourceUsageConfig};
use super::validation::Validatable;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// Complete configuration of one analysis run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    preset: Preset,
    pub lexer: LexerConfig,
    pub graph: GraphConfig,
    pub resource_usage: ResourceUsageConfig,
    pub parallel: ParallelConfig,
}

impl AnalysisConfig {
    pub fn preset(preset: Preset) -> Self {
        Self {
            preset,
            lexer: LexerConfig::from_preset(preset),
            graph: GraphConfig::from_preset(preset),
            resource_usage: ResourceUsageConfig::from_preset(preset),
            parallel: ParallelConfig::from_preset(preset),
        }
    }

    pub fn get_preset(&self) -> Preset {
        self.preset
    }

    pub fn lexer(mut self, f: impl FnOnce(LexerConfig) -> LexerConfig) -> Self {
        self.lexer = f(self.lexer);
        self
    }

    pub fn graph(mut self, f: impl FnOnce(GraphConfig) -> GraphConfig) -> Self {
        self.graph = f(self.graph);
        self
    }

    pub fn resource_usage(
        mut self,
        f: impl FnOnce(ResourceUsageConfig) -> ResourceUsageConfig,
    ) -> Self {
        self.resource_usage = f(self.resource_usage);
        self
    }

    pub fn parallel(mut self, f: impl FnOnce(ParallelConfig) -> ParallelConfig) -> Self {
        self.parallel = f(self.parallel);
        self
    }

    /// Validate every section and return the configuration
    pub fn build(self) -> ConfigResult<Self> {
        self.validate()?;
        Ok(self)
    }

    /// Load a YAML file (schema v1)
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        // Check the envelope first so a missing version is reported as such
        // rather than as a generic missing-field error.
        let raw: serde_yaml::Value = serde_yaml::from_str(content)?;
        let version = raw
            .get("version")
            .ok_or(ConfigError::MissingVersion)?
            .as_u64()
            .ok_or_else(|| ConfigError::Validation("'version' must be an integer".to_string()))?;

        let version = u32::try_from(version).unwrap_or(u32::MAX);
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let export: ConfigExportV1 = serde_yaml::from_value(raw)?;
        let preset = Preset::from_str(&export.preset)
            .map_err(|_| ConfigError::UnknownPreset(export.preset.clone()))?;

        let mut config = Self::preset(preset);
        if let Some(overrides) = export.overrides {
            if let Some(lexer) = overrides.lexer {
                config.lexer = lexer;
            }
            if let Some(graph) = overrides.graph {
                config.graph = graph;
            }
            if let Some(resource_usage) = overrides.resource_usage {
                config.resource_usage = resource_usage;
            }
            if let Some(parallel) = overrides.parallel {
                config.parallel = parallel;
            }
        }

        config.build()
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        let export = ConfigExportV1 {
            version: 1,
            preset: self.preset.to_string(),
            overrides: Some(ConfigOverrides {
                lexer: Some(self.lexer.clone()),
                graph: Some(self.graph.clone()),
                resource_usage: Some(self.resource_usage.clone()),
                parallel: Some(self.parallel.clone()),
            }),
        };

        serde_yaml::to_string(&export).map_err(ConfigError::Yaml)
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::preset(Preset::default())
    }
}

impl Validatable for AnalysisConfig {
    fn validate(&self) -> ConfigResult<()> {
        let sections: [&dyn Validatable; 4] =
            [&self.lexer, &self.graph, &self.resource_usage, &self.parallel];
        for section in sections {
            section.validate().map_err(|err| {
                warn!(section = section.config_name(), error = %err, "configuration section rejected");
                err
            })?;
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "analysis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_yaml_roundtrip() {
        let config = AnalysisConfig::preset(Preset::Balanced).graph(|mut g| {
            g.default_loop_iterations = 16;
            g
        });

        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("version: 1"));
        assert!(yaml.contains("preset: balanced"));
        assert!(yaml.contains("default_loop_iterations: 16"));

        let loaded = AnalysisConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_yaml_loading_from_file() {
        let yaml_content = r#"
version: 1
preset: fast
overrides:
  resource_usage:
    separator: "\\t"
    require_header: true
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml_content.as_bytes()).unwrap();

        let config = AnalysisConfig::from_yaml(temp_file.path()).unwrap();
        assert_eq!(config.get_preset(), Preset::Fast);
        assert!(!config.graph.detect_loops);
        assert_eq!(config.resource_usage.separator_char().unwrap(), '\t');
        assert!(config.resource_usage.require_header);
    }

    #[test]
    fn test_yaml_missing_version() {
        let result = AnalysisConfig::from_yaml_str("preset: fast\n");
        assert!(matches!(result, Err(ConfigError::MissingVersion)));
    }

    #[test]
    fn test_yaml_unsupported_version() {
        let result = AnalysisConfig::from_yaml_str("version: 2\npreset: fast\n");
        assert!(matches!(
            result,
            Err(ConfigError::UnsupportedVersion { found: 2, .. })
        ));
    }

    #[test]
    fn test_yaml_unknown_preset() {
        let result = AnalysisConfig::from_yaml_str("version: 1\npreset: turbo\n");
        assert!(matches!(result, Err(ConfigError::UnknownPreset(p)) if p == "turbo"));
    }

    #[test]
    fn test_yaml_unknown_field_rejected() {
        let yaml = "version: 1\npreset: fast\noverrides:\n  graph:\n    max_blocks: 3\n";
        assert!(matches!(
            AnalysisConfig::from_yaml_str(yaml),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_yaml_override_validated() {
        let yaml = "version: 1\npreset: balanced\noverrides:\n  parallel:\n    num_workers: 999\n";
        assert!(matches!(
            AnalysisConfig::from_yaml_str(yaml),
            Err(ConfigError::Range { .. })
        ));
    }
}
