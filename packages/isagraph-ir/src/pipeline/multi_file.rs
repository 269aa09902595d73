//! Multi-file analysis
//!
//! Files are analysed independently, in parallel when the `parallel` feature
//! and the config allow it. Merging is the only shared step: results are keyed
//! by (device, kernel) and a second result for a key is a hard error.

use super::file_analysis::{FileAnalysis, FileAnalyzer, FileInput};
use super::kernel_entry::KernelEntry;
use crate::config::AnalysisConfig;
use crate::errors::{IsaGraphError, Result};
use crate::features::resource_usage::ResourceUsageRecord;
use crate::shared::models::DiagnosticLog;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// (file index, kernel index) per (device, kernel)
#[derive(Debug, Default)]
struct ResultCollector {
    index: BTreeMap<(String, String), (usize, usize)>,
}

impl ResultCollector {
    fn insert(&mut self, device: &str, kernel: &str, at: (usize, usize)) -> Result<()> {
        let key = (device.to_string(), kernel.to_string());
        if self.index.contains_key(&key) {
            return Err(IsaGraphError::duplicate(device, kernel));
        }
        self.index.insert(key, at);
        Ok(())
    }
}

/// Merged results of several files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSet {
    /// In input order
    pub files: Vec<FileAnalysis>,
    #[serde(skip)]
    index: BTreeMap<(String, String), (usize, usize)>,
}

impl AnalysisSet {
    fn merge(files: Vec<FileAnalysis>) -> Result<Self> {
        let mut collector = ResultCollector::default();
        for (file_index, file) in files.iter().enumerate() {
            for (kernel_index, kernel) in file.kernels.iter().enumerate() {
                collector.insert(&file.device, &kernel.name, (file_index, kernel_index))?;
            }
        }
        Ok(Self {
            files,
            index: collector.index,
        })
    }

    pub fn kernel(&self, device: &str, name: &str) -> Option<&KernelEntry> {
        let (file, kernel) = self.index.get(&(device.to_string(), name.to_string()))?;
        self.files.get(*file)?.kernels.get(*kernel)
    }

    pub fn kernel_count(&self) -> usize {
        self.index.len()
    }

    /// Resource rows per device and kernel, kernels without rows omitted
    pub fn resource_table(&self) -> BTreeMap<String, BTreeMap<String, Vec<ResourceUsageRecord>>> {
        let mut table: BTreeMap<String, BTreeMap<String, Vec<ResourceUsageRecord>>> = BTreeMap::new();
        for file in &self.files {
            for kernel in file.kernels.iter().filter(|k| !k.resource_usage.is_empty()) {
                table
                    .entry(file.device.clone())
                    .or_default()
                    .insert(kernel.name.clone(), kernel.resource_usage.clone());
            }
        }
        table
    }

    /// Every file's log, in input order
    pub fn diagnostics(&self) -> DiagnosticLog {
        self.files
            .iter()
            .flat_map(|f| f.diagnostics.iter().cloned())
            .collect()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Analyse every input and merge the results
pub fn analyze_files(inputs: &[FileInput], config: &AnalysisConfig) -> Result<AnalysisSet> {
    let analyzer = FileAnalyzer::new(config.clone())?;

    let files = if config.parallel.enable_rayon && inputs.len() > 1 {
        analyze_parallel(&analyzer, inputs)?
    } else {
        inputs.iter().map(|input| analyzer.analyze(input)).collect()
    };

    let set = AnalysisSet::merge(files)?;
    info!(
        files = set.files.len(),
        kernels = set.kernel_count(),
        "merged analysis results"
    );
    Ok(set)
}

#[cfg(feature = "parallel")]
fn analyze_parallel(analyzer: &FileAnalyzer, inputs: &[FileInput]) -> Result<Vec<FileAnalysis>> {
    let workers = analyzer.config().parallel.effective_workers();
    debug!(workers, files = inputs.len(), "analysing files in parallel");
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("isagraph-worker-{}", i))
        .build()
        .map_err(|e| IsaGraphError::pipeline(format!("Failed to build thread pool: {}", e)))?;
    Ok(pool.install(|| inputs.par_iter().map(|input| analyzer.analyze(input)).collect()))
}

#[cfg(not(feature = "parallel"))]
fn analyze_parallel(analyzer: &FileAnalyzer, inputs: &[FileInput]) -> Result<Vec<FileAnalysis>> {
    debug!(files = inputs.len(), "parallel feature disabled, analysing sequentially");
    Ok(inputs.iter().map(|input| analyzer.analyze(input)).collect())
}
