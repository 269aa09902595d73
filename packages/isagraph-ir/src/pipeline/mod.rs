//! Pipeline orchestration
//!
//! Wires the feature stages together for one file ([`FileAnalyzer`]) and for
//! a batch of files ([`analyze_files`]).
//!
//! ## Structure
//!
//! ```text
//! pipeline/
//! ├── kernel_entry.rs   # Per-kernel result
//! ├── file_analysis.rs  # FileInput -> FileAnalysis
//! └── multi_file.rs     # Parallel analysis + (device, kernel) merge
//! ```

pub mod file_analysis;
pub mod kernel_entry;
pub mod multi_file;

pub use file_analysis::{FileAnalysis, FileAnalyzer, FileInput};
pub use kernel_entry::KernelEntry;
pub use multi_file::{analyze_files, AnalysisSet};
