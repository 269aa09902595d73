//! Resource-Usage Extractor
//!
//! Parses the per-device resource report (registers, spills, shared memory,
//! ISA size) and joins its rows to kernels by name. Bad rows are collected
//! with their row numbers; parsing continues past them.
//!
//! ## Structure
//! - `domain/` - ResourceUsageRecord, ReportSchema, row/report/join errors
//! - `infrastructure/` - ResourceReportParser
//! - `application/` - JoinResourceUsageUseCase

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{JoinResourceUsageUseCase, ResourceJoin};
pub use domain::{
    ConsistencyViolation, ReportSchema, ResourceJoinWarning, ResourceReportError, ResourceRowError,
    ResourceUsageRecord, WorkgroupDimensions,
};
pub use infrastructure::{split_row, ResourceReport, ResourceReportParser};
