mod errors;
mod record;
mod schema;

pub use errors::{ResourceJoinWarning, ResourceReportError, ResourceRowError};
pub use record::{ConsistencyViolation, ResourceUsageRecord, WorkgroupDimensions};
pub use schema::ReportSchema;
