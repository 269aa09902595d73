//! Resource-usage report parser
//!
//! The first non-blank row fixes the schema: a `DEVICE,...` header when
//! present, else the first data row. Cells may be double-quoted with `""`
//! escapes. `N/A` is accepted for optional columns only.

use crate::config::{ConfigResult, ResourceUsageConfig};
use crate::features::resource_usage::domain::{
    ReportSchema, ResourceReportError, ResourceRowError, ResourceUsageRecord, WorkgroupDimensions,
};
use serde::Serialize;
use tracing::{debug, warn};

const NOT_AVAILABLE: &str = "N/A";

/// Parsed report: surviving records plus the rows that failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceReport {
    pub schema: ReportSchema,
    pub records: Vec<ResourceUsageRecord>,
    #[serde(skip)]
    pub row_errors: Vec<ResourceRowError>,
}

/// Split one row on `separator`, honouring double quotes
pub fn split_row(line: &str, separator: char) -> Vec<String> {
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                cell.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            c if c == separator && !quoted => {
                cells.push(cell.trim().to_string());
                cell.clear();
            }
            c => cell.push(c),
        }
    }
    cells.push(cell.trim().to_string());
    cells
}

/// Typed access to the cells of one row
struct RowCells<'a> {
    schema: ReportSchema,
    row: u32,
    cells: &'a [String],
}

impl<'a> RowCells<'a> {
    fn text(&self, column: &'static str) -> &'a str {
        self.schema
            .index_of(column)
            .and_then(|i| self.cells.get(i))
            .map_or("", String::as_str)
    }

    fn name(&self, column: &'static str) -> Result<String, ResourceRowError> {
        match self.text(column) {
            "" | NOT_AVAILABLE => Err(ResourceRowError::MissingValue { row: self.row, column }),
            value => Ok(value.to_string()),
        }
    }

    fn optional(&self, column: &'static str) -> Result<Option<u64>, ResourceRowError> {
        match self.text(column) {
            "" | NOT_AVAILABLE => Ok(None),
            value => value
                .parse::<u64>()
                .map(Some)
                .map_err(|_| ResourceRowError::InvalidNumber {
                    row: self.row,
                    column,
                    value: value.to_string(),
                }),
        }
    }

    fn required(&self, column: &'static str) -> Result<u64, ResourceRowError> {
        self.optional(column)?
            .ok_or(ResourceRowError::MissingValue { row: self.row, column })
    }
}

#[derive(Debug, Clone)]
pub struct ResourceReportParser {
    separator: char,
    require_header: bool,
}

impl Default for ResourceReportParser {
    fn default() -> Self {
        Self::new(',', false)
    }
}

impl ResourceReportParser {
    pub fn new(separator: char, require_header: bool) -> Self {
        Self {
            separator,
            require_header,
        }
    }

    pub fn from_config(config: &ResourceUsageConfig) -> ConfigResult<Self> {
        Ok(Self::new(config.separator_char()?, config.require_header))
    }

    /// `report_kernel` names the kernel of a report without a `KERNEL` column
    pub fn parse(
        &self,
        text: &str,
        report_kernel: Option<&str>,
    ) -> Result<ResourceReport, ResourceReportError> {
        let rows: Vec<(u32, Vec<String>)> = text
            .lines()
            .zip(1u32..)
            .filter(|(line, _)| !line.trim().is_empty())
            .map(|(line, number)| (number, split_row(line, self.separator)))
            .collect();

        let Some((_, first)) = rows.first() else {
            return Err(ResourceReportError::Empty);
        };
        let has_header = first
            .first()
            .map_or(false, |cell| cell.eq_ignore_ascii_case("DEVICE"));
        if self.require_header && !has_header {
            return Err(ResourceReportError::MissingHeader);
        }
        let schema = ReportSchema::from_column_count(first.len())
            .ok_or(ResourceReportError::UnknownSchema { columns: first.len() })?;
        if schema == ReportSchema::Generic && report_kernel.is_none() {
            return Err(ResourceReportError::KernelNameRequired);
        }

        let mut report = ResourceReport {
            schema,
            records: Vec::new(),
            row_errors: Vec::new(),
        };
        let data = rows.iter().skip(usize::from(has_header));
        for (row, cells) in data {
            match self.parse_row(schema, *row, cells, report_kernel) {
                Ok(record) => report.records.push(record),
                Err(errors) => {
                    for error in &errors {
                        warn!(row = error.row(), error = %error, "rejected resource-usage row");
                    }
                    report.row_errors.extend(errors);
                }
            }
        }

        debug!(
            schema = schema.as_str(),
            records = report.records.len(),
            rejected = report.row_errors.len(),
            "parsed resource-usage report"
        );
        Ok(report)
    }

    fn parse_row(
        &self,
        schema: ReportSchema,
        row: u32,
        cells: &[String],
        report_kernel: Option<&str>,
    ) -> Result<ResourceUsageRecord, Vec<ResourceRowError>> {
        if cells.len() != schema.column_count() {
            return Err(vec![ResourceRowError::ColumnCount {
                row,
                expected: schema.column_count(),
                found: cells.len(),
            }]);
        }
        let cells = RowCells { schema, row, cells };
        let record = Self::record(&cells, report_kernel).map_err(|e| vec![e])?;

        let violations = record.consistency_violations();
        if violations.is_empty() {
            return Ok(record);
        }
        Err(violations
            .into_iter()
            .map(|v| ResourceRowError::Inconsistent {
                row,
                resource: v.resource,
                used: v.used,
                available: v.available,
            })
            .collect())
    }

    fn record(cells: &RowCells<'_>, report_kernel: Option<&str>) -> Result<ResourceUsageRecord, ResourceRowError> {
        let kernel_name = match (cells.schema, report_kernel) {
            (ReportSchema::PerKernel, _) => cells.name("KERNEL")?,
            (ReportSchema::Generic, Some(kernel)) => kernel.to_string(),
            (ReportSchema::Generic, None) => {
                return Err(ResourceRowError::MissingValue {
                    row: cells.row,
                    column: "KERNEL",
                })
            }
        };

        let dimensions = (
            cells.optional("CL_WORKGROUP_X_DIMENSION")?,
            cells.optional("CL_WORKGROUP_Y_DIMENSION")?,
            cells.optional("CL_WORKGROUP_Z_DIMENSION")?,
        );

        Ok(ResourceUsageRecord {
            device_name: cells.name("DEVICE")?,
            kernel_name,
            scalar_register_count: cells.required("USED_SGPRs")?,
            vector_register_count: cells.required("USED_VGPRs")?,
            scalar_spill_count: cells.required("SGPR_SPILLS")?,
            vector_spill_count: cells.required("VGPR_SPILLS")?,
            shared_memory_bytes_used: cells.required("USED_LDS_BYTES")?,
            shared_memory_bytes_available: cells.required("AVAILABLE_LDS_BYTES")?,
            isa_size_bytes: cells.required("ISA_SIZE")?,
            scratch_memory_bytes: cells.optional("SCRATCH_MEM")?,
            threads_per_workgroup: cells.optional("THREADS_PER_WORKGROUP")?,
            wavefront_size: cells.optional("WAVEFRONT_SIZE")?,
            scalar_registers_available: cells.optional("AVAILABLE_SGPRs")?,
            vector_registers_available: cells.optional("AVAILABLE_VGPRs")?,
            workgroup_dimensions: match dimensions {
                (Some(x), Some(y), Some(z)) => Some(WorkgroupDimensions { x, y, z }),
                _ => None,
            },
        })
    }
}
