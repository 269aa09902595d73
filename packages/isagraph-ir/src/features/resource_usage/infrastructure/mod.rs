mod report_parser;

pub use report_parser::{split_row, ResourceReport, ResourceReportParser};
