// Resource-usage report parsing and the per-kernel join

#[path = "../common/mod.rs"]
mod common;
use common::{assert_kind_count, init_tracing, resource_report, resource_row, two_kernel_input, STRAIGHT_LINE};

use isagraph_ir::features::resource_usage::{
    ReportSchema, ResourceReportError, ResourceReportParser, ResourceRowError, WorkgroupDimensions,
};
use isagraph_ir::{AnalysisConfig, DiagnosticKind, FileAnalyzer, FileInput, Severity};
use pretty_assertions::assert_eq;

fn analyze(input: &FileInput) -> isagraph_ir::FileAnalysis {
    init_tracing();
    FileAnalyzer::new(AnalysisConfig::default()).unwrap().analyze(input)
}

#[test]
fn test_rows_attach_to_matching_kernels() {
    let report = resource_report(&[
        resource_row("gfx900", "scale", 12, 4, 256),
        resource_row("gfx900", "reduce", 14, 6, 256),
    ]);
    let analysis = analyze(&two_kernel_input("gfx900").with_resource_usage(report));

    let scale = &analysis.kernel("scale").unwrap().resource_usage;
    assert_eq!(scale.len(), 1);
    assert_eq!(scale[0].scalar_register_count, 12);
    assert_eq!(scale[0].vector_register_count, 4);
    assert_eq!(scale[0].isa_size_bytes, 40);
    assert_eq!(
        scale[0].workgroup_dimensions,
        Some(WorkgroupDimensions { x: 64, y: 1, z: 1 })
    );

    let reduce = &analysis.kernel("reduce").unwrap().resource_usage;
    assert_eq!(reduce.len(), 1);
    assert_eq!(reduce[0].kernel_name, "reduce");
    assert_eq!(analysis.diagnostics.count(DiagnosticKind::ResourceJoinWarning), 0);
}

#[test]
fn test_unmatched_row_warns_and_attaches_nothing() {
    let report = resource_report(&[
        resource_row("gfx900", "scale", 12, 4, 256),
        resource_row("gfx900", "Scale", 12, 4, 256),
        resource_row("gfx900", "missing", 12, 4, 256),
    ]);
    let analysis = analyze(&two_kernel_input("gfx900").with_resource_usage(report));

    assert_eq!(analysis.kernel("scale").unwrap().resource_usage.len(), 1);
    assert!(analysis.kernel("reduce").unwrap().resource_usage.is_empty());
    assert_kind_count(&analysis.diagnostics, DiagnosticKind::ResourceJoinWarning, 2);
    assert!(analysis
        .diagnostics
        .of_kind(DiagnosticKind::ResourceJoinWarning)
        .all(|d| d.severity == Severity::Warning));
}

#[test]
fn test_used_above_available_is_rejected() {
    let report = resource_report(&[resource_row("gfx900", "scale", 12, 80, 64)]);
    let analysis = analyze(&two_kernel_input("gfx900").with_resource_usage(report));

    assert!(analysis.kernel("scale").unwrap().resource_usage.is_empty());
    assert_kind_count(&analysis.diagnostics, DiagnosticKind::ResourceRowSchemaError, 1);
    let diagnostic = analysis
        .diagnostics
        .of_kind(DiagnosticKind::ResourceRowSchemaError)
        .next()
        .unwrap();
    assert!(diagnostic.message.contains("vector registers"), "{}", diagnostic.message);
}

#[test]
fn test_unknown_schema_rejects_whole_report() {
    let analysis = analyze(&two_kernel_input("gfx900").with_resource_usage("gfx900,scale,1,2,3\n"));
    assert!(analysis.kernels.iter().all(|k| k.resource_usage.is_empty()));
    assert_kind_count(&analysis.diagnostics, DiagnosticKind::ResourceRowSchemaError, 1);

    let parser = ResourceReportParser::default();
    assert_eq!(
        parser.parse("gfx900,scale,1,2,3", None),
        Err(ResourceReportError::UnknownSchema { columns: 5 })
    );
    assert_eq!(parser.parse("\n\n", None), Err(ResourceReportError::Empty));
}

#[test]
fn test_generic_report_for_single_kernel() {
    let report = "gfx1030,0,1024,32,65536,2048,106,20,0,256,40,0,256,1,1,1024\n";
    let input = FileInput::new("main.isa", "gfx1030", STRAIGHT_LINE, "main: 1-3\n")
        .with_resource_usage(report)
        .with_report_kernel("main");
    let analysis = analyze(&input);

    let rows = &analysis.kernel("main").unwrap().resource_usage;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].device_name, "gfx1030");
    assert_eq!(rows[0].shared_memory_bytes_used, 2048);
    assert_eq!(rows[0].threads_per_workgroup, Some(1024));

    let without_kernel = FileInput::new("main.isa", "gfx1030", STRAIGHT_LINE, "main: 1-3\n")
        .with_resource_usage(report);
    let analysis = analyze(&without_kernel);
    assert!(analysis.kernel("main").unwrap().resource_usage.is_empty());
    assert_kind_count(&analysis.diagnostics, DiagnosticKind::ResourceRowSchemaError, 1);
}

#[test]
fn test_bad_row_does_not_stop_the_report() {
    let mut bad = resource_row("gfx900", "reduce", 14, 6, 256);
    bad = bad.replacen(",14,", ",fourteen,", 1);
    let report = resource_report(&[bad, resource_row("gfx900", "scale", 12, 4, 256)]);

    let parsed = ResourceReportParser::default().parse(&report, None).unwrap();
    assert_eq!(parsed.schema, ReportSchema::PerKernel);
    assert_eq!(parsed.records.len(), 1);
    assert_eq!(
        parsed.row_errors,
        vec![ResourceRowError::InvalidNumber {
            row: 2,
            column: "USED_SGPRs",
            value: "fourteen".to_string()
        }]
    );
}

#[test]
fn test_separator_from_config() {
    let report = resource_report(&[resource_row("gfx900", "scale", 12, 4, 256)]).replace(',', ";");
    let config = AnalysisConfig::default().resource_usage(|mut r| {
        r.separator = ";".to_string();
        r
    });
    init_tracing();
    let analysis = FileAnalyzer::new(config).unwrap().analyze(&two_kernel_input("gfx900").with_resource_usage(report));
    assert_eq!(analysis.kernel("scale").unwrap().resource_usage.len(), 1);
}

#[test]
fn test_multi_device_report_attaches_only_this_device() {
    let report = resource_report(&[
        resource_row("gfx900", "scale", 12, 4, 256),
        resource_row("gfx1030", "scale", 30, 40, 256),
        resource_row("gfx1030", "reduce", 32, 48, 256),
    ]);
    let analysis = analyze(&two_kernel_input("gfx900").with_resource_usage(report));

    let scale = &analysis.kernel("scale").unwrap().resource_usage;
    assert_eq!(scale.len(), 1);
    assert_eq!(scale[0].device_name, "gfx900");
    assert!(analysis.kernel("reduce").unwrap().resource_usage.is_empty());

    assert_kind_count(&analysis.diagnostics, DiagnosticKind::ResourceJoinWarning, 2);
    assert!(analysis
        .diagnostics
        .of_kind(DiagnosticKind::ResourceJoinWarning)
        .all(|d| d.message.contains("not gfx900")));
}
