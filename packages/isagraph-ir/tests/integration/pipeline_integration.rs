// End-to-end tests for single-file analysis
// decode -> kernel boundaries -> correlation -> program graphs

#[path = "../common/mod.rs"]
mod common;
use common::{
    assert_kind_count, assert_no_errors, init_tracing, two_kernel_input, STRAIGHT_LINE,
    TWO_KERNELS, TWO_KERNELS_LIST,
};

use isagraph_ir::features::decoding::{Immediate, InstructionKind, Operand, Register};
use isagraph_ir::features::flow_graph::{EdgeTarget, Successor};
use isagraph_ir::{
    AnalysisConfig, CorrelationMode, DiagnosticKind, EdgeKind, FileAnalyzer, FileInput,
    InstructionFormat, InstructionRange, LineSpan, Preset,
};
use pretty_assertions::assert_eq;

fn analyze(input: &FileInput) -> isagraph_ir::FileAnalysis {
    init_tracing();
    FileAnalyzer::new(AnalysisConfig::default()).unwrap().analyze(input)
}

#[test]
fn test_two_kernels_are_partitioned() {
    let analysis = analyze(&two_kernel_input("gfx900"));
    assert_no_errors(&analysis.diagnostics);

    let names: Vec<&str> = analysis.kernels.iter().map(|k| k.name.as_str()).collect();
    assert_eq!(names, vec!["scale", "reduce"]);

    let scale = analysis.kernel("scale").unwrap();
    assert_eq!(scale.instruction_range, InstructionRange::new(0, 4));
    assert_eq!(scale.declared_span(), LineSpan::new(1, 5));

    let reduce = analysis.kernel("reduce").unwrap();
    assert_eq!(reduce.instruction_range, InstructionRange::new(4, 10));
    assert_eq!((reduce.start_line, reduce.end_line), (7, 14));
}

#[test]
fn test_isa_statistics() {
    let analysis = analyze(&two_kernel_input("gfx900"));
    assert_eq!(analysis.isa_statistics.vector_registers, Some(8));
    assert_eq!(analysis.isa_statistics.scalar_registers(), Some(16));
    assert_eq!(analysis.isa_statistics.isa_size_bytes(), Some(44));
    assert_eq!(analysis.isa_statistics.encoded_size_bytes, 44);
}

#[test]
fn test_precise_correlation_from_markers() {
    let analysis = analyze(&two_kernel_input("gfx900"));

    let scale = analysis.kernel("scale").unwrap().correlation.as_ref().unwrap();
    assert_eq!(scale.mode, CorrelationMode::Precise);
    assert_eq!(scale.line_of(0), Some(3));
    assert_eq!(scale.line_of(1), Some(3));
    assert_eq!(scale.line_of(2), Some(4));
    assert_eq!(scale.instructions_for_line(4), vec![2, 3]);

    let reduce = analysis.kernel("reduce").unwrap().correlation.as_ref().unwrap();
    assert_eq!(reduce.line_of(4), Some(9));
    assert_eq!(reduce.instructions_for_line(10), vec![5, 6, 7, 8]);
    assert_eq!(reduce.line_of(9), Some(12));
    assert_eq!(reduce.span_of(10), None);
}

#[test]
fn test_loop_kernel_graph() {
    let analysis = analyze(&two_kernel_input("gfx900"));
    let reduce = analysis.kernel("reduce").unwrap();
    let graph = reduce.graph.as_ref().unwrap();

    assert_eq!(graph.block_count(), 3);
    assert_eq!(graph.instruction_count(), 6);

    let body = graph.block(1).unwrap();
    assert_eq!(body.label.as_deref(), Some("label_0018"));
    assert_eq!(
        body.successors,
        vec![
            Successor::new(EdgeTarget::Block(1), EdgeKind::Taken),
            Successor::new(EdgeTarget::Block(2), EdgeKind::NotTaken),
        ]
    );
    assert!(body.loop_header);
    assert_eq!(body.iteration_estimate, Some(10));

    assert_eq!(graph.loops.len(), 1);
    assert_eq!(graph.loops[0].header, 1);
    assert_eq!(graph.loops[0].latches, vec![1]);
    assert!(!graph.loops[0].hardware_loop);

    let stats = reduce.graph_statistics.as_ref().unwrap();
    assert_eq!(stats.edges, 3);
    assert_eq!(stats.loops, 1);
    assert!(stats.unreachable_blocks.is_empty());
    assert_eq!(stats.terminal_blocks, 1);
}

#[test]
fn test_straight_line_kernel_graph() {
    let analysis = analyze(&two_kernel_input("gfx900"));
    let graph = analysis.kernel("scale").unwrap().graph.as_ref().unwrap();
    assert_eq!(graph.block_count(), 1);
    assert!(graph.loops.is_empty());
    assert!(graph.entry().unwrap().terminal);
}

#[test]
fn test_source_lines_flow_into_isa_csv() {
    let analysis = analyze(&two_kernel_input("gfx900"));
    let csv = analysis.kernel("reduce").unwrap().isa_csv(true).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 7);
    assert!(lines[1].contains("v_mov_b32"));
    assert!(lines[1].contains(",9,"), "{}", lines[1]);

    let dot = analysis.kernel("reduce").unwrap().dot().unwrap();
    assert!(dot.contains("doublecircle"));
}

#[test]
fn test_scalar_move_decodes_to_scalar_immediate() {
    let input = FileInput::new("main.isa", "gfx900", STRAIGHT_LINE, "main: 10-25\n");
    let analysis = analyze(&input);
    let main = analysis.kernel("main").unwrap();
    let first = main.instructions().next().unwrap();

    assert_eq!(first.format(), InstructionFormat::ScalarImmediate);
    match &first.kind {
        InstructionKind::ScalarImmediate { dest, value } => {
            assert_eq!(dest, &Operand::Register(Register::scalar(0)));
            assert_eq!(value, &Operand::Immediate(Immediate::hex(4)));
        }
        other => panic!("unexpected kind {:?}", other),
    }
}

#[test]
fn test_unlabelled_kernel_is_coarse() {
    let input = FileInput::new("main.isa", "gfx900", STRAIGHT_LINE, "main: 10-25\n");
    let analysis = analyze(&input);
    let correlation = analysis.kernel("main").unwrap().correlation.as_ref().unwrap();
    assert_eq!(correlation.mode, CorrelationMode::Coarse);
    assert_eq!(correlation.instructions, InstructionRange::new(0, 3));
    assert_eq!(correlation.span_of(2), Some(LineSpan::new(10, 25)));
    assert_eq!(correlation.instructions_for_line(17), vec![0, 1, 2]);
    assert!(correlation.instructions_for_line(30).is_empty());
}

#[test]
fn test_overlapping_kernel_list_builds_nothing() {
    let input = FileInput::new("k.isa", "gfx900", TWO_KERNELS, "scale: 0-50\nreduce: 0-50\n");
    let analysis = analyze(&input);
    assert!(analysis.kernels.is_empty());
    assert_kind_count(&analysis.diagnostics, DiagnosticKind::OverlappingKernelRanges, 2);
}

#[test]
fn test_undeclared_kernel_is_dropped() {
    let input = FileInput::new("k.isa", "gfx900", TWO_KERNELS, "scale: 1-5\n");
    let analysis = analyze(&input);
    assert_eq!(analysis.kernels.len(), 1);
    assert_eq!(analysis.kernels[0].name, "scale");
    assert_kind_count(&analysis.diagnostics, DiagnosticKind::AmbiguousKernelBoundary, 1);
    assert!(analysis.diagnostics.count(DiagnosticKind::CorrelationRangeMismatch) >= 1);
}

#[test]
fn test_unknown_and_malformed_lines_survive() {
    let text = "\
main:
  s_mov_b32 s0, 0x4
  s_frobnicate s1
  s_add_u32 s0, s1
  s_endpgm
";
    let analysis = analyze(&FileInput::new("m.isa", "gfx900", text, "main: 1-4\n"));
    let main = analysis.kernel("main").unwrap();
    assert_eq!(main.graph.as_ref().unwrap().instruction_count(), 4);
    assert_kind_count(&analysis.diagnostics, DiagnosticKind::UnknownInstruction, 1);
    assert_kind_count(&analysis.diagnostics, DiagnosticKind::DecodeError, 1);
    assert!(analysis.diagnostics.iter().all(|d| d.file.as_deref() == Some("m.isa")));
}

#[test]
fn test_fast_preset_skips_loop_detection() {
    init_tracing();
    let config = AnalysisConfig::preset(Preset::Fast).build().unwrap();
    let analysis = FileAnalyzer::new(config).unwrap().analyze(&two_kernel_input("gfx900"));
    let graph = analysis.kernel("reduce").unwrap().graph.as_ref().unwrap();
    assert!(graph.loops.is_empty());
    assert_eq!(graph.loop_headers().count(), 0);
}

#[test]
fn test_analysis_is_idempotent() {
    let input = FileInput::new("k.isa", "gfx900", TWO_KERNELS, TWO_KERNELS_LIST);
    assert_eq!(analyze(&input), analyze(&input));
}
