//! Property-based tests for the analysis pipeline
//!
//! Invariants that should hold for ALL generated inputs:
//! - Partition: every instruction lands in exactly one basic block
//! - Idempotence: analysing the same text twice gives equal results
//! - Kernel list: `name: a-b` with a <= b keeps both bounds
//! - Operands: rendering a parsed operand list and parsing it again is stable,
//!   including float literals and neg/abs/sext source modifiers

use isagraph_ir::config::LexerConfig;
use isagraph_ir::features::decoding::{parse_operand_list, DecodeListingUseCase, IsaDispatcher};
use isagraph_ir::features::flow_graph::{BlockGraphBuilder, BranchLabel, KernelStream, ProgramGraphBuilder};
use isagraph_ir::features::kernel_boundary::parse_kernel_list;
use isagraph_ir::features::lexing::IsaLexer;
use isagraph_ir::{AnalysisConfig, FileAnalyzer, FileInput, LineSpan};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn label_name(id: u8) -> String {
    format!("label_{:04X}", u32::from(id) * 16)
}

fn listing_line() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => (0u8..8).prop_map(|r| format!("  v_add_f32 v{r}, v{}, v2", (r + 1) % 8)),
        2 => (0u8..4).prop_map(|l| format!("{}:", label_name(l))),
        2 => (0u8..5, any::<bool>()).prop_map(|(l, conditional)| {
            let opcode = if conditional { "s_cbranch_scc1" } else { "s_branch" };
            format!("  {} {}", opcode, label_name(l))
        }),
        1 => Just("  s_setpc_b64 s[0:1]".to_string()),
        1 => Just("  s_endpgm".to_string()),
    ]
}

fn listing() -> impl Strategy<Value = String> {
    prop::collection::vec(listing_line(), 1..40).prop_map(|lines| lines.join("\n") + "\n")
}

fn operand_token() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u16..256).prop_map(|i| format!("v{i}")),
        (0u16..100).prop_map(|i| format!("s{i}")),
        (0u16..96, 1u16..5).prop_map(|(first, len)| format!("s[{}:{}]", first, first + len - 1)),
        (0u16..250, 1u16..5).prop_map(|(first, len)| format!("v[{}:{}]", first, first + len - 1)),
        (-64i64..=64).prop_map(|n| n.to_string()),
        (0i64..0x10000).prop_map(|n| format!("0x{:x}", n)),
        prop::sample::select(vec!["vcc", "exec", "scc", "m0", "off"]).prop_map(str::to_string),
        float_literal(),
        modified_operand(),
    ]
}

/// Finite floats with an exact binary expansion, including negatives
fn float_literal() -> impl Strategy<Value = String> {
    (-4096i32..4096, 1i32..6).prop_map(|(n, shift)| format!("{:?}", n as f32 / (1 << shift) as f32))
}

/// Registers under every source modifier. Floats only take absolute value:
/// `neg(0.5)` prints as the plain literal `-0.5`.
fn modified_operand() -> impl Strategy<Value = String> {
    let register = prop_oneof![
        (0u16..256).prop_map(|i| format!("v{i}")),
        (0u16..100).prop_map(|i| format!("s{i}")),
    ];
    let modified_register = (register, 0u8..6).prop_map(|(operand, form)| match form {
        0 => format!("-{operand}"),
        1 => format!("|{operand}|"),
        2 => format!("-|{operand}|"),
        3 => format!("neg({operand})"),
        4 => format!("abs({operand})"),
        _ => format!("sext({operand})"),
    });
    let modified_float = (float_literal(), 0u8..3).prop_map(|(literal, form)| match form {
        0 => format!("|{literal}|"),
        1 => format!("-|{literal}|"),
        _ => format!("abs({literal})"),
    });
    prop_oneof![3 => modified_register, 1 => modified_float]
}

fn modifier_token() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(vec!["glc", "slc", "offen", "clamp"]).prop_map(str::to_string),
        (0u32..4096).prop_map(|n| format!("offset:{n}")),
    ]
}

fn decode(text: &str) -> isagraph_ir::features::decoding::DisassemblyListing {
    DecodeListingUseCase::new(IsaLexer::new(LexerConfig::default()), IsaDispatcher).execute(text)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Property: blocks partition the instruction stream without gaps or overlaps
    #[test]
    fn prop_blocks_partition_stream(text in listing()) {
        let listing = decode(&text);
        prop_assume!(!listing.instructions.is_empty());

        let labels: Vec<BranchLabel> = listing
            .branch_labels()
            .map(|l| BranchLabel { name: l.name.clone(), index: l.instruction_index })
            .collect();
        let graph = BlockGraphBuilder::default()
            .build(&KernelStream::new("k", &listing.instructions, &labels))
            .unwrap();

        prop_assert_eq!(graph.instruction_count(), listing.instructions.len());
        let rebuilt: Vec<_> = graph.instructions().collect();
        prop_assert_eq!(rebuilt, listing.instructions.iter().collect::<Vec<_>>());

        let mut next = 0;
        for block in graph.blocks.values() {
            prop_assert!(!block.is_empty());
            prop_assert_eq!(block.first_index, next);
            next = block.range().end;
            for successor in block.successor_blocks() {
                prop_assert!(graph.block(successor).is_some());
            }
        }
        prop_assert_eq!(next, listing.instructions.len());
    }

    /// Property: the same text analysed twice gives equal graphs and logs
    #[test]
    fn prop_analysis_is_idempotent(body in listing()) {
        let text = format!("main:\n{body}");
        let input = FileInput::new("p.isa", "gfx900", text, "main: 1-200\n");
        let analyzer = FileAnalyzer::new(AnalysisConfig::default()).unwrap();

        let first = analyzer.analyze(&input);
        let second = analyzer.analyze(&input);
        prop_assert_eq!(&first.kernels, &second.kernels);
        prop_assert_eq!(&first.diagnostics, &second.diagnostics);
    }

    /// Property: well-formed kernel-list lines keep their bounds
    #[test]
    fn prop_kernel_list_ranges(
        name in "[A-Za-z_][A-Za-z0-9_.$]{0,24}",
        a in 0u32..100_000,
        len in 0u32..10_000,
    ) {
        let b = a + len;
        let (list, errors) = parse_kernel_list(&format!("{name}: {a}-{b}\n"));
        prop_assert!(errors.is_empty(), "{:?}", errors);
        let entry = list.get(&name).unwrap();
        prop_assert_eq!(entry.span, LineSpan::new(a, b));
        prop_assert_eq!((entry.span.start_line, entry.span.end_line), (a, b));
    }

    /// Property: inverted ranges are rejected rather than swapped
    #[test]
    fn prop_kernel_list_inverted_ranges(a in 1u32..100_000, gap in 1u32..1000) {
        let (list, errors) = parse_kernel_list(&format!("k: {}-{}\n", a + gap, a));
        prop_assert!(list.is_empty());
        prop_assert_eq!(errors.len(), 1);
    }

    /// Property: render then parse reproduces an equivalent operand set
    #[test]
    fn prop_operand_round_trip(
        operands in prop::collection::vec(operand_token(), 1..5),
        modifiers in prop::collection::vec(modifier_token(), 0..3),
    ) {
        let text = format!("{} {}", operands.join(", "), modifiers.join(" "));
        let parsed = parse_operand_list(&text).unwrap();
        prop_assert_eq!(parsed.len(), operands.len());

        let rendered_operands: Vec<String> = parsed.operands.iter().map(|o| o.to_string()).collect();
        let rendered_modifiers: Vec<String> = parsed.modifiers.iter().map(|m| m.to_string()).collect();
        let rendered = format!("{} {}", rendered_operands.join(", "), rendered_modifiers.join(" "));

        let reparsed = parse_operand_list(&rendered).unwrap();
        prop_assert_eq!(reparsed, parsed);
    }
}
