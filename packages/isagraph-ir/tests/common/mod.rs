//! Common test utilities for isagraph-ir
//!
//! Disassembly fixtures, resource report builders and logging setup shared
//! by the integration targets.

#![allow(dead_code)]

use isagraph_ir::{DiagnosticKind, DiagnosticLog, FileInput};
use std::sync::Once;

static TRACING: Once = Once::new();

/// Route `tracing` output to the test harness; `RUST_LOG` filters it
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Two kernels with debug markers; `reduce` holds a counted loop
pub const TWO_KERNELS: &str = "\
NumVgprs = 8
NumSgprs = 16
codeLenInByte = 44
; -------- Disassembly --------
scale:
; /work/kernels.cl:3
  s_load_dwordx2 s[0:1], s[4:5], 0x0      // 000000000000: C0060002 00000000
  s_waitcnt lgkmcnt(0)                     // 000000000008: BF8CC07F
; /work/kernels.cl:4
; out[i] = in[i] * k;
  v_mul_f32 v0, v1, v0                     // 00000000000C: 0A000101
  s_endpgm                                 // 000000000010: BF810000
reduce:
; /work/kernels.cl:9
  v_mov_b32 v1, 0                          // 000000000014: 7E020280
label_0018:
; /work/kernels.cl:10
  v_add_u32 v1, v1, v0                     // 000000000018: 68020101
  s_sub_u32 s2, s2, 1                      // 00000000001C: 80828102
  s_cmp_lg_u32 s2, 0                       // 000000000020: BF078002
  s_cbranch_scc1 label_0018                // 000000000024: BF85FFFC
; /work/kernels.cl:12
  s_endpgm                                 // 000000000028: BF810000
";

pub const TWO_KERNELS_LIST: &str = "scale: 1-5\nreduce: 7-14\n";

/// Single kernel, no markers, no labels
pub const STRAIGHT_LINE: &str = "\
  s_mov_b32 s0, 0x4
  v_mov_b32 v0, s0
  s_endpgm
";

pub const RESOURCE_HEADER: &str = "DEVICE,KERNEL,SCRATCH_MEM,THREADS_PER_WORKGROUP,WAVEFRONT_SIZE,AVAILABLE_LDS_BYTES,USED_LDS_BYTES,AVAILABLE_SGPRs,USED_SGPRs,SGPR_SPILLS,AVAILABLE_VGPRs,USED_VGPRs,VGPR_SPILLS,CL_WORKGROUP_X_DIMENSION,CL_WORKGROUP_Y_DIMENSION,CL_WORKGROUP_Z_DIMENSION,ISA_SIZE";

/// Per-kernel report row with the given register usage
pub fn resource_row(device: &str, kernel: &str, sgprs: u32, vgprs: u32, available_vgprs: u32) -> String {
    format!("{device},{kernel},0,256,64,65536,0,102,{sgprs},0,{available_vgprs},{vgprs},0,64,1,1,40")
}

/// Header followed by `rows`
pub fn resource_report(rows: &[String]) -> String {
    let mut text = String::from(RESOURCE_HEADER);
    for row in rows {
        text.push('\n');
        text.push_str(row);
    }
    text.push('\n');
    text
}

pub fn two_kernel_input(device: &str) -> FileInput {
    FileInput::new(format!("{device}/kernels.isa"), device, TWO_KERNELS, TWO_KERNELS_LIST)
}

/// `count` independent kernels `k0..k<count>`, each `body` instructions long
pub fn fixture_n_kernels(count: usize, body: usize) -> (String, String) {
    let mut disassembly = String::from("; -------- Disassembly --------\n");
    let mut list = String::new();
    let mut line = 1;
    for k in 0..count {
        disassembly.push_str(&format!("k{k}:\n"));
        for i in 0..body {
            disassembly.push_str(&format!("  v_add_f32 v{}, v{}, v{}\n", i % 8, (i + 1) % 8, (i + 2) % 8));
        }
        disassembly.push_str("  s_endpgm\n");
        list.push_str(&format!("k{k}: {}-{}\n", line, line + 9));
        line += 10;
    }
    (disassembly, list)
}

/// Assert that no diagnostic has error severity
pub fn assert_no_errors(log: &DiagnosticLog) {
    assert!(!log.has_errors(), "Expected no errors, got: {:?}", log);
}

/// Assert the number of diagnostics of one kind
pub fn assert_kind_count(log: &DiagnosticLog, kind: DiagnosticKind, expected: usize) {
    assert_eq!(
        log.count(kind),
        expected,
        "Expected {expected} {kind} diagnostics, got: {:?}",
        log.iter().map(|d| d.to_string()).collect::<Vec<_>>()
    );
}
