// Multi-file analysis: parallel workers, (device, kernel) merge, JSON export

#[path = "../common/mod.rs"]
mod common;
use common::{fixture_n_kernels, init_tracing, resource_report, resource_row, two_kernel_input};

use isagraph_ir::{analyze_files, AnalysisConfig, AnalysisSet, FileInput, IsaGraphError};
use pretty_assertions::assert_eq;

fn sequential() -> AnalysisConfig {
    AnalysisConfig::default().parallel(|mut p| {
        p.enable_rayon = false;
        p
    })
}

#[test]
fn test_devices_are_merged() {
    init_tracing();
    let report = resource_report(&[
        resource_row("gfx900", "scale", 12, 4, 256),
        resource_row("gfx900", "reduce", 14, 6, 256),
    ]);
    let inputs = vec![
        two_kernel_input("gfx900").with_resource_usage(report),
        two_kernel_input("gfx1030"),
    ];
    let set = analyze_files(&inputs, &AnalysisConfig::default()).unwrap();

    assert_eq!(set.files.len(), 2);
    assert_eq!(set.kernel_count(), 4);
    assert_eq!(set.files[0].device, "gfx900");
    assert_eq!(set.files[1].device, "gfx1030");
    assert!(set.kernel("gfx1030", "reduce").unwrap().graph.is_some());

    let table = set.resource_table();
    assert_eq!(table.len(), 1);
    assert_eq!(table["gfx900"].keys().collect::<Vec<_>>(), vec!["reduce", "scale"]);
    assert_eq!(table["gfx900"]["reduce"][0].scalar_register_count, 14);
}

#[test]
fn test_duplicate_result_is_a_hard_error() {
    init_tracing();
    let inputs = vec![two_kernel_input("gfx900"), two_kernel_input("gfx900")];
    match analyze_files(&inputs, &AnalysisConfig::default()) {
        Err(IsaGraphError::DuplicateResult { device, kernel }) => {
            assert_eq!(device, "gfx900");
            assert_eq!(kernel, "scale");
        }
        other => panic!("expected a duplicate result error, got {:?}", other.map(|s| s.kernel_count())),
    }
}

#[test]
fn test_parallel_and_sequential_agree() {
    init_tracing();
    let inputs: Vec<FileInput> = (0..8)
        .map(|i| {
            let (disassembly, list) = fixture_n_kernels(3, 5 + i);
            FileInput::new(format!("f{i}.isa"), format!("dev{i}"), disassembly, list)
        })
        .collect();

    let config = AnalysisConfig::default().parallel(|mut p| {
        p.num_workers = 4;
        p
    });
    let parallel = analyze_files(&inputs, &config).unwrap();
    let sequential = analyze_files(&inputs, &sequential()).unwrap();

    assert_eq!(parallel.kernel_count(), 24);
    assert_eq!(parallel.files, sequential.files);
    assert_eq!(parallel.diagnostics(), sequential.diagnostics());
}

#[test]
fn test_diagnostics_keep_their_file() {
    init_tracing();
    let broken = FileInput::new("broken.isa", "gfx906", "main:\n  s_endpgm\n", "main 1-2\n");
    let set = analyze_files(&[two_kernel_input("gfx900"), broken], &sequential()).unwrap();

    let log = set.diagnostics();
    assert!(log.has_errors());
    assert!(log
        .iter()
        .filter(|d| d.is_error())
        .all(|d| d.file.as_deref() == Some("broken.isa")));
    assert!(set.kernel("gfx906", "main").is_none());
}

#[test]
fn test_json_round_trip_keeps_files() {
    init_tracing();
    let set = analyze_files(&[two_kernel_input("gfx900")], &AnalysisConfig::default()).unwrap();
    let json = set.to_json().unwrap();

    let restored: AnalysisSet = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.files, set.files);
    // lookup index is rebuilt only by analysis
    assert!(restored.kernel("gfx900", "scale").is_none());
}

#[test]
fn test_empty_input() {
    let set = analyze_files(&[], &AnalysisConfig::default()).unwrap();
    assert!(set.files.is_empty());
    assert!(set.diagnostics().is_empty());
}
