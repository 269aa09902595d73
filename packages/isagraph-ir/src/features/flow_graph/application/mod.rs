mod build_program_graph;

pub use build_program_graph::BuildProgramGraphUseCase;
