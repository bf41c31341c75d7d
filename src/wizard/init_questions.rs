//! Questions asked by `cortex init`.

use super::{
    GraphError, QuestionGraph,
    question::Question,
    record::{GpuType, Instructions, RunMode},
};

/// Key of the run mode question.
pub const RUN_MODE: &str = "runMode";
/// Key of the GPU type question.
pub const GPU_TYPE: &str = "gpuType";
/// Key of the instruction set question.
pub const INSTRUCTIONS: &str = "instructions";

/// Knobs for the init question set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InitQuestionOptions {
    /// Default for the instruction set question. `None` forces an explicit
    /// choice when prompting and fails non-interactive runs on hosts where the
    /// question applies.
    pub default_instructions: Option<Instructions>,
}

/// Builds the run mode → GPU type → instruction set graph.
///
/// # Errors
///
/// Only fails if the declarations below break a graph invariant.
pub fn init_questions(options: InitQuestionOptions) -> Result<QuestionGraph, GraphError> {
    QuestionGraph::builder()
        .question(
            Question::single_choice(RUN_MODE, "Select run mode", RunMode::LABELS.iter().copied())
                .with_default(RunMode::Cpu.label())
                .visible_when(&[], |view| !view.platform().is_apple_desktop()),
        )
        .question(
            Question::single_choice(GPU_TYPE, "Select GPU type", GpuType::LABELS.iter().copied())
                .with_default(GpuType::Nvidia.label())
                .visible_when(&[RUN_MODE], |view| {
                    view.effective(RUN_MODE) == Some(RunMode::Gpu.label())
                }),
        )
        .question(
            Question::single_choice(
                INSTRUCTIONS,
                "Select CPU instructions set",
                Instructions::LABELS.iter().copied(),
            )
            .with_optional_default(options.default_instructions.map(Instructions::label))
            .visible_when(&[], |view| !view.platform().is_apple_desktop()),
        )
        .build()
}
