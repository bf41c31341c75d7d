//! Unit tests for the configuration wizard
//!
//! Exercises question visibility, defaults, re-prompting and cancellation
//! against a scripted prompter. No terminal involved.

#![allow(clippy::unwrap_used)]

use std::{
    collections::VecDeque,
    io::{self, Cursor},
    sync::Mutex,
};

use crate::platform::Platform;
use crate::wizard::{
    GpuType, GraphError, InitQuestionOptions, Instructions, LinePrompter, PromptError,
    PromptReply, Prompter, Question, QuestionGraph, RunMode, RuntimeConfiguration, Wizard,
    WizardContext, WizardError, WizardOptions, init_questions, init_questions::*,
};

/// Replies with queued answers and records every prompt it was shown.
#[derive(Default)]
struct ScriptedPrompter {
    replies: Mutex<VecDeque<Result<PromptReply, PromptError>>>,
    asked: Mutex<Vec<String>>,
    rejected: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    fn with_replies(replies: &[&str]) -> Self {
        let prompter = Self::default();
        {
            let mut queue = prompter.replies.lock().unwrap();
            for reply in replies {
                queue.push_back(Ok(if reply.is_empty() {
                    PromptReply::Empty
                } else {
                    PromptReply::Selected(reply.to_string())
                }));
            }
        }
        prompter
    }

    fn then_cancel(self) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(PromptError::Cancelled));
        self
    }

    fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }

    fn rejected(&self) -> Vec<String> {
        self.rejected.lock().unwrap().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn present_choice(
        &self,
        prompt: &str,
        _choices: &[String],
        _default: Option<usize>,
    ) -> Result<PromptReply, PromptError> {
        self.asked.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(PromptError::Cancelled))
    }

    fn reject(&self, input: &str, _choices: &[String]) {
        self.rejected.lock().unwrap().push(input.to_string());
    }
}

fn linux() -> WizardContext {
    WizardContext {
        platform: Platform::Linux,
    }
}

fn macos() -> WizardContext {
    WizardContext {
        platform: Platform::MacOs,
    }
}

fn default_graph() -> QuestionGraph {
    init_questions(InitQuestionOptions::default()).unwrap()
}

#[test]
fn gpu_nvidia_avx2_on_linux() {
    let graph = default_graph();
    let prompter = ScriptedPrompter::with_replies(&["GPU", "Nvidia", "AVX2"]);

    let record = Wizard::new(&graph, &prompter).configure(&linux()).unwrap();

    assert_eq!(
        record,
        RuntimeConfiguration {
            run_mode: Some(RunMode::Gpu),
            gpu_type: Some(GpuType::Nvidia),
            instructions: Some(Instructions::Avx2),
        }
    );
    assert_eq!(
        prompter.asked(),
        vec![
            "Select run mode",
            "Select GPU type",
            "Select CPU instructions set"
        ]
    );
}

#[test]
fn apple_desktop_asks_nothing() {
    let graph = default_graph();
    let prompter = ScriptedPrompter::default();

    let answers = Wizard::new(&graph, &prompter).run(&macos()).unwrap();
    let record = RuntimeConfiguration::from_answers(&answers).unwrap();

    assert!(answers.is_empty());
    assert!(record.is_empty());
    assert!(prompter.asked().is_empty());
}

#[test]
fn cpu_mode_skips_gpu_question() {
    let graph = default_graph();
    let prompter = ScriptedPrompter::with_replies(&["CPU", "AVX"]);

    let answers = Wizard::new(&graph, &prompter).run(&linux()).unwrap();

    assert!(!answers.contains(GPU_TYPE));
    assert_eq!(answers.get(RUN_MODE), Some("CPU"));
    assert_eq!(answers.get(INSTRUCTIONS), Some("AVX"));
}

#[test]
fn empty_reply_takes_declared_default() {
    let graph = default_graph();
    let prompter = ScriptedPrompter::with_replies(&["", "AVX-512"]);

    let record = Wizard::new(&graph, &prompter).configure(&linux()).unwrap();

    assert_eq!(record.run_mode, Some(RunMode::Cpu));
    assert_eq!(record.gpu_type, None);
    assert_eq!(record.instructions, Some(Instructions::Avx512));
}

#[test]
fn empty_reply_without_default_is_asked_again() {
    let graph = default_graph();
    let prompter = ScriptedPrompter::with_replies(&["CPU", "", "AVX"]);

    let answers = Wizard::new(&graph, &prompter).run(&linux()).unwrap();

    assert_eq!(answers.get(INSTRUCTIONS), Some("AVX"));
    assert_eq!(prompter.asked().len(), 3);
    assert_eq!(prompter.rejected(), vec![String::new()]);
}

#[test]
fn out_of_domain_answer_is_rejected_and_reasked() {
    let graph = default_graph();
    let prompter = ScriptedPrompter::with_replies(&["TPU", "gpu", "Nvidia", "AVX2"]);

    let answers = Wizard::new(&graph, &prompter).run(&linux()).unwrap();

    assert_eq!(answers.get(RUN_MODE), Some("GPU"));
    assert_eq!(prompter.rejected(), vec!["TPU".to_string()]);
    assert_eq!(
        answers.iter().map(|(name, _)| name).collect::<Vec<_>>(),
        vec![RUN_MODE, GPU_TYPE, INSTRUCTIONS]
    );
}

#[test]
fn cancellation_discards_partial_answers() {
    let graph = default_graph();
    let prompter = ScriptedPrompter::with_replies(&["GPU"]).then_cancel();

    let result = Wizard::new(&graph, &prompter).run(&linux());

    assert_eq!(result, Err(WizardError::Cancelled));
}

#[test]
fn non_interactive_uses_defaults_without_prompting() {
    let graph = init_questions(InitQuestionOptions {
        default_instructions: Some(Instructions::Avx),
    })
    .unwrap();
    let prompter = ScriptedPrompter::default();

    let record = Wizard::new(&graph, &prompter)
        .with_options(WizardOptions { interactive: false })
        .configure(&linux())
        .unwrap();

    assert_eq!(record.run_mode, Some(RunMode::Cpu));
    assert_eq!(record.gpu_type, None);
    assert_eq!(record.instructions, Some(Instructions::Avx));
    assert!(prompter.asked().is_empty());
}

#[test]
fn non_interactive_fails_on_question_without_default() {
    let graph = default_graph();
    let prompter = ScriptedPrompter::default();

    let result = Wizard::new(&graph, &prompter)
        .with_options(WizardOptions { interactive: false })
        .run(&linux());

    assert_eq!(result, Err(WizardError::NoDefault(INSTRUCTIONS.to_string())));
}

#[test]
fn non_interactive_on_apple_desktop_succeeds_without_defaults() {
    let graph = default_graph();
    let prompter = ScriptedPrompter::default();

    let answers = Wizard::new(&graph, &prompter)
        .with_options(WizardOptions { interactive: false })
        .run(&macos())
        .unwrap();

    assert!(answers.is_empty());
}

#[test]
fn hidden_questions_never_recorded_for_any_platform() {
    let platforms = [
        Platform::MacOs,
        Platform::Linux,
        Platform::Windows,
        Platform::Other,
    ];
    let scripts: [&[&str]; 3] = [&["GPU", "Others (Vulkan)", "AVX"], &["CPU", "AVX2"], &[]];

    for platform in platforms {
        for script in scripts {
            let graph = default_graph();
            let prompter = ScriptedPrompter::with_replies(script);
            let context = WizardContext { platform };

            let Ok(answers) = Wizard::new(&graph, &prompter).run(&context) else {
                continue;
            };

            if platform.is_apple_desktop() {
                assert!(answers.is_empty());
            }
            if answers.get(RUN_MODE) != Some("GPU") {
                assert!(!answers.contains(GPU_TYPE));
            }
        }
    }
}

#[test]
fn effective_default_drives_downstream_visibility() {
    let graph = QuestionGraph::builder()
        .question(
            Question::single_choice("mode", "Mode", ["fast", "slow"])
                .with_default("slow")
                .visible_when(&[], |_| false),
        )
        .question(
            Question::single_choice("tuning", "Tuning", ["a", "b"])
                .visible_when(&["mode"], |view| {
                    view.get("mode").is_none() && view.effective("mode") == Some("slow")
                }),
        )
        .build()
        .unwrap();
    let prompter = ScriptedPrompter::with_replies(&["b"]);

    let answers = Wizard::new(&graph, &prompter).run(&linux()).unwrap();

    assert!(!answers.contains("mode"));
    assert_eq!(answers.get("tuning"), Some("b"));
}

#[test]
fn undeclared_dependency_reads_as_absent() {
    let graph = QuestionGraph::builder()
        .question(Question::single_choice("first", "First", ["x"]))
        .question(
            Question::single_choice("second", "Second", ["y"])
                .visible_when(&[], |view| view.get("first").is_some()),
        )
        .build()
        .unwrap();
    let prompter = ScriptedPrompter::with_replies(&["x"]);

    let answers = Wizard::new(&graph, &prompter).run(&linux()).unwrap();

    assert!(answers.contains("first"));
    assert!(!answers.contains("second"));
}

#[test]
fn graph_rejects_forward_dependency() {
    let result = QuestionGraph::builder()
        .question(
            Question::single_choice("early", "Early", ["a"])
                .visible_when(&["late"], |view| view.get("late").is_some()),
        )
        .question(Question::single_choice("late", "Late", ["b"]))
        .build();

    assert_eq!(
        result.unwrap_err(),
        GraphError::ForwardDependency {
            question: "early".to_string(),
            dependency: "late".to_string(),
        }
    );
}

#[test]
fn graph_rejects_self_dependency() {
    let result = QuestionGraph::builder()
        .question(Question::single_choice("loop", "Loop", ["a"]).visible_when(&["loop"], |_| true))
        .build();

    assert!(matches!(
        result,
        Err(GraphError::ForwardDependency { .. })
    ));
}

#[test]
fn graph_rejects_default_outside_choices() {
    let result = QuestionGraph::builder()
        .question(Question::single_choice("mode", "Mode", ["CPU", "GPU"]).with_default("TPU"))
        .build();

    assert_eq!(
        result.unwrap_err(),
        GraphError::DefaultNotInChoices {
            question: "mode".to_string(),
            default: "TPU".to_string(),
        }
    );
}

#[test]
fn graph_rejects_duplicates_and_empty_choices() {
    let duplicate = QuestionGraph::builder()
        .question(Question::single_choice("a", "A", ["x"]))
        .question(Question::single_choice("a", "A again", ["y"]))
        .build();
    assert_eq!(
        duplicate.unwrap_err(),
        GraphError::DuplicateQuestion("a".to_string())
    );

    let empty = QuestionGraph::builder()
        .question(Question::single_choice("a", "A", Vec::<String>::new()))
        .build();
    assert_eq!(empty.unwrap_err(), GraphError::EmptyChoices("a".to_string()));
}

#[test]
fn line_prompter_accepts_numbers_labels_and_blank() {
    let input = Cursor::new("2\nAVX-512\n\n");
    let prompter = LinePrompter::new(Box::new(input), Box::new(io::sink()));
    let choices: Vec<String> = Instructions::LABELS.iter().map(|l| l.to_string()).collect();

    assert_eq!(
        prompter.present_choice("Pick", &choices, None).unwrap(),
        PromptReply::Selected("AVX".to_string())
    );
    assert_eq!(
        prompter.present_choice("Pick", &choices, None).unwrap(),
        PromptReply::Selected("AVX-512".to_string())
    );
    assert_eq!(
        prompter.present_choice("Pick", &choices, Some(0)).unwrap(),
        PromptReply::Empty
    );
    assert_eq!(
        prompter.present_choice("Pick", &choices, None),
        Err(PromptError::Cancelled)
    );
}

#[test]
fn piped_answers_drive_full_run() {
    let input = Cursor::new("2\n1\nAVX2\n");
    let prompter = LinePrompter::new(Box::new(input), Box::new(io::sink()));
    let graph = default_graph();

    let record = Wizard::new(&graph, &prompter).configure(&linux()).unwrap();

    assert_eq!(record.run_mode, Some(RunMode::Gpu));
    assert_eq!(record.gpu_type, Some(GpuType::Nvidia));
    assert_eq!(record.instructions, Some(Instructions::Avx2));
}

#[test]
fn record_serializes_only_present_fields() {
    let record = RuntimeConfiguration {
        run_mode: Some(RunMode::Cpu),
        gpu_type: None,
        instructions: Some(Instructions::Avx512),
    };

    let toml_str = toml::to_string(&record).unwrap();

    assert!(toml_str.contains("runMode = \"CPU\""));
    assert!(toml_str.contains("instructions = \"AVX-512\""));
    assert!(!toml_str.contains("gpuType"));
}

#[test]
fn engine_variant_follows_configuration() {
    let gpu = RuntimeConfiguration {
        run_mode: Some(RunMode::Gpu),
        gpu_type: Some(GpuType::Nvidia),
        instructions: Some(Instructions::Avx2),
    };
    let vulkan = RuntimeConfiguration {
        gpu_type: Some(GpuType::Vulkan),
        ..gpu.clone()
    };

    assert_eq!(gpu.engine_variant(Platform::Linux), "linux-amd64-avx2-cuda-12-0");
    assert_eq!(vulkan.engine_variant(Platform::Windows), "windows-amd64-vulkan");
    assert_eq!(
        RuntimeConfiguration::default().engine_variant(Platform::MacOs),
        "mac-arm64"
    );
    assert_eq!(
        RuntimeConfiguration::default().engine_variant(Platform::Linux),
        "linux-amd64-avx2"
    );
}
