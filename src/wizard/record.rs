use std::fmt;

use serde::{Deserialize, Serialize};

use crate::platform::Platform;

use super::{AnswerSet, WizardError, init_questions};

/// Execution mode of the model runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunMode {
    /// CPU only
    #[serde(rename = "CPU")]
    Cpu,
    /// GPU offload
    #[serde(rename = "GPU")]
    Gpu,
}

/// GPU vendor family used for acceleration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GpuType {
    /// CUDA builds
    #[serde(rename = "Nvidia")]
    Nvidia,
    /// Vulkan builds for every other vendor
    #[serde(rename = "Others (Vulkan)")]
    Vulkan,
}

/// CPU instruction set the runtime build targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instructions {
    /// AVX2
    #[serde(rename = "AVX2")]
    Avx2,
    /// AVX
    #[serde(rename = "AVX")]
    Avx,
    /// AVX-512
    #[serde(rename = "AVX-512")]
    Avx512,
}

macro_rules! labelled {
    ($ty:ty { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $ty {
            /// Every label, in presentation order.
            pub const LABELS: &'static [&'static str] = &[$($label),+];

            /// Label shown to the operator and stored in the config file.
            pub fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            /// Parses a label produced by [`label`](Self::label).
            pub fn from_label(label: &str) -> Option<Self> {
                match label {
                    $($label => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

labelled!(RunMode { Cpu => "CPU", Gpu => "GPU" });
labelled!(GpuType { Nvidia => "Nvidia", Vulkan => "Others (Vulkan)" });
labelled!(Instructions { Avx2 => "AVX2", Avx => "AVX", Avx512 => "AVX-512" });

/// Runtime configuration produced by `cortex init`.
///
/// A field is `None` when its question was not asked on this host; it is
/// never filled in with a default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeConfiguration {
    /// Selected run mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_mode: Option<RunMode>,

    /// Selected GPU family, only present for GPU run mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu_type: Option<GpuType>,

    /// Selected instruction set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<Instructions>,
}

impl RuntimeConfiguration {
    /// Projects a completed answer set into typed fields.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::InvalidAnswer`] if a recorded label has no typed
    /// counterpart.
    pub fn from_answers(answers: &AnswerSet) -> Result<Self, WizardError> {
        Ok(Self {
            run_mode: parse(answers, init_questions::RUN_MODE, RunMode::from_label)?,
            gpu_type: parse(answers, init_questions::GPU_TYPE, GpuType::from_label)?,
            instructions: parse(answers, init_questions::INSTRUCTIONS, Instructions::from_label)?,
        })
    }

    /// Whether no field was recorded.
    pub fn is_empty(&self) -> bool {
        self.run_mode.is_none() && self.gpu_type.is_none() && self.instructions.is_none()
    }

    /// Checks the cross-field rules a wizard run always satisfies.
    ///
    /// A GPU family is only recorded for the GPU run mode.
    ///
    /// # Errors
    ///
    /// Returns a description of the violated rule.
    pub fn validate(&self) -> Result<(), String> {
        if self.gpu_type.is_some() && self.run_mode != Some(RunMode::Gpu) {
            return Err(format!(
                "{} is only valid when {} is {}",
                init_questions::GPU_TYPE,
                init_questions::RUN_MODE,
                RunMode::Gpu
            ));
        }
        Ok(())
    }

    /// Name of the llama.cpp engine build matching this configuration.
    ///
    /// Absent fields fall back to the CPU/AVX2 build, which is what the engine
    /// installer downloads when nothing was configured.
    pub fn engine_variant(&self, platform: Platform) -> String {
        match platform {
            Platform::MacOs => "mac-arm64".to_string(),
            _ => {
                let os = match platform {
                    Platform::Windows => "windows",
                    _ => "linux",
                };
                let instructions = match self.instructions.unwrap_or(Instructions::Avx2) {
                    Instructions::Avx2 => "avx2",
                    Instructions::Avx => "avx",
                    Instructions::Avx512 => "avx512",
                };

                match (self.run_mode, self.gpu_type) {
                    (Some(RunMode::Gpu), Some(GpuType::Vulkan)) => format!("{os}-amd64-vulkan"),
                    (Some(RunMode::Gpu), _) => format!("{os}-amd64-{instructions}-cuda-12-0"),
                    _ => format!("{os}-amd64-{instructions}"),
                }
            }
        }
    }
}

fn parse<T>(
    answers: &AnswerSet,
    question: &str,
    from_label: fn(&str) -> Option<T>,
) -> Result<Option<T>, WizardError> {
    answers
        .get(question)
        .map(|label| {
            from_label(label).ok_or_else(|| WizardError::InvalidAnswer {
                question: question.to_string(),
                label: label.to_string(),
            })
        })
        .transpose()
}
