//! Interactive runtime configuration wizard.
//!
//! Walks a [`QuestionGraph`] in declaration order, asking only the questions
//! whose visibility predicate holds for the answers collected so far, and
//! projects the result into a [`RuntimeConfiguration`].
//!
//! # Architecture
//!
//! - `question` / `graph`: declarations and construction-time checks
//! - `answers`: the answer set and the view predicates see
//! - `prompter`: operator I/O (`dialoguer` menus, piped line input)
//! - `record`: typed configuration record
//! - `init_questions`: the question set behind `cortex init`

mod answers;
mod graph;
pub mod init_questions;
mod prompter;
mod question;
mod record;

#[cfg(test)]
mod tests;

pub use answers::{AnswerSet, AnswerView};
pub use graph::{GraphError, QuestionGraph, QuestionGraphBuilder};
pub use init_questions::{InitQuestionOptions, init_questions};
pub use prompter::{DialoguerPrompter, LinePrompter, PromptError, PromptReply, Prompter};
pub use question::Question;
pub use record::{GpuType, Instructions, RunMode, RuntimeConfiguration};

use thiserror::Error;
use tracing::{debug, instrument};

use crate::platform::Platform;

/// Errors that end a wizard run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    /// The operator aborted; collected answers were discarded.
    #[error("setup cancelled by operator")]
    Cancelled,

    /// A visible question has no default in non-interactive mode.
    #[error("question '{0}' has no default and cannot be answered non-interactively")]
    NoDefault(String),

    /// A recorded label does not map onto the configuration record.
    #[error("answer '{label}' is not valid for '{question}'")]
    InvalidAnswer {
        /// Question name
        question: String,
        /// Recorded label
        label: String,
    },

    /// Operator I/O failed.
    #[error("{0}")]
    Prompt(PromptError),
}

impl From<PromptError> for WizardError {
    fn from(error: PromptError) -> Self {
        match error {
            PromptError::Cancelled => WizardError::Cancelled,
            other => WizardError::Prompt(other),
        }
    }
}

/// Facts known before the first question is asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WizardContext {
    /// Host platform category
    pub platform: Platform,
}

impl WizardContext {
    /// Context for the running host.
    pub fn detect() -> Self {
        Self {
            platform: Platform::current(),
        }
    }
}

/// How the wizard obtains answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WizardOptions {
    /// Prompt the operator. When false every visible question takes its
    /// default without prompting.
    pub interactive: bool,
}

impl Default for WizardOptions {
    fn default() -> Self {
        Self { interactive: true }
    }
}

/// Drives one question graph to completion.
pub struct Wizard<'a> {
    graph: &'a QuestionGraph,
    prompter: &'a dyn Prompter,
    options: WizardOptions,
}

impl<'a> Wizard<'a> {
    /// Creates an interactive wizard.
    pub fn new(graph: &'a QuestionGraph, prompter: &'a dyn Prompter) -> Self {
        Self {
            graph,
            prompter,
            options: WizardOptions::default(),
        }
    }

    /// Overrides the run options.
    pub fn with_options(mut self, options: WizardOptions) -> Self {
        self.options = options;
        self
    }

    /// Asks every visible question and returns the collected answers.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::Cancelled`] when the operator aborts and
    /// [`WizardError::NoDefault`] when a non-interactive run reaches a visible
    /// question without a default. No partial answers are returned.
    #[instrument(skip(self), fields(questions = self.graph.len()))]
    pub fn run(&self, context: &WizardContext) -> Result<AnswerSet, WizardError> {
        let mut answers = AnswerSet::default();

        for question in self.graph.questions() {
            let visible = {
                let view = AnswerView::new(context, &answers, self.graph, question);
                question.is_visible(&view)
            };

            if !visible {
                debug!(question = question.name(), "Skipping hidden question");
                continue;
            }

            let label = self.answer(question)?;
            debug!(question = question.name(), label = %label, "Recorded answer");
            answers.record(question.name(), &label);
        }

        Ok(answers)
    }

    /// Runs the wizard and projects the answers into a configuration record.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub fn configure(&self, context: &WizardContext) -> Result<RuntimeConfiguration, WizardError> {
        let answers = self.run(context)?;
        RuntimeConfiguration::from_answers(&answers)
    }

    fn answer(&self, question: &Question) -> Result<String, WizardError> {
        if !self.options.interactive {
            return question
                .default()
                .map(str::to_string)
                .ok_or_else(|| WizardError::NoDefault(question.name().to_string()));
        }

        loop {
            let reply = self.prompter.present_choice(
                question.prompt(),
                question.choices(),
                question.default_index(),
            )?;

            let input = match reply {
                PromptReply::Selected(input) => input,
                PromptReply::Empty => match question.default() {
                    Some(default) => return Ok(default.to_string()),
                    None => {
                        self.prompter.reject("", question.choices());
                        continue;
                    }
                },
            };

            match question.resolve_choice(&input) {
                Some(label) => return Ok(label.to_string()),
                None => {
                    debug!(question = question.name(), input = %input, "Rejected out-of-domain answer");
                    self.prompter.reject(&input, question.choices());
                }
            }
        }
    }
}
