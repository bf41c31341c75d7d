//! Operator-facing prompt implementations.
//!
//! The wizard talks to the operator only through [`Prompter`], so tests can
//! script answers and the CLI can pick a terminal or line-based frontend.

use std::{
    io::{self, BufRead, Write},
    sync::Mutex,
};

use console::style;
use dialoguer::{Select, theme::ColorfulTheme};
use thiserror::Error;

/// What the operator entered for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptReply {
    /// An explicit label (not yet checked against the choices).
    Selected(String),
    /// No input; the wizard applies the default.
    Empty,
}

/// Failures while talking to the operator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PromptError {
    /// The operator aborted the session.
    #[error("cancelled by operator")]
    Cancelled,

    /// The terminal could not be read or written.
    #[error("prompt I/O failed: {0}")]
    Io(String),
}

/// Interactive input/output used once per visible question.
pub trait Prompter: Send + Sync {
    /// Presents `choices` under `prompt` and returns the operator's reply.
    ///
    /// `default` is the index of the declared default, if the question has one.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::Cancelled`] when the operator aborts.
    fn present_choice(
        &self,
        prompt: &str,
        choices: &[String],
        default: Option<usize>,
    ) -> Result<PromptReply, PromptError>;

    /// Tells the operator `input` was not an accepted choice.
    fn reject(&self, _input: &str, _choices: &[String]) {}
}

/// Arrow-key selection menu on an attended terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    /// Create a new terminal prompter.
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for DialoguerPrompter {
    fn present_choice(
        &self,
        prompt: &str,
        choices: &[String],
        default: Option<usize>,
    ) -> Result<PromptReply, PromptError> {
        let theme = ColorfulTheme::default();
        let mut select = Select::with_theme(&theme)
            .with_prompt(prompt)
            .items(choices);

        if let Some(index) = default {
            select = select.default(index);
        }

        match select.interact_opt() {
            Ok(Some(index)) => choices
                .get(index)
                .map(|label| PromptReply::Selected(label.clone()))
                .ok_or_else(|| PromptError::Io(format!("selection {index} out of range"))),
            Ok(None) => Err(PromptError::Cancelled),
            Err(dialoguer::Error::IO(e)) if e.kind() == io::ErrorKind::Interrupted => {
                Err(PromptError::Cancelled)
            }
            Err(e) => Err(PromptError::Io(e.to_string())),
        }
    }
}

/// Numbered-list prompt over plain line I/O.
///
/// Used when stdin is piped. Accepts a label or its 1-based number; an empty
/// line selects the default and end of input cancels the session.
pub struct LinePrompter {
    input: Mutex<Box<dyn BufRead + Send>>,
    output: Mutex<Box<dyn Write + Send>>,
}

impl LinePrompter {
    /// Prompter over arbitrary reader and writer.
    pub fn new(input: Box<dyn BufRead + Send>, output: Box<dyn Write + Send>) -> Self {
        Self {
            input: Mutex::new(input),
            output: Mutex::new(output),
        }
    }

    /// Prompter reading stdin. Menus go to stderr so stdout only carries
    /// command output.
    pub fn stdio() -> Self {
        Self::new(
            Box::new(io::BufReader::new(io::stdin())),
            Box::new(io::stderr()),
        )
    }

    fn write_menu(
        &self,
        prompt: &str,
        choices: &[String],
        default: Option<usize>,
    ) -> Result<(), PromptError> {
        let mut output = self
            .output
            .lock()
            .map_err(|_| PromptError::Io("output lock poisoned".to_string()))?;

        let mut menu = format!("{}\n", style(prompt).bold());
        for (index, choice) in choices.iter().enumerate() {
            let marker = if Some(index) == default { "*" } else { " " };
            menu.push_str(&format!("{marker} {}) {choice}\n", index + 1));
        }
        menu.push_str("> ");

        output
            .write_all(menu.as_bytes())
            .and_then(|()| output.flush())
            .map_err(|e| PromptError::Io(e.to_string()))
    }

    fn read_reply(&self, choices: &[String]) -> Result<PromptReply, PromptError> {
        let mut input = self
            .input
            .lock()
            .map_err(|_| PromptError::Io("input lock poisoned".to_string()))?;

        let mut line = String::new();
        let read = input.read_line(&mut line).map_err(|e| {
            if e.kind() == io::ErrorKind::Interrupted {
                PromptError::Cancelled
            } else {
                PromptError::Io(e.to_string())
            }
        })?;

        if read == 0 {
            return Err(PromptError::Cancelled);
        }

        let line = line.trim();
        if line.is_empty() {
            return Ok(PromptReply::Empty);
        }

        let selected = line
            .parse::<usize>()
            .ok()
            .and_then(|number| number.checked_sub(1))
            .and_then(|index| choices.get(index))
            .cloned()
            .unwrap_or_else(|| line.to_string());

        Ok(PromptReply::Selected(selected))
    }
}

impl Prompter for LinePrompter {
    fn present_choice(
        &self,
        prompt: &str,
        choices: &[String],
        default: Option<usize>,
    ) -> Result<PromptReply, PromptError> {
        self.write_menu(prompt, choices, default)?;
        self.read_reply(choices)
    }

    fn reject(&self, input: &str, choices: &[String]) {
        if let Ok(mut output) = self.output.lock() {
            let _ = writeln!(
                output,
                "{} '{}' is not one of: {}",
                style("!").yellow(),
                input,
                choices.join(", ")
            );
        }
    }
}
