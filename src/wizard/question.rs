use std::fmt;

use super::answers::AnswerView;

type VisibilityPredicate = Box<dyn Fn(&AnswerView<'_>) -> bool + Send + Sync>;

/// A single-choice configuration question.
///
/// Questions are declared once, collected into a
/// [`QuestionGraph`](super::QuestionGraph) and evaluated in declaration order.
/// A question may only look at the answers of the questions named in its
/// dependency list, all of which must be declared before it.
pub struct Question {
    name: String,
    prompt: String,
    choices: Vec<String>,
    default: Option<String>,
    depends_on: Vec<String>,
    visible: VisibilityPredicate,
}

impl Question {
    /// Creates an always-visible single-choice question without a default.
    pub fn single_choice<I, S>(name: &str, prompt: &str, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.to_string(),
            prompt: prompt.to_string(),
            choices: choices.into_iter().map(Into::into).collect(),
            default: None,
            depends_on: Vec::new(),
            visible: Box::new(|_| true),
        }
    }

    /// Sets the label chosen when the operator gives no explicit input.
    pub fn with_default(mut self, label: &str) -> Self {
        self.default = Some(label.to_string());
        self
    }

    /// Sets or clears the default label.
    pub fn with_optional_default(mut self, label: Option<&str>) -> Self {
        self.default = label.map(str::to_string);
        self
    }

    /// Restricts visibility to when `predicate` holds.
    ///
    /// `depends_on` names every earlier question the predicate reads. Reads of
    /// any other question through the [`AnswerView`] return `None`.
    pub fn visible_when<F>(mut self, depends_on: &[&str], predicate: F) -> Self
    where
        F: Fn(&AnswerView<'_>) -> bool + Send + Sync + 'static,
    {
        self.depends_on = depends_on.iter().map(|name| name.to_string()).collect();
        self.visible = Box::new(predicate);
        self
    }

    /// Unique key of the question.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Text shown to the operator.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Ordered choice labels.
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    /// Declared default label, if any.
    pub fn default(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Position of the default label within the choices.
    pub fn default_index(&self) -> Option<usize> {
        let default = self.default.as_deref()?;
        self.choices.iter().position(|choice| choice == default)
    }

    /// Names of the earlier questions this one reads.
    pub fn depends_on(&self) -> &[String] {
        &self.depends_on
    }

    /// Evaluates the visibility predicate.
    pub fn is_visible(&self, view: &AnswerView<'_>) -> bool {
        (self.visible)(view)
    }

    /// Maps operator input onto a declared label.
    ///
    /// Matches exactly first, then case-insensitively. Returns `None` for
    /// input outside the choice domain.
    pub fn resolve_choice(&self, input: &str) -> Option<&str> {
        let input = input.trim();

        self.choices
            .iter()
            .find(|choice| choice.as_str() == input)
            .or_else(|| {
                self.choices
                    .iter()
                    .find(|choice| choice.eq_ignore_ascii_case(input))
            })
            .map(String::as_str)
    }
}

impl fmt::Debug for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Question")
            .field("name", &self.name)
            .field("prompt", &self.prompt)
            .field("choices", &self.choices)
            .field("default", &self.default)
            .field("depends_on", &self.depends_on)
            .finish_non_exhaustive()
    }
}
