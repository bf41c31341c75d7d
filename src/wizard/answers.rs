use crate::platform::Platform;

use super::{QuestionGraph, WizardContext, question::Question};

/// Answers collected during one wizard run, in evaluation order.
///
/// Only the wizard can record answers. Once a run completes the set is handed
/// to the caller and can no longer change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSet {
    entries: Vec<(String, String)>,
}

impl AnswerSet {
    /// Label recorded for `name`, if the question was asked.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, label)| label.as_str())
    }

    /// Whether an explicit answer exists for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of recorded answers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no question was answered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(name, label)` pairs in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, label)| (name.as_str(), label.as_str()))
    }

    pub(super) fn record(&mut self, name: &str, label: &str) {
        self.entries.push((name.to_string(), label.to_string()));
    }
}

/// Read-only window over the answers a question is allowed to see.
///
/// Handed to visibility predicates. Exposes the wizard context and the answers
/// of the question's declared dependencies and nothing else.
pub struct AnswerView<'a> {
    context: &'a WizardContext,
    answers: &'a AnswerSet,
    graph: &'a QuestionGraph,
    question: &'a Question,
}

impl<'a> AnswerView<'a> {
    pub(super) fn new(
        context: &'a WizardContext,
        answers: &'a AnswerSet,
        graph: &'a QuestionGraph,
        question: &'a Question,
    ) -> Self {
        Self {
            context,
            answers,
            graph,
            question,
        }
    }

    /// Host platform of this run.
    pub fn platform(&self) -> Platform {
        self.context.platform
    }

    /// Explicit answer of a declared dependency.
    pub fn get(&self, name: &str) -> Option<&'a str> {
        if !self.is_dependency(name) {
            tracing::debug!(
                question = self.question.name(),
                dependency = name,
                "Visibility predicate read an undeclared question"
            );
            return None;
        }

        self.answers.get(name)
    }

    /// Explicit answer of a declared dependency, or its declared default when
    /// that question was skipped.
    pub fn effective(&self, name: &str) -> Option<&'a str> {
        if !self.is_dependency(name) {
            return None;
        }

        self.answers
            .get(name)
            .or_else(|| self.graph.question(name).and_then(Question::default))
    }

    fn is_dependency(&self, name: &str) -> bool {
        self.question.depends_on().iter().any(|dep| dep == name)
    }
}
