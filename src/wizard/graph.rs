use std::collections::HashSet;

use thiserror::Error;

use super::question::Question;

/// Reasons a set of questions cannot form a graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Two questions share a name.
    #[error("duplicate question '{0}'")]
    DuplicateQuestion(String),

    /// A question offers nothing to choose from.
    #[error("question '{0}' has no choices")]
    EmptyChoices(String),

    /// The default is not one of the declared choices.
    #[error("default '{default}' of question '{question}' is not one of its choices")]
    DefaultNotInChoices {
        /// Question name
        question: String,
        /// Offending default label
        default: String,
    },

    /// A question reads a question that is not declared before it.
    ///
    /// Also covers self references, so dependency cycles cannot be built.
    #[error("question '{question}' depends on '{dependency}', which is not declared before it")]
    ForwardDependency {
        /// Question name
        question: String,
        /// Name of the dependency
        dependency: String,
    },
}

/// Ordered, validated set of questions.
#[derive(Debug)]
pub struct QuestionGraph {
    questions: Vec<Question>,
}

impl QuestionGraph {
    /// Starts a new graph.
    pub fn builder() -> QuestionGraphBuilder {
        QuestionGraphBuilder::default()
    }

    /// Questions in declaration order.
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }

    /// Looks up a question by name.
    pub fn question(&self, name: &str) -> Option<&Question> {
        self.questions.iter().find(|question| question.name() == name)
    }

    /// Number of declared questions.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Whether the graph declares no questions.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Collects questions and checks their invariants on [`build`](Self::build).
#[derive(Debug, Default)]
pub struct QuestionGraphBuilder {
    questions: Vec<Question>,
}

impl QuestionGraphBuilder {
    /// Appends a question after the ones already declared.
    pub fn question(mut self, question: Question) -> Self {
        self.questions.push(question);
        self
    }

    /// Validates names, choices, defaults and dependency order.
    ///
    /// # Errors
    ///
    /// Returns the first [`GraphError`] found, in declaration order.
    pub fn build(self) -> Result<QuestionGraph, GraphError> {
        let mut declared: HashSet<String> = HashSet::new();

        for question in &self.questions {
            let name = question.name();

            if question.choices().is_empty() {
                return Err(GraphError::EmptyChoices(name.to_string()));
            }

            if let Some(default) = question.default()
                && question.default_index().is_none()
            {
                return Err(GraphError::DefaultNotInChoices {
                    question: name.to_string(),
                    default: default.to_string(),
                });
            }

            if let Some(dependency) = question
                .depends_on()
                .iter()
                .find(|dep| !declared.contains(dep.as_str()))
            {
                return Err(GraphError::ForwardDependency {
                    question: name.to_string(),
                    dependency: dependency.clone(),
                });
            }

            if !declared.insert(name.to_string()) {
                return Err(GraphError::DuplicateQuestion(name.to_string()));
            }
        }

        Ok(QuestionGraph {
            questions: self.questions,
        })
    }
}
