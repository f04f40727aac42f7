use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::OptionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("question has no options")]
    NoOptions,

    #[error("duplicate option id: {0}")]
    DuplicateOption(OptionId),

    #[error("correct option {0} is not one of the question's options")]
    CorrectOptionMissing(OptionId),

    #[error("no question at index {0}")]
    UnknownQuestion(usize),

    #[error("option {option} does not belong to question {question}")]
    UnknownOption { question: usize, option: OptionId },
}

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    pub id: OptionId,
    pub label: String,
}

impl QuizOption {
    #[must_use]
    pub fn new(id: &str, label: impl Into<String>) -> Self {
        Self {
            id: OptionId::new(id),
            label: label.into(),
        }
    }
}

/// One multiple-choice question with exactly one correct option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    prompt: String,
    options: Vec<QuizOption>,
    correct: OptionId,
    explanation: String,
}

impl QuizQuestion {
    /// # Errors
    ///
    /// Returns `QuizError` if there are no options, option ids repeat, or the
    /// correct id is not among the options.
    pub fn new(
        prompt: impl Into<String>,
        options: Vec<QuizOption>,
        correct: &str,
        explanation: impl Into<String>,
    ) -> Result<Self, QuizError> {
        if options.is_empty() {
            return Err(QuizError::NoOptions);
        }
        for (idx, option) in options.iter().enumerate() {
            if options[..idx].iter().any(|o| o.id == option.id) {
                return Err(QuizError::DuplicateOption(option.id.clone()));
            }
        }
        let correct = OptionId::new(correct);
        if !options.iter().any(|o| o.id == correct) {
            return Err(QuizError::CorrectOptionMissing(correct));
        }
        Ok(Self {
            prompt: prompt.into(),
            options,
            correct,
            explanation: explanation.into(),
        })
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[QuizOption] {
        &self.options
    }

    #[must_use]
    pub fn correct(&self) -> &OptionId {
        &self.correct
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn has_option(&self, id: &OptionId) -> bool {
        self.options.iter().any(|o| &o.id == id)
    }
}

/// Ordered question list for one lesson.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizConfig {
    questions: Vec<QuizQuestion>,
}

/// Outcome for one question after a submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionResult {
    pub index: usize,
    pub selected: Option<OptionId>,
    pub is_correct: bool,
    pub explanation: String,
}

/// Result of evaluating a full set of selections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizEvaluation {
    pub fully_answered: bool,
    pub all_correct: bool,
    pub results: Vec<QuestionResult>,
}

impl QuizEvaluation {
    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_correct).count()
    }
}

impl QuizConfig {
    #[must_use]
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        Self { questions }
    }

    #[must_use]
    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Check that `option` is a valid answer for question `index`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::UnknownQuestion` or `QuizError::UnknownOption`.
    pub fn check_selection(&self, index: usize, option: &OptionId) -> Result<(), QuizError> {
        let question = self
            .questions
            .get(index)
            .ok_or(QuizError::UnknownQuestion(index))?;
        if !question.has_option(option) {
            return Err(QuizError::UnknownOption {
                question: index,
                option: option.clone(),
            });
        }
        Ok(())
    }

    /// Evaluate `selections`, positionally aligned with the questions.
    ///
    /// Missing trailing selections count as unanswered. An empty quiz is
    /// vacuously answered and correct.
    #[must_use]
    pub fn evaluate(&self, selections: &[Option<OptionId>]) -> QuizEvaluation {
        let results: Vec<QuestionResult> = self
            .questions
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let selected = selections.get(index).cloned().flatten();
                QuestionResult {
                    index,
                    is_correct: selected.as_ref() == Some(&question.correct),
                    selected,
                    explanation: question.explanation.clone(),
                }
            })
            .collect();

        QuizEvaluation {
            fully_answered: results.iter().all(|r| r.selected.is_some()),
            all_correct: results.iter().all(|r| r.is_correct),
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct: &str) -> QuizQuestion {
        QuizQuestion::new(
            "Which tag makes a paragraph?",
            vec![
                QuizOption::new("a", "<p>"),
                QuizOption::new("b", "<h1>"),
                QuizOption::new("c", "<img>"),
            ],
            correct,
            "<p> wraps a paragraph of text.",
        )
        .unwrap()
    }

    #[test]
    fn question_requires_known_correct_option() {
        let err = QuizQuestion::new("?", vec![QuizOption::new("a", "A")], "z", "").unwrap_err();
        assert_eq!(err, QuizError::CorrectOptionMissing(OptionId::new("z")));
        assert_eq!(
            QuizQuestion::new("?", vec![], "a", "").unwrap_err(),
            QuizError::NoOptions
        );
    }

    #[test]
    fn evaluate_all_correct() {
        let quiz = QuizConfig::new(vec![question("a"), question("b")]);
        let eval = quiz.evaluate(&[Some(OptionId::new("a")), Some(OptionId::new("b"))]);
        assert!(eval.fully_answered);
        assert!(eval.all_correct);
        assert_eq!(eval.correct_count(), 2);
    }

    #[test]
    fn evaluate_partial_and_wrong() {
        let quiz = QuizConfig::new(vec![question("a"), question("b")]);
        let eval = quiz.evaluate(&[Some(OptionId::new("c"))]);
        assert!(!eval.fully_answered);
        assert!(!eval.all_correct);
        assert!(!eval.results[0].is_correct);
        assert_eq!(eval.results[1].selected, None);
        assert_eq!(eval.results[0].explanation, "<p> wraps a paragraph of text.");
    }

    #[test]
    fn check_selection_rejects_unknown_ids() {
        let quiz = QuizConfig::new(vec![question("a")]);
        assert!(quiz.check_selection(0, &OptionId::new("b")).is_ok());
        assert_eq!(
            quiz.check_selection(3, &OptionId::new("a")),
            Err(QuizError::UnknownQuestion(3))
        );
        assert!(matches!(
            quiz.check_selection(0, &OptionId::new("q")),
            Err(QuizError::UnknownOption { .. })
        ));
    }
}
