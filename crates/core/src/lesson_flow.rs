//! Quiz-then-practice flow for a single lesson.

use crate::model::{LessonAssessment, OptionId, PracticeFailure, QuizError, QuizEvaluation};

/// Where a lesson stands in its assessment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LessonPhase {
    NotStarted,
    QuizInProgress,
    QuizSubmittedIncorrect(QuizEvaluation),
    QuizSubmittedCorrect(QuizEvaluation),
    PracticeFailed(PracticeFailure),
    Completed,
}

/// Result of a practice check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Practice and quiz both passed; the lesson should be marked complete.
    Passed,
    Rejected(PracticeFailure),
    /// Practice passed but the quiz has not been submitted fully correct.
    QuizNotCorrect,
    /// Lesson was already completed; nothing to do.
    AlreadyCompleted,
}

impl CheckOutcome {
    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Passed | Self::AlreadyCompleted)
    }

    #[must_use]
    pub fn reason(&self) -> String {
        match self {
            Self::Passed => "Nice work. This lesson is now marked as completed.".to_owned(),
            Self::AlreadyCompleted => "This lesson is already completed.".to_owned(),
            Self::Rejected(failure) => failure.reason(),
            Self::QuizNotCorrect => "Your practice looks good, but the quiz is not fully correct yet. Answer every question correctly and submit it first.".to_owned(),
        }
    }
}

/// Transient assessment state for one lesson view.
#[derive(Debug, Clone)]
pub struct LessonFlow {
    assessment: LessonAssessment,
    selections: Vec<Option<OptionId>>,
    // Last submitted evaluation, dropped whenever a selection changes.
    submission: Option<QuizEvaluation>,
    phase: LessonPhase,
}

impl LessonFlow {
    #[must_use]
    pub fn new(assessment: LessonAssessment) -> Self {
        let selections = vec![None; assessment.quiz.len()];
        Self {
            assessment,
            selections,
            submission: None,
            phase: LessonPhase::NotStarted,
        }
    }

    /// Open the flow for a lesson that is already recorded as completed.
    #[must_use]
    pub fn completed(assessment: LessonAssessment) -> Self {
        Self {
            phase: LessonPhase::Completed,
            ..Self::new(assessment)
        }
    }

    #[must_use]
    pub fn phase(&self) -> &LessonPhase {
        &self.phase
    }

    #[must_use]
    pub fn assessment(&self) -> &LessonAssessment {
        &self.assessment
    }

    #[must_use]
    pub fn selections(&self) -> &[Option<OptionId>] {
        &self.selections
    }

    /// The submitted view, if it is still current.
    #[must_use]
    pub fn submission(&self) -> Option<&QuizEvaluation> {
        self.submission.as_ref()
    }

    #[must_use]
    pub fn is_fully_answered(&self) -> bool {
        self.selections.iter().all(Option::is_some)
    }

    fn quiz_passed(&self) -> bool {
        self.submission.as_ref().is_some_and(|e| e.all_correct)
    }

    /// Pick `option` for question `index`.
    ///
    /// Invalidates any submitted view. A completed lesson records the selection
    /// but stays completed.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` if the question or option does not exist.
    pub fn select_answer(&mut self, index: usize, option: OptionId) -> Result<(), QuizError> {
        self.assessment.quiz.check_selection(index, &option)?;
        self.selections[index] = Some(option);
        self.submission = None;
        if self.phase != LessonPhase::Completed {
            self.phase = LessonPhase::QuizInProgress;
        }
        Ok(())
    }

    /// Evaluate the current selections and reveal per-question results.
    pub fn submit_quiz(&mut self) -> QuizEvaluation {
        let evaluation = self.assessment.quiz.evaluate(&self.selections);
        self.submission = Some(evaluation.clone());
        if self.phase != LessonPhase::Completed {
            self.phase = if evaluation.all_correct {
                LessonPhase::QuizSubmittedCorrect(evaluation.clone())
            } else {
                LessonPhase::QuizSubmittedIncorrect(evaluation.clone())
            };
        }
        evaluation
    }

    /// Check a practice submission against the lesson's requirement.
    ///
    /// Only a fully correct, still-current quiz submission lets the flow reach
    /// `Completed`.
    pub fn check_practice(&mut self, input: &str) -> CheckOutcome {
        if self.phase == LessonPhase::Completed {
            return CheckOutcome::AlreadyCompleted;
        }
        if let Err(failure) = self.assessment.practice.check(input) {
            self.phase = LessonPhase::PracticeFailed(failure.clone());
            return CheckOutcome::Rejected(failure);
        }
        if !self.quiz_passed() {
            return CheckOutcome::QuizNotCorrect;
        }
        self.phase = LessonPhase::Completed;
        CheckOutcome::Passed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LessonCatalog, LessonId};

    fn flow() -> LessonFlow {
        let catalog = LessonCatalog::academy().unwrap();
        LessonFlow::new(catalog.assessment(&LessonId::new("prog-2-1")).unwrap().clone())
    }

    fn answer_all_correct(flow: &mut LessonFlow) {
        for (idx, option) in ["b", "a", "c"].into_iter().enumerate() {
            flow.select_answer(idx, OptionId::new(option)).unwrap();
        }
    }

    fn good_practice() -> String {
        let mut text = String::from(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head><title>Me</title></head>\n<body>\n<h1>Hello</h1>\n<p>I am learning HTML.</p>\n",
        );
        while text.chars().count() < 260 {
            text.push_str("<p>more</p>\n");
        }
        text.push_str("</body></html>");
        text
    }

    #[test]
    fn correct_quiz_then_practice_completes() {
        let mut flow = flow();
        assert_eq!(flow.phase(), &LessonPhase::NotStarted);
        answer_all_correct(&mut flow);
        assert_eq!(flow.phase(), &LessonPhase::QuizInProgress);
        let eval = flow.submit_quiz();
        assert!(eval.all_correct);
        assert!(matches!(flow.phase(), LessonPhase::QuizSubmittedCorrect(_)));
        assert_eq!(flow.check_practice(&good_practice()), CheckOutcome::Passed);
        assert_eq!(flow.phase(), &LessonPhase::Completed);
        assert_eq!(
            flow.check_practice(&good_practice()),
            CheckOutcome::AlreadyCompleted
        );
    }

    #[test]
    fn changing_an_answer_clears_submitted_view() {
        let mut flow = flow();
        answer_all_correct(&mut flow);
        flow.submit_quiz();
        assert!(flow.submission().is_some());

        flow.select_answer(1, OptionId::new("a")).unwrap();
        assert!(flow.submission().is_none());
        assert_eq!(flow.phase(), &LessonPhase::QuizInProgress);
        assert_eq!(flow.check_practice(&good_practice()), CheckOutcome::QuizNotCorrect);

        flow.submit_quiz();
        assert_eq!(flow.check_practice(&good_practice()), CheckOutcome::Passed);
    }

    #[test]
    fn incorrect_quiz_blocks_completion_with_reason() {
        let mut flow = flow();
        flow.select_answer(0, OptionId::new("a")).unwrap();
        let eval = flow.submit_quiz();
        assert!(!eval.fully_answered);
        assert!(matches!(flow.phase(), LessonPhase::QuizSubmittedIncorrect(_)));

        let outcome = flow.check_practice(&good_practice());
        assert_eq!(outcome, CheckOutcome::QuizNotCorrect);
        assert!(outcome.reason().contains("quiz is not fully correct"));
        assert!(!outcome.is_pass());
    }

    #[test]
    fn practice_failure_then_retry() {
        let mut flow = flow();
        answer_all_correct(&mut flow);
        flow.submit_quiz();

        let outcome = flow.check_practice("<html><body><h1>short</h1></body></html>");
        assert!(matches!(outcome, CheckOutcome::Rejected(PracticeFailure::TooShort { .. })));
        assert!(matches!(flow.phase(), LessonPhase::PracticeFailed(_)));

        // The earlier correct submission still counts.
        assert_eq!(flow.check_practice(&good_practice()), CheckOutcome::Passed);
    }

    #[test]
    fn unknown_selection_is_rejected() {
        let mut flow = flow();
        assert!(flow.select_answer(7, OptionId::new("a")).is_err());
        assert!(flow.select_answer(0, OptionId::new("zz")).is_err());
        assert_eq!(flow.phase(), &LessonPhase::NotStarted);
    }

    #[test]
    fn lesson_without_quiz_only_needs_practice() {
        let mut flow = LessonFlow::new(LessonAssessment::default());
        assert!(flow.is_fully_answered());
        assert_eq!(flow.check_practice(&good_practice()), CheckOutcome::QuizNotCorrect);
        assert!(flow.submit_quiz().all_correct);
        assert_eq!(flow.check_practice(&good_practice()), CheckOutcome::Passed);
    }
}
