use academy_core::model::{Lesson, LessonCatalog, LessonId, OptionId, QuizEvaluation, TrackId};
use academy_core::{CheckOutcome, LessonFlow, LessonPhase};
use tracing::info;

use crate::error::LessonSessionError;
use crate::progress_service::LessonProgressService;

/// One open lesson: its quiz/practice flow tied to recorded progress.
pub struct LessonSession {
    track: TrackId,
    lesson: Lesson,
    flow: LessonFlow,
}

impl LessonSession {
    /// Open `lesson` in `track`. A lesson already recorded as completed opens
    /// in the completed phase; a lesson without an assessment gets an empty quiz
    /// and the default practice minimum.
    ///
    /// # Errors
    ///
    /// Returns `LessonSessionError::UnknownLesson` if the catalog does not list
    /// the lesson under `track`.
    pub fn open(
        catalog: &LessonCatalog,
        progress: &LessonProgressService,
        track: &TrackId,
        lesson: &LessonId,
    ) -> Result<Self, LessonSessionError> {
        let found = catalog
            .lesson(track, lesson)
            .ok_or_else(|| LessonSessionError::UnknownLesson {
                track: track.clone(),
                lesson: lesson.clone(),
            })?;
        let assessment = catalog.assessment(lesson).cloned().unwrap_or_default();
        let flow = if progress.is_lesson_completed(track, lesson) {
            LessonFlow::completed(assessment)
        } else {
            LessonFlow::new(assessment)
        };
        Ok(Self {
            track: track.clone(),
            lesson: found.clone(),
            flow,
        })
    }

    #[must_use]
    pub fn lesson(&self) -> &Lesson {
        &self.lesson
    }

    #[must_use]
    pub fn flow(&self) -> &LessonFlow {
        &self.flow
    }

    #[must_use]
    pub fn phase(&self) -> &LessonPhase {
        self.flow.phase()
    }

    /// # Errors
    ///
    /// Returns `LessonSessionError::Quiz` for an unknown question or option.
    pub fn select_answer(
        &mut self,
        index: usize,
        option: OptionId,
    ) -> Result<(), LessonSessionError> {
        self.flow.select_answer(index, option)?;
        Ok(())
    }

    pub fn submit_quiz(&mut self) -> QuizEvaluation {
        self.flow.submit_quiz()
    }

    /// Check practice text; a pass records completion exactly once.
    pub fn check_practice(
        &mut self,
        input: &str,
        progress: &mut LessonProgressService,
    ) -> CheckOutcome {
        let outcome = self.flow.check_practice(input);
        if outcome == CheckOutcome::Passed && progress.mark_completed(&self.track, &self.lesson.id)
        {
            info!(track = %self.track, lesson = %self.lesson.id, "lesson completed");
        }
        outcome
    }
}
