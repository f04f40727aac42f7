mod ids;
pub mod lesson;
mod plan;
mod practice;
mod progress;
mod quiz;
mod study;

pub use ids::{ClassId, LessonId, OptionId, ParseIdError, TrackId, UserId};

pub use lesson::{Lesson, LessonAssessment, LessonCatalog, Section, Track};
pub use plan::{
    ArcDayRange, ArcPlacement, CurriculumError, STUDY_ENGINE_VERSION, StudyArc, StudyPlan,
    StudyPlanDraft, WEB_AWAKENING_CLASS_ID, WEB_AWAKENING_PLANNED_DAYS,
};
pub use practice::{PRACTICE_MIN_CHARS, PracticeFailure, PracticeRequirement};
pub use progress::{LessonProgress, TrackSummary};
pub use quiz::{QuestionResult, QuizConfig, QuizError, QuizEvaluation, QuizOption, QuizQuestion};
pub use study::{StudyEngineSnapshot, StudyEngineState, TodayArc};
