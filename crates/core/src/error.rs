use thiserror::Error;

use crate::model::{CurriculumError, QuizError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Curriculum(#[from] CurriculumError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
}
