#![forbid(unsafe_code)]

pub mod engine;
pub mod error;
pub mod lesson_flow;
pub mod model;
pub mod narrative;
pub mod time;

pub use engine::StudyEngine;
pub use error::Error;
pub use lesson_flow::{CheckOutcome, LessonFlow, LessonPhase};
pub use time::Clock;
