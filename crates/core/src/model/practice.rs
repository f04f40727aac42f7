use serde::{Deserialize, Serialize};

/// Minimum trimmed length (in characters) of a practice submission.
pub const PRACTICE_MIN_CHARS: usize = 250;

/// What a practice submission must contain to be accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeRequirement {
    min_chars: usize,
    required: Vec<String>,
}

impl Default for PracticeRequirement {
    fn default() -> Self {
        Self {
            min_chars: PRACTICE_MIN_CHARS,
            required: Vec::new(),
        }
    }
}

/// Why a practice submission was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PracticeFailure {
    TooShort { length: usize, minimum: usize },
    MissingContent { missing: Vec<String> },
}

impl PracticeFailure {
    #[must_use]
    pub fn reason(&self) -> String {
        match self {
            Self::TooShort { length, minimum } => format!(
                "Your practice is {length} characters long; write at least {minimum} characters before checking."
            ),
            Self::MissingContent { missing } => {
                format!("Your practice is missing: {}.", missing.join(", "))
            }
        }
    }
}

impl PracticeRequirement {
    #[must_use]
    pub fn new<I, S>(required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            min_chars: PRACTICE_MIN_CHARS,
            required: required.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn with_min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars = min_chars;
        self
    }

    #[must_use]
    pub fn min_chars(&self) -> usize {
        self.min_chars
    }

    #[must_use]
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Length first, then case-insensitive required substrings.
    ///
    /// # Errors
    ///
    /// Returns the first failing check as a `PracticeFailure`.
    pub fn check(&self, input: &str) -> Result<(), PracticeFailure> {
        let trimmed = input.trim();
        let length = trimmed.chars().count();
        if length < self.min_chars {
            return Err(PracticeFailure::TooShort {
                length,
                minimum: self.min_chars,
            });
        }

        let haystack = trimmed.to_lowercase();
        let missing: Vec<String> = self
            .required
            .iter()
            .filter(|needle| !haystack.contains(&needle.to_lowercase()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(PracticeFailure::MissingContent { missing });
        }
        Ok(())
    }
}
