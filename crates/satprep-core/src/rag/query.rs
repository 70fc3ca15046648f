//! Consumer-facing question requests

use crate::error::{Result, SatPrepError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Requested question difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Moderate,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Easy => "Easy",
            Self::Moderate => "Moderate",
            Self::Hard => "Hard",
        };
        f.write_str(s)
    }
}

impl FromStr for Difficulty {
    type Err = SatPrepError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "moderate" | "medium" => Ok(Self::Moderate),
            "hard" => Ok(Self::Hard),
            other => Err(SatPrepError::InvalidInput(format!(
                "unknown difficulty '{}' (expected easy, moderate or hard)",
                other
            ))),
        }
    }
}

/// Language the questions should be written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    Spanish,
    French,
    German,
    Other,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::English => "English",
            Self::Spanish => "Spanish",
            Self::French => "French",
            Self::German => "German",
            Self::Other => "Other",
        };
        f.write_str(s)
    }
}

impl FromStr for Language {
    type Err = SatPrepError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "english" | "en" => Ok(Self::English),
            "spanish" | "es" => Ok(Self::Spanish),
            "french" | "fr" => Ok(Self::French),
            "german" | "de" => Ok(Self::German),
            "other" => Ok(Self::Other),
            other => Err(SatPrepError::InvalidInput(format!(
                "unknown language '{}' (expected english, spanish, french, german or other)",
                other
            ))),
        }
    }
}

/// The four fields a user fills in to request questions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRequest {
    pub topic: String,
    pub difficulty: Difficulty,
    pub language: Language,
    pub instructions: String,
}

impl Default for QuestionRequest {
    fn default() -> Self {
        Self {
            topic: "algebraic inequalities".to_string(),
            difficulty: Difficulty::Moderate,
            language: Language::English,
            instructions: "Please include more word problems.".to_string(),
        }
    }
}

impl QuestionRequest {
    /// Merge the fields into the single query string used for retrieval
    /// and generation
    pub fn compose(&self) -> String {
        format!(
            "Topic: {}\nDifficulty Level: {}\nLanguage: {}\nAdditional Instructions: {}\nPlease generate the questions.",
            self.topic, self.difficulty, self.language, self.instructions
        )
    }
}
