//! Generation kinds and their fixed prompt profiles
//!
//! Each kind carries its own system instruction, user prompt template,
//! temperature and token budget. Callers choose the kind and supply the
//! material; the tuning knobs are not caller-supplied.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What the generative model is asked to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationKind {
    /// Plain-language explanation of study material
    Explanation,
    /// Answer to a question grounded in the material
    Answer,
    /// Practical examples on a topic from the material
    Examples,
}

/// Fixed tuning for one [`GenerationKind`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationProfile {
    pub system_instruction: &'static str,
    pub temperature: f32,
    pub max_tokens: u32,
}

const EXPLANATION_PROFILE: GenerationProfile = GenerationProfile {
    system_instruction: "You are a tutor who helps students understand difficult study material. \
                         Explain clearly, in a structured way, and with examples.",
    temperature: 0.6,
    max_tokens: 2000,
};

const ANSWER_PROFILE: GenerationProfile = GenerationProfile {
    system_instruction: "You are a study material assistant. Answer questions precisely, \
                         relying only on the information provided.",
    temperature: 0.3,
    max_tokens: 1500,
};

const EXAMPLES_PROFILE: GenerationProfile = GenerationProfile {
    system_instruction: "You are an experienced teacher. Create practical examples that help \
                         students understand and remember the material.",
    temperature: 0.7,
    max_tokens: 1500,
};

/// Instruction used by [`GenerationRequest::explanation`] when none is given.
pub const DEFAULT_EXPLANATION_INSTRUCTION: &str = "Explain this study material in simple words";

impl GenerationKind {
    pub const fn profile(self) -> GenerationProfile {
        match self {
            Self::Explanation => EXPLANATION_PROFILE,
            Self::Answer => ANSWER_PROFILE,
            Self::Examples => EXAMPLES_PROFILE,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Explanation => "explanation",
            Self::Answer => "answer",
            Self::Examples => "examples",
        }
    }
}

impl fmt::Display for GenerationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single generation call: the material plus the kind-specific directive
/// (instruction, question or topic).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub kind: GenerationKind,
    pub content: String,
    pub directive: String,
}

impl GenerationRequest {
    pub fn explanation(content: impl Into<String>, instruction: Option<&str>) -> Self {
        Self {
            kind: GenerationKind::Explanation,
            content: content.into(),
            directive: instruction.unwrap_or(DEFAULT_EXPLANATION_INSTRUCTION).to_string(),
        }
    }

    pub fn answer(content: impl Into<String>, question: impl Into<String>) -> Self {
        Self { kind: GenerationKind::Answer, content: content.into(), directive: question.into() }
    }

    pub fn examples(content: impl Into<String>, topic: impl Into<String>) -> Self {
        Self { kind: GenerationKind::Examples, content: content.into(), directive: topic.into() }
    }

    pub fn profile(&self) -> GenerationProfile {
        self.kind.profile()
    }

    /// Render the user message from the kind's fixed template.
    pub fn user_message(&self) -> String {
        match self.kind {
            GenerationKind::Explanation => format!("{}:\n\n{}", self.directive, self.content),
            GenerationKind::Answer => format!(
                "Answer the question based on this study material:\n\nMaterial: {}\n\nQuestion: {}",
                self.content, self.directive
            ),
            GenerationKind::Examples => format!(
                "Generate practical examples on the topic based on the study material:\n\n\
                 Material: {}\n\nTopic: {}",
                self.content, self.directive
            ),
        }
    }
}
