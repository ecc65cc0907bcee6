use serde::Serialize;

use crate::error::StoryError;

/// 未提供创意时使用的占位文本
pub const DEFAULT_IDEA: &str = "Drop you ideas and I will find relevant story";

/// 用户输入的故事创意，只读
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Idea(String);

impl Idea {
    pub fn new(raw: impl Into<String>) -> Result<Self, StoryError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(StoryError::EmptyIdea);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Idea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
