//! 各阶段提示词

use crate::error::StoryError;
use crate::types::StoryRecord;
use crate::utils::PromptTemplate;

pub const IDEA_SLOT: &str = "idea";
pub const FINDINGS_SLOT: &str = "findings";

const STORY_WRITER_TEMPLATE: &str = "You are a friendly story writing assistant who knows the world's literature and pop culture. Help the user with their story writing based on their idea. Query: {idea}";

const QUESTION_GENERATION_TEMPLATE: &str = "You are a literary research assistant. A writer shared the story idea below. Write 3 to 5 precise search questions that would uncover existing novels, short stories, films or games with a similar premise. Return only the questions, one per line.

Story idea: {idea}";

/// 单阶段：故事写作助手
pub fn story_writer() -> Result<PromptTemplate, StoryError> {
    PromptTemplate::new(STORY_WRITER_TEMPLATE, &[IDEA_SLOT])
}

/// 三阶段之一：把创意转成检索问题
pub fn question_generation() -> Result<PromptTemplate, StoryError> {
    PromptTemplate::new(QUESTION_GENERATION_TEMPLATE, &[IDEA_SLOT])
}

/// 三阶段之三：把Agent的原始调研结果整理为故事列表
pub fn synthesis() -> Result<PromptTemplate, StoryError> {
    let template = format!(
        "You are an editor preparing a reading list for a writer. Below are raw research notes about existing stories that resemble the writer's idea.

Research notes:
{{{slot}}}

Restructure the notes into a numbered list of stories. Give every story these fields:
{fields}

Similarity Score is a number from 1 to 10 describing how close the story is to the idea. Only include stories that appear in the notes.",
        slot = FINDINGS_SLOT,
        fields = StoryRecord::outline()
    );
    PromptTemplate::new(&template, &[FINDINGS_SLOT])
}
