use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::PipelineVariant;
use crate::generator::workflow::TimingScope;
use crate::llm::client::ReActResponse;
use crate::types::Idea;

/// 阶段名称常量
pub struct StageNames;

impl StageNames {
    pub const STORY_WRITER: &'static str = "story_writer";
    pub const QUESTION_GENERATION: &'static str = "question_generation";
    pub const RESEARCH_AGENT: &'static str = "research_agent";
    pub const SYNTHESIS: &'static str = "synthesis";
}

/// 单个阶段的耗时
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageTiming {
    pub stage: String,
    pub duration_ms: u64,
}

/// 一次提交的最终结果
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub variant: PipelineVariant,
    pub idea: Idea,
    /// 最后一个阶段的输出文本，未做任何解析
    pub content: String,
    pub agent_iterations: usize,
    pub stopped_by_max_iterations: bool,
    pub tool_calls: Vec<String>,
    pub stage_timings: Vec<StageTiming>,
    pub generated_at: DateTime<Utc>,
}

impl PipelineOutput {
    pub fn new(
        variant: PipelineVariant,
        idea: Idea,
        content: String,
        agent: Option<&ReActResponse>,
        timing: &TimingScope,
    ) -> Self {
        let stage_timings = timing
            .get_phase_durations()
            .iter()
            .map(|(stage, duration)| StageTiming {
                stage: stage.clone(),
                duration_ms: duration.as_millis() as u64,
            })
            .collect();

        Self {
            variant,
            idea,
            content,
            agent_iterations: agent.map_or(0, |r| r.iterations_used),
            stopped_by_max_iterations: agent.is_some_and(|r| r.stopped_by_max_iterations),
            tool_calls: agent.map(|r| r.tool_calls_history()).unwrap_or_default(),
            stage_timings,
            generated_at: Utc::now(),
        }
    }
}
