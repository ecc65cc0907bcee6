//! 提示词编排流水线
//!
//! 阶段按顺序执行，上一阶段的完整输出原样作为下一阶段的输入；任一阶段失败时
//! 后续阶段不再执行。

use anyhow::Result;

use crate::config::PipelineVariant;
use crate::generator::types::{PipelineOutput, StageNames};
use crate::generator::workflow::TimingScope;
use crate::llm::client::{CompletionModel, ReActConfig, ReActExecutor, ReActResponse};
use crate::llm::tools::Toolbox;
use crate::types::Idea;
use crate::utils::PromptTemplate;

pub mod prompts;

/// 阶段的执行方式
#[derive(Debug, Clone)]
pub enum StageKind {
    /// 单次补全请求
    Completion,
    /// 带工具的ReAct循环
    Agent {
        toolbox: Toolbox,
        max_iterations: usize,
    },
}

/// 一个"渲染提示词并调用模型"的步骤
#[derive(Debug, Clone)]
pub struct Stage {
    name: &'static str,
    template: Option<PromptTemplate>,
    kind: StageKind,
}

/// 单个阶段的输出
#[derive(Debug, Clone)]
pub struct StageOutput {
    pub text: String,
    pub agent: Option<ReActResponse>,
}

impl Stage {
    pub fn completion(name: &'static str, template: PromptTemplate) -> Self {
        Self {
            name,
            template: Some(template),
            kind: StageKind::Completion,
        }
    }

    /// `template`为空时，上一阶段的输出直接作为Agent的问题
    pub fn agent(
        name: &'static str,
        template: Option<PromptTemplate>,
        toolbox: Toolbox,
        max_iterations: usize,
    ) -> Self {
        Self {
            name,
            template,
            kind: StageKind::Agent {
                toolbox,
                max_iterations,
            },
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> &StageKind {
        &self.kind
    }

    /// 渲染本阶段实际发送的输入
    pub fn render_input(&self, input: &str) -> Result<String> {
        match &self.template {
            Some(template) => Ok(template.render_single(input)?),
            None => Ok(input.to_string()),
        }
    }

    pub async fn run(&self, model: &dyn CompletionModel, input: &str) -> Result<StageOutput> {
        let prompt = self.render_input(input)?;

        match &self.kind {
            StageKind::Completion => {
                let text = model.complete(&prompt).await?;
                Ok(StageOutput { text, agent: None })
            }
            StageKind::Agent {
                toolbox,
                max_iterations,
            } => {
                let config = ReActConfig::new(*max_iterations);
                let response = ReActExecutor::execute(model, toolbox, &prompt, &config).await?;
                Ok(StageOutput {
                    text: response.content.clone(),
                    agent: Some(response),
                })
            }
        }
    }
}

/// 有序的阶段列表
#[derive(Debug, Clone)]
pub struct Pipeline {
    variant: PipelineVariant,
    stages: Vec<Stage>,
}

impl Pipeline {
    /// 故事助手模板 + 单一搜索工具的Agent
    pub fn single_stage(toolbox: Toolbox, max_iterations: usize) -> Result<Self> {
        Ok(Self {
            variant: PipelineVariant::Single,
            stages: vec![Stage::agent(
                StageNames::STORY_WRITER,
                Some(prompts::story_writer()?),
                toolbox,
                max_iterations,
            )],
        })
    }

    /// 问题生成 -> 搜索/百科Agent -> 结构化整理
    pub fn three_stage(toolbox: Toolbox, max_iterations: usize) -> Result<Self> {
        Ok(Self {
            variant: PipelineVariant::ThreeStage,
            stages: vec![
                Stage::completion(
                    StageNames::QUESTION_GENERATION,
                    prompts::question_generation()?,
                ),
                Stage::agent(StageNames::RESEARCH_AGENT, None, toolbox, max_iterations),
                Stage::completion(StageNames::SYNTHESIS, prompts::synthesis()?),
            ],
        })
    }

    pub fn for_variant(
        variant: PipelineVariant,
        toolbox: Toolbox,
        max_iterations: usize,
    ) -> Result<Self> {
        match variant {
            PipelineVariant::Single => Self::single_stage(toolbox, max_iterations),
            PipelineVariant::ThreeStage => Self::three_stage(toolbox, max_iterations),
        }
    }

    pub fn variant(&self) -> PipelineVariant {
        self.variant
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// 依次执行所有阶段
    pub async fn run(&self, model: &dyn CompletionModel, idea: &Idea) -> Result<PipelineOutput> {
        let mut timing = TimingScope::new();
        let mut text = idea.as_str().to_string();
        let mut agent_response: Option<ReActResponse> = None;

        for stage in &self.stages {
            tracing::info!(stage = stage.name(), "🤖 执行阶段");
            timing.start_phase(stage.name());

            let output = stage.run(model, &text).await?;

            if let Some(duration) = timing.end_phase(stage.name()) {
                tracing::info!(
                    stage = stage.name(),
                    elapsed_ms = duration.as_millis() as u64,
                    "✓ 阶段完成"
                );
            }
            text = output.text;
            if output.agent.is_some() {
                agent_response = output.agent;
            }
        }

        tracing::debug!("{}", timing.generate_timing_report());

        Ok(PipelineOutput::new(
            self.variant,
            idea.clone(),
            text,
            agent_response.as_ref(),
            &timing,
        ))
    }
}
