//! ReAct文本协议 - 配置、单步记录与模型输出解析

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

pub const FINAL_ANSWER: &str = "Final Answer:";
pub const ITERATION_LIMIT_MESSAGE: &str = "Agent stopped due to iteration limit.";

static ACTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)Action\s*\d*\s*:[\s]*(.*?)[\s]*Action\s*\d*\s*Input\s*\d*\s*:[\s]*(.*)")
        .expect("action pattern is valid")
});
static OBSERVATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*Observation:").expect("observation pattern is valid")
});

/// ReAct配置
#[derive(Debug, Clone)]
pub struct ReActConfig {
    /// 最大迭代次数，每次迭代最多调用一次工具
    pub max_iterations: usize,
}

impl ReActConfig {
    pub fn new(max_iterations: usize) -> Self {
        Self { max_iterations }
    }
}

impl Default for ReActConfig {
    fn default() -> Self {
        Self::new(3)
    }
}

/// 模型在一次迭代中给出的决定
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentAction {
    ToolCall {
        thought: String,
        tool: String,
        input: String,
    },
    Finish {
        thought: String,
        answer: String,
    },
}

/// Agent执行记录中的一步
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentStep {
    pub thought: String,
    pub tool: String,
    pub tool_input: String,
    pub observation: String,
    /// 工具名无效时为false，此时未发生任何外部调用
    pub tool_invoked: bool,
}

/// ReAct响应
#[derive(Debug, Clone, Serialize)]
pub struct ReActResponse {
    /// 最终回答内容
    pub content: String,
    /// 实际使用的迭代次数
    pub iterations_used: usize,
    /// 是否因达到最大迭代次数而停止
    pub stopped_by_max_iterations: bool,
    /// 执行过程中的每一步
    pub steps: Vec<AgentStep>,
}

impl ReActResponse {
    pub fn success(content: String, iterations_used: usize, steps: Vec<AgentStep>) -> Self {
        Self {
            content,
            iterations_used,
            stopped_by_max_iterations: false,
            steps,
        }
    }

    /// 达到上限时以最后一步的思考作为部分结果
    pub fn max_iterations_reached(max_iterations: usize, steps: Vec<AgentStep>) -> Self {
        let content = steps
            .iter()
            .rev()
            .map(|step| step.thought.trim())
            .find(|thought| !thought.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| ITERATION_LIMIT_MESSAGE.to_string());

        Self {
            content,
            iterations_used: max_iterations,
            stopped_by_max_iterations: true,
            steps,
        }
    }

    /// 实际发生的工具调用次数
    pub fn tool_invocations(&self) -> usize {
        self.steps.iter().filter(|step| step.tool_invoked).count()
    }

    /// 工具调用记录，形如`Web Search(query)`
    pub fn tool_calls_history(&self) -> Vec<String> {
        self.steps
            .iter()
            .filter(|step| step.tool_invoked)
            .map(|step| format!("{}({})", step.tool, step.tool_input))
            .collect()
    }
}

/// 解析模型的单次输出
///
/// 模型可能替工具编造以`Observation:`开头的行，该行及之后的内容全部丢弃。
/// 剩余文本中出现`Final Answer:`即视为结束；否则取第一个动作，`Action Input`
/// 只取一行。既没有动作也没有最终回答的输出按最终回答处理。
pub fn parse_agent_output(output: &str) -> AgentAction {
    let text = match OBSERVATION_RE.find(output) {
        Some(m) => &output[..m.start()],
        None => output,
    };

    if let Some(idx) = text.find(FINAL_ANSWER) {
        return AgentAction::Finish {
            thought: clean_thought(&text[..idx]),
            answer: text[idx + FINAL_ANSWER.len()..].trim().to_string(),
        };
    }

    if let Some(caps) = ACTION_RE.captures(text) {
        let start = caps.get(0).map_or(0, |m| m.start());
        let tool = caps.get(1).map_or("", |m| m.as_str()).trim().to_string();
        let input = caps
            .get(2)
            .map_or("", |m| m.as_str())
            .lines()
            .next()
            .unwrap_or("")
            .trim()
            .trim_matches('"')
            .to_string();
        return AgentAction::ToolCall {
            thought: clean_thought(&text[..start]),
            tool,
            input,
        };
    }

    AgentAction::Finish {
        thought: String::new(),
        answer: text.trim().to_string(),
    }
}

fn clean_thought(text: &str) -> String {
    let text = text.trim();
    text.strip_prefix("Thought:").unwrap_or(text).trim().to_string()
}
