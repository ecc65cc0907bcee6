//! ReAct执行器 - 负责执行ReAct模式的多轮推理与工具调用

use anyhow::Result;

use super::CompletionModel;
use super::react::{AgentAction, AgentStep, ReActConfig, ReActResponse};
use crate::llm::tools::Toolbox;
use crate::utils::PromptTemplate;

const AGENT_TEMPLATE: &str = "Answer the question below as well as you can. You can use these tools:

{tools}

Respond using this format:

Question: the question you must answer
Thought: think about what to do next
Action: the tool to use, exactly one of [{tool_names}]
Action Input: the query to send to the tool
Observation: the tool result
... (Thought/Action/Action Input/Observation may repeat)
Thought: I now know the final answer
Final Answer: the final answer to the original question

Begin!

Question: {input}
Thought:{scratchpad}";

/// ReAct执行器
pub struct ReActExecutor;

impl ReActExecutor {
    /// 执行ReAct循环逻辑
    ///
    /// 每次迭代发出一次补全请求，最多调用一次工具。模型与工具的错误直接返回。
    pub async fn execute(
        model: &dyn CompletionModel,
        toolbox: &Toolbox,
        input: &str,
        config: &ReActConfig,
    ) -> Result<ReActResponse> {
        tracing::info!(
            max_iterations = config.max_iterations,
            tools = ?toolbox,
            "♻️ 激活ReAct Agent模式"
        );

        let template = PromptTemplate::new(
            AGENT_TEMPLATE,
            &["tools", "tool_names", "input", "scratchpad"],
        )?;
        let tools = toolbox.describe();
        let tool_names = toolbox.names().join(", ");
        let mut steps: Vec<AgentStep> = Vec::new();

        for iteration in 1..=config.max_iterations {
            let scratchpad = Self::build_scratchpad(&steps);
            let prompt = template.render(&[
                ("tools", tools.as_str()),
                ("tool_names", tool_names.as_str()),
                ("input", input),
                ("scratchpad", scratchpad.as_str()),
            ])?;

            let output = model.complete(&prompt).await?;

            match super::react::parse_agent_output(&output) {
                AgentAction::Finish { answer, .. } => {
                    tracing::info!(iteration, "✅ ReAct Agent任务完成");
                    return Ok(ReActResponse::success(answer, iteration, steps));
                }
                AgentAction::ToolCall {
                    thought,
                    tool,
                    input: tool_input,
                } => {
                    tracing::debug!(iteration, %tool, %tool_input, "Agent选择工具");

                    let (observation, tool_invoked) = match toolbox.get(&tool) {
                        Some(search_tool) => (search_tool.run(&tool_input).await?, true),
                        None => (
                            format!(
                                "{} is not a valid tool, try one of [{}].",
                                tool, tool_names
                            ),
                            false,
                        ),
                    };

                    steps.push(AgentStep {
                        thought,
                        tool,
                        tool_input,
                        observation,
                        tool_invoked,
                    });
                }
            }
        }

        tracing::warn!(
            max_iterations = config.max_iterations,
            "⚠️ 达到最大迭代次数，返回部分结果"
        );
        Ok(ReActResponse::max_iterations_reached(
            config.max_iterations,
            steps,
        ))
    }

    /// 将已完成的步骤拼接为提示词中的推理草稿
    fn build_scratchpad(steps: &[AgentStep]) -> String {
        let mut scratchpad = String::new();
        for step in steps {
            if !step.thought.is_empty() {
                scratchpad.push(' ');
                scratchpad.push_str(&step.thought);
            }
            scratchpad.push_str(&format!(
                "\nAction: {}\nAction Input: {}\nObservation: {}\nThought:",
                step.tool, step.tool_input, step.observation
            ));
        }
        scratchpad
    }
}
