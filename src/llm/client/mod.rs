//! LLM客户端 - 提供统一的LLM服务接口

use anyhow::Result;
use async_trait::async_trait;

use crate::{config::LLMConfig, types::Credential};

mod providers;
mod react;
mod react_executor;

pub use react::{AgentAction, AgentStep, ReActConfig, ReActResponse, parse_agent_output};
pub use react_executor::ReActExecutor;

use providers::ProviderClient;

/// 文本补全服务
///
/// 编排层只通过这个接口访问模型：输入一段完整提示词，返回模型的文本输出。
/// 远程错误原样向上传播，不做重试。
#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// LLM客户端，每次提交单独创建
#[derive(Clone)]
pub struct LLMClient {
    config: LLMConfig,
    client: ProviderClient,
}

impl LLMClient {
    /// 创建新的LLM客户端
    pub fn new(config: &LLMConfig, credential: &Credential) -> Result<Self> {
        let client = ProviderClient::new(config, credential.expose())?;
        Ok(Self {
            config: config.clone(),
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl CompletionModel for LLMClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let agent = self.client.create_agent(&self.config.model, &self.config);

        tracing::debug!(
            provider = %self.config.provider,
            model = %self.config.model,
            prompt_chars = prompt.chars().count(),
            "发送补全请求"
        );
        let response = agent.prompt(prompt).await?;
        tracing::debug!(response_chars = response.chars().count(), "收到补全结果");

        Ok(response)
    }
}
