//! 单元测试用的模型与工具替身

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::llm::client::CompletionModel;
use crate::llm::tools::SearchTool;

/// 按脚本依次返回响应的模型，并记录收到的每个提示词
pub struct ScriptedModel {
    script: Mutex<VecDeque<Result<String, String>>>,
    fallback: Option<Result<String, String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: Mutex::new(responses.into_iter().map(|r| Ok(r.into())).collect()),
            fallback: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// 每次都返回同一响应
    pub fn repeating(response: &str) -> Self {
        Self {
            fallback: Some(Ok(response.to_string())),
            ..Self::new(Vec::<String>::new())
        }
    }

    /// 每次都失败
    pub fn failing(message: &str) -> Self {
        Self {
            fallback: Some(Err(message.to_string())),
            ..Self::new(Vec::<String>::new())
        }
    }

    /// 脚本用完之后的调用失败
    pub fn then_fail(mut self, message: &str) -> Self {
        self.fallback = Some(Err(message.to_string()));
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionModel for ScriptedModel {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        let next = self.script.lock().unwrap().pop_front();
        match next.or_else(|| self.fallback.clone()) {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Err(anyhow!("scripted model has no more responses")),
        }
    }
}

/// 返回固定文本并记录查询的工具
pub struct RecordingTool {
    name: String,
    response: String,
    queries: Mutex<Vec<String>>,
}

impl RecordingTool {
    pub fn new(name: &str, response: &str) -> Self {
        Self {
            name: name.to_string(),
            response: response.to_string(),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchTool for RecordingTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "returns canned text"
    }

    async fn run(&self, query: &str) -> Result<String> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok(self.response.clone())
    }
}

/// 总是失败的工具
pub struct FailingTool {
    name: String,
    message: String,
}

impl FailingTool {
    pub fn new(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl SearchTool for FailingTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "always fails"
    }

    async fn run(&self, _query: &str) -> Result<String> {
        Err(anyhow!(self.message.clone()))
    }
}
