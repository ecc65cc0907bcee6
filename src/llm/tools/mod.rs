//! Agent可用的外部检索工具

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub mod web_search;
pub mod wikipedia;

pub use web_search::WebSearchTool;
pub use wikipedia::WikipediaTool;

/// 文本进、文本出的检索工具
///
/// `name`与`description`会原样写入Agent提示词，供模型决定调用哪个工具。
#[async_trait]
pub trait SearchTool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    async fn run(&self, query: &str) -> Result<String>;
}

/// 一次运行中声明给Agent的工具集合，创建后不再修改
#[derive(Clone, Default)]
pub struct Toolbox {
    tools: Vec<Arc<dyn SearchTool>>,
}

impl Toolbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tool(mut self, tool: Arc<dyn SearchTool>) -> Self {
        self.tools.push(tool);
        self
    }

    /// 按名称查找工具，名称两端空白与大小写不敏感
    pub fn get(&self, name: &str) -> Option<&Arc<dyn SearchTool>> {
        let name = name.trim();
        self.tools
            .iter()
            .find(|tool| tool.name() == name)
            .or_else(|| {
                self.tools
                    .iter()
                    .find(|tool| tool.name().eq_ignore_ascii_case(name))
            })
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|tool| tool.name()).collect()
    }

    /// 每行一个`name: description`
    pub fn describe(&self) -> String {
        self.tools
            .iter()
            .map(|tool| format!("{}: {}", tool.name(), tool.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for Toolbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
