use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// 默认配置文件名，存在于当前工作目录时自动加载
pub const DEFAULT_CONFIG_FILE: &str = "story-explore.toml";

/// LLM Provider类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum LLMProvider {
    #[serde(rename = "openai")]
    #[default]
    OpenAI,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "ollama")]
    Ollama,
}

impl LLMProvider {
    /// 密钥必须携带的前缀；本地模型不需要密钥
    pub fn credential_prefix(&self) -> Option<&'static str> {
        match self {
            LLMProvider::OpenAI | LLMProvider::Anthropic | LLMProvider::DeepSeek => Some("sk-"),
            LLMProvider::Ollama => None,
        }
    }
}

impl LLMProvider {
    /// 面向用户的名称
    pub fn display_name(&self) -> &'static str {
        match self {
            LLMProvider::OpenAI => "OpenAI",
            LLMProvider::Anthropic => "Anthropic",
            LLMProvider::DeepSeek => "DeepSeek",
            LLMProvider::Ollama => "Ollama",
        }
    }
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::DeepSeek => write!(f, "deepseek"),
            LLMProvider::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(LLMProvider::OpenAI),
            "anthropic" => Ok(LLMProvider::Anthropic),
            "deepseek" => Ok(LLMProvider::DeepSeek),
            "ollama" => Ok(LLMProvider::Ollama),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// 流水线形态
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineVariant {
    /// 单阶段：故事助手模板 + 网页搜索Agent
    #[serde(rename = "single")]
    #[default]
    Single,
    /// 三阶段：问题生成 -> 搜索/百科Agent -> 结构化整理
    #[serde(rename = "three-stage")]
    ThreeStage,
}

impl std::fmt::Display for PipelineVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineVariant::Single => write!(f, "single"),
            PipelineVariant::ThreeStage => write!(f, "three-stage"),
        }
    }
}

impl std::str::FromStr for PipelineVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" | "single-stage" | "1" => Ok(PipelineVariant::Single),
            "three-stage" | "three" | "3" => Ok(PipelineVariant::ThreeStage),
            _ => Err(format!("Unknown pipeline variant: {}", s)),
        }
    }
}

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// 流水线形态
    pub variant: PipelineVariant,

    /// 是否启用详细日志
    pub verbose: bool,

    /// LLM模型配置
    pub llm: LLMConfig,

    /// Agent循环配置
    pub agent: AgentConfig,

    /// 搜索工具配置
    pub search: SearchConfig,
}

/// LLM模型配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LLMConfig {
    /// LLM Provider类型
    pub provider: LLMProvider,

    /// LLM API KEY，只接受交互式提供（命令行或配置文件）
    pub api_key: String,

    /// LLM API基地址
    pub api_base_url: String,

    /// 模型标识
    pub model: String,

    /// 最大输出tokens
    pub max_tokens: u32,

    /// 温度
    pub temperature: f64,
}

/// Agent循环配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct AgentConfig {
    /// 单阶段流水线的最大推理/工具调用轮次
    pub single_stage_max_iterations: usize,

    /// 三阶段流水线中Agent阶段的最大轮次
    pub three_stage_max_iterations: usize,
}

/// 搜索工具配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    /// DuckDuckGo HTML搜索入口
    pub web_search_url: String,

    /// 网页搜索返回的最大条目数
    pub max_web_results: usize,

    /// MediaWiki API地址
    pub wikipedia_api_url: String,

    /// 百科查询取前k个页面
    pub wikipedia_top_k: usize,

    /// 百科查询结果的最大字符数
    pub wikipedia_max_chars: usize,

    /// 外部请求使用的User-Agent
    pub user_agent: String,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    /// 检查无法由类型表达的约束
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.agent.single_stage_max_iterations > 0,
            "agent.single_stage_max_iterations must be greater than 0"
        );
        ensure!(
            self.agent.three_stage_max_iterations > 0,
            "agent.three_stage_max_iterations must be greater than 0"
        );
        Ok(())
    }

    /// 当前流水线形态对应的Agent迭代上限
    pub fn max_iterations(&self) -> usize {
        match self.variant {
            PipelineVariant::Single => self.agent.single_stage_max_iterations,
            PipelineVariant::ThreeStage => self.agent.three_stage_max_iterations,
        }
    }

    /// 覆盖当前流水线形态对应的Agent迭代上限
    pub fn set_max_iterations(&mut self, max_iterations: usize) {
        match self.variant {
            PipelineVariant::Single => self.agent.single_stage_max_iterations = max_iterations,
            PipelineVariant::ThreeStage => self.agent.three_stage_max_iterations = max_iterations,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            variant: PipelineVariant::default(),
            verbose: false,
            llm: LLMConfig::default(),
            agent: AgentConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::default(),
            api_key: String::new(),
            api_base_url: String::from("https://api.openai.com/v1"),
            model: String::from("gpt-4o-mini"),
            max_tokens: 1024,
            temperature: 0.8,
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            single_stage_max_iterations: 3,
            three_stage_max_iterations: 5,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            web_search_url: String::from("https://html.duckduckgo.com/html/"),
            max_web_results: 5,
            wikipedia_api_url: String::from("https://en.wikipedia.org/w/api.php"),
            wikipedia_top_k: 3,
            wikipedia_max_chars: 4000,
            user_agent: format!("story-explore/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
