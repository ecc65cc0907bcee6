use crate::config::{Config, DEFAULT_CONFIG_FILE, LLMProvider, PipelineVariant};
use crate::types::DEFAULT_IDEA;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// story-explore - 根据故事创意查找相似的已有作品
#[derive(Parser, Debug)]
#[command(name = "story-explore")]
#[command(
    about = "Turns a story idea into a list of related existing stories, using an LLM agent with web search and encyclopedic lookup."
)]
#[command(version)]
pub struct Args {
    /// 故事创意
    #[arg(default_value = DEFAULT_IDEA)]
    pub idea: String,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// LLM API KEY
    #[arg(short = 'k', long)]
    pub api_key: Option<String>,

    /// 流水线类型 (single, three-stage)
    #[arg(long)]
    pub variant: Option<String>,

    /// LLM Provider (openai, anthropic, deepseek, ollama)
    #[arg(long)]
    pub llm_provider: Option<String>,

    /// LLM API基地址
    #[arg(long)]
    pub llm_api_base_url: Option<String>,

    /// 模型名称
    #[arg(short, long)]
    pub model: Option<String>,

    /// 最大tokens数
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// 温度参数
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Agent最大迭代次数，覆盖当前流水线类型的默认值
    #[arg(long)]
    pub max_iterations: Option<usize>,

    /// 交互模式，每行输入作为一次独立提交
    #[arg(short, long)]
    pub interactive: bool,

    /// 以JSON输出完整结果
    #[arg(long)]
    pub json: bool,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// 将CLI参数转换为配置
    ///
    /// 显式指定的配置文件读取失败时返回错误；未指定时尝试当前目录下的默认配置文件。
    pub fn to_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(config_path) => Config::from_file(config_path)?,
            None => {
                let default_config_path = std::env::current_dir()
                    .unwrap_or_else(|_| PathBuf::from("."))
                    .join(DEFAULT_CONFIG_FILE);

                if default_config_path.exists() {
                    Config::from_file(&default_config_path)?
                } else {
                    Config::default()
                }
            }
        };

        self.apply_overrides(&mut config);
        Ok(config)
    }

    /// 用命令行参数覆盖配置文件中的设置
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(variant_str) = &self.variant {
            match variant_str.parse::<PipelineVariant>() {
                Ok(variant) => config.variant = variant,
                Err(_) => tracing::warn!(
                    variant = %variant_str,
                    "⚠️ 未知的流水线类型，使用 {}",
                    config.variant
                ),
            }
        }

        if let Some(provider_str) = &self.llm_provider {
            match provider_str.parse::<LLMProvider>() {
                Ok(provider) => config.llm.provider = provider,
                Err(_) => tracing::warn!(
                    provider = %provider_str,
                    "⚠️ 未知的provider，使用 {}",
                    config.llm.provider
                ),
            }
        }
        if let Some(api_key) = &self.api_key {
            config.llm.api_key = api_key.clone();
        }
        if let Some(api_base_url) = &self.llm_api_base_url {
            config.llm.api_base_url = api_base_url.clone();
        }
        if let Some(model) = &self.model {
            config.llm.model = model.clone();
        }
        if let Some(max_tokens) = self.max_tokens {
            config.llm.max_tokens = max_tokens;
        }
        if let Some(temperature) = self.temperature {
            config.llm.temperature = temperature;
        }

        // 迭代上限跟随最终确定的流水线类型
        match self.max_iterations {
            Some(0) => tracing::warn!("⚠️ max-iterations 必须大于0，保留配置值"),
            Some(max_iterations) => config.set_max_iterations(max_iterations),
            None => {}
        }

        if self.verbose {
            config.verbose = true;
        }
    }
}
