use std::sync::Arc;

use anyhow::Result;

use crate::config::{Config, PipelineVariant};
use crate::error::StoryError;
use crate::generator::pipeline::Pipeline;
use crate::llm::client::LLMClient;
use crate::llm::tools::{Toolbox, WebSearchTool, WikipediaTool};
use crate::types::{Credential, Idea};

/// 单次提交的上下文
///
/// 每次提交都从头创建，客户端、工具和流水线均由它派生，提交之间不共享任何状态。
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// 配置
    pub config: Config,
    /// 已校验的密钥
    pub credential: Credential,
    /// 用户创意
    pub idea: Idea,
}

impl RequestContext {
    /// 先校验密钥，再校验创意文本；均为本地检查
    pub fn new(config: Config, raw_idea: &str) -> Result<Self, StoryError> {
        let credential = Credential::parse(&config.llm.provider, &config.llm.api_key)?;
        let idea = Idea::new(raw_idea)?;

        Ok(Self {
            config,
            credential,
            idea,
        })
    }

    pub fn build_client(&self) -> Result<LLMClient> {
        LLMClient::new(&self.config.llm, &self.credential)
    }

    /// 单阶段只声明网页搜索，三阶段额外声明百科查询
    pub fn build_toolbox(&self) -> Result<Toolbox> {
        let search = &self.config.search;
        let toolbox = Toolbox::new().with_tool(Arc::new(WebSearchTool::new(search)?));

        match self.config.variant {
            PipelineVariant::Single => Ok(toolbox),
            PipelineVariant::ThreeStage => {
                Ok(toolbox.with_tool(Arc::new(WikipediaTool::new(search)?)))
            }
        }
    }

    pub fn build_pipeline(&self) -> Result<Pipeline> {
        Pipeline::for_variant(
            self.config.variant,
            self.build_toolbox()?,
            self.config.max_iterations(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::pipeline::StageKind;

    fn config_with_key(key: &str) -> Config {
        let mut config = Config::default();
        config.llm.api_key = key.to_string();
        config
    }

    #[test]
    fn test_rejects_bad_credential_before_idea() {
        let err = RequestContext::new(config_with_key("not-a-key"), "").unwrap_err();
        assert!(err.is_credential_error());
    }

    #[test]
    fn test_rejects_empty_idea() {
        let err = RequestContext::new(config_with_key("sk-test"), "   ").unwrap_err();
        assert_eq!(err, StoryError::EmptyIdea);
    }

    #[test]
    fn test_single_stage_declares_web_search_only() {
        let context =
            RequestContext::new(config_with_key("sk-test"), "a detective who forgets faces")
                .unwrap();
        let toolbox = context.build_toolbox().unwrap();
        assert_eq!(toolbox.names(), vec!["Web Search"]);

        let pipeline = context.build_pipeline().unwrap();
        assert_eq!(pipeline.variant(), PipelineVariant::Single);
        assert_eq!(pipeline.stages().len(), 1);
        match pipeline.stages()[0].kind() {
            StageKind::Agent { max_iterations, .. } => assert_eq!(*max_iterations, 3),
            other => panic!("unexpected stage {:?}", other),
        }
    }

    #[test]
    fn test_three_stage_declares_both_tools() {
        let mut config = config_with_key("sk-test");
        config.variant = PipelineVariant::ThreeStage;
        let context = RequestContext::new(config, "a detective who forgets faces").unwrap();

        let toolbox = context.build_toolbox().unwrap();
        assert_eq!(toolbox.names(), vec!["Web Search", "Wikipedia"]);

        let pipeline = context.build_pipeline().unwrap();
        assert_eq!(pipeline.stages().len(), 3);
        match pipeline.stages()[1].kind() {
            StageKind::Agent {
                toolbox,
                max_iterations,
            } => {
                assert_eq!(*max_iterations, 5);
                assert_eq!(toolbox.len(), 2);
            }
            other => panic!("unexpected stage {:?}", other),
        }
    }

    #[test]
    fn test_client_builds_without_network() {
        let context = RequestContext::new(config_with_key("sk-test"), "idea").unwrap();
        let client = context.build_client().unwrap();
        assert_eq!(client.model(), "gpt-4o-mini");
    }
}
