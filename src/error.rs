use thiserror::Error;

use crate::config::LLMProvider;

/// 本地校验类错误，在发起任何远程请求之前产生
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoryError {
    #[error("missing API key for provider `{provider}`")]
    MissingCredential { provider: String },

    #[error("API key for provider `{provider}` must start with `{prefix}`")]
    InvalidCredential {
        provider: String,
        prefix: &'static str,
    },

    #[error("idea text is empty")]
    EmptyIdea,

    #[error("invalid prompt template: {0}")]
    InvalidTemplate(String),

    #[error("no value supplied for prompt slot `{0}`")]
    MissingSlot(String),

    #[error("prompt template has no slot named `{0}`")]
    UnknownSlot(String),
}

impl StoryError {
    /// 是否为密钥相关错误（需要提示用户重新输入）
    pub fn is_credential_error(&self) -> bool {
        matches!(
            self,
            StoryError::MissingCredential { .. } | StoryError::InvalidCredential { .. }
        )
    }

    /// 用户可以自行修正的错误对应的提示语；模板类错误属于程序缺陷，返回`None`
    pub fn user_warning(&self, provider: &LLMProvider) -> Option<String> {
        match self {
            StoryError::MissingCredential { .. } | StoryError::InvalidCredential { .. } => Some(
                format!("⚠ Please enter your {} API key!", provider.display_name()),
            ),
            StoryError::EmptyIdea => Some("⚠ Please enter a story idea!".to_string()),
            StoryError::InvalidTemplate(_)
            | StoryError::MissingSlot(_)
            | StoryError::UnknownSlot(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_errors_are_flagged() {
        let missing = StoryError::MissingCredential {
            provider: "openai".to_string(),
        };
        let invalid = StoryError::InvalidCredential {
            provider: "openai".to_string(),
            prefix: "sk-",
        };
        assert!(missing.is_credential_error());
        assert!(invalid.is_credential_error());
        assert!(!StoryError::EmptyIdea.is_credential_error());
    }

    #[test]
    fn test_user_warning_for_credentials() {
        let missing = StoryError::MissingCredential {
            provider: "openai".to_string(),
        };
        assert_eq!(
            missing.user_warning(&LLMProvider::OpenAI).as_deref(),
            Some("⚠ Please enter your OpenAI API key!")
        );

        let invalid = StoryError::InvalidCredential {
            provider: "deepseek".to_string(),
            prefix: "sk-",
        };
        assert_eq!(
            invalid.user_warning(&LLMProvider::DeepSeek).as_deref(),
            Some("⚠ Please enter your DeepSeek API key!")
        );
    }

    #[test]
    fn test_user_warning_only_for_user_errors() {
        let provider = LLMProvider::OpenAI;
        assert!(StoryError::EmptyIdea.user_warning(&provider).is_some());
        assert!(
            StoryError::InvalidTemplate("unclosed".to_string())
                .user_warning(&provider)
                .is_none()
        );
        assert!(
            StoryError::MissingSlot("idea".to_string())
                .user_warning(&provider)
                .is_none()
        );
        assert!(
            StoryError::UnknownSlot("x".to_string())
                .user_warning(&provider)
                .is_none()
        );
    }

    #[test]
    fn test_error_messages() {
        let invalid = StoryError::InvalidCredential {
            provider: "openai".to_string(),
            prefix: "sk-",
        };
        assert_eq!(
            invalid.to_string(),
            "API key for provider `openai` must start with `sk-`"
        );
        assert_eq!(
            StoryError::MissingSlot("idea".to_string()).to_string(),
            "no value supplied for prompt slot `idea`"
        );
    }
}
