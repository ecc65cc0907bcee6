//! 模型服务密钥

use crate::config::LLMProvider;
use crate::error::StoryError;

/// 经过前缀校验的模型服务密钥
///
/// 校验完全在本地完成，校验失败时不会发出任何网络请求。
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    provider: String,
    secret: String,
}

impl Credential {
    /// 按provider的密钥前缀规则校验原始输入
    pub fn parse(provider: &LLMProvider, raw: &str) -> Result<Self, StoryError> {
        if let Some(prefix) = provider.credential_prefix() {
            if raw.is_empty() {
                return Err(StoryError::MissingCredential {
                    provider: provider.to_string(),
                });
            }
            if !raw.starts_with(prefix) {
                return Err(StoryError::InvalidCredential {
                    provider: provider.to_string(),
                    prefix,
                });
            }
        }

        Ok(Self {
            provider: provider.to_string(),
            secret: raw.to_string(),
        })
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// 取出原始密钥，仅在构建provider客户端时使用
    pub fn expose(&self) -> &str {
        &self.secret
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("provider", &self.provider)
            .field("secret", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_sk_prefix() {
        let credential = Credential::parse(&LLMProvider::OpenAI, "sk-abc123").unwrap();
        assert_eq!(credential.expose(), "sk-abc123");
        assert_eq!(credential.provider(), "openai");
    }

    #[test]
    fn test_rejects_missing_key() {
        let err = Credential::parse(&LLMProvider::OpenAI, "").unwrap_err();
        assert_eq!(
            err,
            StoryError::MissingCredential {
                provider: "openai".to_string()
            }
        );
    }

    #[test]
    fn test_rejects_wrong_prefix() {
        for raw in ["pk-abc", "SK-abc", " sk-abc", "sk", "abc-sk-"] {
            let err = Credential::parse(&LLMProvider::OpenAI, raw).unwrap_err();
            assert!(err.is_credential_error(), "{raw} should be rejected");
        }
    }

    #[test]
    fn test_check_is_repeatable() {
        let first = Credential::parse(&LLMProvider::DeepSeek, "bad-key");
        let second = Credential::parse(&LLMProvider::DeepSeek, "bad-key");
        assert_eq!(first, second);
    }

    #[test]
    fn test_local_provider_needs_no_key() {
        let credential = Credential::parse(&LLMProvider::Ollama, "").unwrap();
        assert_eq!(credential.expose(), "");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let credential = Credential::parse(&LLMProvider::OpenAI, "sk-secret").unwrap();
        let printed = format!("{:?}", credential);
        assert!(!printed.contains("sk-secret"));
        assert!(printed.contains("***"));
    }
}
