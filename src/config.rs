use crate::error::ExchangeError;
use crate::mode::Mode;

pub const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const IMAGE_GENERATIONS_URL: &str = "https://api.openai.com/v1/images/generations";

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Where the bearer token comes from.
///
/// `Env` consults the process environment on every call, so rotating
/// the key takes effect on the next request without a restart. `Fixed`
/// injects a literal token, which keeps tests deterministic.
#[derive(Debug, Clone)]
pub enum Credential {
    Env(String),
    Fixed(String),
}

impl Credential {
    /// Resolve the token. Presence is the only validation; an empty
    /// value counts as absent.
    pub fn bearer(&self) -> Result<String, ExchangeError> {
        let (token, source) = match self {
            Credential::Env(var) => (std::env::var(var).unwrap_or_default(), var.as_str()),
            Credential::Fixed(token) => (token.clone(), "API credential"),
        };
        if token.is_empty() {
            return Err(ExchangeError::MissingCredential(source.to_string()));
        }
        Ok(token)
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub credential: Credential,
    pub chat_url: String,
    pub image_url: String,
}

impl ApiConfig {
    /// Standard configuration: OpenAI endpoints, key from the environment.
    pub fn from_env() -> Self {
        Self {
            credential: Credential::Env(API_KEY_VAR.to_string()),
            chat_url: CHAT_COMPLETIONS_URL.to_string(),
            image_url: IMAGE_GENERATIONS_URL.to_string(),
        }
    }

    pub fn endpoint(&self, mode: Mode) -> &str {
        match mode {
            Mode::Chat => &self.chat_url,
            Mode::ImageGeneration => &self.image_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_selection_follows_mode() {
        let config = ApiConfig::from_env();
        assert_eq!(config.endpoint(Mode::Chat), CHAT_COMPLETIONS_URL);
        assert_eq!(config.endpoint(Mode::ImageGeneration), IMAGE_GENERATIONS_URL);
    }

    #[test]
    fn fixed_credential_resolves() {
        let credential = Credential::Fixed("sk-test".to_string());
        assert_eq!(credential.bearer().unwrap(), "sk-test");
    }

    #[test]
    fn empty_fixed_credential_is_missing() {
        let credential = Credential::Fixed(String::new());
        assert!(matches!(
            credential.bearer(),
            Err(ExchangeError::MissingCredential(_))
        ));
    }

    #[test]
    fn unset_env_credential_is_missing() {
        let credential = Credential::Env("GPT_ASSISTANT_TEST_KEY_UNSET".to_string());
        let err = credential.bearer().unwrap_err();
        assert_eq!(
            err,
            ExchangeError::MissingCredential("GPT_ASSISTANT_TEST_KEY_UNSET".to_string())
        );
    }

    #[test]
    fn env_credential_reads_fresh_value_each_call() {
        const VAR: &str = "GPT_ASSISTANT_TEST_KEY_ROTATED";
        let credential = Credential::Env(VAR.to_string());

        std::env::set_var(VAR, "first");
        assert_eq!(credential.bearer().unwrap(), "first");

        std::env::set_var(VAR, "second");
        assert_eq!(credential.bearer().unwrap(), "second");

        std::env::remove_var(VAR);
        assert!(credential.bearer().is_err());
    }
}
