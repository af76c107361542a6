use std::env;
use std::str::FromStr;

const DEFAULT_LLM_HOST: &str = "https://api.openai.com";
const DEFAULT_LLM_MODEL: &str = "gpt-4o";
const DEFAULT_MAX_CODE_CHARS: usize = 8000;
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60 * 10;
// Inline images are base64 data URIs so the default axum limit of
// 2MB is too small for a couple of screenshots
const DEFAULT_MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub openai_api_hostname: String,
    // Left unset when the env var is missing so the server still
    // starts and the first help request reports the problem instead
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub max_code_chars: usize,
    pub llm_timeout_secs: u64,
    pub store_responses: bool,
    pub max_body_bytes: usize,
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

impl Default for AppConfig {
    fn default() -> Self {
        let openai_api_hostname =
            env::var("CLUE_LLM_HOST").unwrap_or_else(|_| DEFAULT_LLM_HOST.to_string());
        let openai_api_key = env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        let openai_model =
            env::var("CLUE_LLM_MODEL").unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_string());
        // A bound of zero would drop every snippet
        let max_code_chars = match env_or("CLUE_MAX_CODE_CHARS", DEFAULT_MAX_CODE_CHARS) {
            0 => DEFAULT_MAX_CODE_CHARS,
            n => n,
        };
        let llm_timeout_secs = env_or("CLUE_LLM_TIMEOUT_SECS", DEFAULT_LLM_TIMEOUT_SECS);
        let store_responses = env_or("CLUE_STORE_RESPONSES", true);
        let max_body_bytes = env_or("CLUE_MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES);

        Self {
            openai_api_hostname,
            openai_api_key,
            openai_model,
            max_code_chars,
            llm_timeout_secs,
            store_responses,
            max_body_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: &[&str] = &[
        "OPENAI_API_KEY",
        "CLUE_LLM_HOST",
        "CLUE_LLM_MODEL",
        "CLUE_MAX_CODE_CHARS",
        "CLUE_LLM_TIMEOUT_SECS",
        "CLUE_STORE_RESPONSES",
        "CLUE_MAX_BODY_BYTES",
    ];

    fn clear_env() {
        for key in KEYS {
            unsafe { env::remove_var(key) };
        }
    }

    #[test]
    #[serial]
    fn test_defaults_without_env() {
        clear_env();
        let config = AppConfig::default();
        assert_eq!(config.openai_api_hostname, "https://api.openai.com");
        assert_eq!(config.openai_api_key, None);
        assert_eq!(config.openai_model, "gpt-4o");
        assert_eq!(config.max_code_chars, 8000);
        assert_eq!(config.llm_timeout_secs, 600);
        assert!(config.store_responses);
        assert_eq!(config.max_body_bytes, 20 * 1024 * 1024);
    }

    #[test]
    #[serial]
    fn test_reads_env_overrides() {
        clear_env();
        unsafe {
            env::set_var("OPENAI_API_KEY", "sk-test");
            env::set_var("CLUE_LLM_HOST", "http://localhost:8080");
            env::set_var("CLUE_LLM_MODEL", "gpt-4.1-mini");
            env::set_var("CLUE_MAX_CODE_CHARS", "100");
            env::set_var("CLUE_STORE_RESPONSES", "false");
        }
        let config = AppConfig::default();
        clear_env();

        assert_eq!(config.openai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.openai_api_hostname, "http://localhost:8080");
        assert_eq!(config.openai_model, "gpt-4.1-mini");
        assert_eq!(config.max_code_chars, 100);
        assert!(!config.store_responses);
    }

    #[test]
    #[serial]
    fn test_blank_key_and_bad_numbers_fall_back() {
        clear_env();
        unsafe {
            env::set_var("OPENAI_API_KEY", "   ");
            env::set_var("CLUE_MAX_CODE_CHARS", "lots");
        }
        let config = AppConfig::default();
        clear_env();

        assert_eq!(config.openai_api_key, None);
        assert_eq!(config.max_code_chars, 8000);
    }

    #[test]
    #[serial]
    fn test_zero_code_bound_uses_default() {
        clear_env();
        unsafe { env::set_var("CLUE_MAX_CODE_CHARS", "0") };
        let config = AppConfig::default();
        clear_env();

        assert_eq!(config.max_code_chars, 8000);
    }
}
