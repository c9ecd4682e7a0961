use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    Claude,
    Codex,
    Gemini,
    /// Anthropic Messages API（HTTP）
    Api,
}

impl AiProvider {
    /// CLIで呼び出すプロバイダのコマンド名
    pub fn command_name(&self) -> Option<&'static str> {
        match self {
            AiProvider::Claude => Some("claude"),
            AiProvider::Codex => Some("codex"),
            AiProvider::Gemini => Some("gemini"),
            AiProvider::Api => None,
        }
    }

    /// プロンプトを渡すCLI引数
    pub fn cli_args(&self, prompt: &str) -> Vec<String> {
        match self {
            AiProvider::Claude => vec![
                "-p".into(),
                prompt.into(),
                "--output-format".into(),
                "text".into(),
            ],
            AiProvider::Codex => vec!["exec".into(), prompt.into()],
            AiProvider::Gemini => vec!["-p".into(), prompt.into()],
            AiProvider::Api => Vec::new(),
        }
    }
}

impl std::fmt::Display for AiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AiProvider::Claude => write!(f, "claude"),
            AiProvider::Codex => write!(f, "codex"),
            AiProvider::Gemini => write!(f, "gemini"),
            AiProvider::Api => write!(f, "api"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_args_embed_prompt() {
        let args = AiProvider::Claude.cli_args("こんにちは");
        assert_eq!(args, vec!["-p", "こんにちは", "--output-format", "text"]);
        assert_eq!(AiProvider::Codex.cli_args("x"), vec!["exec", "x"]);
        assert!(AiProvider::Api.cli_args("x").is_empty());
    }

    #[test]
    fn test_command_name() {
        assert_eq!(AiProvider::Gemini.command_name(), Some("gemini"));
        assert_eq!(AiProvider::Api.command_name(), None);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&AiProvider::Codex).unwrap();
        assert_eq!(json, "\"codex\"");
        let provider: AiProvider = serde_json::from_str("\"api\"").unwrap();
        assert_eq!(provider, AiProvider::Api);
    }
}
