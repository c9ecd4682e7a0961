//! AI CLI連携
//!
//! claude / codex / gemini のCLIを子プロセスとして起動し、標準出力を応答とする。
//! タイムアウト時は子プロセスを終了させる。

use crate::ai_provider::AiProvider;
use async_trait::async_trait;
use job_match_common::{ServiceError, TextService};
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::debug;

/// 起動するコマンド
enum Invocation {
    Provider(AiProvider),
    /// 任意のコマンド（プロンプトは最後の引数として渡す）
    Program { program: String, args: Vec<String> },
}

pub struct CliService {
    invocation: Invocation,
    timeout: Duration,
}

impl CliService {
    pub fn new(provider: AiProvider, timeout: Duration) -> Self {
        Self {
            invocation: Invocation::Provider(provider),
            timeout,
        }
    }

    /// 任意のコマンドを使う
    pub fn with_program(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            invocation: Invocation::Program {
                program: program.into(),
                args,
            },
            timeout,
        }
    }

    fn command(&self, prompt: &str) -> Result<Command, ServiceError> {
        let (name, args) = match &self.invocation {
            Invocation::Provider(provider) => {
                let name = provider.command_name().ok_or_else(|| {
                    ServiceError::Unavailable(format!("{} はCLIプロバイダではありません", provider))
                })?;
                (name, provider.cli_args(prompt))
            }
            Invocation::Program { program, args } => {
                let mut args = args.clone();
                args.push(prompt.to_string());
                (program.as_str(), args)
            }
        };

        // Windowsではcmd /c経由
        #[cfg(windows)]
        let mut command = {
            let mut c = Command::new("cmd");
            c.args(["/c", name]);
            c
        };

        #[cfg(not(windows))]
        let mut command = Command::new(name);

        command.args(args).kill_on_drop(true);
        Ok(command)
    }
}

#[async_trait]
impl TextService for CliService {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, ServiceError> {
        let full_prompt = format!("{}\n\n{}", system, prompt);
        let mut command = self.command(&full_prompt)?;

        debug!(
            service = self.name(),
            prompt_chars = full_prompt.chars().count(),
            "CLI呼び出し"
        );
        let started = Instant::now();

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| ServiceError::Timeout(self.timeout.as_secs()))?
            .map_err(|e| {
                ServiceError::Unavailable(format!("{} CLI実行エラー: {}", self.name(), e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ServiceError::Failed(format!(
                "{} CLI failed (code {:?}): {}",
                self.name(),
                output.status.code(),
                stderr.trim()
            )));
        }

        let response = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!(
            service = self.name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            response_chars = response.chars().count(),
            "CLI応答"
        );

        if response.is_empty() {
            return Err(ServiceError::EmptyResponse);
        }
        Ok(response)
    }

    fn name(&self) -> &str {
        match &self.invocation {
            Invocation::Provider(provider) => provider.command_name().unwrap_or("api"),
            Invocation::Program { program, .. } => program,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_api_provider_is_not_a_cli() {
        let service = CliService::new(AiProvider::Api, Duration::from_secs(1));
        let result = service.complete("system", "prompt").await;
        assert!(matches!(result, Err(ServiceError::Unavailable(_))));
    }

    #[test]
    fn test_name() {
        let service = CliService::new(AiProvider::Claude, Duration::from_secs(1));
        assert_eq!(service.name(), "claude");
        let service = CliService::with_program("sh", Vec::new(), Duration::from_secs(1));
        assert_eq!(service.name(), "sh");
    }

    fn shell(script: &str, timeout: Duration) -> CliService {
        // プロンプトは $0 に入る
        CliService::with_program("sh", vec!["-c".into(), script.into()], timeout)
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stdout_is_response() {
        let service = shell("echo '  応答です  '", Duration::from_secs(5));
        let response = service.complete("system", "prompt").await.unwrap();
        assert_eq!(response, "応答です");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_is_failed() {
        let service = shell("echo oops >&2; exit 3", Duration::from_secs(5));
        match service.complete("system", "prompt").await {
            Err(ServiceError::Failed(message)) => {
                assert!(message.contains("Some(3)"));
                assert!(message.contains("oops"));
            }
            other => panic!("Failed を期待: {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_blank_stdout_is_empty_response() {
        let service = shell("true", Duration::from_secs(5));
        let result = service.complete("system", "prompt").await;
        assert_eq!(result, Err(ServiceError::EmptyResponse));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_kills_child() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let marker = dir.path().join("finished");
        let script = format!("sleep 2 && touch '{}'", marker.display());
        let service = shell(&script, Duration::from_secs(1));

        let started = Instant::now();
        let result = service.complete("system", "prompt").await;
        assert_eq!(result, Err(ServiceError::Timeout(1)));
        assert!(started.elapsed() < Duration::from_secs(3));

        // 打ち切られたプロセスは最後まで実行されない
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(!marker.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_missing_program_is_unavailable() {
        let service = CliService::with_program(
            "/nonexistent/job-match-cli",
            Vec::new(),
            Duration::from_secs(1),
        );
        let result = service.complete("system", "prompt").await;
        assert!(matches!(result, Err(ServiceError::Unavailable(_))));
    }
}
