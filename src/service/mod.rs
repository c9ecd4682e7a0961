//! 外部テキストサービス
//!
//! 設定に応じてCLI呼び出しかHTTP APIのどちらかを用意する。
//! プロバイダ未設定、またはAPIキーが無い場合は None を返し、
//! 呼び出し側はキーワード抽出・定型文紹介で動作する。

mod api;
mod cli;

pub use api::ApiService;
pub use cli::CliService;

use crate::ai_provider::AiProvider;
use crate::config::Config;
use job_match_common::TextService;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// 設定から外部サービスを構築
pub fn from_config(config: &Config) -> Option<Arc<dyn TextService>> {
    let provider = match config.ai_provider {
        Some(provider) => provider,
        None => {
            info!("AIプロバイダ未設定: 外部サービスを使用しません");
            return None;
        }
    };
    let timeout = Duration::from_secs(config.timeout_seconds);

    match provider {
        AiProvider::Api => match config.get_api_key() {
            Ok(key) => match ApiService::new(key, config.model.clone(), timeout) {
                Ok(service) => Some(Arc::new(service)),
                Err(e) => {
                    warn!("HTTPクライアントを構築できません: {}", e);
                    None
                }
            },
            Err(e) => {
                warn!("{}", e);
                None
            }
        },
        cli_provider => Some(Arc::new(CliService::new(cli_provider, timeout))),
    }
}
