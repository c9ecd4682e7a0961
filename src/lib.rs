//! 求人マッチングチャット
//!
//! 自由文の希望条件を構造化し、求人表を照合して、件数に応じた応答を返す。
//! 中核ロジックは job_match_common、このクレートは入出力と外部サービス連携を持つ。

pub mod ai_provider;
pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod extractor;
pub mod loader;
pub mod pipeline;
pub mod service;
pub mod session;
pub mod summarizer;
