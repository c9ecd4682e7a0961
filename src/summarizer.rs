//! 求人紹介文の生成
//!
//! - Template: 定型文（外部呼び出しなし、失敗しない）
//! - Batch: 最大summary_limit件を1回の呼び出しでまとめて紹介
//! - PerListing: 1件ずつ呼び出して紹介
//!
//! 生成失敗時のテンプレートへの切り替えは呼び出し側で行う。

use clap::ValueEnum;
use job_match_common::prompts::{
    build_batch_summary_prompt, build_listing_summary_prompt, SUMMARY_SYSTEM,
};
use job_match_common::{render_listings, GenerationError, JobListing, TextService};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// 紹介文の方式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStyle {
    Template,
    #[default]
    Batch,
    PerListing,
}

pub struct Summarizer {
    style: SummaryStyle,
    service: Option<Arc<dyn TextService>>,
}

impl Summarizer {
    /// サービスが無ければ定型文になる
    pub fn build(style: SummaryStyle, service: Option<Arc<dyn TextService>>) -> Self {
        match (style, service) {
            (SummaryStyle::Template, _) => Self::template(),
            (style, Some(service)) => Self {
                style,
                service: Some(service),
            },
            (_, None) => {
                warn!("生成サービスが利用できないため定型文で紹介します");
                Self::template()
            }
        }
    }

    pub fn template() -> Self {
        Self {
            style: SummaryStyle::Template,
            service: None,
        }
    }

    pub fn style(&self) -> SummaryStyle {
        self.style
    }

    /// 求人を紹介文にする
    ///
    /// Template/PerListing は1件につき1文、Batch はまとめて1文。
    pub async fn summarize(&self, rows: &[&JobListing]) -> Result<Vec<String>, GenerationError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let service = match (&self.service, self.style) {
            (Some(service), SummaryStyle::Batch | SummaryStyle::PerListing) => service,
            _ => return Ok(render_listings(rows.iter().copied())),
        };

        match self.style {
            SummaryStyle::Batch => {
                let prompt = build_batch_summary_prompt(rows);
                let text = service.complete(SUMMARY_SYSTEM, &prompt).await?;
                debug!(service = service.name(), rows = rows.len(), "まとめて紹介文を生成");
                Ok(vec![text.trim().to_string()])
            }
            _ => {
                let mut summaries = Vec::with_capacity(rows.len());
                for listing in rows {
                    let prompt = build_listing_summary_prompt(listing);
                    let text = service.complete(SUMMARY_SYSTEM, &prompt).await?;
                    summaries.push(text.trim().to_string());
                }
                debug!(service = service.name(), rows = rows.len(), "1件ずつ紹介文を生成");
                Ok(summaries)
            }
        }
    }
}
