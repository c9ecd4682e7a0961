//! 希望条件の抽出
//!
//! キーワード辞書による抽出と、外部サービスへの委譲による抽出を
//! 設定で切り替える。再試行は行わない（呼び出し側の責務）。

use clap::ValueEnum;
use job_match_common::prompts::{build_extraction_prompt, EXTRACTION_SYSTEM};
use job_match_common::{
    parse_conditions_reply, Conditions, ExtractionError, RuleExtractor, TextService, Vocabulary,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// 抽出方式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    /// キーワード辞書（オフライン）
    #[default]
    Rules,
    /// 外部サービスに委譲
    Delegated,
}

pub enum ConditionExtractor {
    Rules(RuleExtractor),
    Delegated(Arc<dyn TextService>),
}

impl ConditionExtractor {
    /// 方式とサービスから抽出器を構築
    ///
    /// 委譲方式でもサービスが無ければキーワード抽出になる。
    pub fn build(
        strategy: ExtractionStrategy,
        vocabulary: Vocabulary,
        service: Option<Arc<dyn TextService>>,
    ) -> Self {
        match (strategy, service) {
            (ExtractionStrategy::Delegated, Some(service)) => ConditionExtractor::Delegated(service),
            (ExtractionStrategy::Delegated, None) => {
                warn!("抽出サービスが利用できないためキーワード抽出を使用します");
                ConditionExtractor::Rules(RuleExtractor::new(vocabulary))
            }
            (ExtractionStrategy::Rules, _) => ConditionExtractor::Rules(RuleExtractor::new(vocabulary)),
        }
    }

    pub fn strategy(&self) -> ExtractionStrategy {
        match self {
            ConditionExtractor::Rules(_) => ExtractionStrategy::Rules,
            ConditionExtractor::Delegated(_) => ExtractionStrategy::Delegated,
        }
    }

    pub async fn extract(&self, text: &str) -> Result<Conditions, ExtractionError> {
        match self {
            ConditionExtractor::Rules(rules) => Ok(rules.extract(text)),
            ConditionExtractor::Delegated(service) => {
                let prompt = build_extraction_prompt(text);
                let response = service.complete(EXTRACTION_SYSTEM, &prompt).await?;
                debug!(service = service.name(), "抽出応答: {}", preview(&response));
                parse_conditions_reply(&response)
            }
        }
    }
}

fn preview(text: &str) -> String {
    text.chars().take(200).collect()
}
