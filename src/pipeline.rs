//! 1メッセージ分の処理
//!
//! 入力文 → 希望条件 → 照合 → 応答方針 → 紹介文 の順に一方向で処理する。
//! 状態は持たず、会話履歴にも触れない（履歴は呼び出し側の ChatLog が持つ）。
//!
//! - 抽出失敗: お詫びメッセージを返し、照合は行わない
//! - 生成失敗: 定型文の紹介に切り替える

use crate::config::Config;
use crate::extractor::ConditionExtractor;
use crate::summarizer::{Summarizer, SummaryStyle};
use job_match_common::{
    decide, match_jobs, render_listings, Conditions, ExtractionError, JobTable, ManyAction,
    MatchResult, ResponseMode, TextService, Thresholds,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 一致なし
pub const NO_MATCH_MESSAGE: &str =
    "申し訳ありません、条件に一致する求人が見つかりませんでした。条件を変更してもう一度お試しください。";

/// 条件を読み取れなかった
pub const EXTRACTION_APOLOGY: &str =
    "申し訳ありません、ご希望条件を読み取れませんでした。表現を変えてもう一度お試しください。";

/// 絞り込みの依頼
pub const NARROW_PROMPT: &str =
    "もう少し詳しい希望条件を教えてください（例：交替制、休日、日勤希望など）";

/// 件数が多い場合の案内
pub fn many_message(count: usize) -> String {
    format!(
        "{}件の求人が見つかりました。さらに詳細な条件を追加いただくか、Excelで抽出してください。",
        count
    )
}

/// 応答
#[derive(Debug)]
pub enum Reply<'t> {
    /// 条件抽出に失敗
    Apology { error: ExtractionError },
    /// 一致なし
    NoMatch { conditions: Conditions },
    /// 少数一致: 紹介文
    Summaries {
        conditions: Conditions,
        mode: ResponseMode,
        shown: MatchResult<'t>,
        messages: Vec<String>,
        /// 外部サービスで生成した紹介文か
        generated: bool,
    },
    /// 多数一致: 絞り込みか一括出力を選ばせる
    Many {
        conditions: Conditions,
        mode: ResponseMode,
        matched: MatchResult<'t>,
    },
}

impl<'t> Reply<'t> {
    pub fn mode(&self) -> Option<ResponseMode> {
        match self {
            Reply::Apology { .. } => None,
            Reply::NoMatch { .. } => Some(ResponseMode::NoMatch),
            Reply::Summaries { mode, .. } | Reply::Many { mode, .. } => Some(*mode),
        }
    }

    pub fn conditions(&self) -> Option<&Conditions> {
        match self {
            Reply::Apology { .. } => None,
            Reply::NoMatch { conditions }
            | Reply::Summaries { conditions, .. }
            | Reply::Many { conditions, .. } => Some(conditions),
        }
    }

    /// 画面に出すアシスタントのメッセージ
    pub fn messages(&self) -> Vec<String> {
        match self {
            Reply::Apology { .. } => vec![EXTRACTION_APOLOGY.to_string()],
            Reply::NoMatch { .. } => vec![NO_MATCH_MESSAGE.to_string()],
            Reply::Summaries { shown, messages, .. } => {
                let mut out = Vec::with_capacity(messages.len() + 1);
                out.push(format!("{}件の求人が見つかりました。", shown.len()));
                out.extend(messages.iter().cloned());
                out
            }
            Reply::Many { matched, .. } => vec![many_message(matched.len())],
        }
    }
}

/// 多数一致時の選択結果
#[derive(Debug)]
pub enum ManyOutcome<'t> {
    /// 追加条件の依頼（データは返さない）
    Narrow { message: String },
    /// 一致した全件（件数上限なし）
    Export { rows: MatchResult<'t> },
}

/// 多数一致時の選択を処理
pub fn resolve_many<'t>(action: ManyAction, matched: &MatchResult<'t>) -> ManyOutcome<'t> {
    match action {
        ManyAction::NarrowFurther => ManyOutcome::Narrow {
            message: NARROW_PROMPT.to_string(),
        },
        ManyAction::ExportAll => ManyOutcome::Export {
            rows: matched.clone(),
        },
    }
}

pub struct Pipeline<'t> {
    table: &'t JobTable,
    extractor: ConditionExtractor,
    summarizer: Summarizer,
    thresholds: Thresholds,
    extraction_retries: u32,
}

impl<'t> Pipeline<'t> {
    pub fn new(
        table: &'t JobTable,
        extractor: ConditionExtractor,
        summarizer: Summarizer,
        thresholds: Thresholds,
    ) -> Self {
        Self {
            table,
            extractor,
            summarizer,
            thresholds,
            extraction_retries: 0,
        }
    }

    /// 設定と外部サービスから構築
    pub fn from_config(
        table: &'t JobTable,
        config: &Config,
        service: Option<Arc<dyn TextService>>,
    ) -> Self {
        let extractor = ConditionExtractor::build(
            config.extraction,
            config.vocabulary.clone(),
            service.clone(),
        );
        let summarizer = Summarizer::build(config.summary_style, service);
        Self::new(table, extractor, summarizer, config.thresholds())
            .with_retries(config.extraction_retries)
    }

    /// 抽出サービスに到達できない場合の再試行回数
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.extraction_retries = retries;
        self
    }

    pub fn table(&self) -> &'t JobTable {
        self.table
    }

    /// 条件抽出（接続失敗のみ再試行）
    pub async fn extract(&self, text: &str) -> Result<Conditions, ExtractionError> {
        let mut attempt = 0;
        loop {
            match self.extractor.extract(text).await {
                Ok(conditions) => return Ok(conditions),
                Err(e) if e.is_retryable() && attempt < self.extraction_retries => {
                    attempt += 1;
                    warn!("{} (再試行 {}/{})", e, attempt, self.extraction_retries);
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub fn match_conditions(&self, conditions: &Conditions) -> MatchResult<'t> {
        match_jobs(self.table.listings(), conditions)
    }

    /// 1メッセージを処理して応答を返す
    pub async fn handle(&self, text: &str) -> Reply<'t> {
        let conditions = match self.extract(text).await {
            Ok(conditions) => conditions,
            Err(error) => {
                warn!("条件抽出に失敗: {}", error);
                return Reply::Apology { error };
            }
        };
        debug!("抽出条件: {}", conditions.describe());

        let matched = self.match_conditions(&conditions);
        let mode = decide(matched.len(), &self.thresholds);
        info!(matched = matched.len(), mode = ?mode, "照合完了");

        match mode {
            ResponseMode::NoMatch => Reply::NoMatch { conditions },
            ResponseMode::Summarize { shown, .. } => {
                let shown = matched.head(shown);
                let (messages, generated) = match self.summarizer.summarize(shown.rows()).await {
                    Ok(messages) => (messages, self.summarizer.style() != SummaryStyle::Template),
                    Err(e) => {
                        warn!("{}。定型文で紹介します", e);
                        (render_listings(shown.iter()), false)
                    }
                };
                Reply::Summaries {
                    conditions,
                    mode,
                    shown,
                    messages,
                    generated,
                }
            }
            ResponseMode::ModeratelyMany { .. } | ResponseMode::TooMany { .. } => Reply::Many {
                conditions,
                mode,
                matched,
            },
        }
    }
}
