//! 応答方針
//!
//! 一致件数だけで応答の種類を決める。ターンをまたいだ状態は持たない。
//!
//! | 件数                                 | 応答            |
//! |--------------------------------------|-----------------|
//! | 0                                    | NoMatch         |
//! | 1..=summary_limit                    | Summarize       |
//! | summary_limit+1..=large_threshold    | ModeratelyMany  |
//! | large_threshold超                    | TooMany         |
//!
//! `large_threshold` が無い場合は summary_limit 超をすべて TooMany とする。

use serde::{Deserialize, Serialize};

pub const DEFAULT_SUMMARY_LIMIT: usize = 5;
pub const DEFAULT_LARGE_THRESHOLD: usize = 30;

/// 件数の閾値
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    /// 紹介文で案内する最大件数
    pub summary_limit: usize,
    /// これを超えると「多すぎる」
    pub large_threshold: Option<usize>,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            summary_limit: DEFAULT_SUMMARY_LIMIT,
            large_threshold: Some(DEFAULT_LARGE_THRESHOLD),
        }
    }
}

impl Thresholds {
    /// 閾値1つだけの方式
    pub fn single(summary_limit: usize) -> Self {
        Self {
            summary_limit,
            large_threshold: None,
        }
    }

    /// 閾値の整合性を確認
    pub fn validate(&self) -> Result<(), String> {
        if self.summary_limit == 0 {
            return Err("summary_limit は1以上にしてください".into());
        }
        if let Some(large) = self.large_threshold {
            if large < self.summary_limit {
                return Err(format!(
                    "large_threshold ({}) は summary_limit ({}) 以上にしてください",
                    large, self.summary_limit
                ));
            }
        }
        Ok(())
    }
}

/// 応答の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    NoMatch,
    /// 先頭 `shown` 件を紹介する
    Summarize { count: usize, shown: usize },
    ModeratelyMany { count: usize },
    TooMany { count: usize },
}

impl ResponseMode {
    /// 絞り込み／一括出力を選ばせる応答か
    pub fn is_many(&self) -> bool {
        matches!(
            self,
            ResponseMode::ModeratelyMany { .. } | ResponseMode::TooMany { .. }
        )
    }

    /// 件数が多い場合に提示する選択肢
    pub fn offered_actions(&self) -> &'static [ManyAction] {
        if self.is_many() {
            &[ManyAction::NarrowFurther, ManyAction::ExportAll]
        } else {
            &[]
        }
    }
}

/// 件数が多い場合の利用者の選択
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManyAction {
    /// 条件を追加してもらう（データは返さない）
    NarrowFurther,
    /// 一致した全件を表形式で出力
    ExportAll,
}

impl ManyAction {
    /// コマンドラインでの指定名
    pub fn keyword(&self) -> &'static str {
        match self {
            ManyAction::NarrowFurther => "narrow",
            ManyAction::ExportAll => "export",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ManyAction::NarrowFurther => "さらに条件を絞り込む",
            ManyAction::ExportAll => "このままExcelで出力する",
        }
    }
}

impl std::str::FromStr for ManyAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "narrow" | "n" => Ok(ManyAction::NarrowFurther),
            "export" | "e" | "excel" => Ok(ManyAction::ExportAll),
            _ => Err(format!("Unknown action: {}. Use narrow or export", s)),
        }
    }
}

/// 一致件数から応答の種類を決める
pub fn decide(match_count: usize, thresholds: &Thresholds) -> ResponseMode {
    if match_count == 0 {
        return ResponseMode::NoMatch;
    }
    if match_count <= thresholds.summary_limit {
        return ResponseMode::Summarize {
            count: match_count,
            shown: match_count.min(thresholds.summary_limit),
        };
    }
    match thresholds.large_threshold {
        Some(large) if match_count <= large => ResponseMode::ModeratelyMany { count: match_count },
        _ => ResponseMode::TooMany { count: match_count },
    }
}
