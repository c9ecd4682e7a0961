//! キーワード辞書による条件抽出
//!
//! 外部呼び出しを行わない決定的な抽出器。同じ入力には常に同じ条件を返す。
//!
//! - 年代・性別: 辞書の優先順で最初に見つかったもの
//! - 勤務地・資格: 見つかったものをすべて（辞書順、重複なし）
//! - 寮: 「寮」があれば寮希望、なければ「通勤」で寮不要

use crate::types::{Conditions, Dormitory};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// 年代（優先順）
pub const AGE_BRACKETS: &[&str] = &["20代", "30代", "40代", "50代"];

/// 性別（優先順）
pub const GENDERS: &[&str] = &["男性", "女性"];

/// 都道府県名（「都」「府」「県」を除いた語幹）
pub const PREFECTURES: &[&str] = &[
    "北海道", "青森", "岩手", "宮城", "秋田", "山形", "福島",
    "茨城", "栃木", "群馬", "埼玉", "千葉", "東京", "神奈川",
    "新潟", "富山", "石川", "福井", "山梨", "長野",
    "岐阜", "静岡", "愛知", "三重",
    "滋賀", "京都", "大阪", "兵庫", "奈良", "和歌山",
    "鳥取", "島根", "岡山", "広島", "山口",
    "徳島", "香川", "愛媛", "高知",
    "福岡", "佐賀", "長崎", "熊本", "大分", "宮崎", "鹿児島", "沖縄",
];

/// 資格キーワード
pub const QUALIFICATIONS: &[&str] = &[
    "リフト", "フォークリフト", "玉掛け", "クレーン", "溶接", "電気工事", "危険物",
];

/// 地域名がこの語の一部としてしか現れない場合は採用しない
const REGION_SHADOWS: &[(&str, &str)] = &[("京都", "東京都")];

/// 抽出用の辞書
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    pub age_brackets: Vec<String>,
    pub genders: Vec<String>,
    pub regions: Vec<String>,
    pub qualifications: Vec<String>,
    pub dormitory_words: Vec<String>,
    pub commute_words: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        fn owned(words: &[&str]) -> Vec<String> {
            words.iter().map(|w| w.to_string()).collect()
        }

        Self {
            age_brackets: owned(AGE_BRACKETS),
            genders: owned(GENDERS),
            regions: owned(PREFECTURES),
            qualifications: owned(QUALIFICATIONS),
            dormitory_words: owned(&["寮"]),
            commute_words: owned(&["通勤"]),
        }
    }
}

/// キーワード抽出器
#[derive(Debug, Clone, Default)]
pub struct RuleExtractor {
    vocabulary: Vocabulary,
}

impl RuleExtractor {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// 入力文から条件を抽出
    pub fn extract(&self, text: &str) -> Conditions {
        let vocab = &self.vocabulary;

        let age_bracket = first_present(&vocab.age_brackets, text)
            .or_else(|| other_age_bracket(text));
        let gender = first_present(&vocab.genders, text);

        let regions = all_present(&vocab.regions, text)
            .into_iter()
            .filter(|region| !is_shadowed(region, text))
            .collect();

        let dormitory = if vocab.dormitory_words.iter().any(|w| text.contains(w.as_str())) {
            Dormitory::Required
        } else if vocab.commute_words.iter().any(|w| text.contains(w.as_str())) {
            Dormitory::NotRequired
        } else {
            Dormitory::Unconstrained
        };

        let qualifications = all_present(&vocab.qualifications, text);

        Conditions {
            age_bracket,
            gender,
            regions,
            dormitory,
            qualifications,
        }
    }
}

fn first_present(words: &[String], text: &str) -> Option<String> {
    words
        .iter()
        .find(|w| !w.is_empty() && text.contains(w.as_str()))
        .cloned()
}

fn all_present(words: &[String], text: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for word in words {
        if !word.is_empty() && text.contains(word.as_str()) && !found.contains(word) {
            found.push(word.clone());
        }
    }
    found
}

/// 辞書にない年代表記（"60代" など）を拾う
fn other_age_bracket(text: &str) -> Option<String> {
    lazy_static::lazy_static! {
        static ref AGE_PATTERN: Regex = Regex::new(r"[1-9]0代").unwrap();
    }
    AGE_PATTERN.find(text).map(|m| m.as_str().to_string())
}

/// 地域名の出現がすべて別の地名の一部か
fn is_shadowed(region: &str, text: &str) -> bool {
    let shadows: Vec<&str> = REGION_SHADOWS
        .iter()
        .filter(|(r, _)| *r == region)
        .map(|(_, longer)| *longer)
        .collect();
    if shadows.is_empty() {
        return false;
    }

    text.match_indices(region).all(|(start, _)| {
        let end = start + region.len();
        shadows.iter().any(|longer| {
            text.match_indices(longer)
                .any(|(s, _)| s <= start && end <= s + longer.len())
        })
    })
}
