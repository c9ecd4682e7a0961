//! プロンプト生成モジュール
//!
//! - build_extraction_prompt: 希望条件抽出（厳密なJSON出力を要求）
//! - build_batch_summary_prompt: 複数求人をまとめて紹介
//! - build_listing_summary_prompt: 求人1件の紹介

use crate::summary::render_listing;
use crate::types::JobListing;

/// 条件抽出のシステムプロンプト
pub const EXTRACTION_SYSTEM: &str = "あなたは人材紹介エージェントです。求職者の文章から希望条件を抽出し、指定されたJSONだけを出力します。";

/// 紹介文生成のシステムプロンプト
pub const SUMMARY_SYSTEM: &str = "あなたは親切な求人紹介アシスタントです。";

/// 条件抽出プロンプト
pub fn build_extraction_prompt(user_text: &str) -> String {
    format!(
        r#"以下の求職者の文章から、次の5項目を抽出してください。

## 項目
- age_bracket: 年代（例: "40代"）。記載がなければ null
- gender: 性別（"男性" または "女性"）。記載がなければ null
- regions: 希望勤務地の都道府県名（「都」「府」「県」を除く。例: ["東京", "埼玉"]）。なければ []
- dormitory: 入寮希望なら true、通勤希望なら false、記載がなければ null
- qualifications: 保有する免許・資格（例: ["リフト", "玉掛け"]）。なければ []

## 出力形式（厳密にこのJSONオブジェクト形式で出力）
{{
  "age_bracket": "40代",
  "gender": "男性",
  "regions": ["東京", "埼玉"],
  "dormitory": true,
  "qualifications": ["リフト", "玉掛け"]
}}

## 注意
- 上記5つのキー以外を出力しない
- 推測せず、文章に書かれていることだけを抽出
- JSONのみ出力。説明文は不要

求職者の文章:
{user_text}"#
    )
}

/// 複数求人の紹介プロンプト（1回の呼び出しでまとめて紹介）
pub fn build_batch_summary_prompt(listings: &[&JobListing]) -> String {
    let lines = listings
        .iter()
        .map(|l| render_listing(l))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "以下の求人情報を元に、求職者に自然な文章で{}件のおすすめを紹介してください。\n\n{}",
        listings.len(),
        lines
    )
}

/// 求人1件の紹介プロンプト
pub fn build_listing_summary_prompt(listing: &JobListing) -> String {
    format!(
        "以下の求人情報を求職者向けに魅力的に紹介してください：\n勤務地: {}\n仕事内容: {}\n給与: {}\n寮: {}\n資格: {}",
        listing.work_location,
        listing.job_description,
        listing.salary,
        listing.dormitory_info,
        listing.qualifications_text,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_prompt_embeds_text_and_keys() {
        let prompt = build_extraction_prompt("40代男性、東京、寮希望");
        assert!(prompt.contains("40代男性、東京、寮希望"));
        for key in ["age_bracket", "gender", "regions", "dormitory", "qualifications"] {
            assert!(prompt.contains(key), "キーがない: {}", key);
        }
        assert!(prompt.contains("JSONのみ出力"));
    }

    #[test]
    fn test_batch_prompt_lists_each_listing() {
        let a = JobListing {
            work_location: "東京都".into(),
            ..Default::default()
        };
        let b = JobListing {
            work_location: "埼玉県".into(),
            ..Default::default()
        };
        let prompt = build_batch_summary_prompt(&[&a, &b]);
        assert!(prompt.contains("2件のおすすめ"));
        assert!(prompt.contains("【勤務地】東京都"));
        assert!(prompt.contains("【勤務地】埼玉県"));
    }

    #[test]
    fn test_listing_prompt() {
        let listing = JobListing {
            work_location: "大阪府".into(),
            qualifications_text: "溶接".into(),
            ..Default::default()
        };
        let prompt = build_listing_summary_prompt(&listing);
        assert!(prompt.contains("勤務地: 大阪府"));
        assert!(prompt.contains("資格: 溶接"));
    }
}
