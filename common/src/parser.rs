//! 抽出サービス応答のパーサー
//!
//! 応答からJSONオブジェクトを取り出し、5項目のキー構成と型を検証してから
//! Conditions に変換する。検証に失敗したものはすべて MalformedResponse。

use crate::error::ExtractionError;
use crate::types::{Conditions, Dormitory};
use serde::Deserialize;
use serde_json::Value;

/// 応答に含まれるべきキー
pub const CONDITION_KEYS: &[&str] = &[
    "age_bracket",
    "gender",
    "regions",
    "dormitory",
    "qualifications",
];

/// 抽出サービスの応答形式
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConditionsReply {
    age_bracket: Option<String>,
    gender: Option<String>,
    regions: Vec<String>,
    dormitory: Option<bool>,
    qualifications: Vec<String>,
}

/// 応答からJSONオブジェクト部分を抽出
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. 最初の `{` から最後の `}` まで
///
/// # Examples
/// ```
/// use job_match_common::extract_json_object;
///
/// let response = "結果です: {\"regions\": []}";
/// assert_eq!(extract_json_object(response).unwrap(), "{\"regions\": []}");
/// ```
pub fn extract_json_object(response: &str) -> Result<&str, ExtractionError> {
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + "```json".len();
        if let Some(end_offset) = response[start..].find("```") {
            return Ok(response[start..start + end_offset].trim());
        }
    }

    if let (Some(start), Some(end)) = (response.find('{'), response.rfind('}')) {
        if end > start {
            return Ok(&response[start..=end]);
        }
    }

    Err(ExtractionError::MalformedResponse(
        "JSONオブジェクトが見つかりません".into(),
    ))
}

/// 抽出サービスの応答を検証して Conditions に変換
pub fn parse_conditions_reply(response: &str) -> Result<Conditions, ExtractionError> {
    let json_str = extract_json_object(response)?;

    let value: Value = serde_json::from_str(json_str)
        .map_err(|e| ExtractionError::MalformedResponse(format!("JSONパースエラー: {}", e)))?;

    let object = value.as_object().ok_or_else(|| {
        ExtractionError::MalformedResponse("応答がJSONオブジェクトではありません".into())
    })?;

    let missing: Vec<&str> = CONDITION_KEYS
        .iter()
        .copied()
        .filter(|key| !object.contains_key(*key))
        .collect();
    if !missing.is_empty() {
        return Err(ExtractionError::MalformedResponse(format!(
            "キーが不足しています: {}",
            missing.join(", ")
        )));
    }

    let reply: ConditionsReply = serde_json::from_value(value)
        .map_err(|e| ExtractionError::MalformedResponse(format!("型が不正です: {}", e)))?;

    Ok(Conditions {
        age_bracket: reply.age_bracket,
        gender: reply.gender,
        regions: reply.regions,
        dormitory: Dormitory::from_flag(reply.dormitory),
        qualifications: reply.qualifications,
    }
    .normalized())
}
