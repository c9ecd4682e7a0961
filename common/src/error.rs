//! エラー型定義
//!
//! - ServiceError: 外部テキストサービス（CLI/HTTP）の呼び出し失敗
//! - ExtractionError: 条件抽出の失敗（利用者には「言い換えてください」と返す）
//! - GenerationError: 紹介文生成の失敗（テンプレート要約にフォールバック）
//! - TableError: 求人表の列構成エラー（読み込み時に検出）

use thiserror::Error;

/// 外部テキストサービスのエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("サービスに接続できません: {0}")]
    Unavailable(String),

    #[error("サービスが{0}秒以内に応答しませんでした")]
    Timeout(u64),

    #[error("サービス呼び出しに失敗: {0}")]
    Failed(String),

    #[error("サービスの応答が空です")]
    EmptyResponse,
}

/// 条件抽出エラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// 応答が構造化データでない、またはフィールド構成・型が不正
    #[error("抽出結果の形式が不正です: {0}")]
    MalformedResponse(String),

    /// 抽出サービスに到達できない
    #[error("抽出サービスを利用できません: {0}")]
    ServiceUnavailable(String),
}

impl ExtractionError {
    /// 呼び出し側で再試行する意味があるか
    pub fn is_retryable(&self) -> bool {
        matches!(self, ExtractionError::ServiceUnavailable(_))
    }
}

impl From<ServiceError> for ExtractionError {
    /// 空の応答は構造化データでない応答として扱う（再試行しない）
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::EmptyResponse => ExtractionError::MalformedResponse(err.to_string()),
            other => ExtractionError::ServiceUnavailable(other.to_string()),
        }
    }
}

/// 紹介文生成エラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("紹介文の生成に失敗: {0}")]
pub struct GenerationError(pub String);

impl From<ServiceError> for GenerationError {
    fn from(err: ServiceError) -> Self {
        GenerationError(err.to_string())
    }
}

/// 求人表の構成エラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("必要な列が見つかりません: {0}")]
    MissingColumn(String),

    #[error("ヘッダー行がありません")]
    MissingHeader,
}
