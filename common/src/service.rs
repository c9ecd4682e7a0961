//! 外部テキストサービスの境界
//!
//! 条件抽出と紹介文生成はこのトレイト越しに外部サービスへ委譲する。
//! 実装（CLI呼び出し、HTTP API）は利用側クレートが持つ。

use crate::error::ServiceError;
use async_trait::async_trait;

/// 自然言語サービス
#[async_trait]
pub trait TextService: Send + Sync {
    /// システムプロンプトとユーザープロンプトを渡し、応答テキストを得る
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, ServiceError>;

    /// ログ表示用の名前
    fn name(&self) -> &str;
}
