use crate::ai_provider::AiProvider;
use crate::error::{JobMatchError, Result};
use crate::extractor::ExtractionStrategy;
use crate::summarizer::SummaryStyle;
use job_match_common::policy::{DEFAULT_LARGE_THRESHOLD, DEFAULT_SUMMARY_LIMIT};
use job_match_common::{ColumnMap, Thresholds, Vocabulary};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    /// 未設定なら外部サービスを使わない（キーワード抽出・定型文のみ）
    pub ai_provider: Option<AiProvider>,
    pub model: String,
    pub timeout_seconds: u64,
    pub data_path: Option<PathBuf>,
    /// 未設定なら先頭シート
    pub sheet_name: Option<String>,
    pub columns: ColumnMap,
    pub vocabulary: Vocabulary,
    pub extraction: ExtractionStrategy,
    pub summary_style: SummaryStyle,
    pub summary_limit: usize,
    /// null で中間帯（ModeratelyMany）を使わない
    pub large_threshold: Option<usize>,
    pub extraction_retries: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    /// 指定パスから読み込み（無ければ既定値）
    pub fn load_from(path: &Path) -> Result<Self> {
        let config = Self::read_from(path)?;
        config.validate()?;
        Ok(config)
    }

    /// 値を検証せずに読み込む（設定の表示・修正用）
    pub fn read() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::read_from(&config_path)
    }

    pub fn read_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(Self::default_config())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| JobMatchError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("job-match").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            api_key: None,
            ai_provider: None,
            model: "claude-sonnet-4-20250514".into(),
            timeout_seconds: 120,
            data_path: None,
            sheet_name: None,
            columns: ColumnMap::default(),
            vocabulary: Vocabulary::default(),
            extraction: ExtractionStrategy::Rules,
            summary_style: SummaryStyle::Batch,
            summary_limit: DEFAULT_SUMMARY_LIMIT,
            large_threshold: Some(DEFAULT_LARGE_THRESHOLD),
            extraction_retries: 0,
        }
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            summary_limit: self.summary_limit,
            large_threshold: self.large_threshold,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.thresholds().validate().map_err(JobMatchError::Config)?;
        if self.timeout_seconds == 0 {
            return Err(JobMatchError::Config(
                "timeout_seconds は1以上にしてください".into(),
            ));
        }
        Ok(())
    }

    /// APIキー（環境変数を優先）
    pub fn get_api_key(&self) -> Result<String> {
        if let Ok(key) = std::env::var("ANTHROPIC_API_KEY") {
            if !key.trim().is_empty() {
                return Ok(key);
            }
        }

        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(JobMatchError::MissingApiKey)
    }

    pub fn data_path(&self) -> Result<&Path> {
        self.data_path.as_deref().ok_or(JobMatchError::MissingData)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.summary_limit, 5);
        assert_eq!(config.large_threshold, Some(30));
        assert_eq!(config.extraction, ExtractionStrategy::Rules);
        assert!(config.ai_provider.is_none());
        assert_eq!(config.columns.work_location, "勤務地");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempdir().expect("Failed to create temp dir");
        let config = Config::load_from(&dir.path().join("none.json")).unwrap();
        assert_eq!(config.timeout_seconds, 120);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"ai_provider": "claude", "summary_limit": 3, "large_threshold": null, "columns": {"work_location": "都道府県"}}"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.ai_provider, Some(AiProvider::Claude));
        assert_eq!(config.thresholds(), Thresholds::single(3));
        assert_eq!(config.columns.work_location, "都道府県");
        assert_eq!(config.columns.salary, "給与");
        assert_eq!(config.summary_style, SummaryStyle::Batch);
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"summary_limit": 10, "large_threshold": 5}"#).unwrap();

        let result = Config::load_from(&path);
        assert!(matches!(result, Err(JobMatchError::Config(_))));
    }

    #[test]
    fn test_read_keeps_invalid_values_for_editing() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"summary_limit": 10, "large_threshold": 5, "ai_provider": "gemini"}"#,
        )
        .unwrap();

        let mut config = Config::read_from(&path).unwrap();
        assert_eq!(config.summary_limit, 10);
        assert!(matches!(config.validate(), Err(JobMatchError::Config(_))));

        // 読み込めれば他の項目は変更・保存できる
        config.data_path = Some(PathBuf::from("jobs.xlsx"));
        config.save_to(&path).unwrap();
        let reread = Config::read_from(&path).unwrap();
        assert_eq!(reread.data_path, Some(PathBuf::from("jobs.xlsx")));
        assert_eq!(reread.ai_provider, Some(AiProvider::Gemini));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            data_path: Some(PathBuf::from("data/全体案件.xlsx")),
            extraction: ExtractionStrategy::Delegated,
            ..Default::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.data_path, config.data_path);
        assert_eq!(loaded.extraction, ExtractionStrategy::Delegated);
    }

    #[test]
    fn test_missing_data_path() {
        let config = Config::default();
        assert!(matches!(config.data_path(), Err(JobMatchError::MissingData)));
    }
}
