use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobMatchError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。`job-match-chat config --set-api-key YOUR_KEY` で設定してください")]
    MissingApiKey,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("求人データが指定されていません。`--data` か `job-match-chat config --set-data FILE` で指定してください")]
    MissingData,

    #[error("Excel読み込みエラー: {0}")]
    Workbook(String),

    #[error("シートが見つかりません: {0}")]
    SheetNotFound(String),

    #[error("求人表の形式が不正: {0}")]
    Table(#[from] job_match_common::TableError),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("入力エラー: {0}")]
    Dialog(String),

    #[error(transparent)]
    Extraction(#[from] job_match_common::ExtractionError),

    #[error(transparent)]
    Generation(#[from] job_match_common::GenerationError),

    #[error(transparent)]
    Service(#[from] job_match_common::ServiceError),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, JobMatchError>;
