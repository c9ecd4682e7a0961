//! Job Match Common Library
//!
//! 求人マッチングの中核ロジック（入出力なし）:
//! 条件抽出（キーワード辞書）、求人照合、応答方針、定型文紹介、
//! 抽出サービス応答のパース、プロンプト生成

pub mod types;
pub mod error;
pub mod rules;
pub mod matcher;
pub mod policy;
pub mod summary;
pub mod prompts;
pub mod parser;
pub mod service;

pub use types::{Cell, ColumnMap, Conditions, Dormitory, JobListing, JobTable, MatchResult};
pub use error::{ExtractionError, GenerationError, ServiceError, TableError};
pub use rules::{RuleExtractor, Vocabulary};
pub use matcher::match_jobs;
pub use policy::{decide, ManyAction, ResponseMode, Thresholds};
pub use summary::{render_listing, render_listings};
pub use parser::{extract_json_object, parse_conditions_reply};
pub use service::TextService;
