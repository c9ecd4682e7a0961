//! 求人マッチングの型定義
//!
//! - Conditions: 求職者の希望条件（自由文から抽出）
//! - JobListing: 求人表の1行
//! - JobTable: セッション中は不変の求人表
//! - MatchResult: 条件に一致した求人（元の表の順序のまま）

use crate::error::TableError;
use serde::{Deserialize, Serialize};

/// 入寮希望の3状態
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dormitory {
    /// 寮希望
    Required,
    /// 通勤（寮不要）
    NotRequired,
    /// 指定なし
    #[default]
    Unconstrained,
}

/// 寮ありとみなす記載
pub const DORMITORY_AVAILABLE: &[&str] = &["あり", "有り", "完備"];

/// 寮なしとみなす記載
pub const DORMITORY_NONE: &[&str] = &["なし", "無し"];

impl Dormitory {
    /// 寮欄に含まれていれば一致とする文字列
    pub fn accepted_tokens(&self) -> &'static [&'static str] {
        match self {
            Dormitory::Required => DORMITORY_AVAILABLE,
            Dormitory::NotRequired => DORMITORY_NONE,
            Dormitory::Unconstrained => &[],
        }
    }

    /// 抽出サービスの `true/false/null` から変換
    pub fn from_flag(flag: Option<bool>) -> Self {
        match flag {
            Some(true) => Dormitory::Required,
            Some(false) => Dormitory::NotRequired,
            None => Dormitory::Unconstrained,
        }
    }
}

impl std::fmt::Display for Dormitory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dormitory::Required => write!(f, "寮希望"),
            Dormitory::NotRequired => write!(f, "通勤"),
            Dormitory::Unconstrained => write!(f, "指定なし"),
        }
    }
}

/// 希望条件
///
/// すべてのフィールドは独立して省略可能。全て未指定なら全件一致になる。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conditions {
    /// 年代（例: "40代"）。年齢欄に部分一致
    pub age_bracket: Option<String>,
    /// 性別（例: "男性"）。性別欄に部分一致
    pub gender: Option<String>,
    /// 希望勤務地。いずれかを含めば一致（OR）
    pub regions: Vec<String>,
    /// 入寮希望
    pub dormitory: Dormitory,
    /// 保有資格。すべてを含む求人のみ一致（AND）
    pub qualifications: Vec<String>,
}

impl Conditions {
    /// どのフィールドも指定されていないか
    pub fn is_unconstrained(&self) -> bool {
        self.age_bracket.is_none()
            && self.gender.is_none()
            && self.regions.is_empty()
            && self.dormitory == Dormitory::Unconstrained
            && self.qualifications.is_empty()
    }

    /// 前後の空白を除去し、空文字を未指定に、重複を除去する
    pub fn normalized(self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        fn clean_list(values: Vec<String>) -> Vec<String> {
            let mut out: Vec<String> = Vec::with_capacity(values.len());
            for value in values {
                let value = value.trim().to_string();
                if !value.is_empty() && !out.contains(&value) {
                    out.push(value);
                }
            }
            out
        }

        Self {
            age_bracket: clean(self.age_bracket),
            gender: clean(self.gender),
            regions: clean_list(self.regions),
            dormitory: self.dormitory,
            qualifications: clean_list(self.qualifications),
        }
    }

    /// 条件の一行表示（ログ・画面表示用）
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(age) = &self.age_bracket {
            parts.push(format!("年代: {}", age));
        }
        if let Some(gender) = &self.gender {
            parts.push(format!("性別: {}", gender));
        }
        if !self.regions.is_empty() {
            parts.push(format!("勤務地: {}", self.regions.join("・")));
        }
        if self.dormitory != Dormitory::Unconstrained {
            parts.push(format!("寮: {}", self.dormitory));
        }
        if !self.qualifications.is_empty() {
            parts.push(format!("資格: {}", self.qualifications.join("・")));
        }
        if parts.is_empty() {
            "条件指定なし".to_string()
        } else {
            parts.join(" / ")
        }
    }
}

/// 求人表の列名対応
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub work_location: String,
    pub job_description: String,
    pub salary: String,
    pub dormitory_info: String,
    pub qualifications_text: String,
    pub age_field: String,
    pub gender_field: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            work_location: "勤務地".into(),
            job_description: "仕事内容".into(),
            salary: "給与".into(),
            dormitory_info: "寮".into(),
            qualifications_text: "資格".into(),
            age_field: "年齢".into(),
            gender_field: "性別".into(),
        }
    }
}

/// 求人表のセル
///
/// 出力時に元の型（数値・真偽値・日付）で書き戻すため、読み込んだ型を保持する。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// 日付・日時（Excelのシリアル値と表示用の文字列）
    DateTime { serial: f64, text: String },
}

impl Cell {
    /// 空欄か（空白のみの文字列を含む）
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => write!(f, "{}", s),
            // 整数値は小数点なし
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Bool(true) => write!(f, "TRUE"),
            Cell::Bool(false) => write!(f, "FALSE"),
            Cell::DateTime { text, .. } => write!(f, "{}", text),
        }
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s)
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::from(s.to_string())
    }
}

impl PartialEq<&str> for Cell {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

/// 求人1件
///
/// 照合に使う各欄は不透明なテキストとして扱う。空欄は空文字。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobListing {
    pub work_location: String,
    pub job_description: String,
    pub salary: String,
    pub dormitory_info: String,
    pub qualifications_text: String,
    pub age_field: String,
    pub gender_field: String,

    /// 元の行のセル（エクスポート用、ヘッダー順）
    #[serde(default)]
    pub cells: Vec<Cell>,
}

/// 求人表
#[derive(Debug, Clone, Default)]
pub struct JobTable {
    headers: Vec<String>,
    listings: Vec<JobListing>,
}

impl JobTable {
    pub fn new(headers: Vec<String>, listings: Vec<JobListing>) -> Self {
        Self { headers, listings }
    }

    /// ヘッダー行とデータ行から構築
    ///
    /// 対応表の列がヘッダーに無ければエラー。行がヘッダーより短い場合は空欄扱い。
    pub fn from_rows<C: Into<Cell>>(
        headers: Vec<String>,
        rows: Vec<Vec<C>>,
        columns: &ColumnMap,
    ) -> Result<Self, TableError> {
        if headers.is_empty() {
            return Err(TableError::MissingHeader);
        }

        let index_of = |name: &str| -> Result<usize, TableError> {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| TableError::MissingColumn(name.to_string()))
        };

        let work_location = index_of(&columns.work_location)?;
        let job_description = index_of(&columns.job_description)?;
        let salary = index_of(&columns.salary)?;
        let dormitory_info = index_of(&columns.dormitory_info)?;
        let qualifications_text = index_of(&columns.qualifications_text)?;
        let age_field = index_of(&columns.age_field)?;
        let gender_field = index_of(&columns.gender_field)?;

        let listings = rows
            .into_iter()
            .map(|row| {
                let cells: Vec<Cell> = row.into_iter().map(Into::into).collect();
                let cell = |i: usize| cells.get(i).map(Cell::to_string).unwrap_or_default();
                JobListing {
                    work_location: cell(work_location),
                    job_description: cell(job_description),
                    salary: cell(salary),
                    dormitory_info: cell(dormitory_info),
                    qualifications_text: cell(qualifications_text),
                    age_field: cell(age_field),
                    gender_field: cell(gender_field),
                    cells,
                }
            })
            .collect();

        Ok(Self { headers, listings })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn listings(&self) -> &[JobListing] {
        &self.listings
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

/// 照合結果（元の表の順序を保持）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchResult<'a> {
    rows: Vec<&'a JobListing>,
}

impl<'a> MatchResult<'a> {
    pub fn new(rows: Vec<&'a JobListing>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[&'a JobListing] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a JobListing> + '_ {
        self.rows.iter().copied()
    }

    /// 先頭n件
    pub fn head(&self, n: usize) -> MatchResult<'a> {
        MatchResult {
            rows: self.rows.iter().take(n).copied().collect(),
        }
    }
}

impl<'a, 'b> IntoIterator for &'b MatchResult<'a> {
    type Item = &'a JobListing;
    type IntoIter = std::iter::Copied<std::slice::Iter<'b, &'a JobListing>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter().copied()
    }
}
