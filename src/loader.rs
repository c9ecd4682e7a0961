//! 求人データ読み込み
//!
//! Excel（xlsx/xls/ods）の1シートを読み込み、先頭行をヘッダーとして求人表を作る。
//! 必要な列が無い場合は読み込み時にエラーにする（照合時には失敗しない）。

use crate::error::{JobMatchError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{NaiveDateTime, Timelike};
use job_match_common::{Cell, ColumnMap, JobTable};
use std::path::Path;
use tracing::info;

/// 求人表を読み込む
///
/// # Arguments
/// * `path` - Excelファイル
/// * `sheet` - シート名（None なら先頭シート）
/// * `columns` - 列名の対応
pub fn load_job_table(path: &Path, sheet: Option<&str>, columns: &ColumnMap) -> Result<JobTable> {
    if !path.exists() {
        return Err(JobMatchError::FileNotFound(path.display().to_string()));
    }

    let mut workbook = open_workbook_auto(path)
        .map_err(|e| JobMatchError::Workbook(format!("{}: {}", path.display(), e)))?;

    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| JobMatchError::SheetNotFound("(シートがありません)".into()))?,
    };

    if !workbook.sheet_names().iter().any(|s| s == &sheet_name) {
        return Err(JobMatchError::SheetNotFound(sheet_name));
    }

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| JobMatchError::Workbook(format!("{}: {}", sheet_name, e)))?;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(to_cell).collect::<Vec<_>>());

    let headers: Vec<String> = rows
        .next()
        .map(|h| h.iter().map(|c| c.to_string().trim().to_string()).collect())
        .unwrap_or_default();

    let data: Vec<Vec<Cell>> = rows
        .filter(|cells| cells.iter().any(|c| !c.is_blank()))
        .collect();

    let table = JobTable::from_rows(headers, data, columns)?;
    info!(
        path = %path.display(),
        sheet = %sheet_name,
        rows = table.len(),
        "求人データを読み込みました"
    );
    Ok(table)
}

/// calamineのセルを型付きのセルにする
///
/// 日付は表示用に `yyyy/mm/dd`（時刻があれば `yyyy/mm/dd HH:MM:SS`）へ整形し、
/// シリアル値も保持する。
pub fn to_cell(cell: &Data) -> Cell {
    match cell {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::from(s.as_str()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) if dt.is_duration() => Cell::Number(dt.as_f64()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => Cell::DateTime {
                serial: dt.as_f64(),
                text: format_datetime(&datetime),
            },
            None => Cell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::from(s.as_str()),
        other => Cell::from(other.to_string()),
    }
}

fn format_datetime(datetime: &NaiveDateTime) -> String {
    if datetime.time().num_seconds_from_midnight() == 0 {
        datetime.format("%Y/%m/%d").to_string()
    } else {
        datetime.format("%Y/%m/%d %H:%M:%S").to_string()
    }
}
