//! Excel出力
//!
//! 一致した求人を元の列・元の順序のまま1シートに書き出す（値の加工なし）。

use crate::error::{JobMatchError, Result};
use job_match_common::{Cell, ColumnMap, JobListing};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::borrow::Cow;
use std::path::Path;
use tracing::info;

/// シート名
pub const SHEET_NAME: &str = "求人一覧";

fn xlsx_err(e: XlsxError) -> JobMatchError {
    JobMatchError::ExcelGeneration(e.to_string())
}

/// 元の行セルが無い求人は対応表の7項目を書く
fn row_cells(listing: &JobListing) -> Cow<'_, [Cell]> {
    if !listing.cells.is_empty() {
        return Cow::Borrowed(&listing.cells);
    }
    Cow::Owned(
        [
            &listing.work_location,
            &listing.job_description,
            &listing.salary,
            &listing.dormitory_info,
            &listing.qualifications_text,
            &listing.age_field,
            &listing.gender_field,
        ]
        .into_iter()
        .map(|field| Cell::from(field.as_str()))
        .collect(),
    )
}

/// 日付と日時の表示形式
struct DateFormats {
    date: Format,
    datetime: Format,
}

impl DateFormats {
    fn new() -> Self {
        Self {
            date: Format::new().set_num_format("yyyy/mm/dd"),
            datetime: Format::new().set_num_format("yyyy/mm/dd hh:mm:ss"),
        }
    }
}

/// セルを元の型で書く（日付はシリアル値に表示形式を付ける）
fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &Cell,
    formats: &DateFormats,
) -> std::result::Result<(), XlsxError> {
    match cell {
        Cell::Empty => return Ok(()),
        Cell::Text(s) if s.is_empty() => return Ok(()),
        Cell::Text(s) => worksheet.write_string(row, col, s)?,
        Cell::Number(n) => worksheet.write_number(row, col, *n)?,
        Cell::Bool(b) => worksheet.write_boolean(row, col, *b)?,
        Cell::DateTime { serial, .. } => {
            let format = if serial.fract() == 0.0 {
                &formats.date
            } else {
                &formats.datetime
            };
            worksheet.write_number_with_format(row, col, *serial, format)?
        }
    };
    Ok(())
}

fn default_headers() -> Vec<String> {
    let columns = ColumnMap::default();
    vec![
        columns.work_location,
        columns.job_description,
        columns.salary,
        columns.dormitory_info,
        columns.qualifications_text,
        columns.age_field,
        columns.gender_field,
    ]
}

fn build_workbook(headers: &[String], rows: &[&JobListing]) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let date_formats = DateFormats::new();

    let fallback;
    let headers = if headers.is_empty() {
        fallback = default_headers();
        &fallback[..]
    } else {
        headers
    };

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME).map_err(xlsx_err)?;

    for (col, header) in headers.iter().enumerate() {
        let col = column_index(col)?;
        worksheet
            .write_string_with_format(0, col, header, &header_format)
            .map_err(xlsx_err)?;
    }

    for (i, listing) in rows.iter().enumerate() {
        let row = u32::try_from(i + 1)
            .map_err(|_| JobMatchError::ExcelGeneration("行数が多すぎます".into()))?;
        for (col, cell) in row_cells(listing).iter().enumerate() {
            write_cell(worksheet, row, column_index(col)?, cell, &date_formats).map_err(xlsx_err)?;
        }
    }

    worksheet.set_freeze_panes(1, 0).map_err(xlsx_err)?;
    worksheet.autofit();

    Ok(workbook)
}

fn column_index(col: usize) -> Result<u16> {
    u16::try_from(col).map_err(|_| JobMatchError::ExcelGeneration("列数が多すぎます".into()))
}

/// ファイルに出力
pub fn export_excel(headers: &[String], rows: &[&JobListing], output_path: &Path) -> Result<()> {
    let mut workbook = build_workbook(headers, rows)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    workbook.save(output_path).map_err(xlsx_err)?;
    info!(path = %output_path.display(), rows = rows.len(), "Excelを出力しました");
    Ok(())
}

/// バッファに出力（ダウンロード用）
pub fn export_excel_buffer(headers: &[String], rows: &[&JobListing]) -> Result<Vec<u8>> {
    let mut workbook = build_workbook(headers, rows)?;
    workbook.save_to_buffer().map_err(xlsx_err)
}
