//! 定型文による求人紹介
//!
//! 外部呼び出しなしで 勤務地 → 仕事内容 → 給与 → 寮 の順に並べる。

use crate::types::JobListing;

/// 空欄の表示
const BLANK: &str = "-";

fn or_blank(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        BLANK
    } else {
        trimmed
    }
}

/// 求人1件を定型文にする
pub fn render_listing(listing: &JobListing) -> String {
    format!(
        "【勤務地】{}｜【仕事内容】{}｜【給与】{}｜【寮】{}",
        or_blank(&listing.work_location),
        or_blank(&listing.job_description),
        or_blank(&listing.salary),
        or_blank(&listing.dormitory_info),
    )
}

/// 求人ごとに定型文を作る（入力と同じ件数・順序）
pub fn render_listings<'a, I>(listings: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a JobListing>,
{
    listings.into_iter().map(render_listing).collect()
}
