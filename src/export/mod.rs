pub mod excel;

use std::path::{Path, PathBuf};

/// 既定の出力ファイル名
pub const DEFAULT_FILE_NAME: &str = "matching_jobs.xlsx";

/// 出力先を決める（ディレクトリや拡張子なしの指定ならファイル名を補う）
pub fn output_path(output: Option<&Path>) -> PathBuf {
    match output {
        None => PathBuf::from(DEFAULT_FILE_NAME),
        Some(path) if path.is_dir() || path.extension().is_none() => path.join(DEFAULT_FILE_NAME),
        Some(path) => path.to_path_buf(),
    }
}

/// 同名ファイルがあれば日時を付けた名前にする（同じ秒に重なれば連番を付ける）
pub fn unique_output_path(output: Option<&Path>) -> PathBuf {
    let path = output_path(output);
    if !path.exists() {
        return path;
    }

    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("matching_jobs");
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();

    let stamped = parent.join(format!("{}_{}.xlsx", stem, stamp));
    if !stamped.exists() {
        return stamped;
    }
    (2u32..)
        .map(|n| parent.join(format!("{}_{}_{}.xlsx", stem, stamp, n)))
        .find(|candidate| !candidate.exists())
        .unwrap_or(stamped)
}
