//! 対話式チャット
//!
//! 1行ごとに独立して処理する（前の入力の条件は引き継がない）。
//! 件数が多い場合は「絞り込む／Excelで出力」を選ばせる。

use crate::error::{JobMatchError, Result};
use crate::export::{self, excel};
use crate::pipeline::{resolve_many, ManyOutcome, Pipeline, Reply};
use crate::session::{ChatLog, Role};
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use job_match_common::{JobListing, ManyAction, MatchResult};
use std::future::Future;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// 入力例
pub const INPUT_HINT: &str =
    "希望条件をご入力ください（例：40代男性、東京・埼玉、寮希望、リフト・玉掛け など）";

/// 入力行の解釈
#[derive(Debug, PartialEq, Eq)]
pub enum ChatInput {
    Message(String),
    Quit,
}

pub fn parse_input(line: &str) -> ChatInput {
    match line.trim() {
        "" | "exit" | "quit" | "q" => ChatInput::Quit,
        text => ChatInput::Message(text.to_string()),
    }
}

/// 処理中スピナーを表示しながら待つ
pub async fn with_spinner<F: Future>(message: &str, future: F) -> F::Output {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    let output = future.await;
    spinner.finish_and_clear();
    output
}

/// 応答を履歴に追加して表示
pub fn present(reply: &Reply<'_>, log: &mut ChatLog) {
    if let Some(conditions) = reply.conditions() {
        println!("  条件: {}", conditions.describe());
    }
    for message in reply.messages() {
        say(log, message);
    }
}

/// アシスタントの発言を履歴に追加して表示
pub fn say(log: &mut ChatLog, message: impl Into<String>) {
    let entry = log.push(Role::Assistant, message);
    println!("{} {}\n", entry.role, entry.message);
}

/// 紹介した求人の出力の案内
pub const EXPORT_SHOWN_PROMPT: &str = "Excelでダウンロードしますか？（上位のみ）";

/// 紹介文を出した応答なら、その求人（上位のみ）
pub fn shown_rows<'r, 't>(reply: &'r Reply<'t>) -> Option<&'r MatchResult<'t>> {
    match reply {
        Reply::Summaries { shown, .. } if !shown.is_empty() => Some(shown),
        _ => None,
    }
}

fn confirm_export_shown() -> Result<bool> {
    Confirm::new()
        .with_prompt(EXPORT_SHOWN_PROMPT)
        .default(false)
        .interact()
        .map_err(|e| JobMatchError::Dialog(e.to_string()))
}

/// 出力してメッセージを履歴に残す（失敗してもチャットは続ける）
fn export_and_say(log: &mut ChatLog, headers: &[String], rows: &[&JobListing], output: Option<&Path>) {
    match export_rows(headers, rows, output) {
        Ok(message) => say(log, message),
        Err(e) => {
            warn!("Excel出力に失敗: {}", e);
            say(log, "申し訳ありません、Excelの出力に失敗しました。");
        }
    }
}

/// 多数一致時の選択肢
fn prompt_many_action(count: usize, actions: &[ManyAction]) -> Result<ManyAction> {
    let labels: Vec<&str> = actions.iter().map(|a| a.label()).collect();

    let selection = Select::new()
        .with_prompt(format!("{}件あります。このあとの対応をお選びください", count))
        .items(&labels)
        .default(0)
        .interact()
        .map_err(|e| JobMatchError::Dialog(e.to_string()))?;

    Ok(actions[selection])
}

/// 一致した求人をExcelに出力し、結果のメッセージを返す
pub fn export_rows(
    headers: &[String],
    rows: &[&JobListing],
    output: Option<&Path>,
) -> Result<String> {
    let path = export::unique_output_path(output);
    excel::export_excel(headers, rows, &path)?;
    Ok(format!("📁 {}件の求人をExcelに出力しました: {}", rows.len(), path.display()))
}

/// 対話式チャットを実行
pub async fn run_chat(
    pipeline: &Pipeline<'_>,
    output: Option<&Path>,
    log_path: Option<&Path>,
) -> Result<()> {
    let mut log = ChatLog::new();

    println!("📋 MatchingChat | 求人マッチングAIチャット");
    println!("{}", INPUT_HINT);
    println!("終了: 空行 / exit\n");

    loop {
        let line: String = Input::new()
            .with_prompt(Role::User.to_string())
            .allow_empty(true)
            .interact_text()
            .map_err(|e| JobMatchError::Dialog(e.to_string()))?;

        let text = match parse_input(&line) {
            ChatInput::Quit => break,
            ChatInput::Message(text) => text,
        };
        log.push_user(text.as_str());

        let reply = with_spinner("マッチング中...", pipeline.handle(&text)).await;
        present(&reply, &mut log);

        if let Reply::Many { matched, mode, .. } = &reply {
            let action = prompt_many_action(matched.len(), mode.offered_actions())?;
            match resolve_many(action, matched) {
                ManyOutcome::Narrow { message } => say(&mut log, message),
                ManyOutcome::Export { rows } => {
                    export_and_say(&mut log, pipeline.table().headers(), rows.rows(), output)
                }
            }
        } else if let Some(shown) = shown_rows(&reply) {
            if confirm_export_shown()? {
                export_and_say(&mut log, pipeline.table().headers(), shown.rows(), output);
            }
        }
    }

    if let Some(path) = log_path {
        log.save(path)?;
        println!("✔ 会話履歴を保存: {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use job_match_common::{Conditions, ExtractionError, ResponseMode};

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input(""), ChatInput::Quit);
        assert_eq!(parse_input("  exit "), ChatInput::Quit);
        assert_eq!(
            parse_input(" 40代男性 "),
            ChatInput::Message("40代男性".to_string())
        );
    }

    #[test]
    fn test_present_apology_is_single_message() {
        let mut log = ChatLog::new();
        let reply = Reply::Apology {
            error: ExtractionError::MalformedResponse("prose".into()),
        };
        present(&reply, &mut log);
        assert_eq!(log.len(), 1);
        assert_eq!(log.entries()[0].role, Role::Assistant);
        assert!(!log.entries()[0].message.contains("prose"));
    }

    #[test]
    fn test_present_summaries() {
        let jobs = vec![JobListing::default(), JobListing::default()];
        let reply = Reply::Summaries {
            conditions: Conditions::default(),
            mode: ResponseMode::Summarize { count: 2, shown: 2 },
            shown: MatchResult::new(jobs.iter().collect()),
            messages: vec!["紹介A".into(), "紹介B".into()],
            generated: true,
        };
        let mut log = ChatLog::new();
        present(&reply, &mut log);
        let messages: Vec<&str> = log.entries().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["2件の求人が見つかりました。", "紹介A", "紹介B"]);
    }

    #[test]
    fn test_shown_rows_only_for_summaries() {
        let jobs = vec![JobListing::default(), JobListing::default()];
        let summaries = Reply::Summaries {
            conditions: Conditions::default(),
            mode: ResponseMode::Summarize { count: 2, shown: 2 },
            shown: MatchResult::new(jobs.iter().collect()),
            messages: vec!["紹介".into()],
            generated: false,
        };
        assert_eq!(shown_rows(&summaries).map(|rows| rows.len()), Some(2));

        let many = Reply::Many {
            conditions: Conditions::default(),
            mode: ResponseMode::ModeratelyMany { count: 2 },
            matched: MatchResult::new(jobs.iter().collect()),
        };
        assert!(shown_rows(&many).is_none());

        let no_match = Reply::NoMatch {
            conditions: Conditions::default(),
        };
        assert!(shown_rows(&no_match).is_none());
    }

    #[test]
    fn test_export_and_say_logs_shown_rows() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let jobs = vec![JobListing::default(), JobListing::default(), JobListing::default()];
        let summaries = Reply::Summaries {
            conditions: Conditions::default(),
            mode: ResponseMode::Summarize { count: 3, shown: 3 },
            shown: MatchResult::new(jobs.iter().collect()),
            messages: Vec::new(),
            generated: false,
        };
        let shown = shown_rows(&summaries).expect("shown rows");

        let mut log = ChatLog::new();
        export_and_say(&mut log, &[], shown.rows(), Some(dir.path()));
        assert_eq!(log.len(), 1);
        assert!(log.entries()[0].message.contains("3件"));
        assert!(dir.path().join(export::DEFAULT_FILE_NAME).exists());
    }

    #[test]
    fn test_export_rows_writes_file() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let job = JobListing {
            work_location: "東京都".into(),
            ..Default::default()
        };
        let message = export_rows(&[], &[&job], Some(dir.path())).unwrap();
        assert!(message.contains("1件"));
        assert!(dir.path().join(export::DEFAULT_FILE_NAME).exists());
    }
}
