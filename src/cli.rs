use crate::ai_provider::AiProvider;
use crate::config::Config;
use crate::extractor::ExtractionStrategy;
use crate::summarizer::SummaryStyle;
use clap::{Parser, Subcommand};
use job_match_common::ManyAction;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "job-match-chat")]
#[command(about = "求人マッチングチャット（希望条件から求人を検索）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// AIプロバイダ (claude/codex/gemini/api)
    #[arg(long, global = true)]
    pub ai_provider: Option<AiProvider>,

    /// 求人データ（Excelファイル）
    #[arg(short, long, global = true)]
    pub data: Option<PathBuf>,

    /// シート名（省略時は先頭シート）
    #[arg(long, global = true)]
    pub sheet: Option<String>,

    /// 条件抽出方式 (rules/delegated)
    #[arg(long, global = true)]
    pub strategy: Option<ExtractionStrategy>,

    /// 紹介文の方式 (template/batch/per-listing)
    #[arg(long, global = true)]
    pub summary_style: Option<SummaryStyle>,
}

impl Cli {
    /// コマンドライン指定で設定を上書き（この実行のみ）
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(provider) = self.ai_provider {
            config.ai_provider = Some(provider);
        }
        if let Some(data) = &self.data {
            config.data_path = Some(data.clone());
        }
        if let Some(sheet) = &self.sheet {
            config.sheet_name = Some(sheet.clone());
        }
        if let Some(strategy) = self.strategy {
            config.extraction = strategy;
        }
        if let Some(style) = self.summary_style {
            config.summary_style = style;
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// 対話式で求人を検索
    Chat {
        /// Excel出力先（ファイル/ディレクトリ）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 会話履歴の保存先（JSON）
        #[arg(short, long)]
        log: Option<PathBuf>,
    },

    /// 1回だけ検索
    Search {
        /// 希望条件（例: "40代男性、東京・埼玉、寮希望、リフト・玉掛け"）
        #[arg(required = true)]
        text: String,

        /// 件数が多い場合の対応 (narrow/export)
        #[arg(short, long)]
        action: Option<ManyAction>,

        /// Excel出力先（ファイル/ディレクトリ）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 紹介した求人（上位のみ）もExcelに出力
        #[arg(long)]
        export_shown: bool,
    },

    /// 希望条件の抽出結果をJSONで表示
    Extract {
        /// 希望条件
        #[arg(required = true)]
        text: String,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// AIプロバイダを設定
        #[arg(long)]
        set_provider: Option<AiProvider>,

        /// 求人データのパスを設定
        #[arg(long)]
        set_data: Option<PathBuf>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

impl Commands {
    /// 検索に使う設定値の検証が必要か（設定の表示・編集は不正な値でも実行できる）
    pub fn needs_valid_config(&self) -> bool {
        !matches!(self, Commands::Config { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search() {
        let cli = Cli::try_parse_from([
            "job-match-chat",
            "search",
            "40代男性、東京",
            "--action",
            "export",
            "--data",
            "jobs.xlsx",
        ])
        .unwrap();

        match cli.command {
            Commands::Search { text, action, .. } => {
                assert_eq!(text, "40代男性、東京");
                assert_eq!(action, Some(ManyAction::ExportAll));
            }
            _ => panic!("search を期待"),
        }
        assert_eq!(cli.data, Some(PathBuf::from("jobs.xlsx")));
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "job-match-chat",
            "extract",
            "寮希望",
            "--strategy",
            "delegated",
            "--ai-provider",
            "codex",
            "--summary-style",
            "per-listing",
        ])
        .unwrap();

        let mut config = Config::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.extraction, ExtractionStrategy::Delegated);
        assert_eq!(config.ai_provider, Some(AiProvider::Codex));
        assert_eq!(config.summary_style, SummaryStyle::PerListing);
        assert!(config.data_path.is_none());
    }

    #[test]
    fn test_config_command_skips_validation() {
        let cli = Cli::try_parse_from(["job-match-chat", "config", "--show"]).unwrap();
        assert!(!cli.command.needs_valid_config());

        for args in [
            vec!["job-match-chat", "chat"],
            vec!["job-match-chat", "search", "東京"],
            vec!["job-match-chat", "extract", "東京"],
        ] {
            let cli = Cli::try_parse_from(args).unwrap();
            assert!(cli.command.needs_valid_config());
        }
    }
}
