use anyhow::Context;
use clap::Parser;
use job_match_chat::{chat, cli, config, loader, pipeline, service};
use job_match_chat::extractor::ConditionExtractor;
use job_match_chat::session::ChatLog;
use job_match_common::JobTable;
use cli::{Cli, Commands};
use config::Config;
use pipeline::{resolve_many, ManyOutcome, Pipeline, Reply};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_table(config: &Config) -> anyhow::Result<JobTable> {
    let path = config.data_path()?;
    let table = loader::load_job_table(path, config.sheet_name.as_deref(), &config.columns)
        .with_context(|| format!("求人データを読み込めません: {}", path.display()))?;
    Ok(table)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::read().context("設定ファイルを読み込めません")?;
    cli.apply_overrides(&mut config);
    if cli.command.needs_valid_config() {
        config.validate().context("設定が不正です")?;
    }

    match cli.command {
        Commands::Chat { output, log } => {
            let table = load_table(&config)?;
            let service = service::from_config(&config);
            let pipeline = Pipeline::from_config(&table, &config, service);

            chat::run_chat(&pipeline, output.as_deref(), log.as_deref()).await?;
        }

        Commands::Search { text, action, output, export_shown } => {
            println!("🔎 job-match-chat - 求人検索\n");

            // 1. 求人データ読み込み
            println!("[1/3] 求人データを読み込み中...");
            let table = load_table(&config)?;
            println!("✔ {}件の求人\n", table.len());

            // 2. 条件抽出・照合
            println!("[2/3] 条件を抽出・照合中...");
            let service = service::from_config(&config);
            let pipeline = Pipeline::from_config(&table, &config, service);
            let mut log = ChatLog::new();
            log.push_user(text.as_str());
            let reply = chat::with_spinner("マッチング中...", pipeline.handle(&text)).await;
            println!("✔ 照合完了\n");

            // 3. 応答
            println!("[3/3] 応答");
            chat::present(&reply, &mut log);

            match &reply {
                Reply::Many { matched, mode, .. } => match action {
                    Some(action) => match resolve_many(action, matched) {
                        ManyOutcome::Narrow { message } => chat::say(&mut log, message),
                        ManyOutcome::Export { rows } => {
                            let message =
                                chat::export_rows(table.headers(), rows.rows(), output.as_deref())?;
                            println!("{}", message);
                        }
                    },
                    None => {
                        println!("対応を選ぶには --action を指定してください:");
                        for action in mode.offered_actions() {
                            println!("  {}: {}", action.keyword(), action.label());
                        }
                    }
                },
                Reply::Summaries { shown, .. } if export_shown => {
                    let message = chat::export_rows(table.headers(), shown.rows(), output.as_deref())?;
                    println!("{}", message);
                }
                _ => {}
            }

            println!("\n✅ 完了");
        }

        Commands::Extract { text } => {
            let service = service::from_config(&config);
            let extractor =
                ConditionExtractor::build(config.extraction, config.vocabulary.clone(), service);

            match extractor.extract(&text).await {
                Ok(conditions) => {
                    println!("{}", serde_json::to_string_pretty(&conditions)?);
                }
                Err(e) => {
                    println!("🤖 {}", pipeline::EXTRACTION_APOLOGY);
                    tracing::warn!("{}", e);
                }
            }
        }

        Commands::Config { set_api_key, set_provider, set_data, show } => {
            let mut config = Config::read()?;
            let mut changed = false;

            if let Some(key) = set_api_key {
                config.api_key = Some(key);
                changed = true;
                println!("✔ APIキーを設定しました");
            }

            if let Some(provider) = set_provider {
                config.ai_provider = Some(provider);
                changed = true;
                println!("✔ AIプロバイダを設定しました: {}", provider);
            }

            if let Some(data) = set_data {
                println!("✔ 求人データを設定しました: {}", data.display());
                config.data_path = Some(data);
                changed = true;
            }

            if changed {
                config.save()?;
            }

            if show || !changed {
                println!("設定: {}", Config::config_path()?.display());
                println!(
                    "  AIプロバイダ: {}",
                    config.ai_provider.map(|p| p.to_string()).unwrap_or_else(|| "未設定".into())
                );
                println!("  モデル: {}", config.model);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!(
                    "  求人データ: {}",
                    config
                        .data_path
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "未設定".into())
                );
                println!("  抽出方式: {:?}", config.extraction);
                println!("  紹介文: {:?}", config.summary_style);
                println!(
                    "  件数閾値: {} / {}",
                    config.summary_limit,
                    config
                        .large_threshold
                        .map(|n| n.to_string())
                        .unwrap_or_else(|| "なし".into())
                );
                println!(
                    "  APIキー: {}",
                    if config.get_api_key().is_ok() { "設定済み" } else { "未設定" }
                );
                if let Err(e) = config.validate() {
                    println!("⚠ {}", e);
                }
            }
        }
    }

    Ok(())
}
