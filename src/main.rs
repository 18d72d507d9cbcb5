use anyhow::Result;
use auto_archive_cleaner::component::BatchDriver;
use auto_archive_cleaner::component::batch_driver::{BatchSummary, DEFAULT_MANIFEST_FILE};
use auto_archive_cleaner::config::{Config, DEFAULT_CONFIG_FILE};
use auto_archive_cleaner::init::{DEFAULT_LOG_FILE, init_logging};
use auto_archive_cleaner::signal::setup_shutdown_signal;
use auto_archive_cleaner::tools::validate_directory_exists;
use clap::Parser;
use console::style;
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

/// 批次解壓 zip/rar/iso，依設定保留指定副檔名並產生檔案清單
#[derive(Debug, Parser)]
#[command(name = "auto_archive_cleaner", version, about)]
struct Cli {
    /// 要掃描壓縮檔的根目錄
    root: PathBuf,

    /// 設定檔路徑
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// 日誌檔路徑
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// 檔案清單輸出路徑
    #[arg(short, long, default_value = DEFAULT_MANIFEST_FILE)]
    manifest: PathBuf,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if let Err(e) = validate_directory_exists(&cli.root) {
        eprintln!("{} {}", style("錯誤:").red().bold(), e);
        eprintln!("用法: auto_archive_cleaner <目錄路徑>");
        return Ok(ExitCode::from(2));
    }

    init_logging(&cli.log_file)?;

    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("設定載入失敗: {e:#}");
            return Err(e);
        }
    };

    let shutdown_signal = setup_shutdown_signal()?;
    let driver = BatchDriver::new(config, shutdown_signal);

    let summary = match driver.run(&cli.root, &cli.manifest) {
        Ok(summary) => summary,
        Err(e) => {
            error!("批次處理失敗: {e:#}");
            return Err(e);
        }
    };

    print_summary(&summary);

    if summary.interrupted {
        info!("程式因中斷訊號結束");
        return Ok(ExitCode::from(130));
    }

    info!("程式正常結束");
    Ok(ExitCode::SUCCESS)
}

fn print_summary(summary: &BatchSummary) {
    println!();
    println!("{}", style("=== 處理結果 ===").cyan().bold());
    println!("  找到壓縮檔: {} 個", summary.archives_found);
    println!("  完成清理: {} 個", style(summary.archives_cleaned).green());

    if summary.archives_failed > 0 {
        println!("  解壓失敗: {} 個", style(summary.archives_failed).red());
    }

    match &summary.manifest_path {
        Some(path) => println!(
            "  檔案清單: {} ({} 列)",
            style(path.display()).green(),
            summary.manifest_rows
        ),
        None => println!(
            "  {}",
            style(format!(
                "已中斷（處理 {}/{} 個），未產生檔案清單",
                summary.archives_processed, summary.archives_found
            ))
            .yellow()
        ),
    }
}
