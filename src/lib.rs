pub mod config;
pub mod dom_renderer;
pub mod engine;
pub mod error;
pub mod ui;
pub mod widgets;

#[cfg(not(target_arch = "wasm32"))]
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod wasm_entry;

use std::env;

pub use config::{CarouselConfig, SiteConfig};
pub use engine::{Carousel, ManualScheduler, Scheduler, TrackFrame, TrackGeometry};
pub use error::ConfigError;
pub use ui::event::CarouselEvent;

// ========================================
// コマンドライン引数構造体
// ========================================

/// コマンドライン引数の設定
#[derive(Debug)]
pub struct CliArgs {
    pub config_path: Option<String>,
    pub script_path: Option<String>,
    /// JSON の代わりにトラックの HTML を出力する
    pub html: bool,
    pub quiet: bool, // panic以外のログを抑制
    pub log_level: LogLevel,
}

#[derive(Debug, Clone)]
pub enum LogLevel {
    Off,   // ログを一切表示しない（panicは除く）
    Error, // エラーレベルのみ
    Warn,  // 警告レベル以上
    Info,  // 情報レベル以上
    Debug, // デバッグレベル以上
    Trace, // 全てのログ
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            config_path: None,
            script_path: None,
            html: false,
            quiet: false,
            log_level: LogLevel::Info,
        }
    }
}

pub fn parse_args() -> CliArgs {
    let args: Vec<String> = env::args().collect();
    parse_arg_list(args.iter().skip(1).map(String::as_str))
}

fn parse_arg_list<'a>(args: impl Iterator<Item = &'a str>) -> CliArgs {
    let mut cli_args = CliArgs::default();

    for arg in args {
        match arg {
            "--html" => cli_args.html = true,
            "--quiet" | "-q" => {
                cli_args.quiet = true;
                cli_args.log_level = LogLevel::Off;
            }
            "--log-level=off" => cli_args.log_level = LogLevel::Off,
            "--log-level=error" => cli_args.log_level = LogLevel::Error,
            "--log-level=warn" => cli_args.log_level = LogLevel::Warn,
            "--log-level=info" => cli_args.log_level = LogLevel::Info,
            "--log-level=debug" => cli_args.log_level = LogLevel::Debug,
            "--log-level=trace" => cli_args.log_level = LogLevel::Trace,
            "--help" | "-h" => {
                show_help();
                std::process::exit(0);
            }
            other => {
                if let Some(path) = other.strip_prefix("--config=") {
                    cli_args.config_path = Some(path.to_string());
                } else if let Some(path) = other.strip_prefix("--script=") {
                    cli_args.script_path = Some(path.to_string());
                }
            }
        }
    }
    cli_args
}

/// ヘルプの本文
pub fn help_text() -> &'static str {
    "slidekit carousel simulator

USAGE:
    slidekit --script=PATH [OPTIONS]

OPTIONS:
    --script=PATH            JSON event script to replay
    --config=PATH            Site config (JSON). Defaults are used when omitted
    --html                   Print the track markup of the final frame instead of JSON lines
    --quiet, -q              Suppress all logs except panics
    --log-level=LEVEL        Set log level (off/error/warn/info/debug/trace)
    --help, -h               Show this help"
}

/// ロガー初期化前に呼ばれるので、ログではなく直接書き出す
pub fn write_help<W: std::io::Write>(out: &mut W) -> std::io::Result<()> {
    writeln!(out, "{}", help_text())
}

pub fn show_help() {
    let _ = write_help(&mut std::io::stdout());
}

/// ログレベルを初期化する関数
pub fn init_logger(log_level: &LogLevel) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::sync::Once;

    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let level = match log_level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        };

        let mut builder = Builder::from_default_env();

        if matches!(log_level, LogLevel::Off) {
            // quietモードの場合、何も出力しない（panicは別途処理される）
            builder
                .filter_level(LevelFilter::Off)
                .format(|_, _| Ok(()))
                .try_init()
                .ok(); // エラーを無視
        } else {
            // フレームは stdout に出すので、ログは stderr
            builder
                .filter_level(level)
                .target(env_logger::Target::Stderr)
                .format_timestamp_secs()
                .try_init()
                .ok(); // エラーを無視
        }
    });
}
