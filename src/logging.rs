//! Logging Module
//!
//! コマンドラインツール用のロガー初期化。ログは標準エラー出力に書き出され、
//! 標準出力はコマンドの結果のみに使われます。

use log::LevelFilter;
use simple_logger::SimpleLogger;

/// 詳細度フラグからログレベルを決定する
pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

/// ロガーを初期化し、有効になったレベルを返す
///
/// すでにロガーが設定されている場合は何もしません。
pub fn init_logging(verbose: bool) -> LevelFilter {
    let level = level_for(verbose);
    let _ = SimpleLogger::new()
        .with_level(level)
        .without_timestamps()
        .init();
    level
}
