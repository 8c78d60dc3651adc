use anyhow::{Result, anyhow};
use log::LevelFilter;

/// 日誌等級名稱不分大小寫
pub fn parse_log_level(level: &str) -> Result<LevelFilter> {
    level
        .trim()
        .parse::<LevelFilter>()
        .map_err(|_| anyhow!("無效的日誌等級: {level}"))
}

pub fn init_logger(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .init();
}
