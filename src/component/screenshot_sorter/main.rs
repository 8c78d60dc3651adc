use super::screenshot_classifier::{ScreenshotClassifier, SortSummary};
use crate::config::Config;
use crate::tools::validate_directory_exists;
use anyhow::Result;
use log::info;
use std::path::Path;

/// 截圖整理元件
pub struct ScreenshotSorter {
    classifier: ScreenshotClassifier,
    dry_run: bool,
}

impl ScreenshotSorter {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            dry_run: config.options.dry_run,
            classifier: ScreenshotClassifier::new(config),
        }
    }

    /// 整理並記錄結果；`depth` 為 `None` 時只處理第一層
    pub fn run(&self, directory: &Path, depth: Option<usize>) -> Result<SortSummary> {
        let summary = match depth {
            Some(max_depth) => self.sort_tree(directory, max_depth)?,
            None => self.sort_directory(directory)?,
        };

        self.log_result(&summary);
        Ok(summary)
    }

    /// 只整理目錄第一層的截圖，子資料夾保持不動
    pub fn sort_directory(&self, directory: &Path) -> Result<SortSummary> {
        self.sort_tree(directory, 1)
    }

    /// 遞迴整理到 `max_depth` 層，每個檔案移到所在資料夾下的 `<遊戲>/<年份>`
    pub fn sort_tree(&self, directory: &Path, max_depth: usize) -> Result<SortSummary> {
        validate_directory_exists(directory)?;

        let plan = self.classifier.scan_and_classify(directory, max_depth)?;
        if plan.moves.is_empty() {
            info!("找不到任何待整理的截圖");
        }

        self.classifier.move_screenshots(&plan)
    }

    fn log_result(&self, summary: &SortSummary) {
        if self.dry_run {
            info!("試執行模式，未移動任何檔案");
        }

        for (game, count) in &summary.game_counts {
            info!("{game} 截圖數量: {count}");
        }

        if summary.skipped() > 0 {
            info!(
                "已略過 {} 個項目 (非圖片: {}, 無法解析: {}, 時間無效: {}, 已整理: {}, 目標已存在: {})",
                summary.skipped(),
                summary.not_pictures,
                summary.unparsed,
                summary.invalid_timestamps,
                summary.already_sorted,
                summary.existing_destinations
            );
        }

        info!("完成！共 {} 個截圖", summary.files_moved());
    }
}
