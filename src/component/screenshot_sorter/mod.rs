//! 截圖整理元件
//!
//! 從截圖檔名取出遊戲名稱與擷取時間，移動到 `<遊戲>/<年份>` 資料夾

mod filename_parser;
mod main;
mod screenshot_classifier;

pub use filename_parser::{
    FilenameParser, ParseError, ScreenshotName, TIMESTAMP_FIELDS, parse_timestamp,
};
pub use main::ScreenshotSorter;
pub use screenshot_classifier::{
    PlannedMove, ScreenshotClassifier, SkipReason, SortPlan, SortSummary, destination_dir,
};
