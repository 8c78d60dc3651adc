use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PictureTypeTable {
    #[serde(rename = "PICTURE_FILE")]
    pub picture_file: Vec<String>,
}

impl PictureTypeTable {
    /// 只看檔名的副檔名（不分大小寫，不含前導點），不檢查檔案是否存在
    #[must_use]
    pub fn has_picture_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.picture_file
                    .iter()
                    .any(|known| known.trim_start_matches('.').eq_ignore_ascii_case(ext))
            })
    }

    /// 一般檔案且副檔名屬於圖片
    #[must_use]
    pub fn is_picture(&self, path: &Path, is_file: bool) -> bool {
        is_file && self.has_picture_extension(path)
    }
}

/// 檔名拆解方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum NamePattern {
    /// 遊戲名稱 = 最後七個數字欄位之前的所有內容（允許底線）
    #[default]
    #[value(name = "suffix")]
    TimestampSuffix,
    /// 遊戲名稱 = 第一個底線之前的內容
    #[value(name = "first-underscore")]
    FirstUnderscore,
}

/// 時間戳記數值超出範圍時的處理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampPolicy {
    /// 記錄警告並略過該檔案
    #[default]
    Skip,
    /// 中止整個執行
    Abort,
}

/// 目標檔案已存在時的處理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// 保留來源檔案不動
    #[default]
    Skip,
    /// 直接覆蓋目標檔案
    Overwrite,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortOptions {
    pub pattern: NamePattern,
    pub timestamp_policy: TimestampPolicy,
    pub collision_policy: CollisionPolicy,
    /// 目標根目錄，未指定時使用檔案所在的資料夾
    pub destination: Option<PathBuf>,
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub picture_types: PictureTypeTable,
    pub options: SortOptions,
}
