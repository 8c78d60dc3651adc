use crate::config::types::{Config, PictureTypeTable, SortOptions};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// 編譯時嵌入的圖片副檔名設定（不需要外部檔案）
const PICTURE_TYPE_TABLE_JSON: &str = include_str!("../data/picture_extensions.json");

impl Config {
    pub fn new() -> Result<Self> {
        Ok(Self {
            picture_types: Self::load_embedded_picture_types()?,
            options: SortOptions::default(),
        })
    }

    #[must_use]
    pub fn with_options(mut self, options: SortOptions) -> Self {
        self.options = options;
        self
    }

    /// 從編譯時嵌入的 JSON 載入圖片副檔名表
    fn load_embedded_picture_types() -> Result<PictureTypeTable> {
        serde_json::from_str(PICTURE_TYPE_TABLE_JSON).context("無法解析嵌入的圖片副檔名設定")
    }
}

/// 預設的截圖資料夾：`~/Pictures/screen`
///
/// 在啟動時計算一次，再以參數傳入整理流程。
pub fn default_screenshot_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("無法取得使用者家目錄")?;
    Ok(home.join("Pictures").join("screen"))
}
