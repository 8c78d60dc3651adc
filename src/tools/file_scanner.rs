use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ScannedEntry {
    pub path: PathBuf,
    pub is_file: bool,
    pub is_dir: bool,
}

/// 列出目錄下的項目（不跟隨符號連結），依檔名排序
///
/// `max_depth` 為 1 時只列出第一層；為 0 時不列出任何項目。
/// 結果會先完整收集，之後搬移檔案或建立資料夾不會影響已取得的清單。
pub fn scan_entries(directory: &Path, max_depth: usize) -> Result<Vec<ScannedEntry>> {
    if max_depth == 0 {
        return Ok(Vec::new());
    }

    WalkDir::new(directory)
        .follow_links(false)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .map(|entry| -> Result<ScannedEntry> {
            let entry =
                entry.with_context(|| format!("無法讀取目錄內容: {}", directory.display()))?;
            let file_type = entry.file_type();
            Ok(ScannedEntry {
                is_file: file_type.is_file(),
                is_dir: file_type.is_dir(),
                path: entry.into_path(),
            })
        })
        .collect()
}
