use super::filename_parser::{FilenameParser, ParseError};
use crate::config::{CollisionPolicy, Config, PictureTypeTable, SortOptions, TimestampPolicy};
use crate::tools::{ScannedEntry, ensure_directory_exists, move_file, scan_entries};
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use log::{debug, info, warn};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// 略過原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// 不是一般檔案或副檔名不是圖片
    NotPicture,
    /// 檔名不符合截圖格式
    Unparsed,
    /// 時間戳記數值超出範圍
    InvalidTimestamp,
    /// 已經位於 `<遊戲>/<年份>` 資料夾中
    AlreadySorted,
}

/// 一筆待搬移的截圖
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMove {
    pub game: String,
    pub captured_at: NaiveDateTime,
    pub source: PathBuf,
    pub destination_dir: PathBuf,
    pub destination: PathBuf,
}

/// 掃描分類結果，尚未對檔案系統做任何修改
#[derive(Debug, Default)]
pub struct SortPlan {
    pub moves: Vec<PlannedMove>,
    pub skipped: Vec<(PathBuf, SkipReason)>,
}

/// 整理結果
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SortSummary {
    /// 各遊戲搬移的截圖數量
    pub game_counts: BTreeMap<String, usize>,
    pub not_pictures: usize,
    pub unparsed: usize,
    pub invalid_timestamps: usize,
    pub already_sorted: usize,
    /// 目標檔案已存在而保留原處的數量
    pub existing_destinations: usize,
}

impl SortSummary {
    #[must_use]
    pub fn files_moved(&self) -> usize {
        self.game_counts.values().sum()
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.not_pictures
            + self.unparsed
            + self.invalid_timestamps
            + self.already_sorted
            + self.existing_destinations
    }

    fn record_move(&mut self, game: &str) {
        *self.game_counts.entry(game.to_string()).or_insert(0) += 1;
    }

    fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::NotPicture => self.not_pictures += 1,
            SkipReason::Unparsed => self.unparsed += 1,
            SkipReason::InvalidTimestamp => self.invalid_timestamps += 1,
            SkipReason::AlreadySorted => self.already_sorted += 1,
        }
    }
}

/// `base/<遊戲>/<四位數年份>`
#[must_use]
pub fn destination_dir(base: &Path, game: &str, year: i32) -> PathBuf {
    base.join(game).join(format!("{year:04}"))
}

/// 檔案所在資料夾位於掃描根目錄之下，且已經是 `<遊戲>/<年份>`
///
/// 掃描根目錄本身不算，直接對 `.../DOOMx64/2016` 執行時仍會整理其中的截圖。
fn is_already_sorted(parent: &Path, root: &Path, game: &str, year: i32) -> bool {
    parent != root
        && parent.starts_with(root)
        && parent.ends_with(Path::new(game).join(format!("{year:04}")))
}

/// 目標路徑上已有項目，包含失效的符號連結
fn is_occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// 截圖分類器
pub struct ScreenshotClassifier {
    picture_types: PictureTypeTable,
    options: SortOptions,
    parser: FilenameParser,
}

impl ScreenshotClassifier {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            parser: FilenameParser::new(config.options.pattern),
            picture_types: config.picture_types,
            options: config.options,
        }
    }

    /// 掃描並分類目錄中的項目，`max_depth` 為 1 時不進入子資料夾
    pub fn scan_and_classify(&self, directory: &Path, max_depth: usize) -> Result<SortPlan> {
        info!("開始掃描目錄: {}", directory.display());

        let entries = scan_entries(directory, max_depth)?;
        let mut plan = SortPlan::default();
        for entry in &entries {
            self.classify_entry(entry, directory, &mut plan)?;
        }

        info!(
            "找到 {} 個待整理截圖，略過 {} 個項目",
            plan.moves.len(),
            plan.skipped.len()
        );
        Ok(plan)
    }

    fn classify_entry(
        &self,
        entry: &ScannedEntry,
        root: &Path,
        plan: &mut SortPlan,
    ) -> Result<()> {
        let path = &entry.path;
        if entry.is_dir {
            info!("{} 是資料夾，略過", path.display());
            return Ok(());
        }

        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            warn!("檔名不是有效的 UTF-8，略過: {}", path.display());
            plan.skipped.push((path.clone(), SkipReason::Unparsed));
            return Ok(());
        };

        if !self.picture_types.is_picture(path, entry.is_file) {
            info!("{name} 不是圖片檔，略過");
            plan.skipped.push((path.clone(), SkipReason::NotPicture));
            return Ok(());
        }

        let screenshot = match self.parser.parse(name) {
            Ok(screenshot) => screenshot,
            Err(ParseError::NoMatch(_)) => {
                warn!("無法解析檔名: {name}");
                plan.skipped.push((path.clone(), SkipReason::Unparsed));
                return Ok(());
            }
            Err(err) => match self.options.timestamp_policy {
                TimestampPolicy::Skip => {
                    warn!("{name}: {err}，略過");
                    plan.skipped.push((path.clone(), SkipReason::InvalidTimestamp));
                    return Ok(());
                }
                TimestampPolicy::Abort => {
                    return Err(err)
                        .with_context(|| format!("無法解析截圖時間: {}", path.display()));
                }
            },
        };

        let year = screenshot.year();
        let parent = path
            .parent()
            .with_context(|| format!("無法取得檔案所在資料夾: {}", path.display()))?;
        let base = self.options.destination.as_deref().unwrap_or(parent);
        let destination_dir = destination_dir(base, &screenshot.game, year);

        let already_sorted = match self.options.destination {
            Some(_) => parent == destination_dir,
            None => is_already_sorted(parent, root, &screenshot.game, year),
        };
        if already_sorted {
            debug!("{name} 已在 {}/{year:04} 中", screenshot.game);
            plan.skipped.push((path.clone(), SkipReason::AlreadySorted));
            return Ok(());
        }

        let destination = destination_dir.join(name);

        plan.moves.push(PlannedMove {
            game: screenshot.game,
            captured_at: screenshot.captured_at,
            source: path.clone(),
            destination_dir,
            destination,
        });
        Ok(())
    }

    /// 依計畫建立資料夾並搬移截圖
    ///
    /// 試執行與實際執行使用相同的衝突判斷，統計結果一致。
    /// 檔案系統錯誤會中止執行，已搬移的檔案不會還原。
    pub fn move_screenshots(&self, plan: &SortPlan) -> Result<SortSummary> {
        let mut summary = SortSummary::default();
        for (_, reason) in &plan.skipped {
            summary.record_skip(*reason);
        }

        // 本次執行中已被佔用的目標路徑
        let mut claimed: HashSet<&Path> = HashSet::new();

        for planned in &plan.moves {
            let name = planned
                .source
                .file_name()
                .unwrap_or_default()
                .to_string_lossy();

            let taken = claimed.contains(planned.destination.as_path())
                || is_occupied(&planned.destination);
            if taken && self.options.collision_policy == CollisionPolicy::Skip {
                warn!("目標檔案已存在，略過: {}", planned.destination.display());
                summary.existing_destinations += 1;
                continue;
            }
            claimed.insert(planned.destination.as_path());

            if self.options.dry_run {
                info!("[試執行] {name} -> {}", planned.destination_dir.display());
                summary.record_move(&planned.game);
                continue;
            }

            ensure_directory_exists(&planned.destination_dir)?;

            info!("移動 {name} 到 {}", planned.destination_dir.display());
            move_file(&planned.source, &planned.destination)?;
            summary.record_move(&planned.game);
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NamePattern;
    use std::fs;
    use tempfile::TempDir;

    fn create_classifier(options: SortOptions) -> ScreenshotClassifier {
        let config = Config::new().expect("Failed to load config");
        ScreenshotClassifier::new(config.with_options(options))
    }

    #[test]
    fn test_destination_dir_is_deterministic() {
        let base = Path::new("/screens");
        let first = destination_dir(base, "DOOMx64", 2016);
        assert_eq!(first, PathBuf::from("/screens/DOOMx64/2016"));
        assert_eq!(first, destination_dir(base, "DOOMx64", 2016));
        assert_eq!(
            destination_dir(base, "Old", 999),
            PathBuf::from("/screens/Old/0999")
        );
    }

    #[test]
    fn test_is_already_sorted() {
        let root = Path::new("/s");
        let sorted = Path::new("/s/DOOMx64/2016");
        assert!(is_already_sorted(sorted, root, "DOOMx64", 2016));
        assert!(!is_already_sorted(sorted, root, "DOOMx64", 2017));
        assert!(!is_already_sorted(root, root, "DOOMx64", 2016));

        let nested_game = Path::new("/s/pc1/Heat_Signature/2019");
        assert!(is_already_sorted(nested_game, root, "Heat_Signature", 2019));
    }

    #[test]
    fn test_scan_root_shaped_like_game_year_is_not_already_sorted() {
        let root = Path::new("/s/DOOMx64/2016");
        assert!(!is_already_sorted(root, root, "DOOMx64", 2016));
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_counts_as_occupied() {
        let temp_dir = TempDir::new().unwrap();
        let link = temp_dir.path().join("link.jpg");
        std::os::unix::fs::symlink(temp_dir.path().join("missing.jpg"), &link).unwrap();

        assert!(!link.exists());
        assert!(is_occupied(&link));
        assert!(!is_occupied(&temp_dir.path().join("other.jpg")));
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_at_destination_is_kept() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();
        let name = "DOOMx64_2016_05_17_14_21_03_678.jpg";
        fs::write(base.join(name), "shot").unwrap();
        fs::create_dir_all(base.join("DOOMx64/2016")).unwrap();
        let link = base.join("DOOMx64/2016").join(name);
        std::os::unix::fs::symlink(base.join("missing.jpg"), &link).unwrap();

        let classifier = create_classifier(SortOptions::default());
        let plan = classifier.scan_and_classify(base, 1).unwrap();
        let summary = classifier.move_screenshots(&plan).unwrap();

        assert_eq!(summary.existing_destinations, 1);
        assert!(base.join(name).exists());
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    }

    #[test]
    fn test_scan_and_classify() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();

        fs::write(base.join("DOOMx64_2016_05_17_14_21_03_678.jpg"), "a").unwrap();
        fs::write(base.join("Heat_Signature_2019_07_20_17_17_30_462.PNG"), "b").unwrap();
        fs::write(base.join("Game_2016_13_01_00_00_00_000.jpg"), "c").unwrap();
        fs::write(base.join("randomfile.jpg"), "d").unwrap();
        fs::write(base.join("notes.txt"), "e").unwrap();
        fs::create_dir(base.join("folder.png")).unwrap();

        let classifier = create_classifier(SortOptions::default());
        let plan = classifier.scan_and_classify(base, 1).unwrap();

        assert_eq!(plan.moves.len(), 2);
        let doom = plan.moves.iter().find(|m| m.game == "DOOMx64").unwrap();
        assert_eq!(doom.destination_dir, base.join("DOOMx64").join("2016"));
        assert_eq!(
            doom.destination,
            base.join("DOOMx64/2016/DOOMx64_2016_05_17_14_21_03_678.jpg")
        );

        let reasons: Vec<SkipReason> = plan.skipped.iter().map(|(_, r)| *r).collect();
        assert_eq!(reasons.len(), 3);
        assert!(reasons.contains(&SkipReason::NotPicture));
        assert!(reasons.contains(&SkipReason::Unparsed));
        assert!(reasons.contains(&SkipReason::InvalidTimestamp));

        // 分類階段不會修改檔案系統
        assert!(base.join("DOOMx64_2016_05_17_14_21_03_678.jpg").exists());
        assert!(!base.join("DOOMx64").exists());
    }

    #[test]
    fn test_strict_policy_aborts_on_invalid_timestamp() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("Game_2016_05_32_00_00_00_000.jpg"),
            "x",
        )
        .unwrap();

        let classifier = create_classifier(SortOptions {
            timestamp_policy: TimestampPolicy::Abort,
            ..SortOptions::default()
        });
        let err = classifier.scan_and_classify(temp_dir.path(), 1).unwrap_err();
        assert!(err.downcast_ref::<ParseError>().is_some());
    }

    #[test]
    fn test_first_underscore_pattern_skips_underscored_game() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("Heat_Signature_2019_07_20_17_17_30_462.jpg"),
            "x",
        )
        .unwrap();

        let classifier = create_classifier(SortOptions {
            pattern: NamePattern::FirstUnderscore,
            ..SortOptions::default()
        });
        let plan = classifier.scan_and_classify(temp_dir.path(), 1).unwrap();

        assert!(plan.moves.is_empty());
        assert_eq!(plan.skipped[0].1, SkipReason::InvalidTimestamp);
    }

    #[test]
    fn test_move_screenshots_and_summary() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();
        fs::write(base.join("DOOMx64_2016_05_17_14_21_03_678.jpg"), "a").unwrap();
        fs::write(base.join("DOOMx64_2017_01_01_00_00_00_000.jpg"), "b").unwrap();
        fs::write(base.join("notes.txt"), "c").unwrap();

        let classifier = create_classifier(SortOptions::default());
        let plan = classifier.scan_and_classify(base, 1).unwrap();
        let summary = classifier.move_screenshots(&plan).unwrap();

        assert_eq!(summary.game_counts.get("DOOMx64"), Some(&2));
        assert_eq!(summary.files_moved(), 2);
        assert_eq!(summary.not_pictures, 1);
        assert_eq!(summary.skipped(), 1);
        assert!(base.join("DOOMx64/2016/DOOMx64_2016_05_17_14_21_03_678.jpg").exists());
        assert!(base.join("DOOMx64/2017/DOOMx64_2017_01_01_00_00_00_000.jpg").exists());
    }
}
