//! 截圖檔名拆解模組
//!
//! `DOOMx64_2016_05_17_14_21_03_678.jpg` -> (`DOOMx64`, `2016_05_17_14_21_03_678`)
//! `Heat_Signature_2019_07_20_17_17_30_462.jpg` -> (`Heat_Signature`, `2019_07_20_17_17_30_462`)

use crate::config::NamePattern;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use log::debug;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// 時間戳記欄位數：年、月、日、時、分、秒、毫秒
pub const TIMESTAMP_FIELDS: usize = 7;

static REGEX_FIRST_UNDERSCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^_]+)_([^.]+)").expect("Invalid regex"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("無法解析檔名: {0}")]
    NoMatch(String),
    #[error("時間戳記欄位數量錯誤: 需要 7 個，實際 {0} 個")]
    FieldCount(usize),
    #[error("時間戳記欄位不是數字: {0:?}")]
    InvalidNumber(String),
    #[error("時間戳記不是有效的日期時間: {0}")]
    InvalidDate(String),
}

impl ParseError {
    /// 檔名符合格式，但時間戳記本身有問題
    #[must_use]
    pub const fn is_timestamp_error(&self) -> bool {
        !matches!(self, Self::NoMatch(_))
    }
}

/// 從檔名取出的遊戲名稱與擷取時間
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenshotName {
    pub game: String,
    pub captured_at: NaiveDateTime,
}

impl ScreenshotName {
    #[must_use]
    pub fn year(&self) -> i32 {
        self.captured_at.year()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FilenameParser {
    pattern: NamePattern,
}

impl FilenameParser {
    #[must_use]
    pub const fn new(pattern: NamePattern) -> Self {
        Self { pattern }
    }

    /// 將檔名拆成（遊戲名稱, 時間戳記字串），不符合格式時回傳 `None`
    #[must_use]
    pub fn decompose<'a>(&self, file_name: &'a str) -> Option<(&'a str, &'a str)> {
        let (game, timestamp) = match self.pattern {
            NamePattern::TimestampSuffix => split_timestamp_suffix(file_name)?,
            NamePattern::FirstUnderscore => split_first_underscore(file_name)?,
        };

        // 遊戲名稱會成為路徑的一段，不能指向上層或目前目錄
        if game.is_empty() || game == "." || game == ".." {
            return None;
        }
        Some((game, timestamp))
    }

    pub fn parse(&self, file_name: &str) -> Result<ScreenshotName, ParseError> {
        let (game, timestamp) = self
            .decompose(file_name)
            .ok_or_else(|| ParseError::NoMatch(file_name.to_string()))?;
        debug!("groups: ({game}, {timestamp})");

        Ok(ScreenshotName {
            game: game.to_string(),
            captured_at: parse_timestamp(timestamp)?,
        })
    }
}

/// 從檔名主體的尾端往回找七個以 `_` 分隔的數字欄位，其前方全部視為遊戲名稱
fn split_timestamp_suffix(file_name: &str) -> Option<(&str, &str)> {
    let stem = file_name.rsplit_once('.').map_or(file_name, |(stem, _)| stem);

    let mut boundary = stem.len();
    for _ in 0..TIMESTAMP_FIELDS {
        let head = &stem[..boundary];
        let separator = head.rfind('_')?;
        let field = &head[separator + 1..];
        if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        boundary = separator;
    }

    Some((&stem[..boundary], &stem[boundary + 1..]))
}

fn split_first_underscore(file_name: &str) -> Option<(&str, &str)> {
    let captures = REGEX_FIRST_UNDERSCORE.captures(file_name)?;
    Some((captures.get(1)?.as_str(), captures.get(2)?.as_str()))
}

/// 將 `年_月_日_時_分_秒_毫秒` 轉為日期時間
pub fn parse_timestamp(timestamp: &str) -> Result<NaiveDateTime, ParseError> {
    let fields = timestamp
        .split('_')
        .map(|field| {
            field
                .parse::<u32>()
                .map_err(|_| ParseError::InvalidNumber(field.to_string()))
        })
        .collect::<Result<Vec<u32>, _>>()?;

    let &[year, month, day, hour, minute, second, millisecond] = fields.as_slice() else {
        return Err(ParseError::FieldCount(fields.len()));
    };

    let invalid = || ParseError::InvalidDate(timestamp.to_string());
    // chrono 允許 1000..=1999 表示閏秒，這裡不接受
    if millisecond > 999 {
        return Err(invalid());
    }
    let year = i32::try_from(year).map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_milli_opt(hour, minute, second, millisecond))
        .ok_or_else(invalid)
}
