use crate::config::{CollisionPolicy, NamePattern, SortOptions, TimestampPolicy};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "screenshot-sorter", about = "Screenshots sorter", version)]
pub struct Cli {
    /// Directory with screenshots [default: ~/Pictures/screen]
    pub dir: Option<PathBuf>,

    /// Logging level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Descend into subdirectories up to this depth (1 = top level only)
    #[arg(long)]
    pub depth: Option<usize>,

    /// Root for the game folders instead of the screenshot's own directory
    #[arg(long)]
    pub dest: Option<PathBuf>,

    /// How to split the game name from the timestamp
    #[arg(long, value_enum, default_value_t = NamePattern::TimestampSuffix)]
    pub pattern: NamePattern,

    /// Abort the run on an out-of-range timestamp instead of skipping the file
    #[arg(long)]
    pub strict: bool,

    /// Replace files that already exist at the destination
    #[arg(long)]
    pub overwrite: bool,

    /// Log what would be moved without touching any file
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    #[must_use]
    pub fn sort_options(&self) -> SortOptions {
        SortOptions {
            pattern: self.pattern,
            timestamp_policy: if self.strict {
                TimestampPolicy::Abort
            } else {
                TimestampPolicy::Skip
            },
            collision_policy: if self.overwrite {
                CollisionPolicy::Overwrite
            } else {
                CollisionPolicy::Skip
            },
            destination: self.dest.clone(),
            dry_run: self.dry_run,
        }
    }
}
