pub mod load;
pub mod types;

pub use load::default_screenshot_dir;
pub use types::{
    CollisionPolicy, Config, NamePattern, PictureTypeTable, SortOptions, TimestampPolicy,
};
