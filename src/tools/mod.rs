mod file_mover;
mod file_scanner;
mod path_validator;

pub use file_mover::move_file;
pub use file_scanner::{ScannedEntry, scan_entries};
pub use path_validator::{ensure_directory_exists, validate_directory_exists};
