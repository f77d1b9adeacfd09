mod apply;
mod category;
mod collision;
mod config;
mod error;
mod exif_reader;
mod extractor;
mod planner;
mod scanner;
mod template;
mod timestamp;

pub use apply::rename_directory;
pub use category::{MediaCategory, MediaKind};
pub use collision::{
    resolve_collision, ClaimedTargets, CollisionCheck, ExistingFiles, DEFAULT_MAX_SUFFIX_ATTEMPTS,
};
pub use config::{config_path, load_config, load_config_from, AppConfig};
pub use error::{RenameError, Result};
pub use exif_reader::{CaptureTimestampReader, ExifCaptureReader};
pub use extractor::{
    extract_timestamp, parse_capture_timestamp, split_extension, Extraction, Provenance,
    SourceFile,
};
pub use planner::{verify_directory, FileEntry, Outcome, RunMode, RunOptions, RunReport};
pub use scanner::{select_files, Selection};
pub use template::{
    format_name, parse_template, render_template, TemplateError, TemplatePart, Token,
};
pub use timestamp::Timestamp;
