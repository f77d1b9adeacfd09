//! Timestamp extraction chain.
//!
//! Sources are tried in a fixed order (filename patterns, embedded metadata,
//! file system time) after a canonical-name short-circuit. The first source
//! that produces a value wins.

use crate::category::MediaCategory;
use crate::error::{RenameError, Result};
use crate::exif_reader::CaptureTimestampReader;
use crate::timestamp::Timestamp;
use chrono::{DateTime, Local};
use regex::Regex;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

static CAPTURE_DATE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn capture_date_pattern() -> &'static Regex {
    CAPTURE_DATE_PATTERN.get_or_init(|| {
        Regex::new(r"^([0-9]{4}):([0-9]{2}):([0-9]{2}) ([0-9]{2}):([0-9]{2}):([0-9]{2}).?$")
            .expect("capture date pattern is valid")
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    Pattern,
    Metadata,
    Filesystem,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Provenance::Pattern => "pattern",
            Provenance::Metadata => "metadata",
            Provenance::Filesystem => "filesystem",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    AlreadyCanonical,
    Resolved {
        timestamp: Timestamp,
        provenance: Provenance,
    },
}

/// A file picked for processing, split at the last `.` of its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub stem: String,
    pub extension: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|v| v.to_string_lossy().into_owned())
            .unwrap_or_default();
        let (stem, extension) = split_extension(&file_name);
        Self {
            stem: stem.to_string(),
            extension: extension.to_string(),
            path,
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}{}", self.stem, self.extension)
    }
}

/// Splits `name` into stem and extension at the last `.`; the extension keeps
/// its dot and is empty when there is none.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(pos) => name.split_at(pos),
        None => (name, ""),
    }
}

trait TimestampSource {
    fn provenance(&self) -> Provenance;

    /// `Ok(None)` means the source does not apply to this file.
    fn extract(&self, file: &SourceFile, category: &MediaCategory) -> Result<Option<Timestamp>>;
}

struct FilenamePatterns;

impl TimestampSource for FilenamePatterns {
    fn provenance(&self) -> Provenance {
        Provenance::Pattern
    }

    fn extract(&self, file: &SourceFile, category: &MediaCategory) -> Result<Option<Timestamp>> {
        Ok(category.match_name(&file.stem))
    }
}

struct EmbeddedMetadata<'a> {
    reader: &'a dyn CaptureTimestampReader,
}

impl TimestampSource for EmbeddedMetadata<'_> {
    fn provenance(&self) -> Provenance {
        Provenance::Metadata
    }

    fn extract(&self, file: &SourceFile, category: &MediaCategory) -> Result<Option<Timestamp>> {
        if !category.reads_metadata() {
            return Ok(None);
        }

        let raw = match self.reader.read_capture_timestamp(&file.path) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(path = %file.path.display(), "no capture timestamp in metadata");
                return Ok(None);
            }
            Err(err) => {
                warn!(path = %file.path.display(), error = %err, "unreadable metadata");
                return Ok(None);
            }
        };

        let parsed = parse_capture_timestamp(&raw);
        if parsed.is_none() {
            warn!(path = %file.path.display(), value = %raw, "bad capture timestamp in metadata");
        }
        Ok(parsed)
    }
}

struct FilesystemTime;

impl TimestampSource for FilesystemTime {
    fn provenance(&self) -> Provenance {
        Provenance::Filesystem
    }

    fn extract(&self, file: &SourceFile, _category: &MediaCategory) -> Result<Option<Timestamp>> {
        let created = file_created_to_local(&file.path)?;
        Ok(Some(Timestamp::from_local(&created)))
    }
}

pub fn extract_timestamp(
    file: &SourceFile,
    category: &MediaCategory,
    reader: &dyn CaptureTimestampReader,
) -> Result<Extraction> {
    if category.is_canonical(&file.stem) {
        return Ok(Extraction::AlreadyCanonical);
    }

    let sources: [&dyn TimestampSource; 3] = [
        &FilenamePatterns,
        &EmbeddedMetadata { reader },
        &FilesystemTime,
    ];

    for source in sources {
        if let Some(timestamp) = source.extract(file, category)? {
            let provenance = source.provenance();
            info!(path = %file.path.display(), %provenance, %timestamp, "timestamp resolved");
            return Ok(Extraction::Resolved {
                timestamp,
                provenance,
            });
        }
    }

    Err(RenameError::NoTimestamp {
        path: file.path.clone(),
    })
}

/// Parses `YYYY:MM:DD HH:MM:SS`, allowing one trailing character after the
/// seconds.
pub fn parse_capture_timestamp(raw: &str) -> Option<Timestamp> {
    let caps = capture_date_pattern().captures(raw)?;
    Timestamp::from_captures(&caps)
}

/// Creation time in local time. Platforms without a birth time report the
/// last modification instead.
fn file_created_to_local(path: &Path) -> Result<DateTime<Local>> {
    let attribute_error = |source| RenameError::FilesystemAttribute {
        path: path.to_path_buf(),
        source,
    };
    let metadata = fs::metadata(path).map_err(attribute_error)?;
    let time = match metadata.created() {
        Ok(time) => time,
        Err(_) => metadata.modified().map_err(attribute_error)?,
    };
    Ok(DateTime::from(time))
}
