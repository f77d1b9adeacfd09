use crate::error::Result;
use crate::template::{format_name, parse_template, TemplatePart};
use crate::timestamp::Timestamp;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Pictures,
    Videos,
}

/// Fixed description of one class of media: which files belong to it, how
/// timestamps are read from their names, and what a canonical name looks like.
#[derive(Debug, Clone)]
pub struct MediaCategory {
    kind: MediaKind,
    name: &'static str,
    extensions: &'static [&'static str],
    name_patterns: Vec<Regex>,
    reads_metadata: bool,
    canonical_pattern: Regex,
    template: Vec<TemplatePart>,
}

impl MediaCategory {
    pub fn pictures() -> Result<Self> {
        Ok(Self {
            kind: MediaKind::Pictures,
            name: "pictures",
            extensions: &[".jpg", ".jpeg"],
            name_patterns: compile(&[
                r"^([0-9]{4})-([0-9]{2})-([0-9]{2}) ([0-9]{2})\.([0-9]{2})\.([0-9]{2})$",
                r"^([0-9]{4})([0-9]{2})([0-9]{2})_([0-9]{2})([0-9]{2})([0-9]{2})$",
                r"^([0-9]{4})-([0-9]{2})-([0-9]{2})-([0-9]{2})-([0-9]{2})-([0-9]{2})-.+$",
                r"^IMG_([0-9]{4})([0-9]{2})([0-9]{2})_([0-9]{2})([0-9]{2})([0-9]{2})(?:_[0-9]+|~[0-9]+)?$",
            ])?,
            reads_metadata: true,
            canonical_pattern: Regex::new(
                r"^img-([0-9]{4})-([0-9]{2})-([0-9]{2})-([0-9]{2})-([0-9]{2})-([0-9]{2})(?:-[0-9]+)?$",
            )?,
            template: parse_template("img-{year}-{month}-{day}-{hour}-{minute}-{second}")?,
        })
    }

    pub fn videos() -> Result<Self> {
        Ok(Self {
            kind: MediaKind::Videos,
            name: "videos",
            extensions: &[".mov", ".mp4", ".avi"],
            name_patterns: compile(&[
                r"^VID_([0-9]{4})([0-9]{2})([0-9]{2})_([0-9]{2})([0-9]{2})([0-9]{2})(?:_[0-9]+|~[0-9]+)?$",
            ])?,
            reads_metadata: false,
            canonical_pattern: Regex::new(
                r"^video-([0-9]{4})-([0-9]{2})-([0-9]{2})-([0-9]{2})-([0-9]{2})-([0-9]{2})(?:-[0-9]+)?$",
            )?,
            template: parse_template("video-{year}-{month}-{day}-{hour}-{minute}-{second}")?,
        })
    }

    pub fn for_kind(kind: MediaKind) -> Result<Self> {
        match kind {
            MediaKind::Pictures => Self::pictures(),
            MediaKind::Videos => Self::videos(),
        }
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        self.extensions
    }

    pub fn reads_metadata(&self) -> bool {
        self.reads_metadata
    }

    pub fn matches_extension(&self, file_name: &str) -> bool {
        let lower = file_name.to_ascii_lowercase();
        self.extensions.iter().any(|ext| lower.ends_with(ext))
    }

    pub fn is_canonical(&self, stem: &str) -> bool {
        self.canonical_pattern.is_match(stem)
    }

    /// First filename pattern, in declared order, that matches the whole stem.
    pub fn match_name(&self, stem: &str) -> Option<Timestamp> {
        self.name_patterns
            .iter()
            .find_map(|pattern| pattern.captures(stem))
            .and_then(|caps| Timestamp::from_captures(&caps))
    }

    pub fn format_name(&self, timestamp: &Timestamp, extension: &str) -> String {
        format_name(&self.template, timestamp, extension)
    }
}

fn compile(patterns: &[&str]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| Regex::new(pattern).map_err(Into::into))
        .collect()
}
