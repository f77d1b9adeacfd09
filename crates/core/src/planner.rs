use crate::category::MediaCategory;
use crate::collision::{
    resolve_collision, ClaimedTargets, CollisionCheck, DEFAULT_MAX_SUFFIX_ATTEMPTS,
};
use crate::error::Result;
use crate::exif_reader::{CaptureTimestampReader, ExifCaptureReader};
use crate::extractor::{extract_timestamp, Extraction, Provenance, SourceFile};
use crate::scanner::select_files;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub max_suffix_attempts: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            max_suffix_attempts: DEFAULT_MAX_SUFFIX_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Verify,
    Rename,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    AlreadyCanonical,
    TargetTaken { target: PathBuf },
    Renamed {
        target: PathBuf,
        provenance: Provenance,
    },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub original_path: PathBuf,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub mode: RunMode,
    pub category: &'static str,
    pub included: usize,
    pub excluded: Vec<PathBuf>,
    pub entries: Vec<FileEntry>,
    /// Files renamed, or that would be renamed in verify mode.
    pub renamed: usize,
}

impl RunReport {
    pub(crate) fn new(mode: RunMode, category: &MediaCategory) -> Self {
        Self {
            mode,
            category: category.name(),
            included: 0,
            excluded: Vec::new(),
            entries: Vec::new(),
            renamed: 0,
        }
    }

    pub fn failed(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, Outcome::Failed { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| {
                matches!(
                    e.outcome,
                    Outcome::AlreadyCanonical | Outcome::TargetTaken { .. }
                )
            })
            .count()
    }

    pub(crate) fn push(&mut self, original_path: PathBuf, outcome: Outcome) {
        if matches!(outcome, Outcome::Renamed { .. }) {
            self.renamed += 1;
        }
        self.entries.push(FileEntry {
            original_path,
            outcome,
        });
    }
}

/// Where a file should go. `Unchanged` keeps the current name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Resolution {
    Unchanged,
    Target {
        path: PathBuf,
        provenance: Provenance,
    },
}

impl Resolution {
    pub(crate) fn chosen_path<'a>(&'a self, original: &'a Path) -> &'a Path {
        match self {
            Resolution::Unchanged => original,
            Resolution::Target { path, .. } => path,
        }
    }
}

pub(crate) fn resolve_target(
    path: &Path,
    category: &MediaCategory,
    reader: &dyn CaptureTimestampReader,
    check: &dyn CollisionCheck,
    options: &RunOptions,
) -> Result<Resolution> {
    let source = SourceFile::new(path);
    let (timestamp, provenance) = match extract_timestamp(&source, category, reader)? {
        Extraction::AlreadyCanonical => return Ok(Resolution::Unchanged),
        Extraction::Resolved {
            timestamp,
            provenance,
        } => (timestamp, provenance),
    };

    let desired = category.format_name(&timestamp, &source.extension);
    let chosen = resolve_collision(path, &desired, check, options.max_suffix_attempts)?;
    if chosen == path {
        return Ok(Resolution::Unchanged);
    }
    Ok(Resolution::Target {
        path: chosen,
        provenance,
    })
}

/// Dry run: reports what `rename_directory` would do for files of this batch
/// without touching the directory.
pub fn verify_directory(
    dir: &Path,
    category: &MediaCategory,
    options: &RunOptions,
) -> Result<RunReport> {
    verify_with_reader(dir, category, options, &ExifCaptureReader)
}

pub(crate) fn verify_with_reader(
    dir: &Path,
    category: &MediaCategory,
    options: &RunOptions,
    reader: &dyn CaptureTimestampReader,
) -> Result<RunReport> {
    info!(category = category.name(), dir = %dir.display(), "checking");
    let selection = select_files(dir, category)?;
    let mut report = RunReport::new(RunMode::Verify, category);
    report.included = selection.included.len();
    report.excluded = selection.excluded;

    let mut claimed = ClaimedTargets::new();
    for path in selection.included {
        let resolution = match resolve_target(&path, category, reader, &claimed, options) {
            Ok(resolution) => resolution,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "error reading file");
                report.push(
                    path,
                    Outcome::Failed {
                        reason: err.to_string(),
                    },
                );
                continue;
            }
        };

        let chosen = resolution.chosen_path(&path).to_path_buf();
        if claimed.contains(&chosen) {
            info!(path = %path.display(), to = %chosen.display(), "chosen name already in set");
            report.push(path, Outcome::TargetTaken { target: chosen });
            continue;
        }

        match resolution {
            Resolution::Unchanged => {
                info!(path = %path.display(), "skipping, already in format");
                report.push(path, Outcome::AlreadyCanonical);
            }
            Resolution::Target {
                path: target,
                provenance,
            } => {
                info!(path = %path.display(), to = %target.display(), "would rename");
                claimed.claim(target.clone());
                report.push(path, Outcome::Renamed { target, provenance });
            }
        }
    }

    info!(
        total = report.renamed,
        included = report.included,
        excluded = report.excluded.len(),
        skipped = report.skipped(),
        failed = report.failed(),
        "checked total"
    );
    Ok(report)
}
