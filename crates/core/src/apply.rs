use crate::category::MediaCategory;
use crate::collision::ExistingFiles;
use crate::error::{RenameError, Result};
use crate::exif_reader::{CaptureTimestampReader, ExifCaptureReader};
use crate::planner::{resolve_target, Outcome, Resolution, RunMode, RunOptions, RunReport};
use crate::scanner::select_files;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Renames every file of `category` in `dir` to its canonical name.
///
/// Each file is renamed on its own; a failure is recorded and the batch
/// carries on, leaving earlier renames in place.
pub fn rename_directory(
    dir: &Path,
    category: &MediaCategory,
    options: &RunOptions,
) -> Result<RunReport> {
    rename_with_reader(dir, category, options, &ExifCaptureReader)
}

pub(crate) fn rename_with_reader(
    dir: &Path,
    category: &MediaCategory,
    options: &RunOptions,
    reader: &dyn CaptureTimestampReader,
) -> Result<RunReport> {
    info!(category = category.name(), dir = %dir.display(), "renaming");
    let selection = select_files(dir, category)?;
    let mut report = RunReport::new(RunMode::Rename, category);
    report.included = selection.included.len();
    report.excluded = selection.excluded;

    for path in selection.included {
        let (target, provenance) =
            match resolve_target(&path, category, reader, &ExistingFiles, options) {
                Ok(Resolution::Unchanged) => {
                    info!(path = %path.display(), "skipping, already in format");
                    report.push(path, Outcome::AlreadyCanonical);
                    continue;
                }
                Ok(Resolution::Target {
                    path: target,
                    provenance,
                }) => (target, provenance),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "error processing file");
                    report.push(
                        path,
                        Outcome::Failed {
                            reason: err.to_string(),
                        },
                    );
                    continue;
                }
            };

        if target.exists() {
            info!(path = %path.display(), to = %target.display(), "chosen name already exists");
            report.push(path, Outcome::TargetTaken { target });
            continue;
        }

        info!(path = %path.display(), to = %target.display(), "renaming file");
        if let Err(source) = fs::rename(&path, &target) {
            let err = RenameError::RenameFailure {
                from: path.clone(),
                to: target,
                source,
            };
            warn!(error = %err, "failed to rename");
            report.push(
                path,
                Outcome::Failed {
                    reason: err.to_string(),
                },
            );
            continue;
        }
        report.push(path, Outcome::Renamed { target, provenance });
    }

    info!(
        total = report.renamed,
        included = report.included,
        excluded = report.excluded.len(),
        skipped = report.skipped(),
        failed = report.failed(),
        "renamed total"
    );
    Ok(report)
}
