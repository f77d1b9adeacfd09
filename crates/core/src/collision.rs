use crate::error::{RenameError, Result};
use crate::extractor::split_extension;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_MAX_SUFFIX_ATTEMPTS: usize = 10_000;

/// Decides whether a candidate target name is already taken.
pub trait CollisionCheck {
    fn is_taken(&self, candidate: &Path) -> bool;
}

impl<F> CollisionCheck for F
where
    F: Fn(&Path) -> bool,
{
    fn is_taken(&self, candidate: &Path) -> bool {
        self(candidate)
    }
}

/// Targets already handed out during a dry run.
#[derive(Debug, Clone, Default)]
pub struct ClaimedTargets {
    claimed: HashSet<PathBuf>,
}

impl ClaimedTargets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.claimed.contains(path)
    }

    /// Returns `false` if the target was already claimed.
    pub fn claim(&mut self, path: PathBuf) -> bool {
        self.claimed.insert(path)
    }

    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}

impl CollisionCheck for ClaimedTargets {
    fn is_taken(&self, candidate: &Path) -> bool {
        self.contains(candidate)
    }
}

/// Live file system lookup. Dangling symlinks count as taken.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExistingFiles;

impl CollisionCheck for ExistingFiles {
    fn is_taken(&self, candidate: &Path) -> bool {
        fs::symlink_metadata(candidate).is_ok()
    }
}

/// Picks the first free variant of `desired_name` next to `original`:
/// `name.ext`, `name-1.ext`, `name-2.ext`, ...
///
/// A candidate equal to `original` ends the search and returns `original`.
pub fn resolve_collision(
    original: &Path,
    desired_name: &str,
    check: &dyn CollisionCheck,
    max_attempts: usize,
) -> Result<PathBuf> {
    let parent = original.parent().unwrap_or_else(|| Path::new(""));
    let (stem, extension) = split_extension(desired_name);

    for n in 0..max_attempts {
        let name = if n == 0 {
            format!("{}{}", stem, extension)
        } else {
            format!("{}-{}{}", stem, n, extension)
        };
        let candidate = parent.join(&name);
        if candidate == original {
            return Ok(original.to_path_buf());
        }
        if !check.is_taken(&candidate) {
            if n != 0 {
                info!(path = %original.display(), new_name = %name, "de-duplicated name");
            }
            return Ok(candidate);
        }
    }

    Err(RenameError::SuffixExhausted {
        name: desired_name.to_string(),
        attempts: max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const DESIRED: &str = "img-2023-06-15-14-22-33.jpg";

    fn first_taken(k: usize) -> impl Fn(&Path) -> bool {
        move |candidate: &Path| {
            let name = candidate
                .file_name()
                .and_then(|v| v.to_str())
                .unwrap_or_default();
            (0..k).any(|n| {
                let taken = if n == 0 {
                    DESIRED.to_string()
                } else {
                    format!("img-2023-06-15-14-22-33-{}.jpg", n)
                };
                taken == name
            })
        }
    }

    #[test]
    fn returns_bare_name_when_nothing_taken() {
        let original = Path::new("/photos/IMG_20230615_142233.jpg");
        let resolved = resolve_collision(original, DESIRED, &first_taken(0), 100).expect("resolve");
        assert_eq!(resolved, Path::new("/photos").join(DESIRED));
    }

    #[test]
    fn skips_first_k_taken_candidates() {
        let original = Path::new("/photos/IMG_20230615_142233.jpg");
        for k in 1..5 {
            let resolved =
                resolve_collision(original, DESIRED, &first_taken(k), 100).expect("resolve");
            assert_eq!(
                resolved,
                Path::new("/photos").join(format!("img-2023-06-15-14-22-33-{}.jpg", k))
            );
        }
    }

    #[test]
    fn original_path_is_returned_unchanged() {
        let original = Path::new("/photos/img-2023-06-15-14-22-33-1.jpg");
        let resolved = resolve_collision(original, DESIRED, &first_taken(1), 100).expect("resolve");
        assert_eq!(resolved, original);
    }

    #[test]
    fn name_without_extension_gets_plain_suffix() {
        let original = Path::new("/photos/source");
        let taken = |p: &Path| p.ends_with("video-2023-06-15-14-22-33");
        let resolved =
            resolve_collision(original, "video-2023-06-15-14-22-33", &taken, 100).expect("resolve");
        assert_eq!(resolved, Path::new("/photos/video-2023-06-15-14-22-33-1"));
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let original = Path::new("/photos/a.jpg");
        let err = resolve_collision(original, DESIRED, &|_: &Path| true, 3)
            .expect_err("everything is taken");
        assert!(matches!(
            err,
            RenameError::SuffixExhausted { attempts: 3, .. }
        ));
    }

    #[test]
    fn claimed_targets_track_membership() {
        let mut claimed = ClaimedTargets::new();
        let path = PathBuf::from("/photos").join(DESIRED);
        assert!(claimed.is_empty());
        assert!(!claimed.is_taken(&path));
        assert!(claimed.claim(path.clone()));
        assert!(!claimed.claim(path.clone()));
        assert!(claimed.is_taken(&path));
        assert_eq!(claimed.len(), 1);

        let resolved = resolve_collision(Path::new("/photos/b.jpg"), DESIRED, &claimed, 100)
            .expect("resolve");
        assert_eq!(resolved, Path::new("/photos/img-2023-06-15-14-22-33-1.jpg"));
    }

    #[test]
    fn existing_files_checks_the_disk() {
        let temp = tempdir().expect("tempdir");
        let taken = temp.path().join(DESIRED);
        fs::write(&taken, b"x").expect("write existing");

        let original = temp.path().join("IMG_20230615_142233.jpg");
        assert!(ExistingFiles.is_taken(&taken));
        assert!(!ExistingFiles.is_taken(&original));

        let resolved = resolve_collision(&original, DESIRED, &ExistingFiles, 100).expect("resolve");
        assert_eq!(resolved, temp.path().join("img-2023-06-15-14-22-33-1.jpg"));
    }
}
