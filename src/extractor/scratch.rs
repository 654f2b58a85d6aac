use crate::error::{HelpGenError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Marks a fixed scratch directory as created by helpgen so a later run may
/// reuse and remove it.
pub const SCRATCH_MARKER: &str = ".helpgen-scratch";

enum Location {
    Fixed(PathBuf),
    Temp(TempDir),
}

/// Working directory for intermediate HTML. Removed when dropped, on every
/// exit path; removal errors are ignored.
pub struct ScratchDir {
    location: Location,
}

impl ScratchDir {
    /// Create the scratch directory at `path`, or a unique temporary one when
    /// no path is given.
    ///
    /// A fixed path must be new, empty, or a leftover from an earlier run
    /// (it carries [`SCRATCH_MARKER`]). Any other existing directory is
    /// refused so its contents are never removed.
    pub fn create(path: Option<&Path>) -> Result<Self> {
        let location = match path {
            Some(path) => {
                check_reusable(path)?;
                fs::create_dir_all(path)?;
                fs::write(path.join(SCRATCH_MARKER), "")?;
                Location::Fixed(path.to_path_buf())
            }
            None => Location::Temp(tempfile::Builder::new().prefix("helpgen-").tempdir()?),
        };

        Ok(Self { location })
    }

    pub fn path(&self) -> &Path {
        match &self.location {
            Location::Fixed(path) => path,
            Location::Temp(dir) => dir.path(),
        }
    }

    pub fn doctree_dir(&self) -> PathBuf {
        self.path().join("doctrees")
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Location::Fixed(ref path) = self.location {
            let _ = fs::remove_dir_all(path);
        }
        // TempDir removes itself
    }
}

fn check_reusable(path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }

    if !path.is_dir() {
        return Err(HelpGenError::Config {
            message: format!("Scratch path is not a directory: {}", path.display()),
        });
    }

    let is_empty = fs::read_dir(path)?.next().is_none();
    if is_empty || path.join(SCRATCH_MARKER).is_file() {
        return Ok(());
    }

    Err(HelpGenError::Config {
        message: format!(
            "Refusing to use {} as scratch directory: it already holds files not created by helpgen",
            path.display()
        ),
    })
}

/// Fail when removing `scratch` would also remove any of `protected`.
pub fn check_scratch_location(scratch: &Path, protected: &[&Path]) -> Result<()> {
    let scratch = normalize(scratch);

    for path in protected {
        if normalize(path).starts_with(&scratch) {
            return Err(HelpGenError::Config {
                message: format!(
                    "Scratch directory {} would contain {}; choose a dedicated directory",
                    scratch.display(),
                    path.display()
                ),
            });
        }
    }

    Ok(())
}

fn normalize(path: &Path) -> PathBuf {
    fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
