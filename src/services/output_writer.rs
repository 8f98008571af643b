//! Output file writer
//!
//! Resolves output names against `--out-dir` and writes generated text

use crate::error::{CvError, Result};
use crate::utils::logging::log_output_written;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Output file writer
///
/// - places outputs under the output directory when one is given
/// - counts the files it writes for the end-of-run summary
/// - rewrites input files in place, keeping a `-bak` copy
#[derive(Debug, Default)]
pub struct OutputWriter {
    out_dir: Option<PathBuf>,
    written: usize,
}

impl OutputWriter {
    pub fn new(out_dir: Option<PathBuf>) -> Self {
        Self {
            out_dir,
            written: 0,
        }
    }

    /// Final path of an output: `out_dir/<basename>` or the name as given
    pub fn resolve(&self, name: &Path) -> PathBuf {
        match &self.out_dir {
            Some(dir) => dir.join(name.file_name().unwrap_or(name.as_os_str())),
            None => name.to_path_buf(),
        }
    }

    /// Writes one output file
    ///
    /// # Parameters
    /// - `path`: already resolved output path
    /// - `content`: file contents
    pub async fn write(&mut self, path: &Path, content: &str) -> Result<()> {
        tokio::fs::write(path, content)
            .await
            .map_err(|e| CvError::io(path, e))?;
        self.written += 1;
        log_output_written(path, content.len());
        Ok(())
    }

    /// Number of files written so far
    pub fn written(&self) -> usize {
        self.written
    }
}

/// `dir/new_<basename>`, the companion file of a student table
pub fn prefix_new(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("new_{}", name))
}

/// `dir/<stem>-bak.<ext>`
pub fn backup_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}-bak.{}", stem, ext.to_string_lossy()),
        None => format!("{}-bak", stem),
    };
    path.with_file_name(name)
}

/// Replaces an input file, moving the original to its `-bak` name
///
/// The new content goes to a temporary file in the same directory first so the
/// original is only moved once the replacement is fully written.
pub fn replace_with_backup(path: &Path, content: &str) -> Result<PathBuf> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let mut temp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| CvError::io(&dir, e))?;
    debug!("Writing to temporary file {}", temp.path().display());
    temp.write_all(content.as_bytes())
        .map_err(|e| CvError::io(temp.path(), e))?;

    let backup = backup_path(path);
    std::fs::rename(path, &backup).map_err(|e| CvError::io(path, e))?;
    temp.persist(path).map_err(|e| CvError::io(path, e.error))?;
    info!("✓ Updated {} (previous version in {})", path.display(), backup.display());
    Ok(backup)
}
