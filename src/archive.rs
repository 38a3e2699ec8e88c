//! Zip archiving for a finished issue directory. The directory is only
//! removed after the archive has been fully written and closed; any failure
//! leaves the source pages on disk.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("archive I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("zip writer failed: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("could not walk issue directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("path is not valid UTF-8: {}", .0.display())]
    BadPath(PathBuf),
}

/// Pack `issue_dir` into `zip_path`, then delete the directory.
///
/// The directory is deleted only once `ZipWriter::finish` has returned; if
/// anything fails before that, a partial zip is removed and the directory is
/// left untouched so the run can be retried.
pub fn archive_issue(issue_dir: &Path, zip_path: &Path) -> Result<(), ArchiveError> {
    if let Err(err) = write_archive(issue_dir, zip_path) {
        let _ = std::fs::remove_file(zip_path);
        return Err(err);
    }
    std::fs::remove_dir_all(issue_dir)?;
    Ok(())
}

fn write_archive(issue_dir: &Path, zip_path: &Path) -> Result<(), ArchiveError> {
    let mut writer = ZipWriter::new(File::create(zip_path)?);
    let options = SimpleFileOptions::default();

    for entry in WalkDir::new(issue_dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(issue_dir)
            .expect("walkdir yields paths under its root");
        let name = relative
            .to_str()
            .ok_or_else(|| ArchiveError::BadPath(entry.path().to_path_buf()))?;
        writer.start_file(name, options)?;
        let mut file = File::open(entry.path())?;
        io::copy(&mut file, &mut writer)?;
    }

    writer.finish()?;
    Ok(())
}
