//! Archive extraction for the client release bundle.
//!
//! The vendor ships an uncompressed `.tar` of `.deb` packages. Entries are
//! unpacked with path traversal protection so a hostile archive cannot write
//! outside the extraction directory.

use std::path::{Component, Path};

/// Trait for extracting release archives, enabling test mocking.
///
/// # Examples
///
/// ```
/// use tsm_client_installer::artefact::extraction::TarExtractor;
///
/// let extractor = TarExtractor;
/// // Use extractor.extract(archive_path, dest_dir) in production
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ArchiveExtractor {
    /// Extract the archive at `archive_path` into `dest_dir`.
    ///
    /// Returns the names of the regular files that were extracted.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::PathTraversal`] if any entry
    /// attempts to escape the destination directory.
    /// Returns [`ExtractionError::LinkEntry`] for symbolic or hard links.
    /// Returns [`ExtractionError::EmptyArchive`] if no files are found.
    /// Returns [`ExtractionError::Io`] on I/O failures.
    fn extract(&self, archive_path: &Path, dest_dir: &Path)
    -> Result<Vec<String>, ExtractionError>;
}

/// Errors arising from archive extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// The archive could not be read or an entry could not be written.
    #[error("could not unpack the archive: {0}")]
    Io(#[from] std::io::Error),

    /// An entry would land outside the extraction directory.
    #[error("archive entry {path} would be written outside the extraction directory")]
    PathTraversal {
        /// The offending path from the archive entry.
        path: String,
    },

    /// A symbolic or hard link entry, which the release bundle never carries.
    #[error("archive entry {path} is a link")]
    LinkEntry {
        /// The path of the link entry.
        path: String,
    },

    /// The archive holds no regular files.
    #[error("archive contains no files")]
    EmptyArchive,
}

/// Default extractor using the `tar` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct TarExtractor;

impl ArchiveExtractor for TarExtractor {
    fn extract(
        &self,
        archive_path: &Path,
        dest_dir: &Path,
    ) -> Result<Vec<String>, ExtractionError> {
        let mut archive = tar::Archive::new(std::fs::File::open(archive_path)?);
        let mut files = Vec::new();

        for entry in archive.entries()? {
            let mut entry = entry?;
            let relative = entry.path()?.into_owned();
            ensure_contained(&relative)?;

            let entry_type = entry.header().entry_type();
            if entry_type.is_symlink() || entry_type.is_hard_link() {
                return Err(ExtractionError::LinkEntry {
                    path: relative.display().to_string(),
                });
            }
            if !entry.unpack_in(dest_dir)? {
                return Err(ExtractionError::PathTraversal {
                    path: relative.display().to_string(),
                });
            }

            let is_file = entry_type.is_file();
            match relative.file_name() {
                Some(name) if is_file => files.push(name.to_string_lossy().into_owned()),
                _ => {}
            }
        }

        if files.is_empty() {
            Err(ExtractionError::EmptyArchive)
        } else {
            Ok(files)
        }
    }
}

/// Accept only relative paths made of plain or `.` components.
fn ensure_contained(path: &Path) -> Result<(), ExtractionError> {
    let contained = path
        .components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
    if contained {
        Ok(())
    } else {
        Err(ExtractionError::PathTraversal {
            path: path.display().to_string(),
        })
    }
}
