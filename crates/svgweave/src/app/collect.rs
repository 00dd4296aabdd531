//! Icon collection services.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::domain::errors::PipelineError;
use crate::domain::model::IconFile;

/// Enumerate `directory` non-recursively and read every regular file eagerly.
///
/// Ordering is the file system's native enumeration order, never sorted;
/// sprite ids are assigned in this order, so it is a contract of the file
/// system rather than of this function. Any listing or read failure is
/// terminal for the run; no partial collection is returned. Entries that
/// are not regular files are skipped.
pub fn collect_icons(directory: &Path) -> Result<Vec<IconFile>, PipelineError> {
    let entries = fs::read_dir(directory).map_err(|source| PipelineError::DirectoryUnavailable {
        path: directory.to_path_buf(),
        source,
    })?;

    let mut icons = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| PipelineError::DirectoryUnavailable {
            path: directory.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        let metadata = fs::metadata(&path).map_err(|source| PipelineError::DirectoryUnavailable {
            path: path.clone(),
            source,
        })?;
        if !metadata.is_file() {
            debug!(path = %path.display(), "skipping non-file entry in icon directory");
            continue;
        }

        let contents = fs::read(&path).map_err(|source| PipelineError::DirectoryUnavailable {
            path: path.clone(),
            source,
        })?;
        icons.push(IconFile {
            name: icon_name(&path),
            absolute_path: path,
            base_directory: directory.to_path_buf(),
            contents,
        });
    }

    Ok(icons)
}

/// Icon name used for id generation: the file stem, falling back to the full
/// file name when there is no stem to take.
fn icon_name(path: &Path) -> String {
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;

    #[test]
    fn missing_directory_is_terminal() {
        let temp = tempfile::tempdir().unwrap();
        let missing = temp.path().join("nope");

        let err = collect_icons(&missing).unwrap_err();
        assert!(matches!(err, PipelineError::DirectoryUnavailable { .. }));
    }

    #[test]
    fn reads_contents_eagerly_and_records_locations() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("arrow.svg"), b"<svg/>").unwrap();

        let icons = collect_icons(temp.path()).unwrap();
        assert_eq!(icons.len(), 1);
        assert_eq!(icons[0].name, "arrow");
        assert_eq!(icons[0].contents, b"<svg/>");
        assert_eq!(icons[0].base_directory, temp.path());
        assert_eq!(icons[0].absolute_path, temp.path().join("arrow.svg"));
    }

    #[test]
    fn skips_subdirectories() {
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir(temp.path().join("nested")).unwrap();
        fs::write(temp.path().join("check.svg"), b"<svg/>").unwrap();

        let icons = collect_icons(temp.path()).unwrap();
        assert_eq!(icons.len(), 1);
        assert_eq!(icons[0].name, "check");
    }

    #[test]
    fn empty_directory_yields_empty_collection() {
        let temp = tempfile::tempdir().unwrap();
        assert!(collect_icons(temp.path()).unwrap().is_empty());
    }

    #[test]
    fn name_without_extension_is_kept_whole() {
        assert_eq!(icon_name(&PathBuf::from("/icons/logo")), "logo");
        assert_eq!(icon_name(&PathBuf::from("/icons/logo.svg")), "logo");
    }
}
