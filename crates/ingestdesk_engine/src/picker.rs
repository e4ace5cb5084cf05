use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::UploadDocument;

#[derive(Debug, Error)]
pub enum PickError {
    #[error("not a regular file: {0}")]
    NotAFile(PathBuf),
    #[error("path has no file name: {0}")]
    Unnamed(PathBuf),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Read one local file into an upload document named after its final path component.
pub fn load_document(path: &Path) -> Result<UploadDocument, PickError> {
    let meta = fs::metadata(path).map_err(|source| PickError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if !meta.is_file() {
        return Err(PickError::NotAFile(path.to_path_buf()));
    }
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| PickError::Unnamed(path.to_path_buf()))?;
    let content = fs::read(path).map_err(|source| PickError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(UploadDocument::new(file_name, content))
}

/// Read every path in order. Fails on the first unreadable path so a
/// selection is never silently partial.
pub fn load_documents<I, P>(paths: I) -> Result<Vec<UploadDocument>, PickError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    paths
        .into_iter()
        .map(|path| load_document(path.as_ref()))
        .collect()
}
