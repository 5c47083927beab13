//! Workspace file listings.

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};

/// One file in a listing.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FileRecord {
    pub path: PathBuf,
    /// Last path component, including the extension.
    pub filename: String,
}

impl FileRecord {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, filename }
    }

    pub fn has_extension(&self, extension: &str) -> bool {
        self.path.extension() == Some(OsStr::new(extension))
    }
}

/// A lazy, filterable listing of files.
///
/// Filters compose without reading anything; files are produced only as
/// the listing is iterated.
pub struct FileList<'a> {
    inner: Box<dyn Iterator<Item = FileRecord> + 'a>,
}

impl<'a> FileList<'a> {
    pub fn new(files: impl Iterator<Item = FileRecord> + 'a) -> Self {
        Self { inner: Box::new(files) }
    }

    /// Keep files whose extension is exactly `extension` (no leading dot).
    pub fn with_extension(self, extension: &'a str) -> Self {
        self.filter(move |file| file.has_extension(extension))
    }

    pub fn filter(self, predicate: impl FnMut(&FileRecord) -> bool + 'a) -> Self {
        Self { inner: Box::new(self.inner.filter(predicate)) }
    }
}

impl Iterator for FileList<'_> {
    type Item = FileRecord;

    fn next(&mut self) -> Option<FileRecord> {
        self.inner.next()
    }
}

impl fmt::Debug for FileList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileList").finish_non_exhaustive()
    }
}

/// Source of the workspace file listing.
pub trait Filesystem {
    fn file_list(&self) -> FileList<'_>;
}

impl<F: Filesystem + ?Sized> Filesystem for &F {
    fn file_list(&self) -> FileList<'_> {
        (**self).file_list()
    }
}

/// Recursive listing of a directory on disk.
///
/// Entries are sorted by file name within each directory; unreadable
/// entries are skipped.
#[derive(Clone, Debug)]
pub struct WalkdirFilesystem {
    root: PathBuf,
}

impl WalkdirFilesystem {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Filesystem for WalkdirFilesystem {
    fn file_list(&self) -> FileList<'_> {
        let files = walkdir::WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| FileRecord::new(entry.into_path()));
        FileList::new(files)
    }
}

/// A fixed listing, for tests and for hosts that already know their files.
#[derive(Clone, Debug, Default)]
pub struct MemoryFilesystem {
    files: Vec<FileRecord>,
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push(FileRecord::new(path));
        self
    }
}

impl FromIterator<PathBuf> for MemoryFilesystem {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(paths: I) -> Self {
        Self { files: paths.into_iter().map(FileRecord::new).collect() }
    }
}

impl Filesystem for MemoryFilesystem {
    fn file_list(&self) -> FileList<'_> {
        FileList::new(self.files.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_record_filename() {
        let record = FileRecord::new("/src/Model/User.php");
        assert_eq!(record.filename, "User.php");
        assert!(record.has_extension("php"));
        assert!(!record.has_extension("ph"));
    }

    #[test]
    fn test_file_list_filters_compose() {
        let fs = MemoryFilesystem::new()
            .with_file("src/User.php")
            .with_file("src/User.txt")
            .with_file("src/Account.php");
        let names: Vec<_> = fs
            .file_list()
            .with_extension("php")
            .filter(|file| file.filename.starts_with('U'))
            .map(|file| file.filename)
            .collect();
        assert_eq!(names, vec!["User.php"]);
    }

    #[test]
    fn test_walkdir_lists_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("Model")).unwrap();
        std::fs::write(dir.path().join("Model/User.php"), "<?php").unwrap();
        std::fs::write(dir.path().join("readme.md"), "").unwrap();

        let fs = WalkdirFilesystem::new(dir.path());
        let names: Vec<_> = fs.file_list().map(|file| file.filename).collect();
        assert_eq!(names, vec!["User.php", "readme.md"]);
    }
}
