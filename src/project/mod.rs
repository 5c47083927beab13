//! Workspace collaborators: file listings and file-to-class mapping.

mod file_to_class;
mod filesystem;

pub use file_to_class::{ClassCandidate, ClassCandidates, FileToClass, Psr4FileToClass};
pub use filesystem::{FileList, FileRecord, Filesystem, MemoryFilesystem, WalkdirFilesystem};
