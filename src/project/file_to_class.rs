//! Guessing which class a file declares from its path.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use smol_str::SmolStr;

/// A class a file is expected to declare.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClassCandidate {
    pub fully_qualified_name: SmolStr,
    /// `None` for the global namespace.
    pub namespace: Option<SmolStr>,
}

impl ClassCandidate {
    /// Build from a fully-qualified name, splitting off the namespace.
    pub fn new(fully_qualified_name: impl Into<SmolStr>) -> Self {
        let fully_qualified_name: SmolStr = fully_qualified_name.into();
        let namespace = fully_qualified_name
            .rsplit_once('\\')
            .map(|(namespace, _)| SmolStr::new(namespace))
            .filter(|namespace| !namespace.is_empty());
        Self { fully_qualified_name, namespace }
    }

    /// Class name without namespace.
    pub fn name(&self) -> &str {
        self.fully_qualified_name
            .rsplit('\\')
            .next()
            .unwrap_or(&self.fully_qualified_name)
    }
}

impl fmt::Display for ClassCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fully_qualified_name)
    }
}

/// Ranked candidates for one file, best first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassCandidates {
    candidates: Vec<ClassCandidate>,
}

impl ClassCandidates {
    pub fn new(candidates: Vec<ClassCandidate>) -> Self {
        Self { candidates }
    }

    pub fn none_found(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn best(&self) -> Option<&ClassCandidate> {
        self.candidates.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassCandidate> {
        self.candidates.iter()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Maps a file path to the classes it probably declares.
pub trait FileToClass {
    fn candidates_for(&self, path: &Path) -> ClassCandidates;
}

impl<F: FileToClass + ?Sized> FileToClass for &F {
    fn candidates_for(&self, path: &Path) -> ClassCandidates {
        (**self).candidates_for(path)
    }
}

/// PSR-4 style mapping: a namespace prefix rooted at a directory, with
/// sub-directories as sub-namespaces and the file stem as class name.
///
/// When several mappings contain a file, the one with the deepest
/// directory ranks first.
#[derive(Clone, Debug, Default)]
pub struct Psr4FileToClass {
    mappings: Vec<(SmolStr, PathBuf)>,
}

impl Psr4FileToClass {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mapping; `prefix` may be empty (global namespace) and may
    /// carry leading or trailing separators.
    pub fn with_mapping(mut self, prefix: &str, directory: impl Into<PathBuf>) -> Self {
        let prefix = prefix.trim_matches('\\');
        self.mappings.push((SmolStr::new(prefix), directory.into()));
        self
    }

    fn candidate(prefix: &str, relative: &Path) -> Option<ClassCandidate> {
        let stem = relative.file_stem()?.to_str()?;
        if !is_identifier(stem) {
            return None;
        }
        let mut segments: Vec<&str> = Vec::new();
        if !prefix.is_empty() {
            segments.push(prefix);
        }
        if let Some(parent) = relative.parent() {
            for component in parent.components() {
                let Component::Normal(dir) = component else {
                    return None;
                };
                let dir = dir.to_str()?;
                if !is_identifier(dir) {
                    return None;
                }
                segments.push(dir);
            }
        }
        segments.push(stem);
        Some(ClassCandidate::new(segments.join("\\")))
    }
}

impl FileToClass for Psr4FileToClass {
    fn candidates_for(&self, path: &Path) -> ClassCandidates {
        let mut ranked: Vec<(usize, ClassCandidate)> = self
            .mappings
            .iter()
            .filter_map(|(prefix, directory)| {
                let relative = path.strip_prefix(directory).ok()?;
                let candidate = Self::candidate(prefix, relative)?;
                Some((directory.components().count(), candidate))
            })
            .collect();
        ranked.sort_by(|a, b| b.0.cmp(&a.0));
        ClassCandidates::new(ranked.into_iter().map(|(_, candidate)| candidate).collect())
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next().is_some_and(|c| c == '_' || c.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
}
