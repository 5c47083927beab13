//! Reflection: offsets to symbol contexts, names to class-likes.
//!
//! [`Reflector`] is the seam completion depends on. [`SourceReflector`] is
//! the in-crate implementation: an index of class-likes built from source
//! text, with inherited members merged in at lookup time.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;
use thiserror::Error;

use crate::base::{clamp_offset, TextSize};
use crate::syntax::{SourceFile, Visibility};
use super::class_like::ClassLike;
use super::infer::infer_at;
use super::symbol_context::SymbolContext;

/// Failure to reflect a class-like.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReflectError {
    #[error("class-like \"{name}\" not found")]
    NotFound { name: SmolStr },
}

/// Maps offsets to symbol contexts and names to class-likes.
pub trait Reflector {
    /// The symbol context of the expression ending at `offset` in `source`.
    fn reflect_offset(&self, source: &str, offset: TextSize) -> SymbolContext;

    /// The class-like named `name` (fully qualified, leading `\` optional),
    /// including inherited members.
    fn reflect_class_like(&self, name: &str) -> Result<Arc<ClassLike>, ReflectError>;
}

impl<R: Reflector + ?Sized> Reflector for &R {
    fn reflect_offset(&self, source: &str, offset: TextSize) -> SymbolContext {
        (**self).reflect_offset(source, offset)
    }

    fn reflect_class_like(&self, name: &str) -> Result<Arc<ClassLike>, ReflectError> {
        (**self).reflect_class_like(name)
    }
}

/// Reflector over class-likes declared in a set of sources.
///
/// Class names are case-insensitive, so the index is keyed by the lowercased
/// fully-qualified name. A later declaration of the same name replaces the
/// earlier one. The document being completed must be added like any other
/// source for its own classes to be found.
#[derive(Debug, Clone, Default)]
pub struct SourceReflector {
    classes: FxHashMap<SmolStr, Arc<ClassLike>>,
}

impl SourceReflector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`SourceReflector::add_source`].
    pub fn with_source(mut self, source: &str) -> Self {
        self.add_source(source);
        self
    }

    /// Index every class-like declared in `source`.
    pub fn add_source(&mut self, source: &str) {
        let file = SourceFile::parse(source);
        for decl in file.classes() {
            let class = ClassLike::lower(decl, &file);
            tracing::trace!(class = %class.name, "indexed class-like");
            self.classes.insert(key(&class.name), Arc::new(class));
        }
    }

    /// Index the class-likes of a file on disk.
    pub fn add_file(&mut self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let source = std::fs::read_to_string(path)?;
        self.add_source(&source);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    fn declared(&self, name: &str) -> Option<&Arc<ClassLike>> {
        self.classes.get(&key(name))
    }

    /// `class` with the members of its ancestors appended, nearest
    /// ancestor first. Members already present by name are not repeated
    /// and private members are not inherited.
    fn merged(&self, class: &Arc<ClassLike>) -> Arc<ClassLike> {
        let mut queue: VecDeque<SmolStr> = class.supertypes().cloned().collect();
        if queue.is_empty() {
            return Arc::clone(class);
        }
        let mut merged = ClassLike::clone(class);
        let mut seen = FxHashSet::default();
        seen.insert(key(&class.name));

        while let Some(name) = queue.pop_front() {
            if !seen.insert(key(&name)) {
                continue;
            }
            let Some(ancestor) = self.declared(&name) else {
                tracing::trace!(ancestor = %name, "ancestor not indexed");
                continue;
            };
            inherit(&mut merged, ancestor);
            queue.extend(ancestor.supertypes().cloned());
        }
        Arc::new(merged)
    }
}

impl Reflector for SourceReflector {
    fn reflect_offset(&self, source: &str, offset: TextSize) -> SymbolContext {
        let file = SourceFile::parse(source);
        infer_at(&file, clamp_offset(source, offset), self)
    }

    fn reflect_class_like(&self, name: &str) -> Result<Arc<ClassLike>, ReflectError> {
        let name = name.strip_prefix('\\').unwrap_or(name);
        self.declared(name)
            .map(|class| self.merged(class))
            .ok_or_else(|| ReflectError::NotFound { name: name.into() })
    }
}

fn key(name: &str) -> SmolStr {
    SmolStr::new(name.trim_start_matches('\\').to_ascii_lowercase())
}

fn inherit(class: &mut ClassLike, ancestor: &ClassLike) {
    for method in &ancestor.methods {
        if method.visibility != Visibility::Private && class.method(&method.name).is_none() {
            class.methods.push(method.clone());
        }
    }
    if class.is_class() {
        for property in &ancestor.properties {
            if property.visibility != Visibility::Private && class.property(&property.name).is_none() {
                class.properties.push(property.clone());
            }
        }
    }
    for constant in &ancestor.constants {
        if class.constant(&constant.name).is_none() {
            class.constants.push(constant.clone());
        }
    }
}
