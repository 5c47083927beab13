//! Static types as seen by completion.

use std::fmt;

use indexmap::IndexSet;
use smol_str::SmolStr;

use crate::base::TextSize;
use crate::syntax::{ClassDecl, SourceFile};

/// Built-in type names. Everything else names a class-like.
const PRIMITIVES: &[&str] = &[
    "array", "bool", "boolean", "callable", "false", "float", "double", "int", "integer",
    "iterable", "mixed", "never", "null", "object", "resource", "string", "true", "void",
];

/// A candidate static type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    /// Nothing could be inferred.
    Unknown,
    /// A scalar or pseudo type, lowercased (`int`, `string`, `array`...).
    Primitive(SmolStr),
    /// A class-like, by fully-qualified name without leading separator.
    Class(SmolStr),
}

/// An ordered set of candidate types.
pub type Types = IndexSet<Type>;

impl Type {
    pub fn primitive(name: &str) -> Self {
        Type::Primitive(SmolStr::new(name.to_ascii_lowercase()))
    }

    pub fn class(name: impl Into<SmolStr>) -> Self {
        let name = name.into();
        match name.strip_prefix('\\') {
            Some(stripped) => Type::Class(stripped.into()),
            None => Type::Class(name),
        }
    }

    pub fn is_defined(&self) -> bool {
        !matches!(self, Type::Unknown)
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Primitive(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Type::Primitive(name) if name == "null")
    }

    /// Display form without namespace (`App\Model\User` → `User`).
    pub fn short(&self) -> &str {
        match self {
            Type::Unknown => "",
            Type::Primitive(name) => name,
            Type::Class(name) => name.rsplit('\\').next().unwrap_or(name),
        }
    }

    /// Name used to look the class-like up, if this is one.
    pub fn class_name(&self) -> Option<&str> {
        match self {
            Type::Class(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Unknown => f.write_str("<unknown>"),
            Type::Primitive(name) | Type::Class(name) => f.write_str(name),
        }
    }
}

/// Where a written type name is being resolved: the file and offset for
/// namespace/import lookup, plus what `self` and `parent` mean there.
#[derive(Clone, Debug)]
pub struct TypeScope<'a> {
    file: &'a SourceFile,
    offset: TextSize,
    self_class: Option<SmolStr>,
    parent_class: Option<SmolStr>,
}

impl<'a> TypeScope<'a> {
    /// Scope at `offset`, with `self` bound to the enclosing class-like.
    pub fn at(file: &'a SourceFile, offset: TextSize) -> Self {
        let class = file.class_at(offset);
        Self {
            file,
            offset,
            self_class: class.map(|decl| declared_name(file, decl)),
            parent_class: class
                .and_then(|decl| decl.parent.as_deref())
                .map(|parent| file.resolve_class_name(parent, offset)),
        }
    }

    pub fn self_class(&self) -> Option<&SmolStr> {
        self.self_class.as_ref()
    }

    pub fn parent_class(&self) -> Option<&SmolStr> {
        self.parent_class.as_ref()
    }

    /// Lower one written type name.
    pub fn lower(&self, name: &str) -> Type {
        let lower = name.to_ascii_lowercase();
        match lower.as_str() {
            "self" | "static" | "$this" => self.self_class.clone().map(Type::Class).unwrap_or(Type::Unknown),
            "parent" => self.parent_class.clone().map(Type::Class).unwrap_or(Type::Unknown),
            _ if PRIMITIVES.contains(&lower.as_str()) => Type::Primitive(lower.into()),
            _ => Type::class(self.file.resolve_class_name(name, self.offset)),
        }
    }

    pub fn lower_all(&self, names: &[SmolStr]) -> Vec<Type> {
        names.iter().map(|name| self.lower(name)).collect()
    }
}

/// Fully-qualified name of a class-like declared in `file`.
pub fn declared_name(file: &SourceFile, decl: &ClassDecl) -> SmolStr {
    match file.namespace_at(decl.range.start()) {
        Some(namespace) => SmolStr::new(format!("{namespace}\\{}", decl.name)),
        None => decl.name.clone(),
    }
}

/// Drop `null` from a nullable type set; a receiver that may be null is
/// still completed as its non-null type.
pub fn without_null(types: impl IntoIterator<Item = Type>) -> Types {
    let types: Types = types.into_iter().filter(Type::is_defined).collect();
    if types.iter().any(|t| !t.is_null()) {
        types.into_iter().filter(|t| !t.is_null()).collect()
    } else {
        types
    }
}
