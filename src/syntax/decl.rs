//! Declarations extracted from a source file.
//!
//! Names are kept as written; resolving them to fully-qualified names is
//! the semantic layer's job (see [`crate::hir`]).

use smol_str::SmolStr;

use crate::base::TextRange;
use super::literal::Literal;

/// Member visibility.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

impl Visibility {
    pub fn from_keyword(text: &str) -> Option<Self> {
        if text.eq_ignore_ascii_case("public") {
            Some(Visibility::Public)
        } else if text.eq_ignore_ascii_case("protected") {
            Some(Visibility::Protected)
        } else if text.eq_ignore_ascii_case("private") {
            Some(Visibility::Private)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
        }
    }

    /// Three-letter form used in suggestion descriptions (`pub`, `pro`, `pri`).
    pub fn short(self) -> &'static str {
        &self.as_str()[..3]
    }

    pub fn is_public(self) -> bool {
        self == Visibility::Public
    }
}

/// Modifiers in front of a member.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// `None` when no visibility keyword was written (implicitly public).
    pub visibility: Option<Visibility>,
    pub is_static: bool,
    pub is_abstract: bool,
}

impl Modifiers {
    pub fn visibility(&self) -> Visibility {
        self.visibility.unwrap_or_default()
    }
}

/// Whether a class-like declaration is a class or an interface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClassDeclKind {
    Class,
    Interface,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClassDecl {
    pub kind: ClassDeclKind,
    pub name: SmolStr,
    pub name_range: TextRange,
    /// From the `class`/`interface` keyword to the closing brace (or end of
    /// file when the body is unterminated).
    pub range: TextRange,
    pub is_abstract: bool,
    pub parent: Option<SmolStr>,
    pub interfaces: Vec<SmolStr>,
    pub methods: Vec<FunctionDecl>,
    pub properties: Vec<PropertyDecl>,
    pub constants: Vec<ConstDecl>,
}

/// A method or a free function.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDecl {
    pub name: SmolStr,
    pub modifiers: Modifiers,
    pub params: Vec<ParamDecl>,
    /// Declared return type alternatives, as written (`?Foo` gives `Foo`, `null`).
    pub return_types: Vec<SmolStr>,
    /// The braced body, absent for abstract and interface methods.
    pub body: Option<TextRange>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParamDecl {
    /// Name without the leading `$`.
    pub name: SmolStr,
    pub types: Vec<SmolStr>,
    pub default: Option<Literal>,
    /// Set for constructor-promoted parameters.
    pub promoted: Option<Visibility>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PropertyDecl {
    /// Name without the leading `$`.
    pub name: SmolStr,
    pub modifiers: Modifiers,
    pub types: Vec<SmolStr>,
    pub default: Option<Literal>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstDecl {
    pub name: SmolStr,
}

/// Which import table a `use` statement feeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImportKind {
    Class = 0,
    Function = 1,
    Constant = 2,
}

/// One `use` clause: `alias` resolves to `fully_qualified`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportEntry {
    pub alias: SmolStr,
    pub fully_qualified: SmolStr,
}

/// The import tables of one namespace scope, addressable by index
/// (0 = classes, 1 = functions, 2 = constants).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportTables {
    tables: [Vec<ImportEntry>; 3],
}

impl ImportTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, kind: ImportKind, entry: ImportEntry) {
        self.tables[kind as usize].push(entry);
    }

    /// Table by index; `None` past the last table.
    pub fn get(&self, index: usize) -> Option<&[ImportEntry]> {
        self.tables.get(index).map(Vec::as_slice)
    }

    pub fn table(&self, kind: ImportKind) -> &[ImportEntry] {
        &self.tables[kind as usize]
    }

    /// The value/class import table.
    pub fn classes(&self) -> &[ImportEntry] {
        self.table(ImportKind::Class)
    }
}

/// A namespace region. The file always starts with a global scope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamespaceScope {
    /// `None` for the global namespace.
    pub name: Option<SmolStr>,
    pub start: crate::base::TextSize,
    pub imports: ImportTables,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_short_form() {
        assert_eq!(Visibility::Public.short(), "pub");
        assert_eq!(Visibility::Protected.short(), "pro");
        assert_eq!(Visibility::Private.short(), "pri");
    }

    #[test]
    fn test_visibility_keywords_are_case_insensitive() {
        assert_eq!(Visibility::from_keyword("PRIVATE"), Some(Visibility::Private));
        assert_eq!(Visibility::from_keyword("static"), None);
    }

    #[test]
    fn test_import_tables_by_index() {
        let mut tables = ImportTables::new();
        tables.add(
            ImportKind::Function,
            ImportEntry { alias: "f".into(), fully_qualified: r"A\f".into() },
        );
        assert!(tables.get(0).unwrap().is_empty());
        assert_eq!(tables.get(1).unwrap().len(), 1);
        assert!(tables.get(3).is_none());
    }
}
