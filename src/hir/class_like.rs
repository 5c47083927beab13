//! Class-like declarations lowered into the semantic model.
//!
//! A [`ClassLike`] is what completion reflects on: member names with their
//! visibility, and types already resolved to fully-qualified names.
//! Lowering happens per declaration; inherited members are merged in by the
//! reflector (see [`super::reflect`]).

use smol_str::SmolStr;

use crate::syntax::{
    ClassDecl, ClassDeclKind, ConstDecl, FunctionDecl, Literal, ParamDecl, PropertyDecl,
    SourceFile, Visibility,
};
use super::types::{declared_name, without_null, Type, TypeScope};

/// Whether the class-like is a class or an interface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClassLikeKind {
    Class,
    Interface,
}

impl From<ClassDeclKind> for ClassLikeKind {
    fn from(kind: ClassDeclKind) -> Self {
        match kind {
            ClassDeclKind::Class => ClassLikeKind::Class,
            ClassDeclKind::Interface => ClassLikeKind::Interface,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClassLike {
    pub kind: ClassLikeKind,
    /// Fully-qualified name without leading separator.
    pub name: SmolStr,
    pub parent: Option<SmolStr>,
    pub interfaces: Vec<SmolStr>,
    pub is_abstract: bool,
    pub methods: Vec<Method>,
    /// Always empty for interfaces.
    pub properties: Vec<Property>,
    pub constants: Vec<Constant>,
}

impl ClassLike {
    /// Lower a declaration found in `file`.
    pub fn lower(decl: &ClassDecl, file: &SourceFile) -> Self {
        let scope = TypeScope::at(file, decl.range.start());
        let kind = ClassLikeKind::from(decl.kind);
        let properties = match kind {
            ClassLikeKind::Class => decl.properties.iter().map(|p| Property::lower(p, &scope)).collect(),
            ClassLikeKind::Interface => Vec::new(),
        };
        Self {
            kind,
            name: declared_name(file, decl),
            parent: decl
                .parent
                .as_deref()
                .map(|parent| file.resolve_class_name(parent, decl.range.start())),
            interfaces: decl
                .interfaces
                .iter()
                .map(|name| file.resolve_class_name(name, decl.range.start()))
                .collect(),
            is_abstract: decl.is_abstract,
            methods: decl.methods.iter().map(|m| Method::lower(m, &scope)).collect(),
            properties,
            constants: decl.constants.iter().map(Constant::lower).collect(),
        }
    }

    pub fn is_class(&self) -> bool {
        self.kind == ClassLikeKind::Class
    }

    pub fn is_interface(&self) -> bool {
        self.kind == ClassLikeKind::Interface
    }

    /// Method by name, case-insensitively.
    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name.eq_ignore_ascii_case(name))
    }

    /// Property by name (case-sensitive, without `$`).
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn constant(&self, name: &str) -> Option<&Constant> {
        self.constants.iter().find(|c| c.name == name)
    }

    /// Every ancestor name this class-like declares directly.
    pub fn supertypes(&self) -> impl Iterator<Item = &SmolStr> {
        self.parent.iter().chain(self.interfaces.iter())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Method {
    pub name: SmolStr,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_abstract: bool,
    pub parameters: Vec<Parameter>,
    pub return_types: Vec<Type>,
}

impl Method {
    fn lower(decl: &FunctionDecl, scope: &TypeScope<'_>) -> Self {
        Self {
            name: decl.name.clone(),
            visibility: decl.modifiers.visibility(),
            is_static: decl.modifiers.is_static,
            is_abstract: decl.modifiers.is_abstract,
            parameters: decl.params.iter().map(|p| Parameter::lower(p, scope)).collect(),
            return_types: scope.lower_all(&decl.return_types),
        }
    }

    /// Return types with `null` removed, for inferring a call's result.
    pub fn inferred_return_types(&self) -> impl Iterator<Item = Type> {
        without_null(self.return_types.iter().cloned()).into_iter()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    pub name: SmolStr,
    /// First declared non-null type, `Unknown` when untyped.
    pub ty: Type,
    pub default: Option<Literal>,
}

impl Parameter {
    fn lower(decl: &ParamDecl, scope: &TypeScope<'_>) -> Self {
        let ty = scope
            .lower_all(&decl.types)
            .into_iter()
            .find(|t| !t.is_null())
            .unwrap_or(Type::Unknown);
        Self { name: decl.name.clone(), ty, default: decl.default.clone() }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    pub name: SmolStr,
    pub visibility: Visibility,
    pub is_static: bool,
    pub types: Vec<Type>,
}

impl Property {
    fn lower(decl: &PropertyDecl, scope: &TypeScope<'_>) -> Self {
        let mut types = scope.lower_all(&decl.types);
        if types.is_empty() {
            types.extend(decl.default.as_ref().and_then(literal_type));
        }
        Self {
            name: decl.name.clone(),
            visibility: decl.modifiers.visibility(),
            is_static: decl.modifiers.is_static,
            types,
        }
    }

    /// The most specific known type: the first declared one that is not
    /// `null`, else `null` itself, else `Unknown`.
    pub fn best_type(&self) -> Type {
        self.types
            .iter()
            .find(|t| !t.is_null())
            .or_else(|| self.types.first())
            .cloned()
            .unwrap_or(Type::Unknown)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Constant {
    pub name: SmolStr,
}

impl Constant {
    fn lower(decl: &ConstDecl) -> Self {
        Self { name: decl.name.clone() }
    }
}

/// The type a literal value evaluates to, if it is a plain literal.
pub fn literal_type(literal: &Literal) -> Option<Type> {
    let name = match literal {
        Literal::Null => "null",
        Literal::Bool(_) => "bool",
        Literal::Int(_) => "int",
        Literal::Float(_) => "float",
        Literal::String(_) => "string",
        Literal::Array(_) => "array",
        Literal::Constant(_) | Literal::Expression(_) => return None,
    };
    Some(Type::primitive(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lower_first(source: &str) -> ClassLike {
        let file = SourceFile::parse(source);
        ClassLike::lower(&file.classes()[0], &file)
    }

    #[test]
    fn test_lower_resolves_names_in_namespace() {
        let class = lower_first(
            r"<?php
namespace App;
use Lib\Base;
class Foo extends Base implements \Countable {
    public function make(Bar $bar, ?int $n = null): ?self {}
}",
        );
        assert_eq!(class.name, r"App\Foo");
        assert_eq!(class.parent.as_deref(), Some(r"Lib\Base"));
        assert_eq!(class.interfaces, vec![SmolStr::new("Countable")]);

        let make = class.method("MAKE").unwrap();
        assert_eq!(make.parameters[0].ty, Type::class(r"App\Bar"));
        assert_eq!(make.parameters[1].ty, Type::primitive("int"));
        assert_eq!(make.parameters[1].default, Some(Literal::Null));
        assert_eq!(make.return_types, vec![Type::class(r"App\Foo"), Type::primitive("null")]);
        assert_eq!(make.inferred_return_types().collect::<Vec<_>>(), vec![Type::class(r"App\Foo")]);
    }

    #[test]
    fn test_property_type_falls_back_to_default() {
        let class = lower_first("<?php class Foo { public $count = 0; private ?Foo $next; var $x; }");
        assert_eq!(class.property("count").unwrap().best_type(), Type::primitive("int"));
        assert_eq!(class.property("next").unwrap().best_type(), Type::class("Foo"));
        assert_eq!(class.property("next").unwrap().visibility, Visibility::Private);
        assert_eq!(class.property("x").unwrap().best_type(), Type::Unknown);
    }

    #[test]
    fn test_interfaces_have_no_properties() {
        let iface = lower_first("<?php interface Shape { const SIDES = 0; public function area(): float; }");
        assert!(iface.is_interface());
        assert!(iface.properties.is_empty());
        assert_eq!(iface.constant("SIDES").unwrap().name, "SIDES");
        assert_eq!(iface.methods[0].return_types, vec![Type::primitive("float")]);
    }
}
