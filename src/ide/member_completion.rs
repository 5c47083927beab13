//! Member suggestions for the candidate types of a receiver.

use std::fmt::Write;

use crate::base::{TextRange, TextSize};
use crate::hir::{ClassLike, Method, Parameter, Property, Reflector, SymbolContext, Type};
use super::suggestion::{Suggestion, SuggestionKind, SuggestionSet};

/// Receivers that see non-public members.
const PRIVILEGED_SYMBOLS: [&str; 2] = ["this", "self"];

/// Turns candidate types into method, property and constant suggestions.
pub struct MemberSuggestionBuilder<'a, R: ?Sized> {
    reflector: &'a R,
    range: TextRange,
}

impl<'a, R: Reflector + ?Sized> MemberSuggestionBuilder<'a, R> {
    /// Suggestions get a zero-width range at `offset`.
    pub fn new(reflector: &'a R, offset: TextSize) -> Self {
        Self { reflector, range: TextRange::empty(offset) }
    }

    /// Suggest the members of each type in order.
    ///
    /// Types that cannot have members add an issue to the returned context
    /// instead of suggestions; unknown types are skipped.
    pub fn build(
        &self,
        context: SymbolContext,
        types: impl IntoIterator<Item = Type>,
    ) -> (SuggestionSet, SymbolContext) {
        let mut suggestions = SuggestionSet::new();
        let mut context = context;
        for ty in types {
            context = self.populate(context, &ty, &mut suggestions);
        }
        (suggestions, context)
    }

    fn populate(&self, context: SymbolContext, ty: &Type, suggestions: &mut SuggestionSet) -> SymbolContext {
        let Some(name) = ty.class_name() else {
            if !ty.is_defined() {
                return context;
            }
            tracing::debug!(%ty, "scalar receiver");
            return context.with_issue(format!("Cannot complete members on scalar value ({ty})"));
        };
        let class = match self.reflector.reflect_class_like(name) {
            Ok(class) => class,
            Err(err) => {
                tracing::debug!(%err, "receiver class not found");
                return context.with_issue(format!("Could not find class \"{ty}\""));
            }
        };

        let public_only = !PRIVILEGED_SYMBOLS.contains(&context.symbol_name());
        self.add_members(&class, public_only, suggestions);
        context
    }

    fn add_members(&self, class: &ClassLike, public_only: bool, suggestions: &mut SuggestionSet) {
        for method in &class.methods {
            if method.name.eq_ignore_ascii_case("__construct") {
                continue;
            }
            if public_only && !method.visibility.is_public() {
                continue;
            }
            suggestions.add(Suggestion::new(SuggestionKind::Method, method.name.clone(), method_info(method), self.range));
        }

        if class.is_class() {
            for property in &class.properties {
                if public_only && !property.visibility.is_public() {
                    continue;
                }
                suggestions.add(Suggestion::new(
                    SuggestionKind::Property,
                    property.name.clone(),
                    property_info(property),
                    self.range,
                ));
            }
        }

        for constant in &class.constants {
            suggestions.add(Suggestion::new(
                SuggestionKind::Constant,
                constant.name.clone(),
                format!("const {}", constant.name),
                self.range,
            ));
        }
    }
}

/// `[abstract ]pub name(Type $a, $b = 1): Ret|null`
fn method_info(method: &Method) -> String {
    let mut info = String::new();
    if method.is_abstract {
        info.push_str("abstract ");
    }
    let params: Vec<String> = method.parameters.iter().map(parameter_info).collect();
    let _ = write!(info, "{} {}({})", method.visibility.short(), method.name, params.join(", "));

    let returns: Vec<&str> = method
        .return_types
        .iter()
        .filter(|t| t.is_defined())
        .map(Type::short)
        .collect();
    if !returns.is_empty() {
        let _ = write!(info, ": {}", returns.join("|"));
    }
    info
}

fn parameter_info(parameter: &Parameter) -> String {
    let mut parts = Vec::with_capacity(3);
    if parameter.ty.is_defined() {
        parts.push(parameter.ty.short().to_string());
    }
    parts.push(format!("${}", parameter.name));
    if let Some(default) = &parameter.default {
        parts.push(format!("= {}", default.to_export_string()));
    }
    parts.join(" ")
}

/// `pub static $name: Type`
fn property_info(property: &Property) -> String {
    let mut info = String::from(property.visibility.short());
    if property.is_static {
        info.push_str(" static");
    }
    let _ = write!(info, " ${}", property.name);
    let best = property.best_type();
    if best.is_defined() {
        let _ = write!(info, ": {}", best.short());
    }
    info
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::SourceReflector;

    const SOURCE: &str = r"<?php
namespace App;

abstract class Foo {
    const LIMIT = 10;
    public static $instances = [];
    protected ?Foo $next;
    public function __construct() {}
    public function bar(): int {}
    abstract protected function baz(Foo $foo, $list = [1, 2], ?string $s = null): ?Foo;
    private function secret() {}
}

interface Shape { const SIDES = 3; public function area(): float; }
";

    fn build(symbol: &str, types: Vec<Type>) -> (Vec<(String, String)>, Vec<String>) {
        let reflector = SourceReflector::new().with_source(SOURCE);
        let builder = MemberSuggestionBuilder::new(&reflector, TextSize::from(7));
        let context = SymbolContext::new(symbol, types.clone());
        let (suggestions, context) = builder.build(context, types);
        for suggestion in &suggestions {
            assert_eq!(suggestion.range(), TextRange::empty(TextSize::from(7)));
        }
        let items = suggestions
            .iter()
            .map(|s| (s.name().to_string(), s.short_description().to_string()))
            .collect();
        (items, context.into_issues())
    }

    #[test]
    fn test_public_members_for_plain_variable() {
        let (items, issues) = build("foo", vec![Type::class(r"App\Foo")]);
        assert!(issues.is_empty());
        assert_eq!(
            items,
            vec![
                ("bar".to_string(), "pub bar(): int".to_string()),
                ("instances".to_string(), "pub static $instances: array".to_string()),
                ("LIMIT".to_string(), "const LIMIT".to_string()),
            ]
        );
    }

    #[test]
    fn test_all_members_for_this() {
        let (items, _) = build("this", vec![Type::class(r"App\Foo")]);
        let descriptions: Vec<_> = items.iter().map(|(_, info)| info.as_str()).collect();
        assert_eq!(
            descriptions,
            vec![
                "pub bar(): int",
                "abstract pro baz(Foo $foo, $list = array (  0 => 1,  1 => 2,), string $s = NULL): Foo|null",
                "pri secret()",
                "pub static $instances: array",
                "pro $next: Foo",
                "const LIMIT",
            ]
        );
    }

    #[test]
    fn test_interface_has_methods_and_constants() {
        let (items, _) = build("shape", vec![Type::class(r"App\Shape")]);
        let names: Vec<_> = items.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["area", "SIDES"]);
    }

    #[test]
    fn test_issues_for_scalars_and_missing_classes() {
        let (items, issues) = build(
            "x",
            vec![Type::Unknown, Type::primitive("string"), Type::class(r"App\Missing")],
        );
        assert!(items.is_empty());
        assert_eq!(
            issues,
            vec![
                "Cannot complete members on scalar value (string)".to_string(),
                "Could not find class \"App\\Missing\"".to_string(),
            ]
        );
    }

    #[test]
    fn test_constructor_skipped_in_any_case() {
        let reflector = SourceReflector::new()
            .with_source("<?php class Widget { public function __CONSTRUCT() {} public function draw(float $scale = 1.50) {} }");
        let builder = MemberSuggestionBuilder::new(&reflector, TextSize::from(0));
        let types = vec![Type::class("Widget")];
        let (suggestions, _) = builder.build(SymbolContext::new("widget", types.clone()), types);
        let items: Vec<_> = suggestions.iter().map(|s| (s.name(), s.short_description())).collect();
        assert_eq!(items, vec![("draw", "pub draw(float $scale = 1.5)")]);
    }
}
