//! End-to-end member completion through `Completor`.
//!
//! Each test builds the reflector from the document being completed, the
//! way an editor host indexes the open buffer before a request.

use quill::hir::SourceReflector;
use quill::project::{MemoryFilesystem, Psr4FileToClass};
use quill::{CompletionConfig, CompletionError, Completor, Suggestion, SuggestionKind, TextRange, TextSize};
use rstest::rstest;

type TestCompletor = Completor<SourceReflector, MemoryFilesystem, Psr4FileToClass>;

fn completor_for(sources: &[&str]) -> TestCompletor {
    let reflector = sources
        .iter()
        .fold(SourceReflector::new(), |reflector, source| reflector.with_source(source));
    Completor::new(reflector, MemoryFilesystem::new(), Psr4FileToClass::new(), CompletionConfig::default())
}

/// Complete at the `<>` marker, which is removed from the source.
fn complete(extra: &[&str], marked: &str) -> (Vec<Suggestion>, Vec<String>) {
    let offset = marked.find("<>").expect("source has a cursor marker");
    let source = marked.replacen("<>", "", 1);
    let mut sources = extra.to_vec();
    sources.push(&source);
    let completor = completor_for(&sources);
    let response = completor
        .complete(&source, TextSize::from(offset as u32))
        .expect("member completion succeeds");
    let issues = response.issues().to_vec();
    (response.into_iter().collect(), issues)
}

fn names(suggestions: &[Suggestion]) -> Vec<&str> {
    suggestions.iter().map(Suggestion::name).collect()
}

#[test]
fn test_public_method_on_new_instance() {
    let source = "<?php class Foo { public function bar(): int {} } $f = new Foo(); $f-><>";
    let (suggestions, issues) = complete(&[], source);

    assert!(issues.is_empty());
    assert_eq!(suggestions.len(), 1);
    let bar = &suggestions[0];
    assert_eq!(bar.name(), "bar");
    assert_eq!(bar.kind(), SuggestionKind::Method);
    assert!(bar.kind().is_function_like());
    assert_eq!(bar.short_description(), "pub bar(): int");
    assert_eq!(bar.import_qualification(), None);

    let offset = TextSize::from(source.find("<>").unwrap() as u32);
    assert_eq!(bar.range(), TextRange::empty(offset));
}

#[test]
fn test_scalar_receiver_reports_one_issue() {
    let (suggestions, issues) = complete(&[], "<?php $s = 'hello'; $s-><>");
    assert!(suggestions.is_empty());
    assert_eq!(issues, vec!["Cannot complete members on scalar value (string)".to_string()]);
}

#[test]
fn test_unknown_class_reports_issue() {
    let (suggestions, issues) = complete(&[], r"<?php namespace App; $m = new Missing(); $m-><>");
    assert!(suggestions.is_empty());
    assert_eq!(issues, vec![r#"Could not find class "App\Missing""#.to_string()]);
}

#[test]
fn test_this_sees_private_and_inherited_members() {
    let base = r"<?php
namespace App;
abstract class Model {
    protected $table;
    private $connection;
    public function save(): bool {}
    abstract protected function validate(array $rules = []): bool;
}";
    let source = r"<?php
namespace App;
class User extends Model {
    private string $email;
    public function __construct() {}
    protected function validate(array $rules = []): bool {}
    public function greet() {
        $this-><>
    }
}";
    let (suggestions, _) = complete(&[base], source);
    let described: Vec<_> = suggestions.iter().map(|s| (s.name(), s.short_description())).collect();
    assert_eq!(
        described,
        vec![
            ("validate", "pro validate(array $rules = array ()): bool"),
            ("greet", "pub greet()"),
            ("save", "pub save(): bool"),
            ("email", "pri $email: string"),
            ("table", "pro $table"),
        ]
    );
}

#[test]
fn test_static_access_on_self() {
    let source = r"<?php
class Config {
    const VERSION = 2;
    private static $cache;
    public static function load(): self {}
    public function run() { self::<> }
}";
    let (suggestions, _) = complete(&[], source);
    let kinds: Vec<_> = suggestions.iter().map(|s| (s.name(), s.kind())).collect();
    assert_eq!(
        kinds,
        vec![
            ("load", SuggestionKind::Method),
            ("run", SuggestionKind::Method),
            ("cache", SuggestionKind::Property),
            ("VERSION", SuggestionKind::Constant),
        ]
    );
    assert_eq!(suggestions[2].short_description(), "pri static $cache");
}

#[test]
fn test_static_access_on_class_name_is_public_only() {
    let source = r"<?php
class Config {
    const VERSION = 2;
    private static $cache;
    public static function load(): self {}
}
Config::<>";
    let (suggestions, _) = complete(&[], source);
    assert_eq!(names(&suggestions), vec!["load", "VERSION"]);
}

#[rstest]
#[case::after_arrow("$f-><>", vec!["bar", "baz", "count"])]
#[case::partial_name("$f->ba<>", vec!["bar", "baz"])]
#[case::spaces_after_arrow("$f->  <>", vec!["bar", "baz", "count"])]
#[case::line_break_before_arrow("$f\n    ->co<>", vec!["count"])]
#[case::nullsafe("$f?-><>", vec!["bar", "baz", "count"])]
#[case::no_match("$f->zz<>", vec![])]
fn test_cursor_positions(#[case] tail: &str, #[case] expected: Vec<&str>) {
    let source = format!(
        "<?php class Foo {{ public $count = 0; public function bar() {{}} public function baz() {{}} }} $f = new Foo(); {tail}"
    );
    let (suggestions, issues) = complete(&[], &source);
    assert!(issues.is_empty());
    assert_eq!(names(&suggestions), expected);
}

#[test]
fn test_chained_call_receiver() {
    let source = r"<?php
namespace App;
class Query { public function where(): static {} public function first(): ?Row {} }
class Row { public $id; }
$q = new Query();
$q->where()->first()-><>";
    let (suggestions, issues) = complete(&[], source);
    assert!(issues.is_empty());
    assert_eq!(names(&suggestions), vec!["id"]);
}

#[test]
fn test_missing_accessor_is_an_error() {
    let source = "<?php $foo";
    let completor = completor_for(&[source]);
    // Not a member context, so the accessor scan never runs.
    assert!(!completor.could_complete(source, TextSize::of(source)));
    let response = completor.complete(source, TextSize::of(source)).unwrap();
    assert!(response.into_suggestion_set().is_empty());

    let err = quill::ide::resolve_offset(source, TextSize::of(source)).unwrap_err();
    assert_eq!(err, CompletionError::NoAccessorFound { offset: TextSize::from(10) });
}

#[test]
fn test_suggestion_set_json_form() {
    let (suggestions, _) = complete(&[], "<?php class Foo { const A = 1; } Foo::<>");
    let set: quill::SuggestionSet = suggestions.into_iter().collect();
    let value = set.to_value();
    assert_eq!(value[0]["kind"], "constant");
    assert_eq!(value[0]["name"], "A");
    assert_eq!(value[0]["short_description"], "const A");
    assert!(value[0]["import"].is_null());
}
