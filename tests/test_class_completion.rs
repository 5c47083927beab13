//! End-to-end class name completion over a workspace on disk.

use std::path::Path;

use quill::hir::SourceReflector;
use quill::project::{Psr4FileToClass, WalkdirFilesystem};
use quill::{CompletionConfig, Completor, Suggestion, SuggestionKind, TextRange, TextSize};
use rstest::{fixture, rstest};
use tempfile::TempDir;

fn write(root: &Path, relative: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, "<?php\n").unwrap();
}

#[fixture]
fn workspace() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "src/Model/Account.php");
    write(dir.path(), "src/Model/User.php");
    write(dir.path(), "src/Http/UserController.php");
    write(dir.path(), "src/Http/routes.txt");
    write(dir.path(), "src/Http/bootstrap-app.php");
    dir
}

fn complete(root: &Path, config: CompletionConfig, marked: &str) -> (Vec<Suggestion>, TextSize) {
    let offset = TextSize::from(marked.find("<>").unwrap() as u32);
    let source = marked.replacen("<>", "", 1);
    let completor = Completor::new(
        SourceReflector::new(),
        WalkdirFilesystem::new(root.join("src")),
        Psr4FileToClass::new().with_mapping("App", root.join("src")),
        config,
    );
    let suggestions = completor.complete(&source, offset).unwrap().into_iter().collect();
    (suggestions, offset)
}

#[rstest]
fn test_partial_name_scans_only_matching_files(workspace: TempDir) {
    let (suggestions, offset) = complete(workspace.path(), CompletionConfig::default(), "<?php\n$u = new Us<>");

    let names: Vec<_> = suggestions.iter().map(Suggestion::name).collect();
    assert_eq!(names, vec!["UserController", "User"]);

    let user = &suggestions[1];
    assert_eq!(user.kind(), SuggestionKind::Class);
    assert_eq!(user.short_description(), r"App\Model\User");
    assert_eq!(user.import_qualification(), Some(r"App\Model\User"));
    assert_eq!(user.range(), TextRange::new(offset - TextSize::from(2), offset));
}

#[rstest]
#[case::statement_end("<?php\n$u = new Us<>;")]
#[case::constructor_call("<?php\n$u = new Us<>();")]
#[case::argument("<?php\nfoo(Us<>);")]
fn test_partial_name_before_closing_token(workspace: TempDir, #[case] marked: &str) {
    let (suggestions, offset) = complete(workspace.path(), CompletionConfig::default(), marked);

    let names: Vec<_> = suggestions.iter().map(Suggestion::name).collect();
    assert_eq!(names, vec!["UserController", "User"]);
    let replaced = TextRange::new(offset - TextSize::from(2), offset);
    assert!(suggestions.iter().all(|s| s.range() == replaced));
}

#[rstest]
fn test_same_namespace_and_imports_need_no_qualification(workspace: TempDir) {
    let source = r"<?php
namespace App\Model;

use App\Http\UserController;

class Team extends <>";
    let (suggestions, offset) = complete(workspace.path(), CompletionConfig::default(), source);

    let imports: Vec<_> = suggestions
        .iter()
        .map(|s| (s.name(), s.import_qualification()))
        .collect();
    assert_eq!(imports, vec![("UserController", None), ("Account", None), ("User", None)]);
    assert!(suggestions.iter().all(|s| s.range() == TextRange::empty(offset)));
}

#[rstest]
fn test_other_namespace_needs_qualification(workspace: TempDir) {
    let (suggestions, _) = complete(
        workspace.path(),
        CompletionConfig::default(),
        "<?php namespace App\\Http; $x instanceof <>",
    );
    let imports: Vec<_> = suggestions
        .iter()
        .map(|s| (s.name(), s.import_qualification()))
        .collect();
    assert_eq!(
        imports,
        vec![
            ("UserController", None),
            ("Account", Some(r"App\Model\Account")),
            ("User", Some(r"App\Model\User")),
        ]
    );
}

#[rstest]
fn test_class_limit_truncates(workspace: TempDir) {
    let config = CompletionConfig::default().with_class_limit(2);
    let (suggestions, _) = complete(workspace.path(), config, "<?php new <>");
    assert_eq!(suggestions.len(), 2);
}

#[rstest]
fn test_source_extension_is_configurable(workspace: TempDir) {
    write(workspace.path(), "src/Legacy/Mailer.inc");
    let config = CompletionConfig::default().with_source_extension("inc");
    let (suggestions, _) = complete(workspace.path(), config, "<?php new <>");
    let names: Vec<_> = suggestions.iter().map(Suggestion::name).collect();
    assert_eq!(names, vec!["Mailer"]);
}

#[rstest]
fn test_no_matching_file_yields_nothing(workspace: TempDir) {
    let (suggestions, _) = complete(workspace.path(), CompletionConfig::default(), "<?php new Zz<>");
    assert!(suggestions.is_empty());
}
