//! Completion suggestions and the ordered set they are collected in.

use serde::Serialize;
use smol_str::SmolStr;

use crate::base::TextRange;

/// What a suggestion completes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Method,
    Property,
    Constant,
    Class,
}

impl SuggestionKind {
    /// Methods are called; everything else is referenced.
    pub fn is_function_like(self) -> bool {
        self == SuggestionKind::Method
    }

    /// Properties and constants.
    pub fn is_member_like(self) -> bool {
        matches!(self, SuggestionKind::Property | SuggestionKind::Constant)
    }
}

/// One completion suggestion. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Suggestion {
    kind: SuggestionKind,
    name: SmolStr,
    short_description: String,
    import_qualification: Option<SmolStr>,
    range: TextRange,
}

impl Suggestion {
    pub fn new(
        kind: SuggestionKind,
        name: impl Into<SmolStr>,
        short_description: impl Into<String>,
        range: TextRange,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            short_description: short_description.into(),
            import_qualification: None,
            range,
        }
    }

    /// Attach the fully-qualified name to import when accepting this
    /// suggestion.
    pub fn with_import(mut self, import: Option<SmolStr>) -> Self {
        self.import_qualification = import;
        self
    }

    pub fn kind(&self) -> SuggestionKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short_description(&self) -> &str {
        &self.short_description
    }

    pub fn import_qualification(&self) -> Option<&str> {
        self.import_qualification.as_deref()
    }

    pub fn range(&self) -> TextRange {
        self.range
    }
}

/// Plain structured form of a suggestion.
#[derive(Serialize)]
struct SuggestionRecord<'a> {
    kind: SuggestionKind,
    name: &'a str,
    short_description: &'a str,
    import: Option<&'a str>,
    range: [u32; 2],
}

impl<'a> From<&'a Suggestion> for SuggestionRecord<'a> {
    fn from(suggestion: &'a Suggestion) -> Self {
        Self {
            kind: suggestion.kind,
            name: &suggestion.name,
            short_description: &suggestion.short_description,
            import: suggestion.import_qualification(),
            range: [suggestion.range.start().into(), suggestion.range.end().into()],
        }
    }
}

/// Suggestions in the order they were added.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SuggestionSet {
    suggestions: Vec<Suggestion>,
}

impl SuggestionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, suggestion: Suggestion) {
        self.suggestions.push(suggestion);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Suggestion> {
        self.suggestions.iter()
    }

    pub fn len(&self) -> usize {
        self.suggestions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suggestions.is_empty()
    }

    /// Keep only the suggestions matching `predicate`.
    pub fn retain(&mut self, predicate: impl FnMut(&Suggestion) -> bool) {
        self.suggestions.retain(predicate);
    }

    /// `[{kind, name, short_description, import, range: [start, end]}]`
    pub fn to_value(&self) -> serde_json::Value {
        let records: Vec<SuggestionRecord<'_>> = self.suggestions.iter().map(SuggestionRecord::from).collect();
        // Plain records of strings and integers always serialize.
        serde_json::to_value(records).unwrap_or_default()
    }
}

impl FromIterator<Suggestion> for SuggestionSet {
    fn from_iter<I: IntoIterator<Item = Suggestion>>(iter: I) -> Self {
        Self { suggestions: iter.into_iter().collect() }
    }
}

impl Extend<Suggestion> for SuggestionSet {
    fn extend<I: IntoIterator<Item = Suggestion>>(&mut self, iter: I) {
        self.suggestions.extend(iter);
    }
}

impl IntoIterator for SuggestionSet {
    type Item = Suggestion;
    type IntoIter = std::vec::IntoIter<Suggestion>;

    fn into_iter(self) -> Self::IntoIter {
        self.suggestions.into_iter()
    }
}

impl<'a> IntoIterator for &'a SuggestionSet {
    type Item = &'a Suggestion;
    type IntoIter = std::slice::Iter<'a, Suggestion>;

    fn into_iter(self) -> Self::IntoIter {
        self.suggestions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::TextSize;

    fn range(start: u32, end: u32) -> TextRange {
        TextRange::new(TextSize::from(start), TextSize::from(end))
    }

    #[test]
    fn test_kinds() {
        assert!(SuggestionKind::Method.is_function_like());
        assert!(!SuggestionKind::Property.is_function_like());
        assert!(SuggestionKind::Constant.is_member_like());
        assert!(!SuggestionKind::Class.is_member_like());
    }

    #[test]
    fn test_set_keeps_insertion_order() {
        let mut set = SuggestionSet::new();
        set.add(Suggestion::new(SuggestionKind::Method, "b", "pub b()", range(0, 0)));
        set.add(Suggestion::new(SuggestionKind::Property, "a", "pub $a", range(0, 0)));
        let names: Vec<_> = set.iter().map(Suggestion::name).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_to_value() {
        let set: SuggestionSet = [Suggestion::new(SuggestionKind::Class, "User", r"App\User", range(4, 6))
            .with_import(Some(r"App\User".into()))]
        .into_iter()
        .collect();
        assert_eq!(
            set.to_value(),
            serde_json::json!([{
                "kind": "class",
                "name": "User",
                "short_description": "App\\User",
                "import": "App\\User",
                "range": [4, 6],
            }])
        );
    }
}
