//! What reflecting an offset yields: the symbol, its candidate types, and
//! any issues met on the way.

use smol_str::SmolStr;

use super::types::{Type, Types};

/// A resolved symbol with its candidate static types.
///
/// Issues only ever accumulate; [`SymbolContext::with_issue`] returns a new
/// context with the issue appended.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SymbolContext {
    symbol_name: SmolStr,
    types: Types,
    issues: Vec<String>,
}

impl SymbolContext {
    pub fn new(symbol_name: impl Into<SmolStr>, types: impl IntoIterator<Item = Type>) -> Self {
        Self { symbol_name: symbol_name.into(), types: types.into_iter().collect(), issues: Vec::new() }
    }

    /// A context for an expression nothing could be inferred about.
    pub fn unknown(symbol_name: impl Into<SmolStr>) -> Self {
        Self::new(symbol_name, [])
    }

    pub fn with_issue(mut self, issue: impl Into<String>) -> Self {
        self.issues.push(issue.into());
        self
    }

    /// Symbol name without a leading `$` (`this` for `$this`).
    pub fn symbol_name(&self) -> &str {
        &self.symbol_name
    }

    pub fn types(&self) -> &Types {
        &self.types
    }

    pub fn issues(&self) -> &[String] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<String> {
        self.issues
    }
}
