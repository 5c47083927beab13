//! Completion settings.

use smol_str::SmolStr;

/// Settings for a [`Completor`](super::Completor).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionConfig {
    /// Extension (without dot) of the files class completion scans.
    pub source_extension: SmolStr,
    /// Maximum number of class suggestions; `None` for no limit.
    pub class_limit: Option<usize>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self { source_extension: SmolStr::new_static("php"), class_limit: None }
    }
}

impl CompletionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source_extension(mut self, extension: &str) -> Self {
        self.source_extension = SmolStr::new(extension.trim_start_matches('.'));
        self
    }

    pub fn with_class_limit(mut self, limit: usize) -> Self {
        self.class_limit = Some(limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_builders() {
        let config = CompletionConfig::new();
        assert_eq!(config.source_extension, "php");
        assert_eq!(config.class_limit, None);

        let config = config.with_source_extension(".inc").with_class_limit(20);
        assert_eq!(config.source_extension, "inc");
        assert_eq!(config.class_limit, Some(20));
    }
}
