//! CSS Reader
//!
//! Loads stylesheet text from disk and hands it to the parser. A stylesheet
//! that fails to parse is logged and reported as "no tree".

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::parser::CssParser;
use crate::rule_tree::RuleTree;
use crate::{CssWeightError, Result};

/// Reads CSS, usually from a file
#[derive(Debug, Clone, Default)]
pub struct CssReader {
    file_name: Option<PathBuf>,
    raw_css: Option<String>,
}

impl CssReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(file_name: impl Into<PathBuf>) -> Self {
        Self {
            file_name: Some(file_name.into()),
            raw_css: None,
        }
    }

    pub fn file_name(&self) -> Option<&Path> {
        self.file_name.as_deref()
    }

    pub fn raw_css(&self) -> Option<&str> {
        self.raw_css.as_deref()
    }

    /// Contents of a file as text
    pub fn read_file_contents(path: &Path) -> Result<String> {
        if path.as_os_str().is_empty() {
            return Err(CssWeightError::InvalidInput("file name not provided".to_string()));
        }

        let bytes = std::fs::read(path).map_err(|e| {
            tracing::error!("Failed to read {}: {}", path.display(), e);
            CssWeightError::Io(e)
        })?;

        String::from_utf8(bytes).map_err(|e| {
            CssWeightError::InvalidInput(format!("{} is not UTF-8 text: {}", path.display(), e))
        })
    }

    /// Read the configured file and keep its contents as the raw CSS
    pub fn read_file(&mut self) -> Result<&str> {
        let path = self
            .file_name
            .as_deref()
            .ok_or_else(|| CssWeightError::InvalidInput("file name not provided".to_string()))?;

        let contents = Self::read_file_contents(path)?;
        tracing::info!("Read {} bytes from {}", contents.len(), path.display());
        self.set_raw_css(contents);

        Ok(self.raw_css.as_deref().unwrap_or_default())
    }

    /// Replace the raw CSS; empty input is ignored
    pub fn set_raw_css(&mut self, css: impl Into<String>) {
        let css = css.into();
        if !css.is_empty() {
            self.raw_css = Some(css);
        }
    }

    /// Parsed rule tree, `None` without CSS or when parsing fails
    pub fn parsed(&self) -> Option<RuleTree> {
        let css = self.raw_css.as_deref()?;

        match CssParser::new().parse(css) {
            Ok(tree) => Some(tree),
            Err(e) => {
                tracing::error!("Failed to parse CSS: {}", e);
                None
            }
        }
    }

    /// De-duplicated selectors of the top-level style rules
    pub fn selectors(&self) -> Option<Vec<String>> {
        let tree = self.parsed()?;
        let mut seen = HashSet::new();

        Some(
            tree.roots()
                .iter()
                .filter_map(|&id| tree.get(id)?.selector_text())
                .filter(|selector| seen.insert(*selector))
                .map(str::to_string)
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
body {
    color: blue;
}
[class] {
    outline: 1px solid blue;
}
#heading {
    font-size: 2em;
    line-height: 2;
}
h2, h3 {
  font-weight: bold;
}
.title.small {
    display: none;
}"#;

    fn sample_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_new_reader_has_no_css() {
        let reader = CssReader::with_file("test.css");
        assert_eq!(reader.file_name(), Some(Path::new("test.css")));
        assert!(reader.raw_css().is_none());
        assert!(reader.parsed().is_none());
        assert!(reader.selectors().is_none());
    }

    #[test]
    fn test_read_file_sets_raw_css() {
        let file = sample_file();
        let mut reader = CssReader::with_file(file.path());

        assert_eq!(reader.read_file().unwrap(), SAMPLE);
        assert_eq!(reader.raw_css(), Some(SAMPLE));
    }

    #[test]
    fn test_read_file_contents() {
        let file = sample_file();
        assert_eq!(CssReader::read_file_contents(file.path()).unwrap(), SAMPLE);
    }

    #[test]
    fn test_read_errors() {
        assert!(matches!(
            CssReader::read_file_contents(Path::new("")),
            Err(CssWeightError::InvalidInput(_))
        ));
        assert!(matches!(
            CssReader::read_file_contents(Path::new("does-not-exist.css")),
            Err(CssWeightError::Io(_))
        ));
        assert!(matches!(CssReader::new().read_file(), Err(CssWeightError::InvalidInput(_))));
    }

    #[test]
    fn test_non_utf8_file_is_invalid_input() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xff, 0xfe, b'a']).unwrap();
        assert!(matches!(
            CssReader::read_file_contents(file.path()),
            Err(CssWeightError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_set_raw_css_ignores_empty() {
        let mut reader = CssReader::new();
        reader.set_raw_css(SAMPLE);
        reader.set_raw_css("");
        assert_eq!(reader.raw_css(), Some(SAMPLE));
    }

    #[test]
    fn test_selectors() {
        let mut reader = CssReader::new();
        reader.set_raw_css(SAMPLE);

        let selectors = reader.selectors().unwrap();
        assert_eq!(selectors.len(), 5);
        for expected in ["body", "[class]", "#heading", "h2, h3"] {
            assert!(selectors.iter().any(|s| s == expected), "missing {expected}");
        }
    }

    #[test]
    fn test_selectors_are_deduplicated() {
        let mut reader = CssReader::new();
        reader.set_raw_css(format!("{SAMPLE}{SAMPLE}"));
        assert_eq!(reader.selectors().unwrap().len(), 5);
    }

    #[test]
    fn test_unparseable_css_has_no_tree() {
        let mut reader = CssReader::new();
        reader.set_raw_css("..broken { color: red; }");
        assert!(reader.parsed().is_none());
    }
}
