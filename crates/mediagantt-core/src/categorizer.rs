use regex::Regex;

/// Resolves free-text categories to the first configured keyword found as a whole word.
#[derive(Debug, Clone)]
pub struct Categorizer {
    rules: Vec<KeywordRule>,
}

#[derive(Debug, Clone)]
struct KeywordRule {
    keyword: String,
    pattern: Regex,
}

impl Categorizer {
    /// Compiles one word-boundary pattern per keyword. Keywords are matched literally.
    pub fn new<I, S>(keywords: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rules = keywords
            .into_iter()
            .map(|keyword| {
                let keyword = keyword.into();
                let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(&keyword)))?;
                Ok(KeywordRule { keyword, pattern })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { rules })
    }

    /// The first keyword found in `text` as a whole word.
    pub fn find(&self, text: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.pattern.is_match(text))
            .map(|rule| rule.keyword.as_str())
    }

    /// Returns the first matching keyword, or `text` itself when nothing matches.
    pub fn categorize<'a>(&'a self, text: &'a str) -> &'a str {
        self.find(text).unwrap_or(text)
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.keyword.as_str())
    }

    /// Exact-label membership, as used when filtering records for output.
    pub fn is_label(&self, label: &str) -> bool {
        self.rules.iter().any(|rule| rule.keyword == label)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
