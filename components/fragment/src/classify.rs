use crate::error::ParseError;

/// Substring used when nothing else is configured.
pub const DEFAULT_SUPPRESSED: &str = "ns2";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Classification {
    Suppressed(ParseError),
    Reported(ParseError),
}

/// Policy deciding which parse errors are accepted data conventions.
///
/// An error is suppressed when its message contains any of the configured
/// substrings. Empty substrings are ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Suppressions {
    substrings: Vec<String>,
}

impl Suppressions {
    pub fn new<S: Into<String>>(substrings: impl IntoIterator<Item = S>) -> Self {
        Self {
            substrings: substrings
                .into_iter()
                .map(Into::into)
                .filter(|s: &String| !s.is_empty())
                .collect(),
        }
    }

    /// Reports every error.
    pub fn none() -> Self {
        Self { substrings: vec![] }
    }

    pub fn substrings(&self) -> &[String] {
        &self.substrings
    }

    pub fn matches(&self, error: &ParseError) -> bool {
        if self.substrings.is_empty() {
            return false;
        }
        let message = error.to_string();
        self.substrings.iter().any(|s| message.contains(s.as_str()))
    }

    pub fn classify(&self, error: ParseError) -> Classification {
        if self.matches(&error) {
            Classification::Suppressed(error)
        } else {
            Classification::Reported(error)
        }
    }
}

impl Default for Suppressions {
    fn default() -> Self {
        Self::new([DEFAULT_SUPPRESSED])
    }
}
