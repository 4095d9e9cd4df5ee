//! Well-formedness checking for XML fragments found in free-text fields.
//!
//! A fragment is escaped ([`escape`]), wrapped in a synthetic root element
//! ([`Wrapper`]) and checked ([`check()`]). Errors whose message matches a
//! [`Suppressions`] entry are accepted; every other error is mapped back to
//! the original text ([`locate`]) and marked ([`highlight()`]).
//!
//! ```
//! use xmlaudit_fragment::{validate, ValidationOutcome};
//!
//! assert_eq!(ValidationOutcome::Valid, validate("Smith & Sons"));
//! assert_eq!(
//!     ValidationOutcome::Invalid {
//!         message: "element <p> is never closed".to_string(),
//!         highlighted: "<<<<p>>>>unterminated".to_string(),
//!     },
//!     validate("<p>unterminated"),
//! );
//! ```

use log::debug;

pub mod chars;
pub mod check;
pub mod classify;
pub mod error;
pub mod escape;
pub mod highlight;
pub mod locate;
mod namespace;
pub mod wrap;

pub use check::check;
pub use classify::{Classification, Suppressions};
pub use error::{ParseError, Reason, TextPosition};
pub use escape::{escape, EscapedFragment};
pub use highlight::{highlight, Markers};
pub use locate::locate;
pub use wrap::{BindingError, NamespaceBinding, WrappedDocument, Wrapper};

/// Result of validating one fragment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    Invalid { message: String, highlighted: String },
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid)
    }
}

/// Diagnostic form of a [`ValidationOutcome`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    WellFormed,
    /// The fragment failed to parse, but only in an accepted way.
    Suppressed(ParseError),
    /// `offset` is `None` when the position could not be mapped back.
    Defect {
        error: ParseError,
        offset: Option<usize>,
    },
}

/// Escape, wrap, check, classify, locate and highlight with one
/// configuration.
///
/// Holds no per-call state and can be shared between threads.
#[derive(Clone, Debug, Default)]
pub struct FragmentValidator {
    wrapper: Wrapper,
    suppressions: Suppressions,
    markers: Markers,
}

impl FragmentValidator {
    pub fn new(wrapper: Wrapper, suppressions: Suppressions, markers: Markers) -> Self {
        Self {
            wrapper,
            suppressions,
            markers,
        }
    }

    pub fn wrapper(&self) -> &Wrapper {
        &self.wrapper
    }

    pub fn suppressions(&self) -> &Suppressions {
        &self.suppressions
    }

    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    pub fn inspect(&self, text: &str) -> Verdict {
        if memchr::memchr(b'<', text.as_bytes()).is_none() {
            return Verdict::WellFormed;
        }

        let fragment = escape(text);
        let document = self.wrapper.wrap(&fragment);
        let error = match check(&document) {
            Ok(()) => return Verdict::WellFormed,
            Err(error) => error,
        };

        match self.suppressions.classify(error) {
            Classification::Suppressed(error) => {
                debug!("suppressed: {}", error);
                Verdict::Suppressed(error)
            }
            Classification::Reported(error) => {
                let offset = locate(&fragment, document.prefix_len(), &error);
                debug!("defect at {:?}: {}", offset, error);
                Verdict::Defect { error, offset }
            }
        }
    }

    pub fn validate(&self, text: &str) -> ValidationOutcome {
        match self.inspect(text) {
            Verdict::WellFormed | Verdict::Suppressed(_) => ValidationOutcome::Valid,
            Verdict::Defect { error, offset } => {
                let mut message = error.to_string();
                if message.is_empty() {
                    message = "malformed markup".to_string();
                }
                ValidationOutcome::Invalid {
                    message,
                    highlighted: highlight(text, offset, &self.markers),
                }
            }
        }
    }
}

/// Validates `text` with the default wrapper, suppressions and markers.
pub fn validate(text: &str) -> ValidationOutcome {
    FragmentValidator::default().validate(text)
}
