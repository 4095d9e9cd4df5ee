use std::fmt;

use crate::chars::XmlStrExt;
use crate::escape::EscapedFragment;

/// Name of the synthetic root element.
pub const ROOT: &str = "root";

/// Namespace of XLink, which ArchivesSpace emits under `ns2` and `xlink`.
pub const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";

/// Prefix declaration carried by the synthetic root element.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NamespaceBinding {
    pub prefix: String,
    pub uri: String,
}

impl NamespaceBinding {
    pub fn new(prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            uri: uri.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BindingError {
    prefix: String,
}

impl fmt::Display for BindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot declare namespace prefix `{}`", self.prefix)
    }
}

impl std::error::Error for BindingError {}

/// Builds the synthetic document around a fragment.
#[derive(Clone, Debug)]
pub struct Wrapper {
    bindings: Vec<NamespaceBinding>,
    open_tag: String,
}

impl Wrapper {
    /// Rejects prefixes that are not NCNames, the reserved `xml`/`xmlns`
    /// prefixes and empty URIs.
    pub fn new(
        bindings: impl IntoIterator<Item = NamespaceBinding>,
    ) -> Result<Self, BindingError> {
        let bindings: Vec<NamespaceBinding> = bindings.into_iter().collect();

        let mut open_tag = format!("<{}", ROOT);
        for binding in &bindings {
            let prefix = binding.prefix.as_str();
            if !prefix.is_xml_ncname()
                || prefix.eq_ignore_ascii_case("xml")
                || prefix.eq_ignore_ascii_case("xmlns")
                || binding.uri.is_empty()
            {
                return Err(BindingError {
                    prefix: prefix.to_string(),
                });
            }
            open_tag.push_str(" xmlns:");
            open_tag.push_str(prefix);
            open_tag.push_str("=\"");
            push_attr_value(&mut open_tag, &binding.uri);
            open_tag.push('"');
        }
        open_tag.push('>');

        Ok(Self { bindings, open_tag })
    }

    /// Wrapper without any prefix declarations.
    pub fn bare() -> Self {
        Self {
            bindings: vec![],
            open_tag: format!("<{}>", ROOT),
        }
    }

    pub fn bindings(&self) -> &[NamespaceBinding] {
        &self.bindings
    }

    pub fn open_tag(&self) -> &str {
        &self.open_tag
    }

    pub fn wrap(&self, fragment: &EscapedFragment<'_>) -> WrappedDocument {
        let text = fragment.as_str();
        let mut document = String::with_capacity(self.open_tag.len() + text.len() + ROOT.len() + 3);
        document.push_str(&self.open_tag);
        document.push_str(text);
        let close_at = document.len();
        document.push_str("</");
        document.push_str(ROOT);
        document.push('>');

        WrappedDocument {
            document,
            prefix_bytes: self.open_tag.len(),
            prefix_len: self.open_tag.chars().count(),
            close_at,
        }
    }
}

impl Default for Wrapper {
    fn default() -> Self {
        Self::new([
            NamespaceBinding::new("ns2", XLINK_NAMESPACE),
            NamespaceBinding::new("xlink", XLINK_NAMESPACE),
        ])
        .unwrap_or_else(|_| Self::bare())
    }
}

fn push_attr_value(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}

/// A fragment enclosed in the synthetic root element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrappedDocument {
    document: String,
    prefix_bytes: usize,
    prefix_len: usize,
    close_at: usize,
}

impl WrappedDocument {
    pub fn as_str(&self) -> &str {
        &self.document
    }

    /// Length of the open tag in characters.
    pub fn prefix_len(&self) -> usize {
        self.prefix_len
    }

    /// Length of the open tag in bytes.
    pub fn prefix_bytes(&self) -> usize {
        self.prefix_bytes
    }

    /// Byte offset of the synthetic close tag.
    pub fn close_at(&self) -> usize {
        self.close_at
    }

    /// The escaped fragment inside the root element.
    pub fn fragment(&self) -> &str {
        &self.document[self.prefix_bytes..self.close_at]
    }
}
