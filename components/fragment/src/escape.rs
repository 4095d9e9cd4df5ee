use std::borrow::Cow;

use memchr::memchr_iter;

use crate::chars::XmlChar;

/// Text appended after a bare `&` to turn it into `&amp;`.
const AMP_TAIL: &str = "amp;";

/// Fragment text with bare ampersands escaped.
///
/// Every escaped ampersand is remembered by its character index in the
/// original text, so positions reported against the escaped text can be
/// mapped back with [`EscapedFragment::to_original_offset`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EscapedFragment<'a> {
    original: &'a str,
    text: Cow<'a, str>,
    expansions: Vec<usize>,
}

impl<'a> EscapedFragment<'a> {
    pub fn original(&self) -> &'a str {
        self.original
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Character indices of the escaped ampersands in the original text.
    pub fn expansions(&self) -> &[usize] {
        &self.expansions
    }

    pub fn is_modified(&self) -> bool {
        !self.expansions.is_empty()
    }

    /// Maps a character offset in the escaped text to the original text.
    ///
    /// Offsets inside an inserted `amp;` map to the ampersand itself.
    pub fn to_original_offset(&self, escaped: usize) -> usize {
        let expansion = AMP_TAIL.len();
        let mut shift = 0;
        for &amp in &self.expansions {
            let at = amp + shift;
            if escaped <= at {
                break;
            }
            if escaped <= at + expansion {
                return amp;
            }
            shift += expansion;
        }
        escaped - shift
    }
}

/// Escapes every `&` that does not start an entity or character reference.
pub fn escape(input: &str) -> EscapedFragment<'_> {
    let mut escaped: Option<String> = None;
    let mut copied = 0;
    let mut chars_before = 0;
    let mut expansions = vec![];

    for pos in memchr_iter(b'&', input.as_bytes()) {
        if starts_with_reference(&input[pos..]) {
            continue;
        }

        chars_before += input[copied..pos].chars().count();
        expansions.push(chars_before);
        chars_before += 1;

        let out = escaped.get_or_insert_with(|| String::with_capacity(input.len() + 16));
        out.push_str(&input[copied..=pos]);
        out.push_str(AMP_TAIL);
        copied = pos + 1;
    }

    let text = match escaped {
        Some(mut out) => {
            out.push_str(&input[copied..]);
            Cow::Owned(out)
        }
        None => Cow::Borrowed(input),
    };

    EscapedFragment {
        original: input,
        text,
        expansions,
    }
}

/// Whether `input` (starting with `&`) starts with `&Name;`, `&#digits;` or
/// `&#xhex;`.
fn starts_with_reference(input: &str) -> bool {
    let rest = &input[1..];

    if let Some(number) = rest.strip_prefix('#') {
        let (digits, radix) = match number.strip_prefix('x') {
            Some(hex) => (hex, 16),
            None => (number, 10),
        };
        let end = digits
            .find(|c: char| !c.is_digit(radix))
            .unwrap_or(digits.len());
        return end > 0 && digits[end..].starts_with(';');
    }

    let mut chars = rest.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_xml_name_start_char() => {}
        _ => return false,
    }
    for (_, c) in chars {
        if c == ';' {
            return true;
        }
        if !c.is_xml_name_char() {
            return false;
        }
    }
    false
}
