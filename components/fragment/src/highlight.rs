use memchr::{memchr, memchr2, memrchr};

/// Tokens inserted around the offending region.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Markers {
    pub start: String,
    pub end: String,
}

impl Markers {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

impl Default for Markers {
    fn default() -> Self {
        Self::new("<<<", ">>>")
    }
}

/// Copy of `text` with the region around `offset` (in characters) marked.
///
/// The tag enclosing the offset is marked as a whole; without an enclosing
/// tag only the character at the offset is. `None` or an offset past the end
/// of the text returns the text unchanged.
pub fn highlight(text: &str, offset: Option<usize>, markers: &Markers) -> String {
    offset
        .and_then(|offset| mark(text, offset, markers))
        .unwrap_or_else(|| text.to_string())
}

fn mark(text: &str, offset: usize, markers: &Markers) -> Option<String> {
    let at = byte_index(text, offset)?;
    let (start, end) = tag_span(text, at).unwrap_or_else(|| char_span(text, at));

    let mut out = String::with_capacity(text.len() + markers.start.len() + markers.end.len());
    out.push_str(text.get(..start)?);
    out.push_str(&markers.start);
    out.push_str(text.get(start..end)?);
    out.push_str(&markers.end);
    out.push_str(text.get(end..)?);
    Some(out)
}

fn byte_index(text: &str, offset: usize) -> Option<usize> {
    text.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .nth(offset)
}

/// Byte range of the `<...>` enclosing `at`, both delimiters included.
fn tag_span(text: &str, at: usize) -> Option<(usize, usize)> {
    let bytes = text.as_bytes();
    let lt = match bytes.get(at) {
        Some(b'<') => at,
        _ => memrchr(b'<', bytes.get(..at)?)?,
    };
    let gt = at + memchr(b'>', bytes.get(at..)?)?;
    if memchr2(b'<', b'>', bytes.get(lt + 1..gt)?).is_some() {
        return None;
    }
    Some((lt, gt + 1))
}

fn char_span(text: &str, at: usize) -> (usize, usize) {
    let len = text[at..].chars().next().map_or(0, char::len_utf8);
    (at, at + len)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mark_at(text: &str, offset: usize) -> String {
        highlight(text, Some(offset), &Markers::default())
    }

    #[test]
    fn whole_tag() {
        assert_eq!("<<<<p>>>>unterminated", mark_at("<p>unterminated", 0));
        assert_eq!("<<<<p>>>>unterminated", mark_at("<p>unterminated", 1));
        assert_eq!("<<<<p>>>>unterminated", mark_at("<p>unterminated", 2));
        assert_eq!(
            "<b><i>x<<<</b>>>></i>",
            mark_at("<b><i>x</b></i>", 7)
        );
        assert_eq!(
            "text <<<<a href=x>>>>y</a>",
            mark_at("text <a href=x>y</a>", 9)
        );
    }

    #[test]
    fn single_character_fallback() {
        assert_eq!("<p>caf<<<&>>>eacute;</p>", mark_at("<p>caf&eacute;</p>", 6));
        assert_eq!("a <<<<>>> b", mark_at("a < b", 2));
        assert_eq!("a <<<<>>> b <c>", mark_at("a < b <c>", 2));
        assert_eq!("x <<<\u{e9}>>> y", mark_at("x \u{e9} y", 2));
    }

    #[test]
    fn end_of_text() {
        assert_eq!("abc<<<>>>", mark_at("abc", 3));
    }

    #[test]
    fn unchanged() {
        assert_eq!("<p>x", highlight("<p>x", None, &Markers::default()));
        assert_eq!("<p>x", mark_at("<p>x", 5));
        assert_eq!("", mark_at("", 1));
    }

    #[test]
    fn custom_markers() {
        let markers = Markers::new("[[", "]]");
        assert_eq!("[[<p>]]x", highlight("<p>x", Some(0), &markers));
    }

    #[test]
    fn keeps_original_characters() {
        let text = "l\u{e9}gende <emph>x</emp> & <p";
        for offset in 0..=text.chars().count() + 1 {
            let marked = mark_at(text, offset);
            let mut rest = marked.chars();
            assert!(
                text.chars().all(|c| rest.any(|m| m == c)),
                "{:?} is not a supersequence of {:?}",
                marked,
                text
            );
        }
    }
}
