use crate::error::{ParseError, TextPosition};
use crate::escape::EscapedFragment;

/// Maps the position of `error` back to a character offset in the original
/// fragment.
///
/// `prefix_len` is the length in characters of the synthetic open tag, which
/// shares the first line with the fragment. The result lies in
/// `0..=len(original)`; the end offset is where the synthetic close tag
/// starts. Returns `None` when the position is missing or does not fall
/// inside the fragment.
pub fn locate(
    fragment: &EscapedFragment<'_>,
    prefix_len: usize,
    error: &ParseError,
) -> Option<usize> {
    let escaped = match error.position()? {
        TextPosition::LineColumn { line, column } => {
            line_column_offset(fragment.as_str(), prefix_len, line, column)?
        }
        TextPosition::Column(column) => column.checked_sub(1)?.checked_sub(prefix_len)?,
    };

    if escaped > fragment.as_str().chars().count() {
        return None;
    }
    let offset = fragment.to_original_offset(escaped);
    (offset <= fragment.original().chars().count()).then_some(offset)
}

fn line_column_offset(text: &str, prefix_len: usize, line: usize, column: usize) -> Option<usize> {
    let index = line.checked_sub(1)?;
    let mut column = column.checked_sub(1)?;
    if index == 0 {
        column = column.checked_sub(prefix_len)?;
    }

    let mut lines = text.split('\n');
    let preceding: usize = lines
        .by_ref()
        .take(index)
        .map(|line| line.chars().count() + 1)
        .sum();
    let current = lines.next()?;
    if column > current.chars().count() {
        return None;
    }
    Some(preceding + column)
}
