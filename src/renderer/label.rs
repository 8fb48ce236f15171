//! Bubble label layout
//!
//! Meanings longer than one line are split by characters (not bytes, so CJK
//! text wraps correctly): six on the first line, up to five more on the
//! second, then `..` if anything was cut.

/// Characters on the first line
pub const FIRST_LINE_CHARS: usize = 6;
/// Characters on the second line
pub const SECOND_LINE_CHARS: usize = 5;
const ELLIPSIS: &str = "..";

/// Split a meaning into at most two display lines
pub fn wrap_label(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= FIRST_LINE_CHARS {
        return vec![text.to_string()];
    }

    let first: String = chars[..FIRST_LINE_CHARS].iter().collect();
    let rest = &chars[FIRST_LINE_CHARS..];
    let mut second: String = rest.iter().take(SECOND_LINE_CHARS).collect();
    if rest.len() > SECOND_LINE_CHARS {
        second.push_str(ELLIPSIS);
    }
    vec![first, second]
}
