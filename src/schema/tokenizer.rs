//! Schema line tokenizer
//!
//! Labels may contain spaces (`first name 1 10`), so a line cannot simply be
//! split on whitespace. A token boundary is a single space that directly
//! follows a non-whitespace character and directly precedes a digit. A well
//! formed line therefore yields `[label, start, end]`; doubled spaces or a
//! numeric word inside the label yield some other count, which the validator
//! reports as a format error.

/// Split one raw schema line into candidate tokens.
///
/// Never fails. Callers must check for exactly three tokens.
pub fn split_line(line: &str) -> Vec<&str> {
    let mut tokens = Vec::with_capacity(3);
    let mut token_start = 0;
    let mut prev: Option<char> = None;
    let mut chars = line.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let at_boundary = c == ' '
            && prev.is_some_and(|p| !p.is_whitespace())
            && chars.peek().is_some_and(|&(_, next)| next.is_ascii_digit());

        if at_boundary {
            tokens.push(&line[token_start..i]);
            token_start = i + 1;
        }
        prev = Some(c);
    }

    tokens.push(&line[token_start..]);
    tokens
}
