// ABOUTME: Line-terminator trimming applied to conditional and loop output
// ABOUTME: Offsets the newline swallowed after standalone block delimiters

/// If `text` starts with a line terminator, drop exactly one leading and at most
/// one trailing terminator. Otherwise return it unchanged.
pub fn trim(mut text: String) -> String {
    let leading = line_terminator_len(&text);
    if leading == 0 {
        return text;
    }
    text.drain(..leading);

    let trailing = trailing_terminator_len(&text);
    text.truncate(text.len() - trailing);
    text
}

fn line_terminator_len(text: &str) -> usize {
    if text.starts_with("\r\n") {
        2
    } else if text.starts_with('\n') {
        1
    } else {
        0
    }
}

fn trailing_terminator_len(text: &str) -> usize {
    if text.ends_with("\r\n") {
        2
    } else if text.ends_with('\n') {
        1
    } else {
        0
    }
}
