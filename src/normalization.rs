// WHY: Whitespace normalization shared by the segmenter, the corrector and the CLI
// Every fragment leaves the pipeline on one line with single interior spaces

/// Collapse line breaks and whitespace runs in a fragment into single spaces
pub fn normalize_fragment(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    normalize_fragment_into(text, &mut result);
    result
}

/// Normalize into a reusable buffer
/// WHY: the batch writer normalizes every sentence of a file through one buffer
pub fn normalize_fragment_into(text: &str, buffer: &mut String) {
    buffer.clear();
    buffer.reserve(text.len());

    // \r\n, \n and any other whitespace run all become one space
    for word in text.split_whitespace() {
        if !buffer.is_empty() {
            buffer.push(' ');
        }
        buffer.push_str(word);
    }
}

/// Join fragments back into running text with single spaces
pub fn join_fragments<S: AsRef<str>>(fragments: &[S]) -> String {
    let mut joined = String::new();
    for fragment in fragments {
        let fragment = fragment.as_ref().trim();
        if fragment.is_empty() {
            continue;
        }
        if !joined.is_empty() {
            joined.push(' ');
        }
        joined.push_str(fragment);
    }
    joined
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_line_breaks() {
        let input = "This is a\nsentence with\r\nline breaks.";
        assert_eq!(normalize_fragment(input), "This is a sentence with line breaks.");
    }

    #[test]
    fn test_normalize_into_buffer_reuse() {
        let mut buffer = String::new();

        normalize_fragment_into("Line one.\nLine two.", &mut buffer);
        assert_eq!(buffer, "Line one. Line two.");

        normalize_fragment_into("Different\r\ncontent.", &mut buffer);
        assert_eq!(buffer, "Different content.");
    }

    #[test]
    fn test_normalize_mixed_whitespace() {
        assert_eq!(normalize_fragment("Mixed\t\n\twhitespace\r\n\there."), "Mixed whitespace here.");
        assert_eq!(normalize_fragment("  Leading and trailing  "), "Leading and trailing");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_fragment(""), "");
        assert_eq!(normalize_fragment(" \n\t "), "");
    }

    #[test]
    fn test_join_skips_blank_fragments() {
        let fragments = ["Item no.", "  ", "5 is here. "];
        assert_eq!(join_fragments(&fragments), "Item no. 5 is here.");
        assert_eq!(join_fragments::<&str>(&[]), "");
    }
}
