//! Citation/bubble text post-processing applied to every outbound
//! `send_to_user` (spec.md §4.2 step 4 / step 5).

const CITE_OPEN: &str = "<cite";
const CITE_CLOSE: &str = "</cite>";

/// Strip `<cite ...>inner</cite>` wrapping, keeping `inner`. Malformed or
/// unterminated markup is passed through unchanged rather than dropped.
pub fn strip_citations(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find(CITE_OPEN) {
        out.push_str(&rest[..open]);
        let Some(tag_end) = rest[open..].find('>') else {
            out.push_str(&rest[open..]);
            rest = "";
            break;
        };
        let inner_start = open + tag_end + 1;
        match rest[inner_start..].find(CITE_CLOSE) {
            Some(close_rel) => {
                let close_start = inner_start + close_rel;
                out.push_str(&rest[inner_start..close_start]);
                rest = &rest[close_start + CITE_CLOSE.len()..];
            }
            None => {
                out.push_str(&rest[inner_start..]);
                rest = "";
                break;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Split on `||` into independent outbound bubbles (spec.md §4.2
/// `send_to_user` effect), dropping empty ones produced by stray
/// separators.
pub fn split_bubbles(text: &str) -> Vec<String> {
    text.split("||")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_citations_keeps_inner_text() {
        let input = "The sky is <cite idx=\"1\">blue</cite> today.";
        assert_eq!(strip_citations(input), "The sky is blue today.");
    }

    #[test]
    fn strip_citations_handles_multiple_occurrences() {
        let input = "<cite a>one</cite> and <cite b>two</cite>";
        assert_eq!(strip_citations(input), "one and two");
    }

    #[test]
    fn strip_citations_passes_through_text_without_markup() {
        assert_eq!(strip_citations("plain text"), "plain text");
    }

    #[test]
    fn split_bubbles_drops_empty_segments() {
        let bubbles = split_bubbles("first || second ||  || third");
        assert_eq!(bubbles, vec!["first", "second", "third"]);
    }

    #[test]
    fn split_bubbles_single_segment_when_no_separator() {
        assert_eq!(split_bubbles("just one"), vec!["just one"]);
    }
}
