//! Tapback / reaction text-shape classification (spec.md §3 InboundMessage).
//!
//! Several chat transports deliver a reaction ("thumbs up", "heart") as a
//! synthetic text message rather than a dedicated event, e.g. `Liked "on my
//! way"` or `Reacted 👍 to "on my way"`. We never see the original event
//! type, only this rendered text, so classification is pattern matching on
//! the verb prefix and the quoted-text delimiter.

const QUOTE_CHARS: [char; 3] = ['\u{0022}', '\u{201C}', '\u{201D}'];

const VERB_PREFIXES: &[&str] = &["Liked", "Loved", "Disliked", "Laughed at", "Emphasized"];

/// Non-quoted object phrases a transport uses in place of a literal quoted
/// message, e.g. `Loved an image`.
const BARE_OBJECTS: &[&str] = &["an image", "a video", "a sticker", "a link", "an attachment"];

/// Returns true when `text` has the shape of a tapback/reaction echo rather
/// than an ordinary message.
pub fn is_tapback_reaction(text: &str) -> bool {
    let trimmed = text.trim();

    for prefix in VERB_PREFIXES {
        if let Some(rest) = trimmed.strip_prefix(prefix) {
            let rest = rest.trim_start();
            if rest.starts_with(QUOTE_CHARS) {
                return true;
            }
            if BARE_OBJECTS.iter().any(|obj| rest.eq_ignore_ascii_case(obj)) {
                return true;
            }
        }
    }

    if let Some(rest) = trimmed.strip_prefix("Reacted") {
        // "Reacted 👍 to ⟨quoted⟩"
        if rest.contains(" to ") {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_quotes_detected() {
        assert!(is_tapback_reaction("Liked \"on my way\""));
    }

    #[test]
    fn curly_quotes_detected() {
        assert!(is_tapback_reaction("Loved \u{201C}see you soon\u{201D}"));
    }

    #[test]
    fn reacted_with_emoji_detected() {
        assert!(is_tapback_reaction("Reacted \u{1F44D} to \"on my way\""));
    }

    #[test]
    fn ordinary_message_not_tapback() {
        assert!(!is_tapback_reaction("Liked the new restaurant you mentioned yesterday"));
    }

    #[test]
    fn plain_text_not_tapback() {
        assert!(!is_tapback_reaction("What's the weather like today?"));
    }
}
