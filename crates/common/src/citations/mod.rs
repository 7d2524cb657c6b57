//! Source-citation extraction
//!
//! The knowledge service appends a citation block to its answers:
//!
//! ```text
//! <answer body>
//!
//! ---
//!
//! **Sources:**
//! *   [Bhagavad Gita, Ch 1](source:bg1) (Confidence: 92%)
//! ```
//!
//! [`parse_sources`] splits such text into the answer body and the ordered
//! list of citations. It is pure and never fails, so it can be re-run on the
//! accumulated text after every streamed chunk.

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Separator between the answer body and the citation block
pub const SOURCES_MARKER: &str = "\n\n---\n\n**Sources:**\n";

/// One bulleted citation: `*   [<location>](source:<id>) (Confidence: <n>%)`.
/// Locations stop at the first `]`, so nested brackets are not supported.
const SOURCE_PATTERN: &str =
    r"\*\s+\[([^\]]+)\]\(source:([^)]+)\)\s+\(Confidence:\s+([\d.]+)%\)";

/// A reference to a passage the answer was drawn from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceCitation {
    /// Opaque source identifier; duplicates are kept
    pub id: String,

    /// Display label, e.g. "Adi Parva, Ch 3"
    pub location: String,

    /// Retrieval confidence as a percentage
    pub confidence: f64,
}

/// Answer text split into its body and citations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedAnswer {
    pub content: String,
    pub sources: Vec<SourceCitation>,
}

impl ParsedAnswer {
    /// Answer with no citation block
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            sources: Vec::new(),
        }
    }

    pub fn has_sources(&self) -> bool {
        !self.sources.is_empty()
    }
}

fn source_regex() -> Option<&'static Regex> {
    static SOURCE_RE: OnceLock<Option<Regex>> = OnceLock::new();
    SOURCE_RE
        .get_or_init(|| match Regex::new(SOURCE_PATTERN) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::error!(error = %e, "Source citation pattern failed to compile");
                None
            }
        })
        .as_ref()
}

/// Split answer text into body and citations.
///
/// Without the marker the text is returned untouched (not trimmed) with no
/// sources, which is the normal state while the body is still streaming.
/// With the marker, the body is the trimmed text before it and the sources
/// are every well-formed entry after it, left to right. Malformed entries
/// are skipped.
pub fn parse_sources(text: &str) -> ParsedAnswer {
    let Some(marker_index) = text.find(SOURCES_MARKER) else {
        return ParsedAnswer::plain(text);
    };

    let Some(re) = source_regex() else {
        return ParsedAnswer::plain(text);
    };

    let content = text[..marker_index].trim();
    let sources_text = &text[marker_index + SOURCES_MARKER.len()..];

    let sources = re
        .captures_iter(sources_text)
        .filter_map(|cap| {
            let location = cap.get(1)?.as_str();
            let id = cap.get(2)?.as_str();
            let confidence = match cap.get(3)?.as_str().parse::<f64>() {
                Ok(value) => value,
                Err(_) => {
                    tracing::debug!(
                        raw = cap.get(3).map(|m| m.as_str()).unwrap_or_default(),
                        "Skipping citation with unparsable confidence"
                    );
                    return None;
                }
            };

            Some(SourceCitation {
                id: id.to_string(),
                location: location.to_string(),
                confidence,
            })
        })
        .collect();

    ParsedAnswer {
        content: content.to_string(),
        sources,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn citation(location: &str, id: &str, confidence: f64) -> SourceCitation {
        SourceCitation {
            id: id.to_string(),
            location: location.to_string(),
            confidence,
        }
    }

    #[test]
    fn test_no_marker_returns_text_untouched() {
        let text = "  Krishna counsels Arjuna on the battlefield.\n\n";
        let parsed = parse_sources(text);
        assert_eq!(parsed.content, text);
        assert!(parsed.sources.is_empty());
    }

    #[test]
    fn test_extracts_sources_in_order() {
        let text = "Dharma is duty.\n\n---\n\n**Sources:**\n\
                    *   [Shanti Parva, Ch 12](source:sp12) (Confidence: 88%)\n\
                    *   [Bhishma Parva, Ch 25](source:bp25) (Confidence: 71.5%)\n";
        let parsed = parse_sources(text);

        assert_eq!(parsed.content, "Dharma is duty.");
        assert_eq!(
            parsed.sources,
            vec![
                citation("Shanti Parva, Ch 12", "sp12", 88.0),
                citation("Bhishma Parva, Ch 25", "bp25", 71.5),
            ]
        );
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let text = "Answer\n\n---\n\n**Sources:**\n\
                    *   [Genesis 1](source:gen1) (Confidence: 90%)\n\
                    - [Exodus 3](source:ex3) (Confidence: 80%)\n\
                    *   [Psalms 23](source:ps23)\n\
                    *   [John 3](source:jn3) (Confidence: 60%)\n\
                    garbage line\n";
        let parsed = parse_sources(text);

        assert_eq!(parsed.sources.len(), 2);
        assert_eq!(parsed.sources[0].id, "gen1");
        assert_eq!(parsed.sources[1].id, "jn3");
    }

    #[test]
    fn test_marker_without_citations() {
        let text = "  The answer body.  \n\n---\n\n**Sources:**\nnone available";
        let parsed = parse_sources(text);
        assert_eq!(parsed.content, "The answer body.");
        assert!(parsed.sources.is_empty());
    }

    #[test]
    fn test_confidence_parsing() {
        let text = "x\n\n---\n\n**Sources:**\n\
                    *   [A](source:a) (Confidence: 87%)\n\
                    *   [B](source:b) (Confidence: 42.5%)\n";
        let parsed = parse_sources(text);
        assert_eq!(parsed.sources[0].confidence, 87.0);
        assert_eq!(parsed.sources[1].confidence, 42.5);
    }

    #[test]
    fn test_unparsable_confidence_is_skipped() {
        let text = "x\n\n---\n\n**Sources:**\n\
                    *   [A](source:a) (Confidence: 1.2.3%)\n\
                    *   [B](source:b) (Confidence: 50%)\n";
        let parsed = parse_sources(text);
        assert_eq!(parsed.sources, vec![citation("B", "b", 50.0)]);
    }

    #[test]
    fn test_duplicate_ids_pass_through() {
        let text = "x\n\n---\n\n**Sources:**\n\
                    *   [Al-Baqarah 2:255](source:q2) (Confidence: 95%)\n\
                    *   [Al-Baqarah 2:256](source:q2) (Confidence: 80%)\n";
        let parsed = parse_sources(text);
        assert_eq!(parsed.sources.len(), 2);
        assert!(parsed.sources.iter().all(|s| s.id == "q2"));
    }

    #[test]
    fn test_nested_brackets_stop_at_first_close() {
        let text = "x\n\n---\n\n**Sources:**\n\
                    *   [Adi [Parva]](source:ap) (Confidence: 70%)\n";
        let parsed = parse_sources(text);
        assert!(parsed.sources.is_empty());
    }

    #[test]
    fn test_deterministic() {
        let text = "Body\n\n---\n\n**Sources:**\n*   [L](source:i) (Confidence: 33%)\n";
        assert_eq!(parse_sources(text), parse_sources(text));
    }

    #[test]
    fn test_growing_prefix_converges() {
        let full = "Krishna is the charioteer.\n\n---\n\n**Sources:**\n\
                    *   [Bhagavad Gita, Ch 1](source:bg1) (Confidence: 92%)\n";

        let mut boundary = 0;
        for end in (0..=full.len()).filter(|i| full.is_char_boundary(*i)) {
            let parsed = parse_sources(&full[..end]);
            if !full[..end].contains(SOURCES_MARKER) {
                assert!(parsed.sources.is_empty());
                assert_eq!(parsed.content, &full[..end]);
            } else if boundary == 0 {
                boundary = end;
            }
        }

        assert!(boundary > 0);
        let final_answer = parse_sources(full);
        assert_eq!(final_answer.content, "Krishna is the charioteer.");
        assert_eq!(
            final_answer.sources,
            vec![citation("Bhagavad Gita, Ch 1", "bg1", 92.0)]
        );
    }
}
