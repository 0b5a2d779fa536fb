//! Turning raw strings into [`Text`].
//!
//! The scores never split text themselves; they take a [`Text`]. This module
//! provides the [`Tokenizer`] seam plus [`ProseTokenizer`], a regex-based
//! splitter good enough for plain prose and markdown documents.

use std::sync::LazyLock;

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use regex::Regex;

use crate::text::Text;

/// Sentence: everything up to a run of terminators followed by whitespace
/// or end of input.
static SENTENCE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s).+?(?:[.!?]+(?:\s+|$)|$)").expect("valid regex"));

/// Word: letters/digits, keeping inner apostrophes and hyphens ("don't", "well-known").
static WORD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{L}\p{N}]+(?:['’\-][\p{L}\p{N}]+)*").expect("valid regex")
});

/// Converts a raw string into sentences of word tokens.
pub trait Tokenizer {
    /// Split `raw` into a [`Text`].
    fn tokenize(&self, raw: &str) -> Text;
}

impl<F> Tokenizer for F
where
    F: Fn(&str) -> Text,
{
    fn tokenize(&self, raw: &str) -> Text {
        self(raw)
    }
}

/// Punctuation-driven sentence splitter with optional markdown stripping.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProseTokenizer {
    strip_markdown: bool,
}

impl ProseTokenizer {
    /// Tokenizer for plain text.
    pub const fn new() -> Self {
        Self {
            strip_markdown: false,
        }
    }

    /// Strip markdown structure (code, headings, front matter) before splitting.
    pub const fn with_markdown(mut self, strip: bool) -> Self {
        self.strip_markdown = strip;
        self
    }
}

impl Tokenizer for ProseTokenizer {
    #[tracing::instrument(skip_all, fields(input_len = raw.len(), strip_md = self.strip_markdown))]
    fn tokenize(&self, raw: &str) -> Text {
        let prose = if self.strip_markdown {
            markdown_prose(raw)
        } else {
            raw.to_string()
        };

        let text: Text = SENTENCE_PATTERN
            .find_iter(&prose)
            .map(|sentence| {
                WORD_PATTERN
                    .find_iter(sentence.as_str())
                    .map(|word| word.as_str())
                    .collect::<Vec<_>>()
            })
            .filter(|words| !words.is_empty())
            .collect();

        tracing::debug!(
            sentences = text.sentence_count(),
            words = text.word_count(),
            "tokenized prose"
        );
        text
    }
}

/// Keep only the prose of a markdown document.
///
/// Code blocks, inline code, headings, and YAML front matter are dropped.
/// Paragraph and line breaks become spaces; link and emphasis text survive.
fn markdown_prose(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_YAML_STYLE_METADATA_BLOCKS;
    let parser = Parser::new_ext(markdown, options);

    let mut prose = String::with_capacity(markdown.len());
    let mut hidden: usize = 0;

    for event in parser {
        match event {
            Event::Start(Tag::CodeBlock(_) | Tag::Heading { .. } | Tag::MetadataBlock(_)) => {
                hidden += 1;
            }
            Event::End(TagEnd::CodeBlock | TagEnd::Heading(_) | TagEnd::MetadataBlock(_)) => {
                hidden = hidden.saturating_sub(1);
            }
            Event::Text(t) if hidden == 0 => prose.push_str(&t),
            Event::SoftBreak | Event::HardBreak | Event::End(TagEnd::Paragraph | TagEnd::Item)
                if hidden == 0 =>
            {
                prose.push(' ');
            }
            _ => {}
        }
    }

    prose
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentences(text: &Text) -> Vec<Vec<&str>> {
        text.sentences()
            .iter()
            .map(|s| s.iter().map(String::as_str).collect())
            .collect()
    }

    #[test]
    fn splits_sentences_and_words() {
        let text = ProseTokenizer::new().tokenize("The cat sat. Did it? Yes!");
        assert_eq!(
            sentences(&text),
            vec![vec!["The", "cat", "sat"], vec!["Did", "it"], vec!["Yes"]]
        );
    }

    #[test]
    fn trailing_fragment_is_a_sentence() {
        let text = ProseTokenizer::new().tokenize("One sentence. And a fragment");
        assert_eq!(text.sentence_count(), 2);
    }

    #[test]
    fn keeps_contractions_and_hyphens() {
        let text = ProseTokenizer::new().tokenize("Don't split well-known words.");
        assert_eq!(
            sentences(&text),
            vec![vec!["Don't", "split", "well-known", "words"]]
        );
    }

    #[test]
    fn decimals_stay_in_sentence() {
        let text = ProseTokenizer::new().tokenize("Pi is 3.14 roughly. Next.");
        assert_eq!(text.sentence_count(), 2);
    }

    #[test]
    fn unicode_words() {
        let text = ProseTokenizer::new().tokenize("L'été est très chaud.");
        assert_eq!(
            sentences(&text),
            vec![vec!["L'été", "est", "très", "chaud"]]
        );
    }

    #[test]
    fn punctuation_only_yields_nothing() {
        assert!(ProseTokenizer::new().tokenize("... !!! ??").is_empty());
        assert!(ProseTokenizer::new().tokenize("").is_empty());
    }

    #[test]
    fn markdown_structure_removed() {
        let md = "---\ntitle: x\n---\n# Heading words\n\nThe cat sat.\n\n```rust\nlet x = 1;\n```\n\nThe dog ran.";
        let text = ProseTokenizer::new().with_markdown(true).tokenize(md);
        assert_eq!(
            sentences(&text),
            vec![vec!["The", "cat", "sat"], vec!["The", "dog", "ran"]]
        );
    }

    #[test]
    fn leading_thematic_break_is_not_front_matter() {
        let md = "---\n\nThe cat sat.\n\n---\n\nThe dog ran.";
        let text = ProseTokenizer::new().with_markdown(true).tokenize(md);
        assert_eq!(
            sentences(&text),
            vec![vec!["The", "cat", "sat"], vec!["The", "dog", "ran"]]
        );
    }

    #[test]
    fn front_matter_text_is_dropped() {
        let md = "---\ntitle: Long Words Everywhere\ntags: [a, b]\n---\nShort one.";
        let text = ProseTokenizer::new().with_markdown(true).tokenize(md);
        assert_eq!(sentences(&text), vec![vec!["Short", "one"]]);
    }

    #[test]
    fn closures_are_tokenizers() {
        let one_word = |raw: &str| Text::new(vec![vec![raw.to_string()]]);
        assert_eq!(one_word.tokenize("hi").word_count(), 1);
    }
}
