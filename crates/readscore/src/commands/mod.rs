//! Command implementations.

use anyhow::Context;
use camino::Utf8Path;
use readscore_core::{ProseTokenizer, Text, Tokenizer};

pub mod info;
pub mod score;
#[cfg(feature = "mcp")]
pub mod serve;
pub mod stats;

/// Read a file after checking its size against the configured limit.
pub fn read_input_file(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<String> {
    // Preflight via metadata so oversized files are never read into memory.
    let metadata =
        std::fs::metadata(path.as_std_path()).with_context(|| format!("failed to read {path}"))?;
    if let Some(max) = max_bytes {
        let size = metadata.len();
        if size > max as u64 {
            anyhow::bail!("input too large: {path} is {size} bytes (limit: {max} bytes)");
        }
    }

    std::fs::read_to_string(path.as_std_path()).with_context(|| format!("failed to read {path}"))
}

/// Read a text file into sentences of tokens.
///
/// `.json` files hold either pre-tokenized sentences or a JSON string;
/// `.md` files are stripped to prose first; anything else is plain text.
pub fn load_text(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<Text> {
    let content = read_input_file(path, max_bytes)?;
    let text = match path.extension() {
        Some("json") => Text::from_json(&content, &ProseTokenizer::new())
            .with_context(|| format!("failed to parse {path}"))?,
        Some("md" | "markdown") => ProseTokenizer::new()
            .with_markdown(true)
            .tokenize(&content),
        _ => ProseTokenizer::new().tokenize(&content),
    };
    tracing::debug!(
        file = %path,
        sentences = text.sentence_count(),
        words = text.word_count(),
        "loaded text"
    );
    Ok(text)
}
