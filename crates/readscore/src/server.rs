//! MCP (Model Context Protocol) server implementation.
//!
//! Exposes the scoring engine over stdio so AI assistants can score text
//! without shelling out to the CLI. Every tool delegates to `readscore_core`.

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};

use readscore_core::{
    Config, Formula, ProseTokenizer, ScoreInput, Scorer, Statistics, Text, Tokenizer, Variant,
    VowelGroupCounter,
};

/// Parameters for the `get_info` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetInfoParams {
    /// Output format: "text" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "text".to_string()
}

/// Parameters for the `score_text` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ScoreTextParams {
    /// Raw prose to tokenize and score.
    pub text: Option<String>,
    /// Pre-tokenized input: a list of sentences, each a list of words.
    pub sentences: Option<Vec<Vec<String>>>,
    /// Formulas to compute. Omit for the server's configured list.
    pub formulas: Option<Vec<Formula>>,
    /// "reference" (default) or "textbook" arithmetic.
    pub variant: Option<Variant>,
    /// Whether to strip markdown formatting from `text` before scoring.
    #[serde(default)]
    pub strip_markdown: bool,
}

/// Parameters for the `score_statistics` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ScoreStatisticsParams {
    /// Precomputed aggregate counts, keyed as in the `text_statistics` output.
    pub statistics: Statistics,
    /// Formulas to compute. Omit for the server's configured list.
    pub formulas: Option<Vec<Formula>>,
    /// "reference" (default) or "textbook" arithmetic.
    pub variant: Option<Variant>,
}

/// Parameters for the `text_statistics` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct TextStatisticsParams {
    /// The text to aggregate.
    pub text: String,
    /// Whether to strip markdown formatting before aggregating.
    #[serde(default)]
    pub strip_markdown: bool,
    /// Polysyllable accumulation: "reference" sums syllables, "textbook" counts words.
    pub variant: Option<Variant>,
}

/// MCP server exposing readability scoring to AI assistants.
#[derive(Clone)]
pub struct ReadscoreServer {
    tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
    variant: Variant,
    formulas: Vec<Formula>,
    max_input: Option<usize>,
}

impl Default for ReadscoreServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl ReadscoreServer {
    /// Create a server with built-in defaults.
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
            variant: Variant::default(),
            formulas: Formula::ALL.to_vec(),
            max_input: Some(readscore_core::DEFAULT_MAX_INPUT_BYTES),
        }
    }

    /// Create a server whose defaults come from loaded configuration.
    pub fn with_config(config: &Config) -> Self {
        Self {
            variant: config.variant.unwrap_or_default(),
            formulas: config.formulas(),
            max_input: config.input_limit(),
            ..Self::new()
        }
    }

    /// Reject inputs whose payload exceeds the configured byte limit.
    fn check_size(&self, len: usize) -> Result<(), McpError> {
        match self.max_input {
            Some(max) if len > max => Err(McpError::invalid_params(
                format!("input too large: {len} bytes (limit: {max} bytes)"),
                None,
            )),
            _ => Ok(()),
        }
    }

    fn scorer(&self, variant: Option<Variant>) -> Scorer {
        Scorer::new(VowelGroupCounter).with_variant(variant.unwrap_or(self.variant))
    }

    fn tokenize(text: &str, strip_markdown: bool) -> Text {
        ProseTokenizer::new()
            .with_markdown(strip_markdown)
            .tokenize(text)
    }

    /// Get project information.
    #[tool(description = "Get project name, version, description, and supported formulas")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_info(
        &self,
        Parameters(params): Parameters<GetInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_info", format = %params.format, "executing MCP tool");

        let formulas: Vec<_> = Formula::ALL
            .iter()
            .map(|f| {
                serde_json::json!({
                    "acronym": f.acronym(),
                    "name": f.name(),
                    "description": f.description(),
                })
            })
            .collect();
        let info = serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "variant": self.variant,
            "formulas": formulas,
        });

        let text = if params.format == "json" {
            serde_json::to_string_pretty(&info)
                .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?
        } else {
            let acronyms: Vec<_> = Formula::ALL.iter().map(|f| f.acronym()).collect();
            format!(
                "{} v{}\n{}\nformulas: {}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_DESCRIPTION"),
                acronyms.join(", "),
            )
        };

        tracing::info!(tool = "get_info", "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Score raw or pre-tokenized text.
    #[tool(
        description = "Score text with classical readability formulas (GFI, ARI, FRE, FKGL, SMOG, REL). Pass either `text` or `sentences`."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn score_text(
        &self,
        Parameters(params): Parameters<ScoreTextParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(
            tool = "score_text",
            strip_md = params.strip_markdown,
            "executing MCP tool"
        );

        let text = match (params.text, params.sentences) {
            (Some(raw), None) => {
                self.check_size(raw.len())?;
                Self::tokenize(&raw, params.strip_markdown)
            }
            (None, Some(sentences)) => {
                self.check_size(sentences.iter().flatten().map(String::len).sum())?;
                sentences.into_iter().collect()
            }
            _ => {
                return Err(McpError::invalid_params(
                    "provide exactly one of `text` or `sentences`",
                    None,
                ));
            }
        };

        let formulas = params.formulas.unwrap_or_else(|| self.formulas.clone());
        let report = self
            .scorer(params.variant)
            .report(&formulas, ScoreInput::Raw(&text))
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?;

        tracing::info!(
            tool = "score_text",
            scores = report.scores.len(),
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Score a precomputed statistics bundle.
    #[tool(
        description = "Score a precomputed statistics bundle (totalWords, totalSentences, totalCharacters, totalSyllables, totalLongWords, nbPolysyllables)."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn score_statistics(
        &self,
        Parameters(params): Parameters<ScoreStatisticsParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "score_statistics", "executing MCP tool");

        let formulas = params.formulas.unwrap_or_else(|| self.formulas.clone());
        let report = self
            .scorer(params.variant)
            .report(&formulas, ScoreInput::Precomputed(&params.statistics))
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?;

        tracing::info!(
            tool = "score_statistics",
            scores = report.scores.len(),
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Aggregate text into a statistics bundle.
    #[tool(
        description = "Compute the aggregate statistics bundle for text. The result can be passed to score_statistics."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn text_statistics(
        &self,
        Parameters(params): Parameters<TextStatisticsParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(
            tool = "text_statistics",
            strip_md = params.strip_markdown,
            "executing MCP tool"
        );

        self.check_size(params.text.len())?;
        let text = Self::tokenize(&params.text, params.strip_markdown);
        let stats = self.scorer(params.variant).statistics(&text);

        let json = serde_json::to_string_pretty(&stats)
            .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?;

        tracing::info!(
            tool = "text_statistics",
            words = text.word_count(),
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

#[tool_handler]
impl ServerHandler for ReadscoreServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(format!(
                "{} MCP server. Use score_text for prose, score_statistics for precomputed counts.",
                env!("CARGO_PKG_NAME"),
            )),
        }
    }
}
