//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{HarfArgs, OutputFormat};
use crate::error::Result;
use crate::highlight::Snippet;
use crate::lookup::LookupEntry;
use crate::pattern::MatchSpan;

/// Result structure for normalization.
#[derive(Debug, Serialize, Deserialize)]
pub struct NormalizeResult {
    pub original: String,
    pub normalized: String,
}

/// Result structure for highlighting.
#[derive(Debug, Serialize, Deserialize)]
pub struct HighlightResult {
    pub queries: Vec<String>,
    pub highlighted: String,
}

/// A single match with its matched text.
#[derive(Debug, Serialize, Deserialize)]
pub struct FoundMatch {
    #[serde(flatten)]
    pub span: MatchSpan,
    pub text: String,
}

/// Result structure for span search.
#[derive(Debug, Serialize, Deserialize)]
pub struct FindResult {
    pub query: String,
    pub normalized_query: String,
    pub matches: Vec<FoundMatch>,
}

/// Result structure for entry lookup.
#[derive(Debug, Serialize, Deserialize)]
pub struct LookupResult {
    pub query: String,
    pub total_entries: usize,
    pub entries: Vec<LookupEntry>,
}

/// Result structure for snippets.
#[derive(Debug, Serialize, Deserialize)]
pub struct SnippetResult {
    pub query: String,
    #[serde(flatten)]
    pub snippet: Snippet,
}

/// Rendering of a result for the human output format.
pub trait HumanOutput {
    fn lines(&self) -> Vec<String>;
}

impl HumanOutput for NormalizeResult {
    fn lines(&self) -> Vec<String> {
        vec![self.normalized.clone()]
    }
}

impl HumanOutput for HighlightResult {
    fn lines(&self) -> Vec<String> {
        vec![self.highlighted.clone()]
    }
}

impl HumanOutput for FindResult {
    fn lines(&self) -> Vec<String> {
        if self.matches.is_empty() {
            return vec![format!("No matches for {:?}", self.query)];
        }
        self.matches
            .iter()
            .map(|m| format!("{}\t{}", m.span, m.text))
            .collect()
    }
}

impl HumanOutput for LookupResult {
    fn lines(&self) -> Vec<String> {
        if self.entries.is_empty() {
            return vec![format!("No entries match {:?}", self.query)];
        }
        self.entries
            .iter()
            .map(|entry| format!("{:>4}  {}", entry.order, entry.name))
            .collect()
    }
}

impl HumanOutput for SnippetResult {
    fn lines(&self) -> Vec<String> {
        vec![self.snippet.text.clone()]
    }
}

/// Output a result in the specified format.
pub fn output_result<T>(message: &str, result: &T, args: &HarfArgs) -> Result<()>
where
    T: Serialize + HumanOutput,
{
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: HumanOutput>(message: &str, result: &T, args: &HarfArgs) -> Result<()> {
    if args.verbosity() > 1 {
        println!("{message}");
        println!();
    }

    for line in result.lines() {
        println!("{line}");
    }
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &HarfArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}
