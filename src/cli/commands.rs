//! Command implementations for the harf CLI.
//!
//! Each command reads its text, merges its flags into the loaded
//! configuration, builds a result struct and hands it to the output layer.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::Context;
use log::{debug, info};

use crate::analysis::{ArabicNormalizer, CompositionForm, NormalizerConfig};
use crate::cli::args::*;
use crate::cli::output::*;
use crate::error::Result;
use crate::highlight::{HighlightConfig, Highlighter};
use crate::lookup::{LookupEntry, NameIndex, validate_entries};
use crate::query::validate_query;

/// Execute a CLI command.
pub fn execute_command(args: HarfArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;

    match &args.command {
        Command::Normalize(normalize_args) => normalize_text(normalize_args, config, &args),
        Command::Highlight(highlight_args) => highlight_text(highlight_args, config, &args),
        Command::Find(find_args) => find_matches(find_args, config, &args),
        Command::Lookup(lookup_args) => lookup_entries(lookup_args, &args),
        Command::Snippet(snippet_args) => cut_snippet(snippet_args, config, &args),
    }
}

/// Print the normalized form of a text.
fn normalize_text(args: &NormalizeArgs, config: HighlightConfig, cli_args: &HarfArgs) -> Result<()> {
    let text = read_text(&args.text)?;
    let normalizer_config = normalizer_config(args, config.normalizer);
    debug!("Normalizer configuration: {normalizer_config:?}");

    let result = normalize_result(text, normalizer_config);
    output_result("Normalized text:", &result, cli_args)
}

/// Highlight one or more queries in a text.
fn highlight_text(args: &HighlightArgs, config: HighlightConfig, cli_args: &HarfArgs) -> Result<()> {
    let text = read_text(&args.text)?;
    let highlighter = Highlighter::new(highlight_config(args, config));

    let result = highlight_result(&text, &args.queries, &highlighter)?;
    info!("Highlighted {} queries", result.queries.len());
    output_result("Highlighted text:", &result, cli_args)
}

/// Print every match span of a query.
fn find_matches(args: &FindArgs, config: HighlightConfig, cli_args: &HarfArgs) -> Result<()> {
    let text = read_text(&args.text)?;
    let highlighter = Highlighter::new(config);

    let result = find_result(&text, &args.query, &highlighter)?;
    info!("Found {} matches for {:?}", result.matches.len(), result.query);
    output_result("Matches:", &result, cli_args)
}

/// Filter a list of entries by name or number.
fn lookup_entries(args: &LookupArgs, cli_args: &HarfArgs) -> Result<()> {
    let entries = load_entries(&args.entries)?;

    let result = lookup_result(&args.query, entries, args.limit)?;
    info!(
        "{} of {} entries match",
        result.entries.len(),
        result.total_entries
    );
    output_result("Matching entries:", &result, cli_args)
}

/// Cut a highlighted excerpt around the first match.
fn cut_snippet(args: &SnippetArgs, config: HighlightConfig, cli_args: &HarfArgs) -> Result<()> {
    let text = read_text(&args.text)?;
    let highlighter = Highlighter::new(snippet_config(args, config));

    let result = snippet_result(&text, &args.query, &highlighter)?;
    output_result("Snippet:", &result, cli_args)
}

/// Apply the `normalize` flags on top of the configured normalizer.
pub fn normalizer_config(args: &NormalizeArgs, base: NormalizerConfig) -> NormalizerConfig {
    let mut config = base;
    if args.nfc {
        config = config.composition(CompositionForm::Nfc);
    }
    if args.keep_diacritics {
        config = config.keep_diacritics();
    }
    if args.keep_tatweel {
        config = config.keep_tatweel();
    }
    config
}

/// Apply the `highlight` markup flags on top of the loaded configuration.
///
/// Explicit `--start`/`--end` markers win over `--tag` and `--css-class`.
pub fn highlight_config(args: &HighlightArgs, base: HighlightConfig) -> HighlightConfig {
    let mut config = base;
    if let Some(tag) = &args.tag {
        config = config.tag(tag.clone());
    }
    if let Some(css_class) = &args.css_class {
        config = config.css_class(css_class.clone());
    }
    if args.no_css_class {
        config = config.no_css_class();
    }
    if let (Some(start), Some(end)) = (&args.start, &args.end) {
        config = config.markers(start.clone(), end.clone());
    }
    config
}

/// Apply `--max-length` on top of the loaded configuration.
pub fn snippet_config(args: &SnippetArgs, base: HighlightConfig) -> HighlightConfig {
    match args.max_length {
        Some(max_length) => base.snippet_length(max_length),
        None => base,
    }
}

pub fn normalize_result(text: String, config: NormalizerConfig) -> NormalizeResult {
    let normalized = ArabicNormalizer::with_config(config).normalize(&text);
    NormalizeResult {
        original: text,
        normalized,
    }
}

/// Highlight `queries` in `text`; several queries share one pattern.
pub fn highlight_result(
    text: &str,
    queries: &[String],
    highlighter: &Highlighter,
) -> Result<HighlightResult> {
    let highlighted = match queries {
        [query] => highlighter.highlight(text, query)?,
        queries => {
            let terms: Vec<&str> = queries.iter().map(String::as_str).collect();
            highlighter.highlight_terms(text, &terms)?
        }
    };

    Ok(HighlightResult {
        queries: queries.to_vec(),
        highlighted,
    })
}

/// Validate `raw_query` as search input and list its matches in `text`.
pub fn find_result(text: &str, raw_query: &str, highlighter: &Highlighter) -> Result<FindResult> {
    let query = validate_query(raw_query)?;
    let pattern = highlighter.pattern(query)?;

    let matches = highlighter
        .spans_with(&pattern, text)
        .into_iter()
        .map(|span| FoundMatch {
            span,
            text: span.text(text).to_string(),
        })
        .collect();

    Ok(FindResult {
        query: query.to_string(),
        normalized_query: pattern.query().to_string(),
        matches,
    })
}

/// Validate `entries` and keep those matching `query`, at most `limit`.
pub fn lookup_result(
    query: &str,
    entries: Vec<LookupEntry>,
    limit: Option<usize>,
) -> Result<LookupResult> {
    validate_entries(&entries)?;

    let index = NameIndex::new(entries);
    let mut found: Vec<LookupEntry> = index.filter(query).into_iter().cloned().collect();
    if let Some(limit) = limit {
        found.truncate(limit);
    }

    Ok(LookupResult {
        query: query.to_string(),
        total_entries: index.len(),
        entries: found,
    })
}

/// Validate `raw_query` as search input and cut a snippet around it.
pub fn snippet_result(
    text: &str,
    raw_query: &str,
    highlighter: &Highlighter,
) -> Result<SnippetResult> {
    let query = validate_query(raw_query)?;
    let snippet = highlighter.snippet(text, query)?;

    Ok(SnippetResult {
        query: query.to_string(),
        snippet,
    })
}

/// Read a text argument; "-" reads all of stdin.
fn read_text(arg: &str) -> Result<String> {
    read_text_from(arg, io::stdin())
}

/// Read a text argument; "-" reads all of `reader`, without trailing newlines.
pub fn read_text_from<R: Read>(arg: &str, mut reader: R) -> Result<String> {
    if arg != "-" {
        return Ok(arg.to_string());
    }

    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .context("Failed to read text from stdin")?;
    let trimmed_len = text.trim_end_matches(['\n', '\r']).len();
    text.truncate(trimmed_len);
    Ok(text)
}

/// Load a highlight configuration file, or the defaults when none is given.
pub fn load_config(path: Option<&Path>) -> Result<HighlightConfig> {
    let Some(path) = path else {
        return Ok(HighlightConfig::default());
    };

    debug!("Loading configuration from: {}", path.display());
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: HighlightConfig = serde_json::from_str(&content)
        .with_context(|| format!("Invalid config file {}", path.display()))?;
    Ok(config)
}

/// Load lookup entries from a JSON array file.
pub fn load_entries(path: &Path) -> Result<Vec<LookupEntry>> {
    debug!("Loading entries from: {}", path.display());
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read entries file {}", path.display()))?;
    let entries: Vec<LookupEntry> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid entries file {}", path.display()))?;
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;
    use crate::error::HarfError;
    use crate::pattern::MatchSpan;

    fn highlight_args(queries: &[&str]) -> HighlightArgs {
        HighlightArgs {
            text: "-".to_string(),
            queries: queries.iter().map(|q| q.to_string()).collect(),
            tag: None,
            css_class: None,
            no_css_class: false,
            start: None,
            end: None,
        }
    }

    fn normalize_args() -> NormalizeArgs {
        NormalizeArgs {
            text: "-".to_string(),
            nfc: false,
            keep_diacritics: false,
            keep_tatweel: false,
        }
    }

    #[test]
    fn test_load_config_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config, HighlightConfig::default());
    }

    #[test]
    fn test_load_config_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"tag": "em", "css_class": null}}"#).unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.opening_tag(), "<em>");
        assert_eq!(config.closing_tag(), "</em>");
        assert_eq!(config.snippet_length, HighlightConfig::default().snippet_length);
    }

    #[test]
    fn test_load_config_reports_path() {
        let err = load_config(Some(Path::new("/nonexistent/harf.json"))).unwrap_err();
        assert!(matches!(err, HarfError::Anyhow(_)));
        assert!(err.to_string().contains("/nonexistent/harf.json"));
    }

    #[test]
    fn test_load_entries() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"order": 1, "name": "الفاتحة"}}, {{"order": 2, "name": "البقرة"}}]"#
        )
        .unwrap();

        let entries = load_entries(file.path()).unwrap();
        assert_eq!(
            entries,
            vec![LookupEntry::new(1, "الفاتحة"), LookupEntry::new(2, "البقرة")]
        );
    }

    #[test]
    fn test_load_entries_rejects_bad_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"order": 1}}"#).unwrap();

        let err = load_entries(file.path()).unwrap_err();
        assert!(err.to_string().starts_with("Invalid entries file"));
    }

    #[test]
    fn test_read_text_passes_arguments_through() {
        let unused = "ignored".as_bytes();
        assert_eq!(read_text_from("بسم الله", unused).unwrap(), "بسم الله");
        assert_eq!(read_text("بسم الله").unwrap(), "بسم الله");
    }

    #[test]
    fn test_read_text_from_reader_drops_trailing_newlines() {
        let input = "بِسْمِ اللَّهِ\n\n".as_bytes();
        assert_eq!(read_text_from("-", input).unwrap(), "بِسْمِ اللَّهِ");

        let input = "سطر أول\r\nسطر ثان\r\n".as_bytes();
        assert_eq!(read_text_from("-", input).unwrap(), "سطر أول\r\nسطر ثان");

        assert_eq!(read_text_from("-", "".as_bytes()).unwrap(), "");
    }

    #[test]
    fn test_read_text_from_rejects_invalid_utf8() {
        let input: &[u8] = &[0xff, 0xfe, b'\n'];
        let err = read_text_from("-", input).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read text from stdin"));
    }

    #[test]
    fn test_find_result_on_piped_text() {
        let text = read_text_from("-", "بِسْمِ اللَّهِ\n\n".as_bytes()).unwrap();
        let result = find_result(&text, " الله ", &Highlighter::default()).unwrap();

        assert_eq!(result.query, "الله");
        assert_eq!(result.normalized_query, "الله");
        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.matches[0].span, MatchSpan::new(13, 27));
        assert_eq!(result.matches[0].text, "اللَّهِ");
    }

    #[test]
    fn test_find_and_snippet_reject_short_queries() {
        let highlighter = Highlighter::default();
        for query in ["ا", " ا ", ""] {
            let err = find_result("اللغة العربية", query, &highlighter).unwrap_err();
            assert!(matches!(err, HarfError::Query(_)), "query: {query:?}");

            let err = snippet_result("اللغة العربية", query, &highlighter).unwrap_err();
            assert!(matches!(err, HarfError::Query(_)), "query: {query:?}");
        }
    }

    #[test]
    fn test_highlight_accepts_empty_query() {
        let highlighter = Highlighter::default();
        let result = highlight_result("بِسْمِ اللَّهِ", &["".to_string()], &highlighter).unwrap();
        assert_eq!(result.highlighted, "بِسْمِ اللَّهِ");
    }

    #[test]
    fn test_markers_override_tag() {
        let mut args = highlight_args(&["بسم"]);
        args.tag = Some("b".to_string());
        args.start = Some("[".to_string());
        args.end = Some("]".to_string());

        let highlighter = Highlighter::new(highlight_config(&args, HighlightConfig::default()));
        let result = highlight_result("بِسْمِ اللَّهِ", &args.queries, &highlighter).unwrap();
        assert_eq!(result.highlighted, "[بِسْمِ] اللَّهِ");
    }

    #[test]
    fn test_highlight_config_tag_and_class() {
        let mut args = highlight_args(&["بسم"]);
        args.tag = Some("b".to_string());
        let config = highlight_config(&args, HighlightConfig::default());
        assert_eq!(config.opening_tag(), "<b class=\"highlight\">");

        args.no_css_class = true;
        let config = highlight_config(&args, HighlightConfig::default());
        assert_eq!(config.opening_tag(), "<b>");
        assert_eq!(config.closing_tag(), "</b>");
    }

    #[test]
    fn test_highlight_result_with_several_queries() {
        let args = highlight_args(&["الله", "الرحيم"]);
        let highlighter =
            Highlighter::new(HighlightConfig::new().markers("[".to_string(), "]".to_string()));
        let result =
            highlight_result("بسم الله الرحمن الرحيم", &args.queries, &highlighter).unwrap();
        assert_eq!(result.highlighted, "بسم [الله] الرحمن [الرحيم]");
    }

    #[test]
    fn test_snippet_config_overrides_length() {
        let args = SnippetArgs {
            text: "-".to_string(),
            query: "نص".to_string(),
            max_length: Some(40),
        };
        assert_eq!(snippet_config(&args, HighlightConfig::default()).snippet_length, 40);

        let args = SnippetArgs {
            max_length: None,
            ..args
        };
        assert_eq!(snippet_config(&args, HighlightConfig::default()).snippet_length, 150);
    }

    #[test]
    fn test_lookup_result_limit() {
        let entries = vec![
            LookupEntry::new(1, "الفاتحة"),
            LookupEntry::new(2, "البقرة"),
            LookupEntry::new(12, "يوسف"),
            LookupEntry::new(112, "الإخلاص"),
        ];

        let result = lookup_result("ال", entries.clone(), Some(2)).unwrap();
        assert_eq!(result.total_entries, 4);
        assert_eq!(
            result.entries,
            vec![LookupEntry::new(1, "الفاتحة"), LookupEntry::new(2, "البقرة")]
        );

        let result = lookup_result("12", entries, None).unwrap();
        assert_eq!(result.entries.len(), 2);

        let bad = vec![LookupEntry::new(1, " ")];
        assert!(matches!(lookup_result("1", bad, None), Err(HarfError::Lookup(_))));
    }

    #[test]
    fn test_normalize_flags() {
        let args = normalize_args();
        let config = normalizer_config(&args, NormalizerConfig::default());
        let result = normalize_result("إِسْلَامـ".to_string(), config);
        assert_eq!(result.normalized, "اسلام");
        assert_eq!(result.original, "إِسْلَامـ");

        let args = NormalizeArgs {
            keep_diacritics: true,
            keep_tatweel: true,
            ..normalize_args()
        };
        let config = normalizer_config(&args, NormalizerConfig::default());
        assert_eq!(normalize_result("إِسْلَامـ".to_string(), config).normalized, "اِسْلَامـ");

        let decomposed = "\u{0627}\u{0654}\u{062D}\u{062F}".to_string();
        let config = normalizer_config(&normalize_args(), NormalizerConfig::default());
        let plain = normalize_result(decomposed.clone(), config);
        assert_eq!(plain.normalized, decomposed);

        let args = NormalizeArgs {
            nfc: true,
            ..normalize_args()
        };
        let config = normalizer_config(&args, NormalizerConfig::default());
        let composed = normalize_result(decomposed, config);
        assert_eq!(composed.normalized, "احد");
    }
}
