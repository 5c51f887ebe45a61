//! Oracle-ranked selection.

use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::feed::Article;
use crate::oracle::Oracle;

/// Articles chosen by the oracle, as 0-based candidate indices in rank order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Candidate indices, most important first.
    pub indices: Vec<usize>,
}

/// Why oracle ranking produced no selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionFailure {
    /// No oracle is configured.
    Unavailable,
    /// The oracle call failed.
    Oracle(String),
    /// The reply held no usable index.
    Unparseable(String),
}

impl fmt::Display for SelectionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionFailure::Unavailable => write!(f, "no oracle configured"),
            SelectionFailure::Oracle(e) => write!(f, "oracle call failed: {e}"),
            SelectionFailure::Unparseable(reply) => {
                let preview: String = reply.chars().take(80).collect();
                write!(f, "no valid indices in reply: {preview:?}")
            }
        }
    }
}

/// Ask the oracle to rank `candidates` and pick `target` of them.
///
/// Only the first `manifest_limit` candidates are shown to the oracle.
pub async fn rank_with_oracle(
    oracle: Option<&dyn Oracle>,
    candidates: &[Article],
    target: usize,
    manifest_limit: usize,
    summary_chars: usize,
) -> Result<Selection, SelectionFailure> {
    let oracle = oracle.ok_or(SelectionFailure::Unavailable)?;

    let shown = &candidates[..candidates.len().min(manifest_limit)];
    let prompt = selection_prompt(shown, target, summary_chars);

    let reply = oracle
        .complete(&prompt)
        .await
        .map_err(|e| SelectionFailure::Oracle(e.to_string()))?;

    let mut indices = parse_indices(&reply, shown.len());
    if indices.is_empty() {
        return Err(SelectionFailure::Unparseable(reply));
    }
    indices.truncate(target);

    Ok(Selection { indices })
}

/// Numbered manifest of candidates, one entry per article.
pub fn build_manifest(candidates: &[Article], summary_chars: usize) -> String {
    candidates
        .iter()
        .enumerate()
        .map(|(i, article)| {
            let summary: String = article.summary.chars().take(summary_chars).collect();
            format!(
                "{}. {} — {}\n   {}",
                i + 1,
                article.title,
                article.source,
                summary
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn selection_prompt(candidates: &[Article], target: usize, summary_chars: usize) -> String {
    format!(
        "You are curating a daily AI and technology news digest.\n\
         Below are {count} candidate articles, numbered 1 to {count}.\n\n\
         {manifest}\n\n\
         Choose exactly {target} articles. Order them by importance, most important first. \
         Cover a diverse range of topics and avoid picking near-duplicate stories about the same event.\n\
         Reply with the chosen article numbers only, separated by commas.",
        count = candidates.len(),
        manifest = build_manifest(candidates, summary_chars),
        target = target,
    )
}

/// Recover 0-based candidate indices from an oracle reply.
///
/// Every embedded integer is read in order. Values outside `[1, count]` and
/// repeats are dropped.
pub fn parse_indices(reply: &str, count: usize) -> Vec<usize> {
    static NUMBERS: OnceLock<Regex> = OnceLock::new();
    let re = NUMBERS.get_or_init(|| Regex::new(r"\d+").expect("valid number pattern"));

    let mut seen = HashSet::new();
    re.find_iter(reply)
        .filter_map(|m| m.as_str().parse::<usize>().ok())
        .filter(|n| (1..=count).contains(n))
        .map(|n| n - 1)
        .filter(|i| seen.insert(*i))
        .collect()
}
