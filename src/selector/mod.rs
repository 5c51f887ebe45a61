//! Article selection.
//!
//! Reduces the candidate pool to at most the configured digest size. The
//! oracle ranks first; when it is missing or its reply is unusable the
//! round-robin diversity fallback takes over.

mod diversity;
mod ranked;

pub use diversity::round_robin;
pub use ranked::{build_manifest, parse_indices, rank_with_oracle, Selection, SelectionFailure};

use tracing::{info, warn};

use crate::config::DigestConfig;
use crate::feed::{Article, DigestArticle};
use crate::oracle::Oracle;

/// How a digest's articles were chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// The pool already fit the target size.
    All,
    /// The oracle ranked the pool.
    Oracle,
    /// Round-robin over sources.
    Diversity,
}

/// Select the articles for one digest.
pub async fn select_articles(
    candidates: &[Article],
    config: &DigestConfig,
    oracle: Option<&dyn Oracle>,
) -> (Vec<DigestArticle>, Strategy) {
    let target = config.target_size;

    if candidates.len() <= target {
        return (
            candidates.iter().map(Article::to_digest).collect(),
            Strategy::All,
        );
    }

    match rank_with_oracle(
        oracle,
        candidates,
        target,
        config.manifest_limit,
        config.summary_chars,
    )
    .await
    {
        Ok(selection) => {
            info!(
                candidates = candidates.len(),
                selected = selection.indices.len(),
                "Articles selected by oracle"
            );
            let picked = selection
                .indices
                .iter()
                .filter_map(|&i| candidates.get(i))
                .map(Article::to_digest)
                .collect();
            (picked, Strategy::Oracle)
        }
        Err(failure) => {
            match &failure {
                SelectionFailure::Unavailable => {
                    info!("No oracle configured, using diversity selection")
                }
                other => warn!(reason = %other, "Oracle selection failed, using diversity selection"),
            }
            let picked = round_robin(candidates, target)
                .into_iter()
                .map(Article::to_digest)
                .collect();
            (picked, Strategy::Diversity)
        }
    }
}
