//! Digest summarization and message formatting.
//!
//! The oracle writes the digest prose when it is available and its reply
//! keeps the article links; otherwise a deterministic local format is used.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::feed::DigestArticle;
use crate::oracle::Oracle;

/// Marker the oracle must keep for every article link.
const READ_MORE_MARKER: &str = "[Read more]";

/// Header of the locally formatted digest.
const LOCAL_HEADER: &str = "📰 *AI & Tech Daily Digest*";

/// A digest body and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Digest text.
    pub text: String,
    /// Whether the oracle wrote the text.
    pub from_oracle: bool,
}

/// Digest summarizer.
pub struct Summarizer {
    oracle: Option<Arc<dyn Oracle>>,
    max_articles: usize,
}

impl Summarizer {
    /// Create a summarizer covering at most `max_articles` articles.
    pub fn new(oracle: Option<Arc<dyn Oracle>>, max_articles: usize) -> Self {
        Self {
            oracle,
            max_articles,
        }
    }

    /// Produce the digest body for the selected articles.
    ///
    /// Never fails: oracle errors and unusable replies fall back to
    /// [`format_local`].
    pub async fn summarize(&self, articles: &[DigestArticle]) -> Summary {
        let articles = &articles[..articles.len().min(self.max_articles)];

        let Some(oracle) = &self.oracle else {
            return local(articles);
        };

        match oracle.complete(&summary_prompt(articles)).await {
            Ok(reply) if is_usable(&reply) => Summary {
                text: reply.trim().to_string(),
                from_oracle: true,
            },
            Ok(_) => {
                debug!("Oracle summary dropped the article links, formatting locally");
                local(articles)
            }
            Err(e) => {
                warn!(error = %e, "Oracle summary failed, formatting locally");
                local(articles)
            }
        }
    }
}

fn local(articles: &[DigestArticle]) -> Summary {
    Summary {
        text: format_local(articles),
        from_oracle: false,
    }
}

fn is_usable(reply: &str) -> bool {
    !reply.trim().is_empty() && reply.contains(READ_MORE_MARKER)
}

fn summary_prompt(articles: &[DigestArticle]) -> String {
    let list = articles
        .iter()
        .enumerate()
        .map(|(i, a)| format!("{}. {}\n   Link: {}", i + 1, a.title, a.link))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Summarize the following tech/AI articles. For each article, provide a 2-3 sentence \
         summary followed by the original link in this exact format:\n\n\
         *Article Title*\n\
         Summary here...\n\
         🔗 [Read more](original_link)\n\n\
         Articles to summarize:\n\
         {list}\n\n\
         Please maintain this format exactly and include all the links."
    )
}

/// Deterministic digest body: a header and one title/summary/link block per
/// article. Digest articles carry no summary, so a fixed line is derived from
/// the title.
pub fn format_local(articles: &[DigestArticle]) -> String {
    let mut blocks = vec![LOCAL_HEADER.to_string()];
    blocks.extend(articles.iter().enumerate().map(|(i, a)| {
        format!(
            "*{}. {}*\n{}\n🔗 <{}|Read more>",
            i + 1,
            a.title,
            local_summary(&a.title),
            a.link
        )
    }));
    blocks.join("\n\n")
}

fn local_summary(title: &str) -> String {
    format!("Latest update from the tech world covering {}.", title.to_lowercase())
}

/// Full Slack message for a recipient.
pub fn slack_message(email: &str, body: &str) -> String {
    format!("🤖 *Daily AI/Tech Digest for {email}*\n\n{body}")
}

/// Email subject for the digest of a local date.
pub fn email_subject(date: NaiveDate) -> String {
    format!("Daily News Digest -- {}", date.format("%Y-%m-%d"))
}
