//! Deterministic diversity fallback.

use std::collections::{HashMap, VecDeque};

use crate::feed::Article;

/// Pick up to `target` articles by round-robin over source buckets.
///
/// Buckets are ordered by the first appearance of their source in
/// `candidates`; each round takes the next unconsumed article from every
/// non-empty bucket.
pub fn round_robin(candidates: &[Article], target: usize) -> Vec<&Article> {
    let mut order: Vec<&str> = Vec::new();
    let mut buckets: HashMap<&str, VecDeque<&Article>> = HashMap::new();

    for article in candidates {
        let source = article.source.as_str();
        buckets
            .entry(source)
            .or_insert_with(|| {
                order.push(source);
                VecDeque::new()
            })
            .push_back(article);
    }

    let mut picked = Vec::with_capacity(target.min(candidates.len()));
    while picked.len() < target {
        let mut progressed = false;
        for source in &order {
            if picked.len() == target {
                break;
            }
            if let Some(article) = buckets.get_mut(source).and_then(|b| b.pop_front()) {
                picked.push(article);
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }

    picked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_sources(sources: &[&str]) -> Vec<Article> {
        sources
            .iter()
            .enumerate()
            .map(|(i, s)| Article {
                title: format!("{s}{i}"),
                link: format!("https://example.com/{i}"),
                summary: String::new(),
                published: None,
                source: s.to_string(),
            })
            .collect()
    }

    fn sources_of(picked: &[&Article]) -> Vec<String> {
        picked.iter().map(|a| a.source.clone()).collect()
    }

    #[test]
    fn test_round_robin_one_per_source_per_round() {
        let candidates = from_sources(&["A", "A", "A", "B", "B", "C"]);
        let picked = round_robin(&candidates, 4);
        assert_eq!(sources_of(&picked), vec!["A", "B", "C", "A"]);

        let titles: Vec<&str> = picked.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["A0", "B3", "C5", "A1"]);
    }

    #[test]
    fn test_round_robin_skips_exhausted_sources() {
        let candidates = from_sources(&["A", "A", "A", "B", "B", "C"]);
        let picked = round_robin(&candidates, 10);
        assert_eq!(sources_of(&picked), vec!["A", "B", "C", "A", "B", "A"]);
    }

    #[test]
    fn test_round_robin_bucket_order_is_first_seen() {
        let candidates = from_sources(&["B", "A", "B", "C"]);
        let picked = round_robin(&candidates, 3);
        assert_eq!(sources_of(&picked), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_round_robin_is_deterministic() {
        let candidates = from_sources(&["X", "Y", "X", "Z", "Y", "X", "W"]);
        assert_eq!(round_robin(&candidates, 5), round_robin(&candidates, 5));
    }

    #[test]
    fn test_round_robin_edge_sizes() {
        let candidates = from_sources(&["A", "B"]);
        assert!(round_robin(&candidates, 0).is_empty());
        assert!(round_robin(&[], 4).is_empty());
    }
}
