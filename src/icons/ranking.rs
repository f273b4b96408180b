//! Ranking search over the catalog snapshot / 目录相关性排序搜索
//!
//! Additive relevance scoring, not full-text search: every entry is scanned
//! once per query, which is fine for catalogs in the low thousands.

use std::cmp::Ordering;

use super::client::encode_component;
use super::types::{CatalogEntry, SearchResult};

const REFERENCE_EXACT: i64 = 1200;
const REFERENCE_PREFIX: i64 = 900;
const NAME_EXACT: i64 = 1000;
const NAME_PREFIX: i64 = 800;
const NAME_CONTAINS: i64 = 500;
const REFERENCE_CONTAINS: i64 = 450;
const TAGS_CONTAINS: i64 = 220;
const CATEGORY_CONTAINS: i64 = 120;
const TOKEN_IN_NAME: i64 = 80;
const TOKEN_IN_REFERENCE: i64 = 70;
const TOKEN_IN_TAGS: i64 = 35;

/// Normalised query: trimmed lowercase text plus its whitespace tokens / 规范化查询
#[derive(Debug, Clone)]
pub struct Query {
    pub text: String,
    pub tokens: Vec<String>,
}

impl Query {
    pub fn parse(raw: &str) -> Self {
        let text = raw.trim().to_lowercase();
        let tokens = text.split_whitespace().map(|t| t.to_string()).collect();
        Self { text, tokens }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Score one entry; `None` means the pre-filter excluded it / 计算得分
pub fn score_entry(entry: &CatalogEntry, query: &Query) -> Option<i64> {
    if query.is_empty() {
        return Some(0);
    }

    let name = entry.name.to_lowercase();
    let reference = entry.reference.to_lowercase();
    let category = entry.category.to_lowercase();
    let tags = entry.tags.to_lowercase();
    let q = query.text.as_str();

    let haystack = format!("{} {} {} {} {}", name, name, reference, category, tags);
    if !haystack.contains(q) {
        return None;
    }

    let mut score = 0;

    if reference == q {
        score += REFERENCE_EXACT;
    } else if reference.starts_with(q) {
        score += REFERENCE_PREFIX;
    }

    if name == q {
        score += NAME_EXACT;
    } else if name.starts_with(q) {
        score += NAME_PREFIX;
    }

    if name.contains(q) {
        score += NAME_CONTAINS;
    }
    if reference.contains(q) {
        score += REFERENCE_CONTAINS;
    }
    if tags.contains(q) {
        score += TAGS_CONTAINS;
    }
    if category.contains(q) {
        score += CATEGORY_CONTAINS;
    }

    for token in &query.tokens {
        if name.contains(token.as_str()) {
            score += TOKEN_IN_NAME;
        }
        if reference.contains(token.as_str()) {
            score += TOKEN_IN_REFERENCE;
        }
        if tags.contains(token.as_str()) {
            score += TOKEN_IN_TAGS;
        }
    }

    Some(score)
}

/// Preview URL for an entry, empty when it has neither SVG nor PNG / 预览地址
pub fn preview_url(raw_base: &str, entry: &CatalogEntry) -> String {
    match entry.preview_format() {
        Some(format) => asset_url(raw_base, &entry.reference, format.ext()),
        None => String::new(),
    }
}

/// `<base>/<ext>/<reference>.<ext>`
pub fn asset_url(raw_base: &str, reference: &str, ext: &str) -> String {
    format!(
        "{}/{}/{}.{}",
        raw_base.trim_end_matches('/'),
        ext,
        encode_component(reference),
        ext
    )
}

/// Score, sort and truncate / 打分、排序、截断
pub fn rank(items: &[CatalogEntry], raw_query: &str, limit: usize, raw_base: &str) -> Vec<SearchResult> {
    let query = Query::parse(raw_query);

    let mut scored: Vec<(i64, &CatalogEntry)> = items
        .iter()
        .filter_map(|entry| score_entry(entry, &query).map(|score| (score, entry)))
        .collect();

    scored.sort_by(|(score_a, a), (score_b, b)| compare_hits(*score_a, a, *score_b, b));
    scored.truncate(limit);

    scored
        .into_iter()
        .map(|(score, entry)| SearchResult::from_catalog(entry, score, preview_url(raw_base, entry)))
        .collect()
}

/// Score desc, then name, then reference (both case-insensitive) / 排序规则
fn compare_hits(score_a: i64, a: &CatalogEntry, score_b: i64, b: &CatalogEntry) -> Ordering {
    score_b
        .cmp(&score_a)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.reference.to_lowercase().cmp(&b.reference.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://raw.test/icons";

    fn entry(name: &str, reference: &str, category: &str, tags: &str) -> CatalogEntry {
        CatalogEntry {
            name: name.to_string(),
            reference: reference.to_string(),
            category: category.to_string(),
            tags: tags.to_string(),
            has_svg: true,
            has_png: true,
            has_webp: false,
            has_light: false,
            has_dark: false,
        }
    }

    fn catalog() -> Vec<CatalogEntry> {
        vec![
            entry("Homepage", "homepage", "Dashboard", "radar dashboard"),
            entry("Radarr", "radarr", "Media", "movies"),
            entry("Sonarr", "sonarr", "Media", "tv"),
            entry("Plex", "plex", "Media", "movies tv"),
        ]
    }

    #[test]
    fn test_prefix_match_beats_tag_match() {
        let results = rank(&catalog(), "radar", 10, BASE);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].reference, "radarr");
        assert_eq!(results[1].reference, "homepage");
        assert!(results[0].score > results[1].score);
    }

    #[test]
    fn test_scores_are_additive() {
        let query = Query::parse("Radarr");
        // reference exact + name exact + name/reference contains + token in name/reference
        assert_eq!(score_entry(&catalog()[1], &query), Some(1200 + 1000 + 500 + 450 + 80 + 70));

        let tag_only = score_entry(&catalog()[0], &Query::parse("radar"));
        assert_eq!(tag_only, Some(220 + 35));
    }

    #[test]
    fn test_multiple_tokens_stack() {
        let query = Query::parse("movies tv");
        let plex = score_entry(&catalog()[3], &query).unwrap();
        // full query in tags, plus two token hits in tags
        assert_eq!(plex, 220 + 35 + 35);
        assert_eq!(score_entry(&catalog()[1], &query), None);
    }

    #[test]
    fn test_empty_query_returns_everything_with_zero_score() {
        let results = rank(&catalog(), "   ", 3, BASE);
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.score == Some(0)));
        let names: Vec<_> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Homepage", "Plex", "Radarr"]);
    }

    #[test]
    fn test_ties_break_on_name_then_reference() {
        let items = vec![
            entry("beta", "b-2", "", ""),
            entry("Alpha", "a-1", "", ""),
            entry("beta", "B-1", "", ""),
        ];
        let results = rank(&items, "", 10, BASE);
        let refs: Vec<_> = results.iter().map(|r| r.reference.as_str()).collect();
        assert_eq!(refs, vec!["a-1", "B-1", "b-2"]);
    }

    #[test]
    fn test_ranking_is_deterministic() {
        let first = rank(&catalog(), "media", 10, BASE);
        let second = rank(&catalog(), "media", 10, BASE);
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn test_preview_url() {
        let mut item = entry("Plex", "plex", "", "");
        assert_eq!(preview_url(BASE, &item), "https://raw.test/icons/svg/plex.svg");
        item.has_svg = false;
        assert_eq!(preview_url(BASE, &item), "https://raw.test/icons/png/plex.png");
        item.has_png = false;
        assert_eq!(preview_url(BASE, &item), "");
    }
}
