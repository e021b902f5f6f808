//! Heuristic content classification for news entries
//!
//! A fixed-priority decision list over the entry's title, link, declared
//! categories and raw content body. Rules are evaluated top to bottom and the
//! first match wins, so the order of the checks in [`classify`] is load-bearing:
//! preview signals must be seen before the review rules, since "preview"
//! contains "review".

use std::sync::OnceLock;

use regex::Regex;

use super::models::NewsKind;

const PREVIEW_TOKENS: &[&str] = &[
    "preview",
    "hands-on",
    "hands on",
    "first look",
    "first-look",
    "impressions",
    "first impressions",
    "förhandstitt",
];
const PREVIEW_PATHS: &[&str] = &["/preview/", "/previews/", "/hands-on/"];

const REVIEW_WORDS: &[&str] = &["review", "recension", "anmeldelse", "recensione"];
const REVIEW_PATHS: &[&str] = &["/review/", "/reviews/", "/recension/", "/tests/"];
/// Outlets title patch notes and score aggregates with the word "review"
const NEGATIVE_REVIEW_PHRASES: &[&str] = &[
    "roundup",
    "round-up",
    "scores",
    "review scores",
    "score roundup",
    "patch notes",
    "update notes",
    "update:",
    "hotfix",
    "changelog",
];

const GUIDE_WORDS: &[&str] = &["guide", "walkthrough"];
const GUIDE_TOKENS: &[&str] = &[
    "tips ",
    "how to",
    "how-to",
    "explained",
    "build guide",
    "tier list",
    "best build",
];
const GUIDE_PATHS: &[&str] = &["/guide/", "/guides/", "/how-to/", "/walkthrough/"];

const OPINION_WORDS: &[&str] = &["opinion", "editorial", "commentary", "op-ed", "op ed", "krönika"];

const VIDEO_TOKENS: &[&str] = &["trailer", "gameplay", "watch the", "video:", "livestream"];

const DEAL_TOKENS: &[&str] = &["deal", "reapris", "sale", "discount", "offer", "bundle", "free weekend"];

const FEATURE_WORDS: &[&str] = &["feature"];
const FEATURE_TOKENS: &[&str] = &["in-depth", "retrospective", "history of", "behind the scenes", "ranking"];

/// Outlets that prefix titles with "Review:" / "Preview:" but carry terse categories
const PREFIXING_OUTLETS: &[&str] = &["nintendolife.com", "pushsquare.com", "purexbox.com"];

/// Textual signals of one candidate entry
#[derive(Debug, Clone, Copy, Default)]
pub struct KindSignals<'a> {
    pub title: &'a str,
    pub source: &'a str,
    pub link: &'a str,
    pub categories: &'a [String],
    pub content: &'a str,
}

/// Build a whole-word alternation matcher for a fixed word list
fn word_pattern(words: &[&str]) -> Regex {
    let alternation = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{})\b", alternation)).expect("word list is a valid pattern")
}

fn review_words() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| word_pattern(REVIEW_WORDS))
}

fn guide_words() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| word_pattern(GUIDE_WORDS))
}

fn opinion_words() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| word_pattern(OPINION_WORDS))
}

fn feature_words() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| word_pattern(FEATURE_WORDS))
}

/// Lowercased views of the signals shared by every rule
struct Haystack {
    title: String,
    link: String,
    source: String,
    categories: Vec<String>,
    combined: String,
}

impl Haystack {
    fn new(signals: &KindSignals<'_>) -> Self {
        let title = signals.title.to_lowercase();
        let link = signals.link.to_lowercase();
        let source = signals.source.to_lowercase();
        let categories: Vec<String> = signals.categories.iter().map(|c| c.to_lowercase()).collect();
        let combined = format!(
            "{} {} {} {}",
            title,
            link,
            categories.join(" "),
            signals.content.to_lowercase()
        );

        Self {
            title,
            link,
            source,
            categories,
            combined,
        }
    }

    fn has_any(&self, tokens: &[&str]) -> bool {
        tokens.iter().any(|t| self.combined.contains(t))
    }

    fn categories_contain(&self, words: &[&str]) -> bool {
        self.categories
            .iter()
            .any(|c| words.iter().any(|w| c.contains(w)))
    }

    fn link_contains(&self, segments: &[&str]) -> bool {
        segments.iter().any(|s| self.link.contains(s))
    }
}

/// Assign exactly one kind to an entry. Pure: identical signals give identical kinds.
pub fn classify(signals: &KindSignals<'_>) -> NewsKind {
    let hay = Haystack::new(signals);

    if hay.has_any(PREVIEW_TOKENS)
        || hay.categories_contain(&["preview", "previews"])
        || hay.link_contains(PREVIEW_PATHS)
    {
        return NewsKind::Preview;
    }

    let strong_title_review = hay.title.starts_with("review:")
        || hay.title.starts_with("recension:")
        || hay.title.ends_with(" review");
    if hay.link_contains(REVIEW_PATHS) || strong_title_review {
        return NewsKind::Review;
    }
    if review_words().is_match(&hay.title) && !hay.has_any(NEGATIVE_REVIEW_PHRASES) {
        return NewsKind::Review;
    }

    if guide_words().is_match(&hay.combined)
        || hay.has_any(GUIDE_TOKENS)
        || hay.categories_contain(&["guide", "guides"])
        || hay.link_contains(GUIDE_PATHS)
    {
        return NewsKind::Guide;
    }

    if opinion_words().is_match(&hay.combined) || hay.categories_contain(&["opinion", "editorial"]) {
        return NewsKind::Opinion;
    }

    if hay.has_any(&["interview", "q&a"])
        || hay.categories_contain(&["interview"])
        || hay.link_contains(&["/interview/"])
    {
        return NewsKind::Interview;
    }

    if hay.has_any(VIDEO_TOKENS) || hay.categories_contain(&["video"]) || hay.link_contains(&["/trailer/"]) {
        return NewsKind::Video;
    }

    if hay.has_any(DEAL_TOKENS) || hay.categories_contain(&["deal", "deals"]) || hay.link_contains(&["/deals/"]) {
        return NewsKind::Deal;
    }

    if feature_words().is_match(&hay.combined)
        || hay.has_any(FEATURE_TOKENS)
        || hay.categories_contain(&["feature"])
    {
        return NewsKind::Feature;
    }

    if PREFIXING_OUTLETS.iter().any(|o| hay.source.contains(o)) {
        if hay.title.starts_with("review:") {
            return NewsKind::Review;
        }
        if hay.title.starts_with("preview:") {
            return NewsKind::Preview;
        }
    }

    NewsKind::News
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_of(title: &str, link: &str, categories: &[&str], content: &str) -> NewsKind {
        let categories: Vec<String> = categories.iter().map(|c| c.to_string()).collect();
        classify(&KindSignals {
            title,
            source: "site.com",
            link,
            categories: &categories,
            content,
        })
    }

    #[test]
    fn test_preview_wins_over_review_path() {
        let kind = kind_of(
            "Preview: Starfield impressions",
            "https://site.com/preview/starfield",
            &[],
            "",
        );
        assert_eq!(kind, NewsKind::Preview);
    }

    #[test]
    fn test_preview_token_beats_review_word() {
        let kind = kind_of(
            "Hands-on with the new DLC: a full review roundup of scores",
            "https://site.com/news/dlc",
            &[],
            "",
        );
        assert_eq!(kind, NewsKind::Preview);
    }

    #[test]
    fn test_negative_context_suppresses_review() {
        let kind = kind_of(
            "The new DLC: a full review roundup of scores",
            "https://site.com/news/dlc",
            &[],
            "",
        );
        assert_eq!(kind, NewsKind::News);
    }

    #[test]
    fn test_review_path_match() {
        let kind = kind_of(
            "God of War Ragnarök review",
            "https://site.com/reviews/god-of-war",
            &[],
            "",
        );
        assert_eq!(kind, NewsKind::Review);
    }

    #[test]
    fn test_review_title_prefix_ignores_negative_context() {
        let kind = kind_of("Review: Patch notes aside, it shines", "https://site.com/a", &[], "");
        assert_eq!(kind, NewsKind::Review);
    }

    #[test]
    fn test_review_word_in_title_requires_word_boundary() {
        assert_eq!(
            kind_of("Our review of the new racer is in", "https://site.com/a", &[], ""),
            NewsKind::Review
        );
        assert_eq!(
            kind_of("Reviewers are divided on the racer", "https://site.com/a", &[], ""),
            NewsKind::News
        );
    }

    #[test]
    fn test_localized_review_word() {
        let kind = kind_of("Vår recension av Zelda", "https://site.se/a", &[], "");
        assert_eq!(kind, NewsKind::Review);
    }

    #[test]
    fn test_guide_rules() {
        assert_eq!(
            kind_of("Elden Ring walkthrough part 3", "https://site.com/a", &[], ""),
            NewsKind::Guide
        );
        assert_eq!(
            kind_of("Diablo 4 tier list for season 5", "https://site.com/a", &[], ""),
            NewsKind::Guide
        );
        assert_eq!(
            kind_of("Where to find every chest", "https://site.com/guides/chests", &[], ""),
            NewsKind::Guide
        );
        assert_eq!(
            kind_of("Where to find every chest", "https://site.com/a", &["Guides"], ""),
            NewsKind::Guide
        );
    }

    #[test]
    fn test_guide_word_is_whole_word_only() {
        // "guidelines" must not count as "guide"
        let kind = kind_of("Studio publishes new community guidelines", "https://site.com/a", &[], "");
        assert_eq!(kind, NewsKind::News);
    }

    #[test]
    fn test_opinion_rules() {
        assert_eq!(
            kind_of("Opinion: live service fatigue is real", "https://site.com/a", &[], ""),
            NewsKind::Opinion
        );
        assert_eq!(
            kind_of("Live service fatigue is real", "https://site.com/a", &["Editorial"], ""),
            NewsKind::Opinion
        );
        assert_eq!(
            kind_of("Veckans krönika om spel", "https://site.se/a", &[], ""),
            NewsKind::Opinion
        );
    }

    #[test]
    fn test_interview_rules() {
        assert_eq!(
            kind_of("Q&A with the director", "https://site.com/a", &[], ""),
            NewsKind::Interview
        );
        assert_eq!(
            kind_of("The director speaks", "https://site.com/interview/director", &[], ""),
            NewsKind::Interview
        );
    }

    #[test]
    fn test_video_rules() {
        assert_eq!(
            kind_of("New trailer drops for the sequel", "https://site.com/a", &[], ""),
            NewsKind::Video
        );
        assert_eq!(
            kind_of("The sequel", "https://site.com/trailer/sequel", &[], ""),
            NewsKind::Video
        );
    }

    #[test]
    fn test_deal_rules() {
        assert_eq!(
            kind_of("Huge discount on the console this week", "https://site.com/a", &[], ""),
            NewsKind::Deal
        );
        assert_eq!(
            kind_of("Console price cut", "https://site.com/deals/console", &[], ""),
            NewsKind::Deal
        );
    }

    #[test]
    fn test_feature_rules() {
        assert_eq!(
            kind_of("A retrospective on the first console", "https://site.com/a", &[], ""),
            NewsKind::Feature
        );
        assert_eq!(
            kind_of("Why the first console mattered", "https://site.com/a", &["Feature"], ""),
            NewsKind::Feature
        );
    }

    #[test]
    fn test_content_body_contributes_to_haystack() {
        let kind = kind_of(
            "The sequel is coming",
            "https://site.com/a",
            &[],
            "<p>Watch the full trailer below</p>",
        );
        assert_eq!(kind, NewsKind::Video);
    }

    #[test]
    fn test_prefixing_outlet_override() {
        let categories: Vec<String> = Vec::new();
        let kind = classify(&KindSignals {
            title: "Review: Mario Kart World scores big",
            source: "nintendolife.com",
            link: "https://www.nintendolife.com/news/mario",
            categories: &categories,
            content: "",
        });
        // Title prefix already triggers the strong review rule before the override
        assert_eq!(kind, NewsKind::Review);
    }

    #[test]
    fn test_default_is_news() {
        assert_eq!(
            kind_of("Studio announces new release date", "https://site.com/a", &[], ""),
            NewsKind::News
        );
    }

    #[test]
    fn test_classify_is_pure() {
        let first = kind_of("Best build for the mage class", "https://site.com/a", &["RPG"], "");
        let second = kind_of("Best build for the mage class", "https://site.com/a", &["RPG"], "");
        assert_eq!(first, second);
        assert_eq!(first, NewsKind::Guide);
    }
}
