//! Interpretation of search-box input and curated preset questions.
//!
//! A search box accepts three kinds of input: a couplet number, one of the
//! curated preset questions (answered from a fixed list), or free text that
//! goes through semantic search.

use serde::{Deserialize, Serialize};

/// Parsed search-box input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    /// Nothing but whitespace.
    Empty,
    /// A bare item number.
    ById(i64),
    /// Free text for semantic search (trimmed).
    Text(String),
}

impl SearchQuery {
    /// Classify raw input.
    ///
    /// ```
    /// use vallu::query::SearchQuery;
    ///
    /// assert_eq!(SearchQuery::parse(" 1081 "), SearchQuery::ById(1081));
    /// assert_eq!(SearchQuery::parse("  "), SearchQuery::Empty);
    /// assert_eq!(
    ///     SearchQuery::parse("on friendship"),
    ///     SearchQuery::Text("on friendship".to_string())
    /// );
    /// ```
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return SearchQuery::Empty;
        }
        if trimmed.bytes().all(|b| b.is_ascii_digit())
            && let Ok(id) = trimmed.parse::<i64>()
        {
            return SearchQuery::ById(id);
        }
        SearchQuery::Text(trimmed.to_string())
    }
}

/// A curated question with its hand-picked answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetQuestion {
    /// Display category.
    pub category: String,
    /// The question text.
    pub question: String,
    /// Answer item ids, best first.
    pub ids: Vec<i64>,
}

/// The curated questions shipped with the reader.
const DEFAULT_PRESETS: &[(&str, &str, &[i64])] = &[
    ("Love and Relationships", "How does Thirukural define true love and relationships?", &[76, 71, 1109, 1192, 74]),
    ("Love and Relationships", "What are Thirukural's views on the role of women in society?", &[58, 907, 910, 57, 909]),
    ("Love and Relationships", "How does Thirukural address the theme of love and its relationship to human emotions?", &[111, 79, 80, 1192, 1196]),
    ("Personal Growth", "What advice does Thirukural offer for overcoming adversity?", &[622, 611, 414, 625, 538]),
    ("Personal Growth", "What lessons does Thirukural offer on the importance of humility?", &[985, 125, 963, 978, 95]),
    ("Personal Growth", "How does Thirukural address the theme of knowledge and its pursuit?", &[358, 717, 175, 354, 134]),
    ("Leadership and Success", "Can you provide Thirukural's insights on effective leadership?", &[382, 445, 513, 634, 648]),
    ("Leadership and Success", "What lessons does Thirukural offer on handling success and failure?", &[662, 372, 371, 461, 435]),
    ("Leadership and Success", "What are Thirukural's views on the balance between action and contemplation?", &[461, 485, 118, 676, 484]),
    ("Philosophy and Nature", "How does Thirukural address the theme of time and its management?", &[334, 484, 333, 337, 712]),
    ("Philosophy and Nature", "Can you explain Thirukural's perspective on the relationship between humans and nature?", &[542, 374, 1323, 149, 898]),
    ("Career and Finance", "What advice does Thirukural offer for managing finances?", &[333, 512, 657, 478, 408]),
    ("Career and Finance", "What lessons does Thirukural offer on the importance of hard work?", &[611, 619, 1065, 612, 538]),
    ("Career and Finance", "How does Thirukural address the theme of success and its pursuit?", &[179, 371, 611, 31, 542]),
    ("Health and Wellness", "How does Thirukural address the theme of health and its importance?", &[946, 949, 987, 217, 330]),
    ("Health and Wellness", "What lessons does Thirukural offer on the balance between work and rest?", &[612, 617, 611, 118, 1065]),
    ("Ethics and Morality", "Can you provide Thirukural's insights on the concept of duty and its relationship to morality?", &[981, 43, 179, 138, 549]),
    ("Ethics and Morality", "What lessons does Thirukural offer on the importance of integrity and honesty?", &[134, 138, 296, 48, 952]),
    ("Religion and Spirituality", "How does Thirukural address the theme of faith and its relationship to spirituality?", &[134, 311, 542, 24, 1023]),
    ("Religion and Spirituality", "What lessons does Thirukural offer on the importance of humility and its relationship to faith?", &[985, 125, 963, 960, 951]),
    ("Politics and Society", "Can you provide Thirukural's insights on the concept of justice and its relationship to society?", &[179, 553, 547, 542, 111]),
    ("Politics and Society", "What lessons does Thirukural offer on the importance of compassion and its relationship to justice?", &[157, 30, 542, 242, 179]),
    ("Science and Technology", "How does Thirukural address the theme of knowledge and its relationship to science and technology?", &[358, 134, 717, 1110, 354]),
    ("Science and Technology", "What lessons does Thirukural offer on the importance of humility and its relationship to knowledge?", &[175, 985, 125, 358, 963]),
    ("Art and Creativity", "Can you provide Thirukural's insights on the concept of beauty and its relationship to art and creativity?", &[407, 1273, 1101, 1320, 1103]),
    ("Art and Creativity", "What lessons does Thirukural offer on the importance of integrity and its relationship to art?", &[138, 134, 131, 30, 32]),
];

/// Lookup table of preset questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetCatalog {
    presets: Vec<PresetQuestion>,
}

impl PresetCatalog {
    /// Build a catalog from arbitrary presets.
    pub fn new(presets: Vec<PresetQuestion>) -> Self {
        Self { presets }
    }

    /// A catalog with no presets.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// All presets in display order.
    pub fn presets(&self) -> &[PresetQuestion] {
        &self.presets
    }

    /// Category names in display order, without repeats.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for preset in &self.presets {
            if !categories.contains(&preset.category.as_str()) {
                categories.push(&preset.category);
            }
        }
        categories
    }

    /// Find the preset whose question equals `question` (ignoring surrounding whitespace).
    pub fn lookup(&self, question: &str) -> Option<&PresetQuestion> {
        let question = question.trim();
        self.presets.iter().find(|preset| preset.question == question)
    }
}

impl Default for PresetCatalog {
    fn default() -> Self {
        let presets = DEFAULT_PRESETS
            .iter()
            .map(|(category, question, ids)| PresetQuestion {
                category: category.to_string(),
                question: question.to_string(),
                ids: ids.to_vec(),
            })
            .collect();
        Self::new(presets)
    }
}
