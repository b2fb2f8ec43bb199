//! Category vocabularies and the keyword table
//!
//! Two vocabularies coexist and are not unified (downstream consumers depend
//! on both):
//! - The remote vocabulary: the closed set of labels the language model is
//!   allowed to answer with.
//! - The keyword table: an ordered list of categories with lowercase substring
//!   tokens. Declaration order is match priority.
//!
//! The keyword table's ids are snake_case (`food`, `food_dining`) and are
//! presented to callers in title case via [`title_case`]: the last segment of a
//! compound id is joined with `&`, so `food_dining` and `food_and_dining` both
//! read `Food & Dining`.

use serde::Serialize;

/// Label returned when the remote tier cannot produce an answer
pub const DEFAULT_CATEGORY: &str = "Miscellaneous";

/// Closed label set offered to the remote model
pub const REMOTE_CATEGORIES: [&str; 12] = [
    "Housing",
    "Utilities",
    "Food",
    "Transportation",
    "Entertainment",
    "Shopping",
    "Health",
    "Education",
    "Financial",
    "Travel",
    "Gifts & Donations",
    "Miscellaneous",
];

/// Built-in keyword table, in priority order
const BUILTIN_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "food",
        &[
            "restaurant",
            "cafe",
            "coffee",
            "starbucks",
            "mcdonald",
            "burger",
            "pizza",
            "kfc",
            "subway",
            "domino",
            "bakery",
            "grocery",
            "supermarket",
            "whole foods",
            "trader joe",
            "uber eats",
            "doordash",
            "grubhub",
            "swiggy",
            "zomato",
            "dining",
            "food",
        ],
    ),
    (
        "transportation",
        &[
            "uber",
            "lyft",
            "taxi",
            "metro",
            "transit",
            "railway",
            "parking",
            "toll",
            "fuel",
            "petrol",
            "gas station",
            "shell",
            "chevron",
            "exxon",
        ],
    ),
    (
        "entertainment",
        &[
            "netflix",
            "spotify",
            "hulu",
            "disney",
            "prime video",
            "youtube",
            "cinema",
            "movie",
            "theater",
            "theatre",
            "concert",
            "ticketmaster",
            "steam",
            "playstation",
            "xbox",
            "nintendo",
        ],
    ),
    (
        "shopping",
        &[
            "amazon",
            "walmart",
            "target",
            "costco",
            "ebay",
            "etsy",
            "ikea",
            "best buy",
            "flipkart",
            "myntra",
            "zara",
            "h&m",
            "nike",
        ],
    ),
    (
        "utilities",
        &[
            "electric",
            "water bill",
            "gas bill",
            "utility",
            "internet",
            "broadband",
            "comcast",
            "xfinity",
            "verizon",
            "at&t",
            "t-mobile",
            "airtel",
            "phone bill",
        ],
    ),
    (
        "housing",
        &[
            "rent payment",
            "mortgage",
            "landlord",
            "apartment",
            "property management",
            "housing",
        ],
    ),
    (
        "health",
        &[
            "pharmacy",
            "hospital",
            "clinic",
            "doctor",
            "dental",
            "dentist",
            "medical",
            "cvs",
            "walgreens",
            "gym",
            "fitness",
            "health",
        ],
    ),
    (
        "travel",
        &[
            "airline",
            "airways",
            "flight",
            "hotel",
            "airbnb",
            "expedia",
            "booking.com",
            "marriott",
            "hilton",
            "delta",
            "makemytrip",
        ],
    ),
];

/// Format a snake_case category id for display
///
/// `food` -> `Food`, `food_dining` -> `Food & Dining`,
/// `gifts_and_donations` -> `Gifts & Donations`.
pub fn title_case(id: &str) -> String {
    let words: Vec<String> = id
        .split('_')
        .filter(|word| !word.is_empty() && !word.eq_ignore_ascii_case("and"))
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect();

    match words.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} & {}", rest.join(" "), last),
        Some((last, _)) => last.clone(),
        None => String::new(),
    }
}

/// Resolve a model answer to a label of the remote vocabulary
///
/// Ignores surrounding whitespace, quotes, a trailing period and letter case.
pub fn canonical_remote_label(raw: &str) -> Option<&'static str> {
    let cleaned = raw
        .trim()
        .trim_end_matches('.')
        .trim_matches(|c| c == '"' || c == '\'' || c == '`')
        .trim_end_matches('.')
        .trim();

    REMOTE_CATEGORIES
        .iter()
        .copied()
        .find(|label| label.eq_ignore_ascii_case(cleaned))
}

/// One category of the keyword table
#[derive(Debug, Clone, Serialize)]
pub struct KeywordCategory {
    /// snake_case identifier (e.g. "food")
    pub id: String,
    /// Display label (e.g. "Food")
    pub label: String,
    /// Lowercase substring tokens
    pub tokens: Vec<String>,
}

impl KeywordCategory {
    /// Whether any token occurs in the already lower-cased text
    fn matches_lowercase(&self, text: &str) -> bool {
        self.tokens.iter().any(|token| text.contains(token.as_str()))
    }
}

/// Ordered category -> tokens mapping used by the keyword tier
#[derive(Debug, Clone, Serialize)]
pub struct KeywordTable {
    categories: Vec<KeywordCategory>,
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl KeywordTable {
    /// The built-in table shipped with the service
    pub fn builtin() -> Self {
        Self::new(
            BUILTIN_KEYWORDS
                .iter()
                .map(|(id, tokens)| (*id, tokens.iter().copied())),
        )
    }

    /// Build a table from `(id, tokens)` pairs, preserving their order
    ///
    /// Tokens are lower-cased; empty tokens are dropped since they would match
    /// every merchant.
    pub fn new<'a, I, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, T)>,
        T: IntoIterator<Item = &'a str>,
    {
        let categories = entries
            .into_iter()
            .map(|(id, tokens)| KeywordCategory {
                id: id.to_string(),
                label: title_case(id),
                tokens: tokens
                    .into_iter()
                    .map(|t| t.trim().to_lowercase())
                    .filter(|t| !t.is_empty())
                    .collect(),
            })
            .collect();

        Self { categories }
    }

    /// First category (in table order) with a token contained in `merchant`
    pub fn find(&self, merchant: &str) -> Option<&KeywordCategory> {
        let merchant = merchant.to_lowercase();
        self.categories
            .iter()
            .find(|category| category.matches_lowercase(&merchant))
    }

    pub fn categories(&self) -> &[KeywordCategory] {
        &self.categories
    }

    /// Display labels in priority order
    pub fn labels(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.label.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
