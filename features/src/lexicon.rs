//! Word lists driving the lexical features.
//!
//! A [`Lexicon`] is plain immutable data. [`Lexicon::default`] is tuned for
//! Vietnamese sales calls; other locales load their own lists from YAML and
//! inject them into the pipeline.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("static regex"));

/// Lowercases `text` and returns its Unicode word tokens.
///
/// Punctuation and whitespace separate tokens, so `"Xin Chào!"` yields
/// `["xin", "chào"]`.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    WORD.find_iter(&lower).map(|m| m.as_str().to_string()).collect()
}

/// Word lists for lexical counting, speech-rate filtering and the
/// greeting/closing checks of the call summary.
///
/// Single-word lists are matched against lowercase tokens. Phrase and marker
/// lists are matched as substrings of the lowercased text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lexicon {
    /// Discourse particles excluded from the speech rate.
    pub fillers: BTreeSet<String>,
    /// Hesitation tokens.
    pub disfluencies: BTreeSet<String>,
    /// Polite single tokens.
    pub politeness_words: BTreeSet<String>,
    /// Polite multi-word phrases, counted as substrings.
    pub politeness_phrases: BTreeSet<String>,
    pub negative_words: BTreeSet<String>,
    pub positive_words: BTreeSet<String>,

    pub greeting_markers: Vec<String>,
    pub name_markers: Vec<String>,
    pub company_markers: Vec<String>,
    pub thanks_markers: Vec<String>,
    pub goodbye_markers: Vec<String>,
}

fn set(words: &[&str]) -> BTreeSet<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn list(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            fillers: set(&[
                "à", "ạ", "ờ", "ừ", "ử", "ừm", "ửm", "hửm", "ơ", "ờm", "dạ", "vâng", "vầng",
                "thưa", "thì", "là", "mà", "rằng", "nhé", "nhá", "nha", "nhỉ", "hả", "ơi",
            ]),
            disfluencies: set(&[
                "à", "ờ", "ử", "ửm", "hửm", "ơ", "ờm", "hơm", "này", "nọ", "kia",
            ]),
            politeness_words: set(&[
                "dạ", "ạ", "vâng", "thưa", "kính", "mong", "xin", "thank", "thanks", "sorry",
                "pardon",
            ]),
            politeness_phrases: set(&["cảm ơn", "cám ơn", "xin lỗi"]),
            negative_words: set(&[
                "tệ", "kém", "dở", "chán", "tức", "bực", "mất", "không", "chưa", "sai", "lỗi",
                "hỏng", "phiền",
            ]),
            positive_words: set(&["tốt", "hay", "được", "ok", "oke", "vui", "tuyệt"]),

            greeting_markers: list(&["xin chào", "chào", "dạ"]),
            name_markers: list(&["em là", "em tên", "tôi là"]),
            company_markers: list(&["công ty", "bên"]),
            thanks_markers: list(&["cảm ơn", "cám ơn", "thank"]),
            goodbye_markers: list(&["tạm biệt", "chào", "bye"]),
        }
    }
}

impl Lexicon {
    /// Returns true for tokens that carry no content for the speech rate.
    pub fn is_filler(&self, token: &str) -> bool {
        self.fillers.contains(token)
    }

    /// Lowercases every entry so that matching against lowercased text works
    /// for hand-written YAML lists.
    pub fn normalized(self) -> Self {
        let lower_set = |s: BTreeSet<String>| s.into_iter().map(|w| w.to_lowercase()).collect();
        let lower_list = |v: Vec<String>| v.into_iter().map(|w| w.to_lowercase()).collect();
        Self {
            fillers: lower_set(self.fillers),
            disfluencies: lower_set(self.disfluencies),
            politeness_words: lower_set(self.politeness_words),
            politeness_phrases: lower_set(self.politeness_phrases),
            negative_words: lower_set(self.negative_words),
            positive_words: lower_set(self.positive_words),
            greeting_markers: lower_list(self.greeting_markers),
            name_markers: lower_list(self.name_markers),
            company_markers: lower_list(self.company_markers),
            thanks_markers: lower_list(self.thanks_markers),
            goodbye_markers: lower_list(self.goodbye_markers),
        }
    }
}

/// Returns true if `text` (already lowercased) contains any of `markers`.
pub fn contains_any(text: &str, markers: &[String]) -> bool {
    markers.iter().any(|m| !m.is_empty() && text.contains(m.as_str()))
}
