//! Text-derived word-list counts.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::lexicon::{tokenize, Lexicon};

/// Word-list counts of one utterance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexicalCounts {
    pub disfluency_count: usize,
    pub politeness_count: usize,
    pub negative_count: usize,
    pub positive_count: usize,
}

/// Lexical features of one utterance, counts plus the interruption flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexicalFeatures {
    #[serde(flatten)]
    pub counts: LexicalCounts,
    pub is_interrupted: bool,
}

impl LexicalFeatures {
    pub fn new(counts: LexicalCounts, is_interrupted: bool) -> Self {
        Self {
            counts,
            is_interrupted,
        }
    }
}

/// Counts lexicon hits in utterance text.
#[derive(Debug, Clone)]
pub struct LexicalAnalyzer {
    lexicon: Arc<Lexicon>,
}

impl LexicalAnalyzer {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    /// Counts token hits per list.
    ///
    /// Politeness also counts non-overlapping occurrences of each phrase in
    /// the lowercased text, so "xin lỗi" scores twice: once for the token
    /// "xin" and once for the phrase.
    pub fn count(&self, text: &str) -> LexicalCounts {
        let lex = &self.lexicon;
        let mut counts = LexicalCounts::default();
        for token in tokenize(text) {
            let t = token.as_str();
            if lex.disfluencies.contains(t) {
                counts.disfluency_count += 1;
            }
            if lex.politeness_words.contains(t) {
                counts.politeness_count += 1;
            }
            if lex.negative_words.contains(t) {
                counts.negative_count += 1;
            }
            if lex.positive_words.contains(t) {
                counts.positive_count += 1;
            }
        }

        let lower = text.to_lowercase();
        counts.politeness_count += lex
            .politeness_phrases
            .iter()
            .filter(|p| !p.is_empty())
            .map(|p| lower.matches(p.as_str()).count())
            .sum::<usize>();
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> LexicalAnalyzer {
        LexicalAnalyzer::new(Arc::new(Lexicon::default()))
    }

    #[test]
    fn counts_every_list() {
        let got = analyzer().count("Dạ, cảm ơn anh. Xin lỗi, ờ, em không rõ");
        assert_eq!(
            got,
            LexicalCounts {
                disfluency_count: 1,
                politeness_count: 4,
                negative_count: 2,
                positive_count: 0,
            }
        );
    }

    #[test]
    fn case_insensitive() {
        let a = analyzer();
        assert_eq!(a.count("SẢN PHẨM TỐT"), a.count("sản phẩm tốt"));
        assert_eq!(a.count("Sản phẩm TỐT").positive_count, 1);
    }

    #[test]
    fn phrases_count_each_occurrence() {
        let got = analyzer().count("cảm ơn, cảm ơn anh nhiều");
        assert_eq!(got.politeness_count, 2);
    }

    #[test]
    fn empty_text() {
        assert_eq!(analyzer().count(""), LexicalCounts::default());
    }

    #[test]
    fn custom_lexicon() {
        let lex = Lexicon {
            positive_words: ["great".to_string()].into_iter().collect(),
            ..Default::default()
        };
        let got = LexicalAnalyzer::new(Arc::new(lex)).count("Great, really great!");
        assert_eq!(got.positive_count, 2);
    }

    #[test]
    fn features_serialize_flat() {
        let f = LexicalFeatures::new(
            LexicalCounts {
                politeness_count: 2,
                ..Default::default()
            },
            true,
        );
        let v = serde_json::to_value(f).unwrap();
        assert_eq!(v["politeness_count"], 2);
        assert_eq!(v["is_interrupted"], true);
    }
}
