//! Severity classification for symptom descriptions

/// Keywords that mark a symptom description as severe
pub const DEFAULT_KEYWORDS: &[&str] = &["chest pain", "blood", "fainting", "difficulty breathing"];

/// Case-insensitive substring match against a keyword set
#[derive(Debug, Clone)]
pub struct EscalationDetector {
    keywords: Vec<String>,
}

impl EscalationDetector {
    /// Build from any keyword list. Blank entries are dropped and the rest
    /// lower-cased once here so `is_severe` only lower-cases the input.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }

    pub fn is_severe(&self, symptoms: &str) -> bool {
        let symptoms = symptoms.to_lowercase();
        self.keywords.iter().any(|k| symptoms.contains(k.as_str()))
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

impl Default for EscalationDetector {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_keywords_match() {
        let detector = EscalationDetector::default();
        assert!(detector.is_severe("chest pain since morning"));
        assert!(detector.is_severe("I coughed up BLOOD"));
        assert!(detector.is_severe("Fainting spells"));
        assert!(detector.is_severe("some Difficulty Breathing at night"));
    }

    #[test]
    fn test_mild_symptoms_do_not_escalate() {
        let detector = EscalationDetector::default();
        assert!(!detector.is_severe("mild headache and runny nose"));
        assert!(!detector.is_severe(""));
        assert!(!detector.is_severe("chest ache"));
    }

    #[test]
    fn test_custom_keywords_replace_defaults() {
        let detector = EscalationDetector::new(["Seizure", "  ", "high fever"]);
        assert_eq!(detector.keywords(), ["seizure", "high fever"]);
        assert!(detector.is_severe("had a seizure"));
        assert!(!detector.is_severe("chest pain"));
    }

    #[test]
    fn test_empty_keyword_set_never_escalates() {
        let detector = EscalationDetector::new(Vec::<String>::new());
        assert!(!detector.is_severe("chest pain and blood"));
    }

    fn arb_keyword() -> impl Strategy<Value = &'static str> {
        prop::sample::select(DEFAULT_KEYWORDS.to_vec())
    }

    /// Randomly upper-case some characters of a keyword
    fn arb_cased(keyword: &'static str) -> impl Strategy<Value = String> {
        prop::collection::vec(any::<bool>(), keyword.len()).prop_map(move |flags| {
            keyword
                .chars()
                .zip(flags)
                .map(|(c, upper)| if upper { c.to_ascii_uppercase() } else { c })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_keyword_anywhere_escalates(
            (prefix, keyword, suffix) in ("[a-z ]{0,20}", arb_keyword(), "[a-z ]{0,20}")
                .prop_flat_map(|(p, k, s)| (Just(p), arb_cased(k), Just(s)))
        ) {
            let text = format!("{prefix}{keyword}{suffix}");
            prop_assert!(EscalationDetector::default().is_severe(&text));
        }

        #[test]
        fn prop_text_without_keywords_is_not_severe(text in "[a-zA-Z ,.]{0,60}") {
            let lower = text.to_lowercase();
            prop_assume!(DEFAULT_KEYWORDS.iter().all(|k| !lower.contains(k)));
            prop_assert!(!EscalationDetector::default().is_severe(&text));
        }
    }
}
