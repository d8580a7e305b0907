//! Property-based tests for the utterance classifier

use super::*;
use proptest::prelude::*;

/// Filler text that cannot contain any keyword.
///
/// In particular it never spells "fever" or "diarrhea", whose combined rule
/// overrides the critical rules.
fn arb_filler() -> impl Strategy<Value = String> {
    "[qxz ]{0,20}"
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z ,.]{0,60}",
        Just("I have chest pain".to_string()),
        Just("dizzy with a headache".to_string()),
        Just("watery diarrhea and fever".to_string()),
        Just("pregnant and confused".to_string()),
    ]
}

proptest! {
    #[test]
    fn classification_is_idempotent(text in arb_text()) {
        prop_assert_eq!(classify(Some(&text)), classify(Some(&text)));
    }

    #[test]
    fn danger_iff_critical(text in arb_text()) {
        let t = classify(Some(&text));
        prop_assert_eq!(t.danger, t.severity == Severity::Critical);
        prop_assert_eq!(t.notes.len(), t.tags.len());
    }

    /// Holds only while diarrhea+fever is absent; see
    /// `diarrhea_with_fever_overrides_earlier_criticals`.
    #[test]
    fn chest_pain_always_critical(pre in arb_filler(), post in arb_filler(), upper in any::<bool>()) {
        let phrase = if upper { "CHEST PAIN" } else { "chest pain" };
        let t = classify(Some(&format!("{pre}{phrase}{post}")));
        prop_assert_eq!(t.severity, Severity::Critical);
        prop_assert!(t.has(Tag::ChestPain));
    }

    #[test]
    fn dizzy_with_vision_phrase_is_critical(
        pre in arb_filler(),
        neuro in prop_oneof![Just("headache"), Just("vision"), Just("blurry")],
    ) {
        let t = classify(Some(&format!("{pre} dizzy {neuro}")));
        prop_assert_eq!(t.severity, Severity::Critical);
    }

    #[test]
    fn diarrhea_and_fever_alone_is_warning(pre in arb_filler(), mid in arb_filler()) {
        let t = classify(Some(&format!("{pre}diarrhea{mid}fever")));
        prop_assert_eq!(t.severity, Severity::Warning);
    }
}
