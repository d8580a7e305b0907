//! Keyword-group classifier

use super::{Severity, Tag};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One keyword group: any matching keyword contributes the tag and note once
struct KeywordGroup {
    tag: Tag,
    note: &'static str,
    keywords: &'static [&'static str],
}

const GROUPS: &[KeywordGroup] = &[
    KeywordGroup {
        tag: Tag::ChestPain,
        note: "Chest pain/pressure",
        keywords: &["chest pain", "tightness", "pressure", "left arm", "squeez"],
    },
    KeywordGroup {
        tag: Tag::Neuro,
        note: "Neuro: headache/vision/weakness",
        keywords: &[
            "headache",
            "blurry",
            "vision",
            "see double",
            "confus",
            "weakness one side",
            "slurred",
        ],
    },
    KeywordGroup {
        tag: Tag::Dizziness,
        note: "Dizziness",
        keywords: &["dizzy", "lightheaded", "faint"],
    },
    KeywordGroup {
        tag: Tag::Edema,
        note: "Swollen feet/ankles",
        keywords: &["swollen", "edema", "feet", "ankle"],
    },
    KeywordGroup {
        tag: Tag::Fever,
        note: "Fever",
        keywords: &["fever", "hot", "chills", "shiver"],
    },
    KeywordGroup {
        tag: Tag::Diarrhea,
        note: "Watery diarrhea",
        keywords: &["diarrhea", "watery", "stool"],
    },
    KeywordGroup {
        tag: Tag::Dyspnea,
        note: "Breathing difficulty",
        keywords: &["breath", "short of breath", "hard to breathe", "breathing"],
    },
    KeywordGroup {
        tag: Tag::Pregnancy,
        note: "Pregnancy",
        keywords: &["pregnan", "baby", "antenatal"],
    },
    KeywordGroup {
        tag: Tag::NonAdherence,
        note: "Missed/ran out of meds",
        keywords: &[
            "missed",
            "forgot",
            "no pill",
            "ran out",
            "no money",
            "cannot afford",
        ],
    },
    KeywordGroup {
        tag: Tag::FootWound,
        note: "Foot ulcer",
        keywords: &["foot", "wound", "ulcer", "smell", "pus"],
    },
];

/// Result of classifying one utterance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triage {
    pub tags: BTreeSet<Tag>,
    pub severity: Severity,
    pub danger: bool,
    /// Human-readable findings, one per fired group, in group order
    pub notes: Vec<String>,
}

impl Triage {
    pub fn has(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }
}

/// Classify an utterance. Pure and deterministic.
pub fn classify(text: Option<&str>) -> Triage {
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return Triage::default();
    };
    let lowered = text.to_lowercase();

    let mut tags = BTreeSet::new();
    let mut notes = Vec::new();
    for group in GROUPS {
        if group.keywords.iter().any(|k| lowered.contains(k)) {
            tags.insert(group.tag);
            notes.push(group.note.to_string());
        }
    }

    let severity = resolve_severity(&tags);
    Triage {
        tags,
        severity,
        danger: severity.is_critical(),
        notes,
    }
}

/// Apply the precedence rules in their fixed order; later rules override.
///
/// The final pregnancy rule runs after the non-adherence rule and can lift a
/// `Warning` back to `Critical`. The diarrhea+fever rule runs after the
/// critical rules and overrides them, so "chest pain, diarrhea and fever"
/// resolves to `Warning`.
fn resolve_severity(tags: &BTreeSet<Tag>) -> Severity {
    let has = |tag: Tag| tags.contains(&tag);
    let mut severity = Severity::Low;

    if has(Tag::ChestPain) || (has(Tag::Neuro) && has(Tag::Dizziness)) {
        severity = Severity::Critical;
    }
    if has(Tag::FootWound) && has(Tag::Fever) {
        severity = Severity::Critical;
    }
    if has(Tag::Edema) && has(Tag::Dyspnea) {
        severity = Severity::Critical;
    }
    if has(Tag::Diarrhea) && has(Tag::Fever) {
        severity = Severity::Warning;
    }
    if has(Tag::NonAdherence) && severity != Severity::Critical {
        severity = Severity::Warning;
    }
    if has(Tag::Pregnancy) && has(Tag::Neuro) {
        severity = Severity::Critical;
    }
    severity
}
