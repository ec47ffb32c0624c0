//! Missing-reason prioritisation and the one-line "why" summary.
//!
//! Reasons are free text from the extraction service. Categorisation is a
//! case-insensitive substring heuristic over English clinical terms; reasons
//! worded differently simply fall through to their original position.

/// Summary shown when nothing is missing.
pub const COMPLETE_MESSAGE: &str = "Why: Core fields and supporting documentation appear complete.";

/// How many prioritised reasons the summary line names before collapsing the rest.
const SUMMARY_LIMIT: usize = 3;

/// Promotion rules, evaluated in this order. At most one reason per rule.
const PRIORITY_RULES: &[&str] = &["npi", "chart", "step therapy"];

/// Canonical short labels, first match wins.
const LABEL_RULES: &[(&str, &str)] = &[
    ("npi", "NPI"),
    ("chart", "chart notes"),
    ("step therapy", "step therapy evidence"),
    ("labs", "labs"),
    ("signature", "signature"),
];

/// Reorder missing reasons so the clinically high-value ones come first.
///
/// For each priority rule the first matching reason not already picked is
/// promoted. Everything else follows in original order. Identical strings
/// appear once.
pub fn prioritize(reasons: &[String]) -> Vec<&str> {
    let lowered: Vec<String> = reasons.iter().map(|r| r.to_lowercase()).collect();
    let mut picked: Vec<&str> = Vec::with_capacity(reasons.len());

    for needle in PRIORITY_RULES {
        let hit = reasons
            .iter()
            .zip(&lowered)
            .find(|(reason, low)| low.contains(needle) && !picked.contains(&reason.as_str()));
        if let Some((reason, _)) = hit {
            picked.push(reason);
        }
    }

    for reason in reasons {
        if !picked.contains(&reason.as_str()) {
            picked.push(reason);
        }
    }

    picked
}

/// Map a reason to its canonical short label, e.g. `"Provider NPI"` → `"NPI"`.
pub fn canonical_label(reason: &str) -> String {
    let lowered = reason.to_lowercase();
    LABEL_RULES
        .iter()
        .find(|(needle, _)| lowered.contains(needle))
        .map(|(_, label)| label.to_string())
        .unwrap_or(lowered)
}

/// Build the advisory "why" line for the suggested-action panel.
pub fn summary_line(reasons: &[String]) -> String {
    if reasons.is_empty() {
        return COMPLETE_MESSAGE.to_string();
    }

    let named: Vec<String> = prioritize(reasons)
        .into_iter()
        .take(SUMMARY_LIMIT)
        .map(canonical_label)
        .collect();

    let mut line = format!("Why: Missing {}", named.join(" + "));
    if reasons.len() > SUMMARY_LIMIT {
        line.push_str(&format!(" + {} more", reasons.len() - SUMMARY_LIMIT));
    }
    line
}
