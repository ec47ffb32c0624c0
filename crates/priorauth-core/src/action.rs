//! Next-action interpretation.
//!
//! The action tag comes from the extraction service and is trusted verbatim.
//! The counters computed here are informational only.

use crate::model::{ActionKind, ExtractionResult};

/// Fields below this confidence are flagged for the reviewer.
pub const LOW_CONFIDENCE_THRESHOLD: f64 = 0.70;

impl ActionKind {
    /// Human label for the call-to-action.
    pub fn label(self) -> &'static str {
        match self {
            ActionKind::Submit => "Submit",
            ActionKind::RequestMoreInfo => "Request More Info",
            ActionKind::StartAppealDraft => "Start Appeal Draft",
        }
    }

    /// Whether the "generate appeal outline" capability is offered.
    pub fn allows_appeal_outline(self) -> bool {
        matches!(self, ActionKind::StartAppealDraft)
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// What the suggested-action panel shows for one result.
#[derive(Debug, Clone, PartialEq)]
pub struct NextAction<'a> {
    pub kind: ActionKind,
    pub reason: &'a str,
    /// Fields with a present value.
    pub extracted: usize,
    pub total: usize,
    /// Fields with no value or confidence under [`LOW_CONFIDENCE_THRESHOLD`].
    pub low_confidence: usize,
}

impl NextAction<'_> {
    pub fn label(&self) -> &'static str {
        self.kind.label()
    }

    pub fn can_generate_appeal(&self) -> bool {
        self.kind.allows_appeal_outline()
    }
}

/// Derive the call-to-action and reviewer counters from a result.
pub fn interpret(result: &ExtractionResult) -> NextAction<'_> {
    let extracted = result.fields.iter().filter(|f| f.has_value()).count();
    let low_confidence = result
        .fields
        .iter()
        .filter(|f| !f.has_value() || f.confidence < LOW_CONFIDENCE_THRESHOLD)
        .count();

    NextAction {
        kind: result.suggested_next_action.action,
        reason: &result.suggested_next_action.reason,
        extracted,
        total: result.fields.len(),
        low_confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo;

    #[test]
    fn labels() {
        assert_eq!(ActionKind::Submit.label(), "Submit");
        assert_eq!(ActionKind::RequestMoreInfo.label(), "Request More Info");
        assert_eq!(ActionKind::StartAppealDraft.to_string(), "Start Appeal Draft");
    }

    #[test]
    fn appeal_gated_to_appeal_action() {
        assert!(ActionKind::StartAppealDraft.allows_appeal_outline());
        assert!(!ActionKind::Submit.allows_appeal_outline());
        assert!(!ActionKind::RequestMoreInfo.allows_appeal_outline());
    }

    #[test]
    fn complete_demo_counters() {
        let result = demo::complete();
        let next = interpret(&result);
        assert_eq!(next.kind, ActionKind::Submit);
        assert_eq!(next.total, 15);
        assert_eq!(next.extracted, 15);
        let expected = result
            .fields
            .iter()
            .filter(|f| f.value.is_none() || f.confidence < 0.70)
            .count();
        assert_eq!(next.low_confidence, expected);
        assert_eq!(next.low_confidence, 0);
        assert!(!next.can_generate_appeal());
    }

    #[test]
    fn incomplete_demo_counters() {
        let result = demo::incomplete();
        let next = interpret(&result);
        assert_eq!(next.label(), "Request More Info");
        assert_eq!(next.extracted, 12);
        // Three absent values plus procedure, CPT, drug and requested date under 0.70.
        assert_eq!(next.low_confidence, 7);
        assert!(!next.can_generate_appeal());
    }

    #[test]
    fn counters_do_not_change_action() {
        let mut result = demo::incomplete();
        result.suggested_next_action.action = ActionKind::Submit;
        let next = interpret(&result);
        assert_eq!(next.kind, ActionKind::Submit);
        assert!(next.low_confidence > 0);
    }

    #[test]
    fn threshold_is_exclusive() {
        let mut result = demo::complete();
        result.fields.truncate(1);
        result.fields[0].confidence = LOW_CONFIDENCE_THRESHOLD;
        assert_eq!(interpret(&result).low_confidence, 0);
        result.fields[0].confidence = 0.69;
        assert_eq!(interpret(&result).low_confidence, 1);
    }
}
