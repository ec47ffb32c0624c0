//! Review card rendering.
//!
//! Renders the session's current result as a vertical, sectioned card:
//! document header, counters and suggested action, missing checklist,
//! grouped fields, audit trail, run metadata, evidence drawer and outline.

use std::fmt;

use priorauth_core::{AuditEntry, ExtractionResult, Field, format_confidence};
use priorauth_session::{Review, ReviewSession};

const EMPTY: &str = "—";

/// Display adapter for the whole session.
pub struct ReviewCard<'a, E>(pub &'a ReviewSession<E>);

impl<E> fmt::Display for ReviewCard<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = self.0;
        match session.review() {
            Some(review) => write_review(f, session, review)?,
            None => writeln!(f, "No extraction result yet. Select a packet or load a demo.")?,
        }
        if let Some(error) = session.error() {
            writeln!(f, "Error: {error}")?;
        }
        if let Some(status) = session.status() {
            writeln!(f, "Status: {status}")?;
        }
        Ok(())
    }
}

fn write_review<E>(
    f: &mut fmt::Formatter<'_>,
    session: &ReviewSession<E>,
    review: &Review,
) -> fmt::Result {
    let result = review.result();
    write_document(f, result)?;
    write_summary(f, session)?;
    write_missing(f, session)?;
    write_sections(f, session)?;
    write_audit(f, result)?;
    write_run(f, review)?;
    if let Some(field) = review.selected_field() {
        write_evidence(f, field)?;
    }
    if let Some(outline) = review.outline() {
        writeln!(f, "Appeal outline")?;
        for line in outline.lines() {
            writeln!(f, "  {line}")?;
        }
        writeln!(f)?;
    }
    Ok(())
}

// ── Header ──

fn write_document(f: &mut fmt::Formatter<'_>, result: &ExtractionResult) -> fmt::Result {
    let doc = &result.document;
    writeln!(f, "=== {} ===", doc.filename)?;
    match doc.pages {
        Some(pages) => writeln!(f, "{} · {} page(s)", doc.file_type, pages)?,
        None => writeln!(f, "{}", doc.file_type)?,
    }
    for warning in &doc.warnings {
        writeln!(f, "! {warning}")?;
    }
    writeln!(f)
}

fn write_summary<E>(f: &mut fmt::Formatter<'_>, session: &ReviewSession<E>) -> fmt::Result {
    let Some(next) = session.next_action() else {
        return Ok(());
    };
    writeln!(f, "Summary")?;
    writeln!(f, "  {:<26} {}/{}", "Extracted", next.extracted, next.total)?;
    writeln!(f, "  {:<26} {}", "Low confidence", next.low_confidence)?;
    writeln!(f, "  {:<26} {}", "Recommended action", next.label())?;
    writeln!(f)?;

    writeln!(f, "Suggested action: {}", next.label())?;
    writeln!(f, "  {}", next.reason)?;
    if next.can_generate_appeal() {
        writeln!(f, "  (appeal outline available)")?;
    }
    if let Some(why) = session.why_line() {
        writeln!(f, "{why}")?;
    }
    writeln!(f)
}

fn write_missing<E>(f: &mut fmt::Formatter<'_>, session: &ReviewSession<E>) -> fmt::Result {
    let missing = session.prioritized_missing();
    if missing.is_empty() {
        return Ok(());
    }
    writeln!(f, "Missing")?;
    for reason in missing {
        writeln!(f, "  [ ] {reason}")?;
    }
    writeln!(f)
}

// ── Fields ──

fn write_sections<E>(f: &mut fmt::Formatter<'_>, session: &ReviewSession<E>) -> fmt::Result {
    if session.sort_by_confidence() {
        writeln!(f, "(sorted by confidence)")?;
    }
    for group in session.sections() {
        writeln!(f, "{}", group.name)?;
        for field in group.fields {
            write_field(f, field)?;
        }
        writeln!(f)?;
    }
    Ok(())
}

fn write_field(f: &mut fmt::Formatter<'_>, field: &Field) -> fmt::Result {
    let value = field.present_value().unwrap_or("Missing");
    let source = if field.source.is_some() { "source" } else { "-" };
    writeln!(
        f,
        "  {:<26} {:<36} {:>4}  {}",
        field.label,
        value,
        format_confidence(field.display_confidence()),
        source
    )
}

// ── Audit trail ──

fn write_audit(f: &mut fmt::Formatter<'_>, result: &ExtractionResult) -> fmt::Result {
    if result.audit_trail.is_empty() {
        return Ok(());
    }
    writeln!(f, "Audit trail")?;
    for entry in &result.audit_trail {
        write_audit_entry(f, result, entry)?;
    }
    writeln!(f)
}

fn write_audit_entry(
    f: &mut fmt::Formatter<'_>,
    result: &ExtractionResult,
    entry: &AuditEntry,
) -> fmt::Result {
    let confidence = result
        .confidence_for(&entry.key)
        .map(format_confidence)
        .unwrap_or_else(|| EMPTY.to_string());
    writeln!(
        f,
        "  {:<26} {:<36} {:<5} {:<24} {}",
        entry.label,
        entry.value.as_deref().unwrap_or(EMPTY),
        page_label(entry.page),
        bbox_label(entry.bbox.as_deref()),
        confidence
    )
}

// ── Run metadata ──

fn write_run(f: &mut fmt::Formatter<'_>, review: &Review) -> fmt::Result {
    let run = review.run();
    writeln!(f, "Run {}", run.run_id)?;
    for entry in &run.timeline {
        writeln!(f, "  {:<26} {}", entry.stage.label(), entry.time_label())?;
    }
    writeln!(f)
}

// ── Evidence drawer ──

fn write_evidence(f: &mut fmt::Formatter<'_>, field: &Field) -> fmt::Result {
    writeln!(f, "Evidence: {}", field.label)?;
    let source = field.source.as_ref();
    match source.and_then(|s| s.snippet.as_deref()) {
        Some(snippet) => writeln!(f, "  \"{snippet}\"")?,
        None => writeln!(f, "  No snippet available.")?,
    }
    writeln!(
        f,
        "  page {}  bbox {}",
        page_label(source.and_then(|s| s.page)),
        bbox_label(source.and_then(|s| s.bbox.as_deref()))
    )?;
    writeln!(f)
}

fn page_label(page: Option<u32>) -> String {
    page.map(|p| format!("p{p}"))
        .unwrap_or_else(|| EMPTY.to_string())
}

fn bbox_label(bbox: Option<&[f64]>) -> String {
    match bbox {
        Some(coords) if !coords.is_empty() => {
            let coords: Vec<String> = coords.iter().map(|c| c.to_string()).collect();
            format!("[{}]", coords.join(", "))
        }
        _ => EMPTY.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use priorauth_core::{ActionKind, Demo, Source};
    use priorauth_session::SessionConfig;

    fn session_with(result: ExtractionResult) -> ReviewSession<()> {
        let mut session = ReviewSession::new((), SessionConfig::default());
        session.select_file("packet.pdf").unwrap();
        session.begin_submit().unwrap();
        session.finish_submit(Ok(result)).unwrap();
        session
    }

    fn demo(demo: Demo) -> ReviewSession<()> {
        let mut session = ReviewSession::new((), SessionConfig::default());
        session.load_demo(demo).unwrap();
        session
    }

    #[test]
    fn idle_card() {
        let session = ReviewSession::new((), SessionConfig::default());
        let card = ReviewCard(&session).to_string();
        assert!(card.starts_with("No extraction result yet."));
    }

    #[test]
    fn complete_card() {
        let session = demo(Demo::Complete);
        let card = ReviewCard(&session).to_string();
        assert!(card.starts_with("=== sample_packet_complete.svg ===\nimage · 1 page(s)\n"));
        assert!(card.contains("! Demo data loaded locally."));
        assert!(card.contains("15/15"));
        assert!(card.contains("Suggested action: Submit"));
        assert!(card.contains("Why: Core fields and supporting documentation appear complete."));
        assert!(!card.contains("Missing\n"));
        assert!(card.contains("Run RUN-"));
        assert!(card.contains("Decision"));
    }

    #[test]
    fn incomplete_card_lists_missing_in_priority_order() {
        let session = demo(Demo::Incomplete);
        let card = ReviewCard(&session).to_string();
        assert!(card.contains("12/15"));
        assert!(card.contains("Why: Missing NPI + chart notes + step therapy evidence + 4 more"));
        let npi = card.find("[ ] Provider NPI").unwrap();
        let chart = card.find("[ ] Chart notes").unwrap();
        let step = card.find("[ ] Failed step therapy").unwrap();
        let ndc = card.find("[ ] Drug NDC").unwrap();
        assert!(npi < chart && chart < step && step < ndc);

        let npi_row = card
            .lines()
            .find(|l| l.trim_start().starts_with("NPI "))
            .unwrap();
        assert!(npi_row.contains("Missing"));
        assert!(npi_row.contains("0%"));
        assert!(npi_row.ends_with('-'));
    }

    #[test]
    fn audit_row_shows_page_bbox_and_confidence() {
        let session = demo(Demo::Complete);
        let card = ReviewCard(&session).to_string();
        let row = card
            .lines()
            .skip_while(|l| *l != "Audit trail")
            .find(|l| l.contains("1234567890"))
            .unwrap();
        assert!(row.contains("p1"));
        assert!(row.contains("[40, 232, 240, 250]"));
        assert!(row.ends_with("92%"));
    }

    #[test]
    fn audit_row_for_unknown_field_uses_dash() {
        let mut result = Demo::Complete.result();
        result.audit_trail[0].key = "not.a.field".into();
        result.audit_trail[0].value = None;
        let session = session_with(result);
        let card = ReviewCard(&session).to_string();
        let row = card
            .lines()
            .skip_while(|l| *l != "Audit trail")
            .nth(1)
            .unwrap();
        assert!(row.ends_with(EMPTY));
        assert!(row.contains("Patient Name"));
    }

    #[test]
    fn evidence_drawer() {
        let mut session = demo(Demo::Complete);
        session.select_field("provider.npi").unwrap();
        let card = ReviewCard(&session).to_string();
        let drawer = "Evidence: NPI\n  \"NPI: 1234567890\"\n  page p1  bbox [40, 232, 240, 250]";
        assert!(card.contains(drawer));

        session.close_evidence();
        assert!(!ReviewCard(&session).to_string().contains("Evidence:"));
    }

    #[test]
    fn evidence_without_snippet() {
        let mut result = Demo::Complete.result();
        result.fields[0].source = Some(Source::default());
        let mut session = session_with(result);
        session.select_field("patient.name").unwrap();
        let card = ReviewCard(&session).to_string();
        let drawer = "Evidence: Patient Name\n  No snippet available.\n  page —  bbox —";
        assert!(card.contains(drawer));
    }

    #[test]
    fn outline_and_sort_marker() {
        let mut result = Demo::Incomplete.result();
        result.suggested_next_action.action = ActionKind::StartAppealDraft;
        let mut session = session_with(result);
        session.generate_outline().unwrap();
        session.toggle_sort();
        let card = ReviewCard(&session).to_string();
        assert!(card.contains("(appeal outline available)"));
        assert!(card.contains("(sorted by confidence)"));
        assert!(card.contains("Appeal outline\n  Appeal Outline\n"));
    }

    #[test]
    fn labels() {
        assert_eq!(page_label(Some(3)), "p3");
        assert_eq!(page_label(None), EMPTY);
        assert_eq!(bbox_label(Some(&[1.5, 2.0])), "[1.5, 2]");
        assert_eq!(bbox_label(Some(&[])), EMPTY);
    }
}
