//! Canned extraction results for walking through the review flow offline.

use std::str::FromStr;

use thiserror::Error;

use crate::model::{
    ActionKind, AuditEntry, DocumentInfo, ExtractionResult, Field, Source, SuggestedAction,
};

/// Which canned packet to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Demo {
    /// Every field present, nothing missing, recommended action `submit`.
    Complete,
    /// Missing NPI, NDC and service date plus supporting documents.
    Incomplete,
}

#[derive(Debug, Error)]
#[error("unknown demo '{0}' (expected 'complete' or 'incomplete')")]
pub struct UnknownDemo(pub String);

impl FromStr for Demo {
    type Err = UnknownDemo;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "complete" => Ok(Demo::Complete),
            "incomplete" => Ok(Demo::Incomplete),
            _ => Err(UnknownDemo(s.to_string())),
        }
    }
}

impl Demo {
    pub fn result(self) -> ExtractionResult {
        match self {
            Demo::Complete => complete(),
            Demo::Incomplete => incomplete(),
        }
    }
}

// ── Builders ──

fn found(
    section: &str,
    key: &str,
    label: &str,
    value: &str,
    confidence: f64,
    snippet: &str,
    bbox: [f64; 4],
) -> Field {
    Field {
        section: section.into(),
        key: key.into(),
        label: label.into(),
        value: Some(value.into()),
        confidence,
        source: Some(Source {
            snippet: Some(snippet.into()),
            page: Some(1),
            bbox: Some(bbox.to_vec()),
        }),
    }
}

fn absent(section: &str, key: &str, label: &str) -> Field {
    Field {
        section: section.into(),
        key: key.into(),
        label: label.into(),
        value: None,
        confidence: 0.0,
        source: None,
    }
}

/// Audit entry citing a field that has a source.
fn cite(field: &Field) -> Option<AuditEntry> {
    let source = field.source.as_ref()?;
    Some(AuditEntry {
        key: field.key.clone(),
        label: field.label.clone(),
        value: field.value.clone(),
        page: source.page,
        bbox: source.bbox.clone(),
        snippet: source.snippet.clone(),
    })
}

fn audit_for(fields: &[Field], keys: &[&str]) -> Vec<AuditEntry> {
    keys.iter()
        .filter_map(|key| fields.iter().find(|f| f.key == *key))
        .filter_map(cite)
        .collect()
}

fn document(filename: &str) -> DocumentInfo {
    DocumentInfo {
        filename: filename.into(),
        file_type: "image".into(),
        pages: Some(1),
        warnings: vec!["Demo data loaded locally.".into()],
    }
}

// ── Packets ──

/// A clean packet the reviewer can submit as-is.
#[rustfmt::skip]
pub fn complete() -> ExtractionResult {
    let fields = vec![
        found("Patient", "patient.name", "Patient Name", "Avery Patel", 0.91, "Patient Name: Avery Patel", [40.0, 120.0, 420.0, 140.0]),
        found("Patient", "patient.dob", "DOB", "02/14/1981", 0.88, "DOB: 02/14/1981", [40.0, 142.0, 280.0, 160.0]),
        found("Patient", "patient.member_id", "Member ID", "HP-449201", 0.83, "Member ID: HP-449201", [40.0, 164.0, 300.0, 182.0]),
        found("Provider", "provider.name", "Provider", "Dr. Sofia Kim", 0.86, "Ordering Provider: Dr. Sofia Kim", [40.0, 210.0, 420.0, 230.0]),
        found("Provider", "provider.npi", "NPI", "1234567890", 0.92, "NPI: 1234567890", [40.0, 232.0, 240.0, 250.0]),
        found("Diagnosis", "diagnosis.description", "Diagnosis", "Rheumatoid arthritis, seropositive", 0.79, "Diagnosis: Rheumatoid arthritis, seropositive", [40.0, 280.0, 600.0, 300.0]),
        found("Diagnosis", "diagnosis.icd10", "ICD-10", "M05.79", 0.87, "ICD-10: M05.79", [40.0, 302.0, 220.0, 320.0]),
        found("Procedure", "procedure.description", "Procedure", "Infusion therapy", 0.74, "Procedure: Infusion therapy", [40.0, 350.0, 420.0, 370.0]),
        found("Procedure", "procedure.cpt", "CPT", "96413", 0.86, "CPT: 96413", [40.0, 372.0, 200.0, 390.0]),
        found("Drug", "drug.name", "Drug", "Infliximab", 0.81, "Drug: Infliximab", [40.0, 420.0, 300.0, 440.0]),
        found("Drug", "drug.ndc", "NDC", "00006-4401-61", 0.84, "NDC: 00006-4401-61", [40.0, 442.0, 260.0, 460.0]),
        found("Payer", "payer.name", "Payer", "Horizon Prime", 0.82, "Payer: Horizon Prime", [40.0, 490.0, 320.0, 510.0]),
        found("Plan", "plan.name", "Plan", "Horizon Prime Gold PPO", 0.80, "Plan: Horizon Prime Gold PPO", [40.0, 512.0, 420.0, 532.0]),
        found("Dates", "dates.requested", "Requested Date", "01/12/2026", 0.74, "Request Date: 01/12/2026", [40.0, 560.0, 300.0, 580.0]),
        found("Dates", "dates.service", "Service Date", "02/04/2026", 0.72, "Service Date: 02/04/2026", [40.0, 582.0, 300.0, 602.0]),
    ];
    let audit_trail = audit_for(
        &fields,
        &["patient.name", "provider.npi", "diagnosis.icd10", "procedure.cpt", "drug.ndc"],
    );

    ExtractionResult {
        document: document("sample_packet_complete.svg"),
        fields,
        missing_fields: Vec::new(),
        suggested_next_action: SuggestedAction {
            action: ActionKind::Submit,
            reason: "Core fields and supporting docs appear complete.".into(),
        },
        audit_trail,
    }
}

/// A packet with gaps that needs follow-up before submission.
#[rustfmt::skip]
pub fn incomplete() -> ExtractionResult {
    let fields = vec![
        found("Patient", "patient.name", "Patient Name", "Jordan Rivera", 0.90, "Patient Name: Jordan Rivera", [40.0, 120.0, 420.0, 140.0]),
        found("Patient", "patient.dob", "DOB", "11/22/1974", 0.86, "DOB: 11/22/1974", [40.0, 142.0, 280.0, 160.0]),
        found("Patient", "patient.member_id", "Member ID", "AC-330128", 0.80, "Member ID: AC-330128", [40.0, 164.0, 300.0, 182.0]),
        found("Provider", "provider.name", "Provider", "Dr. Lila Ahmed", 0.82, "Provider: Dr. Lila Ahmed", [40.0, 210.0, 420.0, 230.0]),
        absent("Provider", "provider.npi", "NPI"),
        found("Diagnosis", "diagnosis.description", "Diagnosis", "Severe asthma exacerbation", 0.72, "Diagnosis: Severe asthma exacerbation", [40.0, 280.0, 600.0, 300.0]),
        found("Diagnosis", "diagnosis.icd10", "ICD-10", "J45.901", 0.76, "ICD-10: J45.901", [40.0, 302.0, 220.0, 320.0]),
        found("Procedure", "procedure.description", "Procedure", "Pulmonary function testing", 0.68, "Procedure: Pulmonary function testing", [40.0, 350.0, 420.0, 370.0]),
        found("Procedure", "procedure.cpt", "CPT", "94010", 0.62, "CPT: 94010", [40.0, 372.0, 200.0, 390.0]),
        found("Drug", "drug.name", "Drug", "Dupilumab", 0.66, "Drug: Dupilumab", [40.0, 420.0, 300.0, 440.0]),
        absent("Drug", "drug.ndc", "NDC"),
        found("Payer", "payer.name", "Payer", "Atlas Health", 0.78, "Payer: Atlas Health", [40.0, 490.0, 320.0, 510.0]),
        found("Plan", "plan.name", "Plan", "Atlas Health Silver HMO", 0.74, "Plan: Atlas Health Silver HMO", [40.0, 512.0, 420.0, 532.0]),
        found("Dates", "dates.requested", "Requested Date", "02/01/2026", 0.60, "Requested DOS: 02/01/2026", [40.0, 560.0, 300.0, 580.0]),
        absent("Dates", "dates.service", "Service Date"),
    ];
    let audit_trail = audit_for(&fields, &["patient.name", "diagnosis.icd10", "procedure.cpt"]);

    ExtractionResult {
        document: document("sample_packet_missing.svg"),
        fields,
        missing_fields: [
            "Provider NPI",
            "Drug NDC",
            "Chart notes",
            "Failed step therapy",
            "Labs from last 90 days",
            "Provider signature",
            "NPI mismatch",
        ]
        .into_iter()
        .map(String::from)
        .collect(),
        suggested_next_action: SuggestedAction {
            action: ActionKind::RequestMoreInfo,
            reason: "Missing fields and supporting documentation require follow-up.".into(),
        },
        audit_trail,
    }
}
