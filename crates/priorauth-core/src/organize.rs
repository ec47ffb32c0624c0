//! Section grouping for the extracted-fields table.
//!
//! Sections appear in the order they are first seen in the field list, never
//! alphabetically. Fields inside a section keep input order unless the
//! confidence sort is on, in which case they are ordered high to low with
//! ties left in input order.

use crate::model::Field;

/// One display section and the fields that belong to it.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionGroup<'a> {
    pub name: &'a str,
    pub fields: Vec<&'a Field>,
}

/// Group `fields` by section in first-appearance order.
pub fn group_by_section(fields: &[Field], sort_by_confidence: bool) -> Vec<SectionGroup<'_>> {
    let mut groups: Vec<SectionGroup<'_>> = Vec::new();

    for field in fields {
        match groups.iter_mut().find(|g| g.name == field.section) {
            Some(group) => group.fields.push(field),
            None => groups.push(SectionGroup {
                name: &field.section,
                fields: vec![field],
            }),
        }
    }

    if sort_by_confidence {
        for group in &mut groups {
            // `sort_by` is stable, so equal confidences keep input order.
            group
                .fields
                .sort_by(|a, b| b.display_confidence().total_cmp(&a.display_confidence()));
        }
    }

    groups
}

/// Render a confidence as a rounded percentage, e.g. `0.916` → `"92%"`.
pub fn format_confidence(confidence: f64) -> String {
    format!("{}%", (confidence * 100.0).round() as i64)
}
