//! Record extraction from fetched detail pages
//!
//! Extraction is all-or-nothing: a page that shows the institution name but
//! lacks any other field is reported as a page-shape failure, never as a
//! partial record.

use crate::certificate::{CertificateRecord, Field, FieldLocator};
use crate::pipeline::Document;
use crate::state::{FailureReason, ItemOutcome};
use crate::Identifier;
use scraper::Html;

/// Extracts the certificate for `identifier` from a fetched document
///
/// # Returns
///
/// * `ItemOutcome::NotFound` - The page has no institution name node
/// * `ItemOutcome::Found` - Every field was present
/// * `ItemOutcome::FetchFailed` with `FailureReason::PageShape` - The record
///   exists but at least one field node is missing
///
/// # Example
///
/// ```
/// use certfetch::certificate::{extract, FieldLocator};
/// use certfetch::pipeline::Document;
/// use certfetch::ItemOutcome;
///
/// let locator = FieldLocator::new("#f_").unwrap();
/// let document = Document::new("http://portal/7", "<html><body></body></html>");
/// assert_eq!(extract(&document, 7, &locator), ItemOutcome::NotFound { identifier: 7 });
/// ```
pub fn extract(document: &Document, identifier: Identifier, locator: &FieldLocator) -> ItemOutcome {
    let html = Html::parse_document(document.body());

    if read_field(&html, locator, Field::InstitutionName).is_none() {
        tracing::info!(identifier, "No certificate under code {}", identifier);
        return ItemOutcome::NotFound { identifier };
    }

    tracing::debug!(identifier, "Certificate found on code {}", identifier);

    match read_record(&html, identifier, locator) {
        Ok(record) => {
            tracing::info!(identifier, folio = %record.folio, "Parsed certificate {}", record.folio);
            ItemOutcome::Found(record)
        }
        Err(missing) => {
            tracing::error!(
                identifier,
                field = %missing,
                "Fields missing on {}: no node for {}",
                identifier,
                missing
            );
            ItemOutcome::FetchFailed {
                identifier,
                reason: FailureReason::PageShape { missing },
            }
        }
    }
}

/// Reads every field, stopping at the first one without a node
fn read_record(
    html: &Html,
    identifier: Identifier,
    locator: &FieldLocator,
) -> Result<CertificateRecord, Field> {
    let read = |field: Field| read_field(html, locator, field).ok_or(field);

    Ok(CertificateRecord {
        identifier,
        institution: read(Field::InstitutionName)?,
        student_name: read(Field::StudentName)?,
        work_key: read(Field::WorkKey)?,
        rvoe: read(Field::Rvoe)?,
        enrollment: read(Field::Enrollment)?,
        grade_average: read(Field::GradeAverage)?,
        period: read(Field::Period)?,
        certificate_type: read(Field::CertificateType)?,
        folio: read(Field::Folio)?,
    })
}

/// Returns the whitespace-normalized text of the field's node, if present
fn read_field(html: &Html, locator: &FieldLocator, field: Field) -> Option<String> {
    html.select(locator.selector(field)).next().map(|element| {
        element
            .text()
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" ")
    })
}

/// Renders a detail page containing the given fields
///
/// Used by tests to build fixtures that follow the portal's node naming.
#[cfg(test)]
pub(crate) fn render_fixture(prefix: &str, values: &[(Field, &str)]) -> String {
    let id_prefix = prefix.trim_start_matches('#');
    let rows: String = values
        .iter()
        .map(|(field, value)| {
            format!(
                "<tr><th>{}</th><td><span id=\"{}{}_{}_id\">{}</span></td></tr>",
                field.label(),
                id_prefix,
                field.token(),
                field.token(),
                value
            )
        })
        .collect();

    format!(
        "<html><head><title>Certificado</title></head><body><table>{}</table></body></html>",
        rows
    )
}
