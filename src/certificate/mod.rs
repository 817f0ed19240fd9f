//! Certificate pages: field locations, the extracted record, and extraction

mod extractor;
mod field;
mod record;

pub use extractor::extract;
pub use field::{Field, FieldLocator};
pub use record::CertificateRecord;

#[cfg(test)]
pub(crate) use extractor::render_fixture;
