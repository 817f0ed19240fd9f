use crate::Identifier;
use serde::Serialize;

/// A certificate extracted in full from a detail page
///
/// Records are only built when every field was present on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateRecord {
    /// Identifier the page was requested with
    pub identifier: Identifier,

    /// Student full name
    pub student_name: String,

    /// Name of the issuing institution
    pub institution: String,

    /// Institution work key (CCT)
    pub work_key: String,

    /// Official study-validity permit number (RVOE)
    pub rvoe: String,

    /// Student enrollment number
    pub enrollment: String,

    /// Final grade average
    pub grade_average: String,

    /// Study period
    pub period: String,

    /// Certificate type
    pub certificate_type: String,

    /// Digital certificate folio
    pub folio: String,
}
