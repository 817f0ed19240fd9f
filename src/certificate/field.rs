//! Field locator for certificate detail pages
//!
//! Every value node on a detail page carries an id built as
//! `<prefix><token>_<token>_id`, where the prefix is shared by all fields.

use crate::ConfigError;
use scraper::Selector;
use serde::Serialize;
use std::fmt;

/// A certificate field shown on the detail page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Presence marker: a page without it holds no certificate
    InstitutionName,
    StudentName,
    WorkKey,
    Rvoe,
    Enrollment,
    GradeAverage,
    Period,
    CertificateType,
    Folio,
}

impl Field {
    /// All fields, in extraction order
    pub const ALL: [Field; 9] = [
        Field::InstitutionName,
        Field::StudentName,
        Field::WorkKey,
        Field::Rvoe,
        Field::Enrollment,
        Field::GradeAverage,
        Field::Period,
        Field::CertificateType,
        Field::Folio,
    ];

    /// The token the portal uses for this field inside node ids
    pub fn token(&self) -> &'static str {
        match self {
            Self::InstitutionName => "tmpNombrePlantel",
            Self::StudentName => "tmpNombreCompleto",
            Self::WorkKey => "tmpClaveCct",
            Self::Rvoe => "tmpRvoe",
            Self::Enrollment => "matricula",
            Self::GradeAverage => "promedio",
            Self::Period => "tmpPeriodo",
            Self::CertificateType => "tmpTipoCertificado",
            Self::Folio => "tmpFolioDigital",
        }
    }

    /// Human-readable field name
    pub fn label(&self) -> &'static str {
        match self {
            Self::InstitutionName => "institution name",
            Self::StudentName => "student name",
            Self::WorkKey => "institution work key",
            Self::Rvoe => "rvoe",
            Self::Enrollment => "enrollment number",
            Self::GradeAverage => "grade average",
            Self::Period => "period",
            Self::CertificateType => "certificate type",
            Self::Folio => "certificate folio",
        }
    }

    /// Builds the selector string for this field under `prefix`
    pub fn selector_string(&self, prefix: &str) -> String {
        let token = self.token();
        format!("{}{}_{}_id", prefix, token, token)
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Pre-parsed selectors for every [`Field`] under one prefix
#[derive(Debug, Clone)]
pub struct FieldLocator {
    prefix: String,
    selectors: Vec<Selector>,
}

impl FieldLocator {
    /// Parses the selectors of all fields for the given prefix
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidSelector` if the prefix yields a selector
    /// that is not valid CSS.
    pub fn new(prefix: &str) -> Result<Self, ConfigError> {
        let selectors = Field::ALL
            .iter()
            .map(|field| {
                let raw = field.selector_string(prefix);
                Selector::parse(&raw)
                    .map_err(|e| ConfigError::InvalidSelector(format!("{}: {:?}", raw, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            prefix: prefix.to_string(),
            selectors,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the parsed selector for `field`
    pub fn selector(&self, field: Field) -> &Selector {
        // `selectors` is built from `Field::ALL`, whose order matches the discriminants
        &self.selectors[field.index()]
    }

    /// Returns the selector string for `field`
    pub fn selector_string(&self, field: Field) -> String {
        field.selector_string(&self.prefix)
    }
}
