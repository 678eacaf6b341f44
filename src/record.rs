use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel for an unrecoverable practitioner name.
pub const NAME_SENTINEL: &str = "Inconnu";
/// Sentinel for any other unrecoverable text field.
pub const NA_SENTINEL: &str = "NA";
/// Generic specialty label used when no known specialty matches.
pub const SPECIALTY_FALLBACK: &str = "Centre de santé";

/// How a consultation takes place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsultationMode {
    /// Telehealth marker present on the listing
    Video,
    /// Default: in-person consultation
    OnSite,
}

impl std::fmt::Display for ConsultationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsultationMode::Video => write!(f, "visio"),
            ConsultationMode::OnSite => write!(f, "sur place"),
        }
    }
}

/// French healthcare reimbursement classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsuranceSector {
    #[serde(rename = "sector_1")]
    Sector1,
    #[serde(rename = "sector_2")]
    Sector2,
    Unspecified,
}

impl std::fmt::Display for InsuranceSector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InsuranceSector::Sector1 => write!(f, "secteur 1"),
            InsuranceSector::Sector2 => write!(f, "secteur 2"),
            InsuranceSector::Unspecified => write!(f, "non précisé"),
        }
    }
}

/// One extracted practitioner record.
///
/// Construction is total: every field carries either a recovered value or its
/// sentinel. A record is never partially built and never mutated after
/// assembly; the filter engine only selects, it does not edit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub full_name: String,
    pub specialty: String,
    pub consultation_mode: ConsultationMode,
    /// Raw matched insurance text, or `"NA"`
    pub insurance_label: String,
    pub insurance_sector: InsuranceSector,
    /// Independent "conventionné" marker, distinct from the sector
    pub is_covered: bool,
    /// Free-form date/time fragment, or `"NA"`
    pub next_availability: String,
    pub street: String,
    pub postal_code: String,
    pub city: String,
    /// Consultation fee in euros; absent when missing or unparseable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl Record {
    /// Fixed downstream CSV column order (header row, UTF-8).
    pub const CSV_HEADER: [&'static str; 10] = [
        "Nom",
        "Spécialité",
        "Disponibilité",
        "Consultation",
        "Assurance",
        "Secteur",
        "Prix (€)",
        "Rue",
        "Code Postal",
        "Ville",
    ];

    /// All-sentinel baseline the assembler fills in.
    pub fn sentinel() -> Self {
        Self {
            full_name: NAME_SENTINEL.to_string(),
            specialty: SPECIALTY_FALLBACK.to_string(),
            consultation_mode: ConsultationMode::OnSite,
            insurance_label: NA_SENTINEL.to_string(),
            insurance_sector: InsuranceSector::Unspecified,
            is_covered: false,
            next_availability: NA_SENTINEL.to_string(),
            street: NA_SENTINEL.to_string(),
            postal_code: NA_SENTINEL.to_string(),
            city: NA_SENTINEL.to_string(),
            price: None,
        }
    }

    /// One output row matching [`Record::CSV_HEADER`]. Writing it to a file
    /// belongs to the caller.
    pub fn to_row(&self) -> [String; 10] {
        [
            self.full_name.clone(),
            self.specialty.clone(),
            self.next_availability.clone(),
            self.consultation_mode.to_string(),
            self.insurance_label.clone(),
            self.insurance_sector.to_string(),
            self.price
                .map(|p| format!("{p}"))
                .unwrap_or_else(|| NA_SENTINEL.to_string()),
            self.street.clone(),
            self.postal_code.clone(),
            self.city.clone(),
        ]
    }
}

/// Category of a recoverable failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A field extractor fell back to its sentinel
    FieldExtraction,
    /// A price could not be parsed when the filter needed it
    PriceParse,
    /// Detail-view navigation was unavailable or failed
    Navigation,
    /// Filter-stage event other than price
    Filter,
}

/// Structured trace of a recoverable failure. Observability only, never
/// control flow: the pipeline keeps going after every one of these.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticEvent {
    pub kind: DiagnosticKind,
    /// Field the event is about, when field-scoped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
    /// Position of the listing block in the scanned page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_index: Option<usize>,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl DiagnosticEvent {
    pub fn field_failure(block_index: usize, field: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::FieldExtraction,
            field: Some(field),
            block_index: Some(block_index),
            message: message.into(),
            at: Utc::now(),
        }
    }

    pub fn navigation(block_index: usize, message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::Navigation,
            field: None,
            block_index: Some(block_index),
            message: message.into(),
            at: Utc::now(),
        }
    }

    pub fn price_parse(message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::PriceParse,
            field: Some("price"),
            block_index: None,
            message: message.into(),
            at: Utc::now(),
        }
    }
}
