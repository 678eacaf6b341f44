use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanError};
use crate::record::{ConsultationMode, SPECIALTY_FALLBACK};

/// How to pick the postal-code fragment out of a decomposed address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressStrategy {
    /// Pick the first fragment matching a 5-digit postal-code pattern,
    /// falling back to fixed positions when none matches
    #[default]
    PostalPattern,
    /// Fragment 0 is the street, fragment 1 is "postal city"
    Positional,
}

/// Separator between address fragments in the raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressDelimiter {
    #[default]
    Comma,
    Newline,
}

impl AddressDelimiter {
    pub fn as_char(self) -> char {
        match self {
            AddressDelimiter::Comma => ',',
            AddressDelimiter::Newline => '\n',
        }
    }
}

/// What the filter does with a record whose price could not be parsed while
/// explicit price bounds are in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPricePolicy {
    /// Log and retain the record
    #[default]
    Keep,
    /// Log and exclude the record
    Drop,
}

/// CSS selector set for one directory layout. Defaults target Doctolib
/// result cards; fakes and other layouts override per field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Selectors {
    /// One listing card in the results page
    #[serde(default = "default_card")]
    pub card: String,
    /// Card heading carrying the practitioner name
    #[serde(default = "default_heading")]
    pub heading: String,
    /// Higher-fidelity name inside the detail view
    #[serde(default = "default_profile_name")]
    pub profile_name: String,
    /// Practice address inside the detail view
    #[serde(default = "default_detail_address")]
    pub detail_address: String,
    /// Address summary on the card itself
    #[serde(default = "default_card_address")]
    pub card_address: String,
    #[serde(default = "default_sector")]
    pub sector: String,
    #[serde(default = "default_fee")]
    pub fee: String,
    /// Availability container
    #[serde(default = "default_availability")]
    pub availability: String,
    #[serde(default = "default_availability_day_name")]
    pub availability_day_name: String,
    #[serde(default = "default_availability_day_date")]
    pub availability_day_date: String,
    #[serde(default = "default_availability_slot")]
    pub availability_slot: String,
    /// Structural telehealth marker; presence means video consultation
    #[serde(default = "default_telehealth")]
    pub telehealth: String,
    /// Generic text fragments scanned by the specialty and insurance heuristics
    #[serde(default = "default_text_fragments")]
    pub text_fragments: String,
}

fn default_card() -> String {
    "div.dl-card-content".into()
}
fn default_heading() -> String {
    "h2".into()
}
fn default_profile_name() -> String {
    ".profile-name-with-title".into()
}
fn default_detail_address() -> String {
    ".dl-profile-practice-name".into()
}
fn default_card_address() -> String {
    ".dl-text.dl-text-body.dl-text-s.dl-text-neutral-130".into()
}
fn default_sector() -> String {
    ".t-sector".into()
}
fn default_fee() -> String {
    ".t-fee".into()
}
fn default_availability() -> String {
    ".availabilities-days".into()
}
fn default_availability_day_name() -> String {
    ".availabilities-day-name".into()
}
fn default_availability_day_date() -> String {
    ".availabilities-day-date".into()
}
fn default_availability_slot() -> String {
    ".availabilities-slot".into()
}
fn default_telehealth() -> String {
    ".dl-icon-video, [data-test='telehealth-icon']".into()
}
fn default_text_fragments() -> String {
    "h2, .dl-text, .t-sector".into()
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            card: default_card(),
            heading: default_heading(),
            profile_name: default_profile_name(),
            detail_address: default_detail_address(),
            card_address: default_card_address(),
            sector: default_sector(),
            fee: default_fee(),
            availability: default_availability(),
            availability_day_name: default_availability_day_name(),
            availability_day_date: default_availability_day_date(),
            availability_slot: default_availability_slot(),
            telehealth: default_telehealth(),
            text_fragments: default_text_fragments(),
        }
    }
}

/// Knobs for the extraction pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    #[serde(default)]
    pub address_strategy: AddressStrategy,
    #[serde(default)]
    pub address_delimiter: AddressDelimiter,
    /// Label used when no known specialty matches
    #[serde(default = "default_specialty_fallback")]
    pub specialty_fallback: String,
    /// Upper bound (in chars) for the raw-text availability fallback
    #[serde(default = "default_availability_max_len")]
    pub availability_max_len: usize,
    /// Whether to open the detail view for name/address enrichment
    #[serde(default = "default_true")]
    pub enrich_from_detail: bool,
    #[serde(default)]
    pub selectors: Selectors,
}

fn default_specialty_fallback() -> String {
    SPECIALTY_FALLBACK.to_string()
}

fn default_availability_max_len() -> usize {
    60
}

fn default_true() -> bool {
    true
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            address_strategy: AddressStrategy::default(),
            address_delimiter: AddressDelimiter::default(),
            specialty_fallback: default_specialty_fallback(),
            availability_max_len: default_availability_max_len(),
            enrich_from_detail: true,
            selectors: Selectors::default(),
        }
    }
}

/// Criteria applied once per run, after assembly. Unset criteria pass
/// everything; set criteria must all pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Case-insensitive containment match against the raw insurance label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurance_sector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consultation: Option<ConsultationMode>,
    #[serde(default)]
    pub price_min: f64,
    #[serde(default = "default_price_max")]
    pub price_max: f64,
    #[serde(default)]
    pub missing_price: MissingPricePolicy,
}

fn default_price_max() -> f64 {
    f64::INFINITY
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            insurance_sector: None,
            consultation: None,
            price_min: 0.0,
            price_max: f64::INFINITY,
            missing_price: MissingPricePolicy::default(),
        }
    }
}

impl FilterSpec {
    /// Build a validated spec. `price_min > price_max` is rejected.
    pub fn new(
        insurance_sector: Option<String>,
        consultation: Option<ConsultationMode>,
        price_min: f64,
        price_max: f64,
    ) -> Result<Self> {
        if price_min > price_max {
            return Err(ScanError::InvalidFilter(format!(
                "price_min {price_min} exceeds price_max {price_max}"
            )));
        }
        Ok(Self {
            insurance_sector,
            consultation,
            price_min,
            price_max,
            missing_price: MissingPricePolicy::default(),
        })
    }

    /// True when either price bound differs from the full default range.
    pub fn price_bounds_active(&self) -> bool {
        self.price_min != 0.0 || self.price_max != f64::INFINITY
    }
}
