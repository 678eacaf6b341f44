//! Per-field extraction heuristics. Each extractor owns its own fallback
//! chain and never lets a failure cross its boundary: the worst outcome is
//! the field's sentinel with `ok = false`, which the assembler turns into a
//! diagnostic event.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::{AddressStrategy, ExtractConfig};
use crate::record::{ConsultationMode, InsuranceSector, NAME_SENTINEL, NA_SENTINEL};
use crate::source::{DetailScope, ListingBlock};

// Leading 5-digit postal code, e.g. "75010 Paris"
static POSTAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{5}\b").expect("Invalid postal code regex"));

// "le 12 mars 2025", "1er juin 2025" — day, French month name, year
static AVAILABILITY_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:le\s+)?(\d{1,2}(?:er)?\s+(?:janvier|février|mars|avril|mai|juin|juillet|août|septembre|octobre|novembre|décembre)\s+\d{4})\b",
    )
    .expect("Invalid availability date regex")
});

// Known-specialty vocabulary, scanned case-insensitively. Broad entries last
// so the most specific label wins.
const SPECIALTY_VOCABULARY: &[&str] = &[
    "Médecin généraliste",
    "Chirurgien-dentiste",
    "Masseur-kinésithérapeute",
    "Kinésithérapeute",
    "Dermatologue",
    "Cardiologue",
    "Ophtalmologue",
    "Gynécologue",
    "Pédiatre",
    "Psychiatre",
    "Psychologue",
    "Ostéopathe",
    "Sage-femme",
    "Radiologue",
    "Dentiste",
    "ORL",
];

/// Outcome of one field extractor: always a usable value, plus whether it was
/// actually recovered or is a fallback/sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue<T> {
    pub value: T,
    pub ok: bool,
}

impl<T> FieldValue<T> {
    pub fn found(value: T) -> Self {
        Self { value, ok: true }
    }

    pub fn fallback(value: T) -> Self {
        Self { value, ok: false }
    }
}

/// Decomposed address, each part with its own recovery flag.
#[derive(Debug, Clone)]
pub struct AddressParts {
    pub street: FieldValue<String>,
    pub postal_code: FieldValue<String>,
    pub city: FieldValue<String>,
}

impl AddressParts {
    fn sentinel() -> Self {
        Self {
            street: FieldValue::fallback(NA_SENTINEL.to_string()),
            postal_code: FieldValue::fallback(NA_SENTINEL.to_string()),
            city: FieldValue::fallback(NA_SENTINEL.to_string()),
        }
    }
}

/// Insurance facts recovered from the block's text fragments.
#[derive(Debug, Clone)]
pub struct InsuranceFacts {
    pub label: FieldValue<String>,
    pub sector: InsuranceSector,
    /// "Conventionné" marker, independent of the sector
    pub is_covered: bool,
}

/// Practitioner name: detail-view profile name first, then the block heading.
pub fn extract_name(
    block: &dyn ListingBlock,
    detail: Option<&DetailScope>,
    config: &ExtractConfig,
) -> FieldValue<String> {
    if let Some(scope) = detail {
        if let Some(name) = scope.query_one(&config.selectors.profile_name) {
            let name = name.trim();
            if !name.is_empty() {
                return FieldValue::found(name.to_string());
            }
        }
    }

    match block.query_one(&config.selectors.heading) {
        Some(heading) if !heading.trim().is_empty() => {
            FieldValue::found(heading.trim().to_string())
        }
        _ => FieldValue::fallback(NAME_SENTINEL.to_string()),
    }
}

/// Address text: detail-view practice block first, then the card summary.
pub fn extract_address(
    block: &dyn ListingBlock,
    detail: Option<&DetailScope>,
    config: &ExtractConfig,
) -> AddressParts {
    let raw = detail
        .and_then(|scope| scope.query_one(&config.selectors.detail_address))
        .filter(|text| !text.trim().is_empty())
        .or_else(|| block.query_one(&config.selectors.card_address));

    match raw {
        Some(text) if !text.trim().is_empty() => decompose_address(&text, config),
        _ => AddressParts::sentinel(),
    }
}

/// Split a free-text address into street / postal code / city.
///
/// Under [`AddressStrategy::PostalPattern`] the postal fragment is the first
/// one matching a leading 5-digit code; when none matches (or under
/// [`AddressStrategy::Positional`]) fragment 0 is the street and fragment 1
/// carries "postal city".
pub fn decompose_address(text: &str, config: &ExtractConfig) -> AddressParts {
    let delimiter = config.address_delimiter.as_char();
    let fragments: Vec<&str> = text
        .split(delimiter)
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .collect();

    if fragments.is_empty() {
        return AddressParts::sentinel();
    }

    let postal_idx = match config.address_strategy {
        AddressStrategy::PostalPattern => fragments.iter().position(|f| POSTAL_RE.is_match(f)),
        AddressStrategy::Positional => None,
    };

    let (street_fragments, locality) = match postal_idx {
        Some(i) => (&fragments[..i], Some(fragments[i])),
        // Positional fallback: fragment 0 = street, fragment 1 = "postal city"
        None => (&fragments[..1], fragments.get(1).copied()),
    };

    let street = if street_fragments.is_empty() {
        FieldValue::fallback(NA_SENTINEL.to_string())
    } else {
        FieldValue::found(street_fragments.join(", "))
    };

    let (postal_code, city) = match locality {
        Some(locality) => split_locality(locality),
        None => (
            FieldValue::fallback(NA_SENTINEL.to_string()),
            FieldValue::fallback(NA_SENTINEL.to_string()),
        ),
    };

    AddressParts {
        street,
        postal_code,
        city,
    }
}

// "75010 Paris" -> postal code = leading token, city = remainder
fn split_locality(locality: &str) -> (FieldValue<String>, FieldValue<String>) {
    let mut tokens = locality.split_whitespace();
    match tokens.next() {
        Some(code) => {
            let city: String = tokens.collect::<Vec<_>>().join(" ");
            let postal = FieldValue::found(code.to_string());
            let city = if city.is_empty() {
                FieldValue::fallback(NA_SENTINEL.to_string())
            } else {
                FieldValue::found(city)
            };
            (postal, city)
        }
        None => (
            FieldValue::fallback(NA_SENTINEL.to_string()),
            FieldValue::fallback(NA_SENTINEL.to_string()),
        ),
    }
}

/// Scan the block's text fragments for a known specialty.
pub fn extract_specialty(block: &dyn ListingBlock, config: &ExtractConfig) -> FieldValue<String> {
    let fragments = block.query_all(&config.selectors.text_fragments);

    for fragment in &fragments {
        let lower = fragment.to_lowercase();
        for entry in SPECIALTY_VOCABULARY {
            if lower.contains(&entry.to_lowercase()) {
                return FieldValue::found((*entry).to_string());
            }
        }
    }

    FieldValue::fallback(config.specialty_fallback.clone())
}

/// Insurance sector and coverage marker from the sector element, then from
/// the generic text fragments.
pub fn extract_insurance(block: &dyn ListingBlock, config: &ExtractConfig) -> InsuranceFacts {
    let mut candidates: Vec<String> = Vec::new();
    if let Some(text) = block.query_one(&config.selectors.sector) {
        candidates.push(text);
    }
    candidates.extend(block.query_all(&config.selectors.text_fragments));

    let mut sector = InsuranceSector::Unspecified;
    let mut is_covered = false;
    let mut label: Option<String> = None;

    for candidate in &candidates {
        let lower = candidate.to_lowercase();
        let mentions_coverage = lower.contains("conventionn");
        let negated = lower.contains("non conventionn");

        if mentions_coverage && !negated {
            is_covered = true;
        }

        if sector == InsuranceSector::Unspecified {
            if lower.contains("secteur 1") {
                sector = InsuranceSector::Sector1;
            } else if lower.contains("secteur 2") {
                sector = InsuranceSector::Sector2;
            }
        }

        if label.is_none() && (lower.contains("secteur") || mentions_coverage) {
            label = Some(candidate.trim().to_string());
        }
    }

    InsuranceFacts {
        label: match label {
            Some(text) => FieldValue::found(text),
            None => FieldValue::fallback(NA_SENTINEL.to_string()),
        },
        sector,
        is_covered,
    }
}

/// Structural derivation: a telehealth marker element means video, its
/// absence means on-site. Never guessed from text.
pub fn extract_consultation(block: &dyn ListingBlock, config: &ExtractConfig) -> ConsultationMode {
    if block.query_one(&config.selectors.telehealth).is_some() {
        ConsultationMode::Video
    } else {
        ConsultationMode::OnSite
    }
}

/// Fee element text stripped of the currency symbol and parsed as a decimal.
/// An unparseable amount is absent, never zero.
pub fn extract_price(block: &dyn ListingBlock, config: &ExtractConfig) -> FieldValue<Option<f64>> {
    let Some(text) = block.query_one(&config.selectors.fee) else {
        return FieldValue::fallback(None);
    };

    let cleaned = text.replace('€', "").replace('\u{a0}', " ");
    match cleaned.trim().parse::<f64>() {
        Ok(amount) => FieldValue::found(Some(amount)),
        Err(_) => FieldValue::fallback(None),
    }
}

/// Next availability: structured day/date/slot sub-elements first, then a
/// date-pattern match over the container text, then bounded truncation.
pub fn extract_availability(block: &dyn ListingBlock, config: &ExtractConfig) -> FieldValue<String> {
    let structured: Vec<String> = [
        block.query_one(&config.selectors.availability_day_name),
        block.query_one(&config.selectors.availability_day_date),
        block.query_one(&config.selectors.availability_slot),
    ]
    .into_iter()
    .flatten()
    .map(|part| part.trim().to_string())
    .filter(|part| !part.is_empty())
    .collect();

    if !structured.is_empty() {
        return FieldValue::found(structured.join(" "));
    }

    let Some(raw) = block.query_one(&config.selectors.availability) else {
        return FieldValue::fallback(NA_SENTINEL.to_string());
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return FieldValue::fallback(NA_SENTINEL.to_string());
    }

    if let Some(captures) = AVAILABILITY_DATE_RE.captures(raw) {
        return FieldValue::found(captures[1].to_string());
    }

    // Best effort: bounded prefix of the raw container text
    let truncated: String = raw.chars().take(config.availability_max_len).collect();
    FieldValue::found(truncated)
}
