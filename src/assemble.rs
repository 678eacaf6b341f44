//! Record assembly: one total [`Record`] per listing block, however many
//! individual extractors fail along the way.

use crate::config::ExtractConfig;
use crate::extract::{self, FieldValue};
use crate::record::{DiagnosticEvent, Record};
use crate::source::{DetailScope, ListingBlock};

/// Assemble exactly one record from `block`.
///
/// Every field ends up populated with a value or its sentinel; each sentinel
/// substitution is reported as a diagnostic tagged with the field name and
/// the block's position. If the detail view opens, [`DetailScope`] guarantees
/// `go_back` runs before this function returns, whatever the extractors did.
pub fn assemble(
    block: &dyn ListingBlock,
    index: usize,
    config: &ExtractConfig,
) -> (Record, Vec<DiagnosticEvent>) {
    let mut diagnostics = Vec::new();

    let detail = if config.enrich_from_detail {
        match block.navigate_into() {
            Some(view) => Some(DetailScope::enter(view)),
            None => {
                diagnostics.push(DiagnosticEvent::navigation(
                    index,
                    "detail view unavailable, extracting from the card alone",
                ));
                None
            }
        }
    } else {
        None
    };

    let name = extract::extract_name(block, detail.as_ref(), config);
    let address = extract::extract_address(block, detail.as_ref(), config);
    let specialty = extract::extract_specialty(block, config);
    let insurance = extract::extract_insurance(block, config);
    let consultation_mode = extract::extract_consultation(block, config);
    let price = extract::extract_price(block, config);
    let availability = extract::extract_availability(block, config);

    // Return to the listing before the record leaves the assembler
    drop(detail);

    let mut record = Record::sentinel();
    record.consultation_mode = consultation_mode;
    record.insurance_sector = insurance.sector;
    record.is_covered = insurance.is_covered;
    record.full_name = take_field("full_name", name, index, &mut diagnostics);
    record.specialty = take_field("specialty", specialty, index, &mut diagnostics);
    record.street = take_field("street", address.street, index, &mut diagnostics);
    record.postal_code = take_field("postal_code", address.postal_code, index, &mut diagnostics);
    record.city = take_field("city", address.city, index, &mut diagnostics);
    record.insurance_label = take_field("insurance_label", insurance.label, index, &mut diagnostics);
    record.next_availability =
        take_field("next_availability", availability, index, &mut diagnostics);
    record.price = take_field("price", price, index, &mut diagnostics);

    (record, diagnostics)
}

fn take_field<T>(
    field: &'static str,
    outcome: FieldValue<T>,
    index: usize,
    diagnostics: &mut Vec<DiagnosticEvent>,
) -> T {
    if !outcome.ok {
        diagnostics.push(DiagnosticEvent::field_failure(
            index,
            field,
            "fell back to sentinel",
        ));
    }
    outcome.value
}
