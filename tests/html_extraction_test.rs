//! End-to-end extraction from saved Doctolib-style result pages.

use doctoscan::config::{ExtractConfig, FilterSpec, Selectors};
use doctoscan::pipeline::run;
use doctoscan::record::{ConsultationMode, InsuranceSector};
use doctoscan::source::HtmlListingSource;

const RESULTS_HTML: &str = r#"
<!DOCTYPE html>
<html>
<body>
    <div class="dl-card-content">
        <h2>Dr Anne Martin</h2>
        <span class="dl-text">Dermatologue</span>
        <span class="t-sector">Conventionné secteur 2</span>
        <span class="t-fee">60 €</span>
        <span class="dl-icon-video"></span>
        <div class="availabilities-days">Prochaine disponibilité le 12 mars 2025 à 14h30</div>
        <div class="dl-text dl-text-body dl-text-s dl-text-neutral-130">12 rue des Lilas, 75010 Paris</div>
    </div>
    <div class="dl-card-content">
        <h2>Dr Paul Leroy</h2>
        <span class="dl-text">Cardiologue</span>
        <span class="t-sector">Conventionné secteur 1</span>
        <span class="t-fee">35,00 €</span>
        <div class="availabilities-days">
            <span class="availabilities-day-name">lundi</span>
            <span class="availabilities-day-date">17 mars</span>
            <span class="availabilities-slot">09:30</span>
        </div>
        <div class="dl-text dl-text-body dl-text-s dl-text-neutral-130">8 avenue Foch, 69006 Lyon</div>
    </div>
    <div class="dl-card-content">
        <h2>Centre Médical Voltaire</h2>
    </div>
</body>
</html>
"#;

const DETAIL_HTML: &str = r#"
<!DOCTYPE html>
<html>
<body>
    <div class="profile-name-with-title">Dr Anne Martin, Dermatologue</div>
    <div class="dl-profile-practice-name">14 boulevard Haussmann, 75009 Paris</div>
</body>
</html>
"#;

#[test]
fn extracts_all_fields_from_a_full_card() {
    let source = HtmlListingSource::new(RESULTS_HTML, Selectors::default());
    let outcome = run(&source, &FilterSpec::default(), 10, &ExtractConfig::default()).unwrap();

    assert_eq!(outcome.blocks_seen, 3);
    let martin = &outcome.records[0];
    assert_eq!(martin.full_name, "Dr Anne Martin");
    assert_eq!(martin.specialty, "Dermatologue");
    assert_eq!(martin.consultation_mode, ConsultationMode::Video);
    assert_eq!(martin.insurance_sector, InsuranceSector::Sector2);
    assert!(martin.is_covered);
    assert_eq!(martin.price, Some(60.0));
    assert_eq!(martin.next_availability, "12 mars 2025");
    assert_eq!(martin.street, "12 rue des Lilas");
    assert_eq!(martin.postal_code, "75010");
    assert_eq!(martin.city, "Paris");
}

#[test]
fn structured_availability_and_comma_price() {
    let source = HtmlListingSource::new(RESULTS_HTML, Selectors::default());
    let outcome = run(&source, &FilterSpec::default(), 10, &ExtractConfig::default()).unwrap();

    let leroy = &outcome.records[1];
    assert_eq!(leroy.full_name, "Dr Paul Leroy");
    assert_eq!(leroy.consultation_mode, ConsultationMode::OnSite);
    assert_eq!(leroy.next_availability, "lundi 17 mars 09:30");
    // comma decimal is unparseable: absent, not zero
    assert_eq!(leroy.price, None);
    assert_eq!(leroy.street, "8 avenue Foch");
    assert_eq!(leroy.postal_code, "69006");
    assert_eq!(leroy.city, "Lyon");
}

#[test]
fn bare_card_yields_degraded_record_with_diagnostics() {
    let source = HtmlListingSource::new(RESULTS_HTML, Selectors::default());
    let outcome = run(&source, &FilterSpec::default(), 10, &ExtractConfig::default()).unwrap();

    let centre = &outcome.records[2];
    assert_eq!(centre.full_name, "Centre Médical Voltaire");
    assert_eq!(centre.specialty, "Centre de santé");
    assert_eq!(centre.street, "NA");
    assert_eq!(centre.next_availability, "NA");
    assert!(centre.price.is_none());
    assert!(outcome
        .diagnostics
        .iter()
        .any(|d| d.block_index == Some(2) && d.field == Some("street")));
}

#[test]
fn detail_page_overrides_card_name_and_address() {
    let source =
        HtmlListingSource::new(RESULTS_HTML, Selectors::default()).with_detail(0, DETAIL_HTML);
    let outcome = run(&source, &FilterSpec::default(), 10, &ExtractConfig::default()).unwrap();

    let martin = &outcome.records[0];
    assert_eq!(martin.full_name, "Dr Anne Martin, Dermatologue");
    assert_eq!(martin.street, "14 boulevard Haussmann");
    assert_eq!(martin.postal_code, "75009");
    assert_eq!(martin.city, "Paris");
}

#[test]
fn sector_filter_selects_matching_card() {
    let source = HtmlListingSource::new(RESULTS_HTML, Selectors::default());
    let spec = FilterSpec {
        insurance_sector: Some("secteur 2".to_string()),
        ..Default::default()
    };
    let outcome = run(&source, &spec, 10, &ExtractConfig::default()).unwrap();

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].full_name, "Dr Anne Martin");
}

#[test]
fn max_results_bounds_the_page() {
    let source = HtmlListingSource::new(RESULTS_HTML, Selectors::default());
    let outcome = run(&source, &FilterSpec::default(), 2, &ExtractConfig::default()).unwrap();
    assert_eq!(outcome.blocks_seen, 2);
    assert_eq!(outcome.records.len(), 2);
}
