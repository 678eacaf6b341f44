//! Filter engine: stable subset selection over assembled records. All active
//! criteria must pass; an unset criterion is vacuously true. Records are
//! never edited, only kept or dropped.

use crate::config::{FilterSpec, MissingPricePolicy};
use crate::record::{DiagnosticEvent, Record};

/// Apply `spec` to `records`, preserving original relative order.
pub fn apply(records: &[Record], spec: &FilterSpec) -> (Vec<Record>, Vec<DiagnosticEvent>) {
    let mut kept = Vec::new();
    let mut diagnostics = Vec::new();

    for record in records {
        if passes(record, spec, &mut diagnostics) {
            kept.push(record.clone());
        }
    }

    (kept, diagnostics)
}

fn passes(record: &Record, spec: &FilterSpec, diagnostics: &mut Vec<DiagnosticEvent>) -> bool {
    if let Some(ref wanted) = spec.insurance_sector {
        if !record
            .insurance_label
            .to_lowercase()
            .contains(&wanted.to_lowercase())
        {
            return false;
        }
    }

    if let Some(mode) = spec.consultation {
        if record.consultation_mode != mode {
            return false;
        }
    }

    match record.price {
        Some(price) => {
            if price < spec.price_min || price > spec.price_max {
                return false;
            }
        }
        None => {
            if spec.price_bounds_active() {
                diagnostics.push(DiagnosticEvent::price_parse(format!(
                    "no parseable price for {}",
                    record.full_name
                )));
                if spec.missing_price == MissingPricePolicy::Drop {
                    return false;
                }
            }
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ConsultationMode;

    fn record(name: &str, label: &str, mode: ConsultationMode, price: Option<f64>) -> Record {
        Record {
            full_name: name.to_string(),
            insurance_label: label.to_string(),
            consultation_mode: mode,
            price,
            ..Record::sentinel()
        }
    }

    #[test]
    fn test_unset_criteria_pass_everything() {
        let records = vec![
            record("A", "NA", ConsultationMode::OnSite, None),
            record("B", "Conventionné secteur 1", ConsultationMode::Video, Some(50.0)),
        ];
        let (kept, diagnostics) = apply(&records, &FilterSpec::default());
        assert_eq!(kept.len(), 2);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_insurance_containment_case_insensitive() {
        let records = vec![
            record("A", "Conventionné secteur 2", ConsultationMode::OnSite, None),
            record("B", "Conventionné secteur 1", ConsultationMode::OnSite, None),
        ];
        let spec = FilterSpec {
            insurance_sector: Some("SECTEUR 2".to_string()),
            ..Default::default()
        };
        let (kept, _) = apply(&records, &spec);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].full_name, "A");
    }

    #[test]
    fn test_consultation_mismatch_excluded() {
        let records = vec![record("A", "NA", ConsultationMode::OnSite, Some(50.0))];
        let spec = FilterSpec {
            consultation: Some(ConsultationMode::Video),
            ..Default::default()
        };
        let (kept, _) = apply(&records, &spec);
        assert!(kept.is_empty());
    }

    #[test]
    fn test_price_range() {
        let records = vec![
            record("cheap", "NA", ConsultationMode::OnSite, Some(20.0)),
            record("fits", "NA", ConsultationMode::OnSite, Some(60.0)),
            record("dear", "NA", ConsultationMode::OnSite, Some(200.0)),
        ];
        let spec = FilterSpec::new(None, None, 30.0, 100.0).unwrap();
        let (kept, _) = apply(&records, &spec);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].full_name, "fits");
    }

    #[test]
    fn test_missing_price_kept_and_logged_under_active_bounds() {
        let records = vec![record("A", "NA", ConsultationMode::OnSite, None)];
        let spec = FilterSpec::new(None, None, 0.0, 1000.0).unwrap();
        let (kept, diagnostics) = apply(&records, &spec);
        assert_eq!(kept.len(), 1);
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_missing_price_dropped_under_drop_policy() {
        let records = vec![record("A", "NA", ConsultationMode::OnSite, None)];
        let mut spec = FilterSpec::new(None, None, 0.0, 1000.0).unwrap();
        spec.missing_price = MissingPricePolicy::Drop;
        let (kept, diagnostics) = apply(&records, &spec);
        assert!(kept.is_empty());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_order_preserved_and_idempotent() {
        let records = vec![
            record("A", "secteur 1", ConsultationMode::OnSite, Some(10.0)),
            record("B", "secteur 2", ConsultationMode::OnSite, Some(20.0)),
            record("C", "secteur 1", ConsultationMode::OnSite, Some(30.0)),
        ];
        let spec = FilterSpec {
            insurance_sector: Some("secteur 1".to_string()),
            ..Default::default()
        };
        let (kept, _) = apply(&records, &spec);
        let names: Vec<&str> = kept.iter().map(|r| r.full_name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);

        let (again, _) = apply(&kept, &spec);
        let names_again: Vec<&str> = again.iter().map(|r| r.full_name.as_str()).collect();
        assert_eq!(names, names_again);
    }
}
