//! Structural comparison of two validated offers.

use super::ValidatedOffer;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One difference between two offers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FieldDiff {
    Added { value: Value },
    Removed { value: Value },
    Changed { old_value: Value, new_value: Value },
}

/// Differences keyed by dotted path, sorted by path.
pub type OfferDiff = BTreeMap<String, FieldDiff>;

/// Compare `a` (old) against `b` (new).
///
/// Nested records present on both sides are compared field by field; any
/// other mismatch, table rows included, is one `Changed` entry for the
/// whole value.
pub fn diff(a: &ValidatedOffer, b: &ValidatedOffer) -> OfferDiff {
    let mut out = OfferDiff::new();
    diff_maps(a.as_map(), b.as_map(), "", &mut out);
    out
}

fn diff_maps(a: &Map<String, Value>, b: &Map<String, Value>, prefix: &str, out: &mut OfferDiff) {
    let keys: std::collections::BTreeSet<&String> = a.keys().chain(b.keys()).collect();

    for key in keys {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match (a.get(key), b.get(key)) {
            (None, Some(new)) => {
                out.insert(path, FieldDiff::Added { value: new.clone() });
            }
            (Some(old), None) => {
                out.insert(path, FieldDiff::Removed { value: old.clone() });
            }
            (Some(old), Some(new)) if old != new => match (old, new) {
                (Value::Object(o), Value::Object(n)) => diff_maps(o, n, &path, out),
                _ => {
                    out.insert(
                        path,
                        FieldDiff::Changed {
                            old_value: old.clone(),
                            new_value: new.clone(),
                        },
                    );
                }
            },
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{blank_offer, validate, OFFER_SCHEMA};
    use serde_json::json;

    fn offer_with(edit: impl FnOnce(&mut Value)) -> ValidatedOffer {
        let mut data = blank_offer(&OFFER_SCHEMA);
        edit(&mut data);
        validate(&data).expect("valid")
    }

    #[test]
    fn identical_offers_have_no_diff() {
        let x = offer_with(|d| d["formInfo"]["investor"] = json!("Acme"));
        assert!(diff(&x, &x).is_empty());
    }

    #[test]
    fn single_field_change_is_reported_exactly() {
        let x = offer_with(|d| d["gpo"]["switchgearType"] = json!("GIS"));
        let y = offer_with(|d| d["gpo"]["switchgearType"] = json!("AIS"));
        let d = diff(&x, &y);
        assert_eq!(d.len(), 1);
        assert_eq!(
            d["gpo.switchgearType"],
            FieldDiff::Changed {
                old_value: json!("GIS"),
                new_value: json!("AIS")
            }
        );
    }

    #[test]
    fn table_change_is_one_whole_value_entry() {
        let row = json!({
            "from": "A", "to": "B", "routeLengthKm": 1.0, "inverterCount": 1,
            "powerMva": 1.0, "currentA": 1.0, "conductorCrossSectionMm2": 120,
            "returnCrossSectionMm2": 35, "coresPerPhase": 1
        });
        let x = offer_with(|_| {});
        let y = offer_with(|d| d["requiredScope"]["internalMvCables"] = json!([row]));
        let d = diff(&x, &y);
        assert_eq!(d.keys().collect::<Vec<_>>(), vec!["requiredScope.internalMvCables"]);
        assert!(matches!(d["requiredScope.internalMvCables"], FieldDiff::Changed { .. }));
    }

    #[test]
    fn serialises_with_status_tag() {
        let entry = FieldDiff::Changed {
            old_value: json!(1),
            new_value: json!(2),
        };
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({"status": "changed", "old_value": 1, "new_value": 2})
        );
    }

    #[test]
    fn missing_keys_become_added_and_removed() {
        let a: Map<String, Value> = serde_json::from_value(json!({"s": {"x": 1}})).unwrap();
        let b: Map<String, Value> = serde_json::from_value(json!({"s": {"y": 2}})).unwrap();
        let mut out = OfferDiff::new();
        diff_maps(&a, &b, "", &mut out);
        assert_eq!(out["s.x"], FieldDiff::Removed { value: json!(1) });
        assert_eq!(out["s.y"], FieldDiff::Added { value: json!(2) });
    }
}
