//! Whole-offer validation with aggregated field errors.
//!
//! [`validate`] walks the schema descriptor recursively and collects every
//! missing or mistyped field into one [`ValidationReport`]. It never returns
//! a partially filled offer: the result is either a complete
//! [`ValidatedOffer`] or the full list of problems.

use super::{FieldKind, FieldSpec, OfferSchema, OFFER_SCHEMA};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A structured response that passed validation.
///
/// Holds exactly the schema's sections and fields (unknown keys dropped,
/// numbers normalised). Constructed only by [`validate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidatedOffer(Map<String, Value>);

impl ValidatedOffer {
    /// The offer as a plain JSON value, e.g. for persistence.
    pub fn dump(&self) -> Value {
        Value::Object(self.0.clone())
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Look up a value by dotted path, e.g. `"formInfo.investor"`.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.0.get(parts.next()?)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }

    /// Convenience accessor for text fields; `None` if absent or not a string.
    pub fn text(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }
}

/// What is wrong with one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "problem", rename_all = "snake_case")]
pub enum FieldProblem {
    Missing,
    WrongType {
        expected: String,
        found: String,
    },
}

/// One offending field, addressed by dotted path (row indices included).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub path: String,
    #[serde(flatten)]
    pub problem: FieldProblem,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "(root)" } else { &self.path };
        match &self.problem {
            FieldProblem::Missing => write!(f, "{path}: field required"),
            FieldProblem::WrongType { expected, found } => {
                write!(f, "{path}: expected {expected}, found {found}")
            }
        }
    }
}

/// Every field error found in one validation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<FieldError>,
}

impl ValidationReport {
    /// Dotted paths of all offending fields, in discovery order.
    pub fn paths(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.path.as_str()).collect()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} validation error(s) for offer template",
            self.errors.len()
        )?;
        for e in &self.errors {
            write!(f, "\n  {e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationReport {}

/// Validate `data` against [`OFFER_SCHEMA`].
pub fn validate(data: &Value) -> Result<ValidatedOffer, ValidationReport> {
    validate_with(&OFFER_SCHEMA, data)
}

/// Validate `data` against an arbitrary schema.
pub fn validate_with(schema: &OfferSchema, data: &Value) -> Result<ValidatedOffer, ValidationReport> {
    let mut errors = Vec::new();

    let Some(root) = data.as_object() else {
        return Err(ValidationReport {
            errors: vec![FieldError {
                path: String::new(),
                problem: FieldProblem::WrongType {
                    expected: "object".into(),
                    found: json_type(data).into(),
                },
            }],
        });
    };

    let mut offer = Map::new();
    for section in schema.sections {
        match root.get(section.name) {
            None => errors.push(missing(section.name.to_string())),
            Some(Value::Object(record)) => {
                if let Some(clean) = check_record(section.fields, record, section.name, &mut errors) {
                    offer.insert(section.name.to_string(), Value::Object(clean));
                }
            }
            Some(other) => errors.push(wrong_type(section.name.to_string(), "object", other)),
        }
    }

    if errors.is_empty() {
        Ok(ValidatedOffer(offer))
    } else {
        Err(ValidationReport { errors })
    }
}

/// Check a flat record. Returns the cleaned record only if every field passed.
fn check_record(
    fields: &[FieldSpec],
    record: &Map<String, Value>,
    prefix: &str,
    errors: &mut Vec<FieldError>,
) -> Option<Map<String, Value>> {
    let before = errors.len();
    let mut clean = Map::new();

    for field in fields {
        let path = format!("{prefix}.{}", field.name);
        let Some(value) = record.get(field.name) else {
            errors.push(missing(path));
            continue;
        };
        if let Some(v) = check_value(field.kind, value, &path, errors) {
            clean.insert(field.name.to_string(), v);
        }
    }

    (errors.len() == before).then_some(clean)
}

fn check_value(
    kind: FieldKind,
    value: &Value,
    path: &str,
    errors: &mut Vec<FieldError>,
) -> Option<Value> {
    let checked = match kind {
        FieldKind::Text => value.as_str().map(|s| Value::String(s.to_string())),
        FieldKind::Integer => coerce_integer(value).map(Value::from),
        FieldKind::Number => coerce_number(value).map(Value::from),
        FieldKind::TextList => {
            let Some(items) = value.as_array() else {
                errors.push(wrong_type(path.to_string(), kind.type_name(), value));
                return None;
            };
            let before = errors.len();
            for (i, item) in items.iter().enumerate() {
                if !item.is_string() {
                    errors.push(wrong_type(format!("{path}.{i}"), "string", item));
                }
            }
            return (errors.len() == before).then(|| value.clone());
        }
        FieldKind::Table(columns) => {
            let Some(rows) = value.as_array() else {
                errors.push(wrong_type(path.to_string(), kind.type_name(), value));
                return None;
            };
            let before = errors.len();
            let mut clean_rows = Vec::with_capacity(rows.len());
            for (i, row) in rows.iter().enumerate() {
                let row_path = format!("{path}.{i}");
                match row.as_object() {
                    Some(record) => {
                        if let Some(clean) = check_record(columns, record, &row_path, errors) {
                            clean_rows.push(Value::Object(clean));
                        }
                    }
                    None => errors.push(wrong_type(row_path, "object", row)),
                }
            }
            return (errors.len() == before).then_some(Value::Array(clean_rows));
        }
    };

    if checked.is_none() {
        errors.push(wrong_type(path.to_string(), kind.type_name(), value));
    }
    checked
}

/// Integers, integral floats, and integer strings are accepted.
fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Any number or numeric string is accepted and normalised to `f64`.
fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

fn missing(path: String) -> FieldError {
    FieldError {
        path,
        problem: FieldProblem::Missing,
    }
}

fn wrong_type(path: String, expected: &str, found: &Value) -> FieldError {
    FieldError {
        path,
        problem: FieldProblem::WrongType {
            expected: expected.to_string(),
            found: json_type(found).to_string(),
        },
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::blank_offer;
    use serde_json::json;

    fn sample() -> Value {
        let mut offer = blank_offer(&OFFER_SCHEMA);
        offer["formInfo"]["investor"] = json!("Solar Farm Sp. z o.o.");
        offer["formInfo"]["version"] = json!(3);
        offer["requiredScope"]["internalMvCables"] = json!([{
            "from": "ST1", "to": "GPO", "routeLengthKm": 1.2, "inverterCount": 4,
            "powerMva": 3.5, "currentA": 101.0, "conductorCrossSectionMm2": 240,
            "returnCrossSectionMm2": 50, "coresPerPhase": 1
        }]);
        offer
    }

    #[test]
    fn valid_offer_round_trips() {
        let offer = validate(&sample()).expect("valid");
        let again = validate(&offer.dump()).expect("dump must validate");
        assert_eq!(offer, again);
    }

    #[test]
    fn missing_nested_field_reports_dotted_path() {
        let mut data = sample();
        data["connection"].as_object_mut().unwrap().remove("maxLayingDepth");
        let report = validate(&data).unwrap_err();
        assert_eq!(report.paths(), vec!["connection.maxLayingDepth"]);
        assert_eq!(report.errors[0].problem, FieldProblem::Missing);
    }

    #[test]
    fn reports_every_error_not_just_the_first() {
        let mut data = sample();
        data.as_object_mut().unwrap().remove("selections");
        data["formInfo"]["version"] = json!("three");
        data["gpo"]["switchgearType"] = json!(42);
        data["formInfo"]["updateDates"] = json!(["2024-01-01", 7]);
        let report = validate(&data).unwrap_err();
        let paths = report.paths();
        assert_eq!(paths.len(), 4, "got: {paths:?}");
        assert!(paths.contains(&"selections"));
        assert!(paths.contains(&"formInfo.version"));
        assert!(paths.contains(&"gpo.switchgearType"));
        assert!(paths.contains(&"formInfo.updateDates.1"));
    }

    #[test]
    fn table_row_errors_carry_row_index() {
        let mut data = sample();
        data["requiredScope"]["internalMvCables"][0]
            .as_object_mut()
            .unwrap()
            .remove("to");
        let report = validate(&data).unwrap_err();
        assert_eq!(report.paths(), vec!["requiredScope.internalMvCables.0.to"]);
    }

    #[test]
    fn numeric_fields_are_coerced() {
        let mut data = sample();
        data["formInfo"]["version"] = json!("4");
        data["requiredScope"]["internalMvCables"][0]["routeLengthKm"] = json!(2);
        data["requiredScope"]["internalMvCables"][0]["coresPerPhase"] = json!(2.0);
        let offer = validate(&data).expect("coercible");
        assert_eq!(offer.get("formInfo.version"), Some(&json!(4)));
        let row = &offer.get("requiredScope.internalMvCables").unwrap()[0];
        assert_eq!(row["routeLengthKm"], json!(2.0));
        assert_eq!(row["coresPerPhase"], json!(2));
    }

    #[test]
    fn fractional_integer_is_rejected() {
        let mut data = sample();
        data["formInfo"]["version"] = json!(1.5);
        let report = validate(&data).unwrap_err();
        assert_eq!(
            report.errors[0].problem,
            FieldProblem::WrongType {
                expected: "integer".into(),
                found: "number".into()
            }
        );
    }

    #[test]
    fn unknown_keys_are_dropped() {
        let mut data = sample();
        data["extra"] = json!(true);
        data["gpo"]["note"] = json!("ignored");
        let offer = validate(&data).expect("extras ignored");
        assert!(offer.get("extra").is_none());
        assert!(offer.get("gpo.note").is_none());
    }

    #[test]
    fn non_object_root_fails_as_unit() {
        let report = validate(&json!(["not", "an", "offer"])).unwrap_err();
        assert_eq!(report.errors.len(), 1);
        assert!(report.to_string().contains("(root): expected object, found array"));
    }

    #[test]
    fn text_accessor_reads_nested_value() {
        let offer = validate(&sample()).unwrap();
        assert_eq!(offer.text("formInfo.investor"), Some("Solar Farm Sp. z o.o."));
        assert_eq!(offer.text("formInfo.version"), None);
    }
}
