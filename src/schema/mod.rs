//! The offer schema: one descriptor, three consumers.
//!
//! [`OFFER_SCHEMA`] is a static, versioned description of the target offer —
//! twelve sections, each a flat record of typed fields, every field paired
//! with the guidance text the LLM needs to fill it. The same descriptor is
//! read by:
//!
//! * [`describe`] — renders the annotated skeleton embedded in the prompt,
//! * [`validate()`] — checks a provider response against it,
//! * [`blank_offer`] — produces an empty, conforming offer.
//!
//! Because prompt and validator walk the same data, they cannot drift.

mod diff;
mod offer;
mod validate;

pub use diff::{diff, FieldDiff, OfferDiff};
pub use offer::OFFER_SCHEMA;
pub use validate::{validate, FieldError, FieldProblem, ValidatedOffer, ValidationReport};

use serde_json::{Map, Value};

/// The type of a single schema field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// JSON string.
    Text,
    /// Whole number.
    Integer,
    /// Any number.
    Number,
    /// Array of strings.
    TextList,
    /// Array of uniform rows, each a flat record of the given columns.
    Table(&'static [FieldSpec]),
}

impl FieldKind {
    /// Short type name used in prompts and validation messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Text => "string",
            FieldKind::Integer => "integer",
            FieldKind::Number => "number",
            FieldKind::TextList => "list of strings",
            FieldKind::Table(_) => "list of rows",
        }
    }
}

/// One named field with its type and human-authored guidance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub guidance: &'static str,
}

impl FieldSpec {
    pub const fn text(name: &'static str, guidance: &'static str) -> Self {
        Self { name, kind: FieldKind::Text, guidance }
    }

    pub const fn integer(name: &'static str, guidance: &'static str) -> Self {
        Self { name, kind: FieldKind::Integer, guidance }
    }

    pub const fn number(name: &'static str, guidance: &'static str) -> Self {
        Self { name, kind: FieldKind::Number, guidance }
    }

    pub const fn text_list(name: &'static str, guidance: &'static str) -> Self {
        Self { name, kind: FieldKind::TextList, guidance }
    }

    pub const fn table(
        name: &'static str,
        columns: &'static [FieldSpec],
        guidance: &'static str,
    ) -> Self {
        Self { name, kind: FieldKind::Table(columns), guidance }
    }
}

/// A named section of the offer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionSpec {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

/// The complete offer schema.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OfferSchema {
    /// Bumped whenever a field is added, removed, renamed, or retyped.
    pub version: u32,
    pub sections: &'static [SectionSpec],
}

impl OfferSchema {
    pub fn section(&self, name: &str) -> Option<&SectionSpec> {
        self.sections.iter().find(|s| s.name == name)
    }
}

/// Render the schema as an annotated JSON skeleton for the prompt.
///
/// Every field appears with its type and its guidance as a trailing
/// `//` comment, in declaration order.
pub fn describe(schema: &OfferSchema) -> String {
    let mut out = format!(
        "// Offer schema v{}. Types: string, integer, number, [string], [{{row}}].\n{{\n",
        schema.version
    );
    for (i, section) in schema.sections.iter().enumerate() {
        out.push_str(&format!("  \"{}\": {{\n", section.name));
        render_fields(&mut out, section.fields, 4);
        out.push_str("  }");
        if i + 1 < schema.sections.len() {
            out.push(',');
        }
        out.push('\n');
    }
    out.push('}');
    out
}

fn render_fields(out: &mut String, fields: &[FieldSpec], indent: usize) {
    let pad = " ".repeat(indent);
    for (i, field) in fields.iter().enumerate() {
        let comma = if i + 1 < fields.len() { "," } else { "" };
        match field.kind {
            FieldKind::Table(columns) => {
                out.push_str(&format!("{pad}\"{}\": [  // {}\n", field.name, field.guidance));
                out.push_str(&format!("{pad}  {{\n"));
                render_fields(out, columns, indent + 4);
                out.push_str(&format!("{pad}  }}\n"));
                out.push_str(&format!("{pad}]{comma}\n"));
            }
            kind => {
                let ty = match kind {
                    FieldKind::TextList => "[string]",
                    other => other.type_name(),
                };
                out.push_str(&format!(
                    "{pad}\"{}\": {ty}{comma}  // {}\n",
                    field.name, field.guidance
                ));
            }
        }
    }
}

/// A conforming offer with every field empty: `""`, `0`, `0.0`, or `[]`.
pub fn blank_offer(schema: &OfferSchema) -> Value {
    let sections = schema
        .sections
        .iter()
        .map(|s| (s.name.to_string(), Value::Object(blank_record(s.fields))))
        .collect::<Map<_, _>>();
    Value::Object(sections)
}

fn blank_record(fields: &[FieldSpec]) -> Map<String, Value> {
    fields
        .iter()
        .map(|f| {
            let v = match f.kind {
                FieldKind::Text => Value::String(String::new()),
                FieldKind::Integer => Value::from(0),
                FieldKind::Number => Value::from(0.0),
                FieldKind::TextList | FieldKind::Table(_) => Value::Array(Vec::new()),
            };
            (f.name.to_string(), v)
        })
        .collect()
}
