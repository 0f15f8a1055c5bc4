//! Prompt construction for the offer-filling request.
//!
//! The prompt has three parts, always in this order:
//!
//! 1. the instruction template (built-in or loaded from a file),
//! 2. the offer schema rendered by [`crate::schema::describe`], including the
//!    per-field guidance,
//! 3. the consolidated document text.
//!
//! The schema description comes from the same descriptor the validator
//! walks, so the model is always asked for exactly what is later checked.

use crate::error::OfferError;
use crate::schema::{describe, OfferSchema};
use std::path::Path;
use tracing::debug;

/// Instructions used when no template file is configured.
pub const DEFAULT_INSTRUCTIONS: &str = r#"You are an assistant that fills in a grid-connection offer form for a medium-voltage (MV) customer installation.

The documents below are technical conditions, site descriptions and equipment specifications, mostly in Polish. Read all of them and fill in the offer form described by the JSON schema.

Rules:
1. Return ONLY one JSON object that matches the schema exactly. No commentary, no markdown fences.
2. Use the field names from the schema verbatim. Every section and every field must be present.
3. Copy values from the documents. Do not invent data.
4. If a text value is not stated in the documents, use an empty string "". If a numeric value is not stated, use 0. If a list has no entries, use [].
5. Numbers are plain JSON numbers without units (kV, MW, km, mm²); convert units to the ones named in the field guidance.
6. Keep Polish wording for names, addresses and descriptions as it appears in the source.
7. Each row of a table field describes one item (for example one cable section); do not merge rows."#;

/// Heading placed above the schema description.
const SCHEMA_HEADING: &str = "JSON Schema (annotated skeleton, `//` comments describe each field):";

/// Heading placed above the consolidated document text.
const TEXT_HEADING: &str = "Extracted Text:";

/// Load the instruction template from `path`, or the built-in instructions.
///
/// A template that cannot be read, or that is blank, is an error: the
/// workflow never falls back to a different prompt than the one configured.
pub async fn load_instructions(path: Option<&Path>) -> Result<String, OfferError> {
    let Some(path) = path else {
        return Ok(DEFAULT_INSTRUCTIONS.to_string());
    };
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| OfferError::TemplateUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
    if text.trim().is_empty() {
        return Err(OfferError::InvalidConfig(format!(
            "instruction template '{}' is empty",
            path.display()
        )));
    }
    debug!("Loaded instruction template from {} ({} bytes)", path.display(), text.len());
    Ok(text)
}

/// Assemble the prompt from instructions, schema and consolidated text.
pub fn build_prompt(
    instructions: &str,
    schema: &OfferSchema,
    consolidated: &str,
) -> Result<String, OfferError> {
    if instructions.trim().is_empty() {
        return Err(OfferError::InvalidConfig(
            "instruction template is empty".into(),
        ));
    }
    if schema.sections.is_empty() {
        return Err(OfferError::InvalidConfig(
            "offer schema has no sections to describe".into(),
        ));
    }
    let description = describe(schema);

    let mut prompt = String::with_capacity(
        instructions.len() + description.len() + consolidated.len() + 128,
    );
    prompt.push_str(instructions.trim_end());
    prompt.push_str("\n\n");
    prompt.push_str(SCHEMA_HEADING);
    prompt.push_str("\n```\n");
    prompt.push_str(&description);
    prompt.push_str("\n```\n\n");
    prompt.push_str(TEXT_HEADING);
    prompt.push('\n');
    prompt.push_str(consolidated);
    Ok(prompt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::OFFER_SCHEMA;

    #[test]
    fn parts_appear_in_fixed_order() {
        let prompt = build_prompt("INSTRUCTIONS", &OFFER_SCHEMA, "BODY TEXT").unwrap();
        let i = prompt.find("INSTRUCTIONS").unwrap();
        let s = prompt.find("\"formInfo\"").unwrap();
        let t = prompt.find("BODY TEXT").unwrap();
        assert!(i < s && s < t);
        assert!(prompt.ends_with("Extracted Text:\nBODY TEXT"));
    }

    #[test]
    fn schema_description_is_embedded_verbatim() {
        let prompt = build_prompt(DEFAULT_INSTRUCTIONS, &OFFER_SCHEMA, "").unwrap();
        assert!(prompt.contains(&describe(&OFFER_SCHEMA)));
    }

    #[test]
    fn blank_instructions_are_rejected() {
        let err = build_prompt("  \n", &OFFER_SCHEMA, "text").unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn empty_schema_is_rejected() {
        let empty = OfferSchema {
            version: 0,
            sections: &[],
        };
        let err = build_prompt("x", &empty, "text").unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn default_instructions_without_path() {
        let text = tokio_test::block_on(load_instructions(None)).unwrap();
        assert_eq!(text, DEFAULT_INSTRUCTIONS);
    }

    #[tokio::test]
    async fn missing_template_file_is_configuration_error() {
        let err = load_instructions(Some(Path::new("/no/such/template.md")))
            .await
            .unwrap_err();
        assert!(matches!(err, OfferError::TemplateUnreadable { .. }));
        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn template_file_is_loaded() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("prompt.md");
        std::fs::write(&path, "Fill the form.").unwrap();
        assert_eq!(load_instructions(Some(&path)).await.unwrap(), "Fill the form.");
    }
}
