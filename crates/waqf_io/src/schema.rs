//! JSON Schema (draft 2020-12) for the stored snapshot envelope.
//!
//! The schema pins the envelope shape and the wire names of the portfolio;
//! typed deserialization into `waqf_core::Portfolio` does the rest.

use jsonschema::{Draft, JSONSchema};
use serde_json::Value;

use crate::{IoError, IoResult};

pub const SNAPSHOT_SCHEMA_VERSION: &str = "1";

static SNAPSHOT_SCHEMA: &str = r##"{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "$id": "urn:waqf:snapshot:1",
  "type": "object",
  "required": ["schemaVersion", "sha256", "portfolio"],
  "additionalProperties": false,
  "properties": {
    "schemaVersion": { "const": "1" },
    "sha256": { "type": "string", "pattern": "^[0-9a-f]{64}$" },
    "portfolio": {
      "type": "object",
      "required": ["items", "totalAmount"],
      "properties": {
        "totalAmount": { "type": "number" },
        "lockPeriodMonths": { "type": "integer", "minimum": 0 },
        "defaultExpirationPreference": {
          "enum": ["return_to_donor", "renew", "convert_to_permanent"]
        },
        "allocationMode": {
          "type": "object",
          "required": ["mode"],
          "properties": {
            "mode": { "enum": ["simple", "balanced", "advanced"] }
          }
        },
        "items": {
          "type": "array",
          "items": {
            "type": "object",
            "required": ["cause"],
            "properties": {
              "cause": {
                "type": "object",
                "required": ["id", "name"],
                "properties": {
                  "id": { "type": "string", "pattern": "^[A-Za-z0-9_.:-]{1,64}$" },
                  "name": { "type": "string" },
                  "supportedWaqfTypes": {
                    "type": "array",
                    "items": { "$ref": "#/$defs/waqfType" }
                  }
                }
              },
              "allocation": { "$ref": "#/$defs/split" },
              "totalAmount": { "type": "number" }
            }
          }
        }
      }
    }
  },
  "$defs": {
    "waqfType": { "enum": ["permanent", "temporary_consumable", "temporary_revolving"] },
    "split": {
      "type": "object",
      "required": ["permanent", "temporary_consumable", "temporary_revolving"],
      "properties": {
        "permanent": { "type": "number" },
        "temporary_consumable": { "type": "number" },
        "temporary_revolving": { "type": "number" }
      }
    }
  }
}"##;

/// Validate a stored envelope. The first failing instance path is reported.
pub fn validate_snapshot_envelope(instance: &Value) -> IoResult<()> {
    let schema: Value = serde_json::from_str(SNAPSHOT_SCHEMA)?;
    let compiled = JSONSchema::options()
        .with_draft(Draft::Draft202012)
        .compile(&schema)
        .map_err(|e| IoError::Schema { pointer: "#".into(), msg: format!("schema compile: {e}") })?;

    let result = compiled.validate(instance);
    if let Err(mut errors) = result {
        if let Some(first) = errors.next() {
            return Err(IoError::Schema {
                pointer: first.instance_path.to_string(),
                msg: first.to_string(),
            });
        }
    }
    Ok(())
}
