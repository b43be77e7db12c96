//! Output payload decoding.
//!
//! Updates carry an opaque `outputs` payload produced by the compute engine.
//! An [`OutputDecoder`] turns it into a display value plus any attributes
//! the payload implies (e.g. a number format for a date result).

use serde_json::{Map, Value};
use std::rc::Rc;

use crate::error::{Result, SheetGridError};
use crate::types::{CellAttributes, CellValue, Viewer};

/// Result of decoding one `outputs` payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedOutput {
    pub value: Option<CellValue>,
    /// Opaque renderable handle, passed through untouched
    pub viewer: Option<Viewer>,
    /// Attributes implied by the output
    pub added_attributes: CellAttributes,
    /// Free-form fields the decoder did not interpret
    pub added_fields: Map<String, Value>,
}

/// Decodes an update's `outputs` payload.
pub trait OutputDecoder {
    /// # Errors
    /// Returns [`SheetGridError::Decode`] when the payload is not understood;
    /// the materializer drops that update and keeps going.
    fn decode(&self, outputs: &Value) -> Result<DecodedOutput>;
}

/// Decoder for the plain JSON payloads used by the session layer.
///
/// - `null` -> no value
/// - string / number -> text / number
/// - boolean -> `TRUE` / `FALSE` text
/// - object -> `{ "value": scalar, "viewer"?: any, "attributes"?: {...}, ...fields }`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonOutputDecoder;

fn scalar(value: &Value) -> Result<Option<CellValue>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(CellValue::Text(s.clone()))),
        Value::Number(n) => n
            .as_f64()
            .map(|f| Some(CellValue::Number(f)))
            .ok_or_else(|| SheetGridError::Decode(format!("number out of range: {n}"))),
        Value::Bool(b) => Ok(Some(CellValue::Text(
            if *b { "TRUE" } else { "FALSE" }.to_string(),
        ))),
        Value::Array(_) => Err(SheetGridError::Decode(
            "array outputs are not supported".to_string(),
        )),
        Value::Object(_) => Err(SheetGridError::Decode(
            "nested object is not a cell value".to_string(),
        )),
    }
}

impl OutputDecoder for JsonOutputDecoder {
    fn decode(&self, outputs: &Value) -> Result<DecodedOutput> {
        let Value::Object(map) = outputs else {
            return Ok(DecodedOutput {
                value: scalar(outputs)?,
                ..DecodedOutput::default()
            });
        };

        let mut decoded = DecodedOutput::default();
        for (key, v) in map {
            match key.as_str() {
                "value" => decoded.value = scalar(v)?,
                "viewer" if !v.is_null() => decoded.viewer = Some(Rc::new(v.clone())),
                "viewer" => {}
                "attributes" => {
                    decoded.added_attributes = CellAttributes::from_value(v).map_err(|e| {
                        SheetGridError::Decode(format!("output attributes: {e}"))
                    })?;
                }
                _ => {
                    decoded.added_fields.insert(key.clone(), v.clone());
                }
            }
        }
        Ok(decoded)
    }
}
