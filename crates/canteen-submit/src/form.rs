// SPDX-FileCopyrightText: 2026 Night Canteen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flattening a payload into multipart form fields.

use canteen_core::{FormField, Payload};
use serde_json::{Number, Value};

/// Encodes every non-null field of `payload` as a form field.
///
/// Objects and arrays are sent as JSON text, strings verbatim, numbers
/// and booleans in their plain textual form.
pub fn encode_form(payload: &Payload) -> Vec<FormField> {
    payload
        .iter()
        .filter_map(|(name, value)| encode_value(value).map(|text| FormField::new(name, text)))
        .collect()
}

fn encode_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(format_number(n)),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

/// Integral floats print without a fractional part (`12.0` becomes `12`).
fn format_number(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}
