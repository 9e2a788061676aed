//! Shared decoding helpers: turning an incoming opaque token into the raw id
//! (or serialized pair) it carries, and wrapping a scalar type so its
//! input-parsing function does that automatically.

use std::sync::Arc;

use global_id_registry::{Error, ScalarType};

pub(crate) const WRONG_SHAPE_MESSAGE: &str = "Global ID must be a string";

/// Decodes a single incoming value, honouring `returnIdOnly`.
///
/// Absent (null) values decode to the empty pair rather than failing, so
/// optional fields and arguments stay optional. The same error contract is
/// used by argument decoding and declared-type decoding: a malformed token
/// fails naming the token, a non-string value fails with the wrong-shape
/// message.
pub(crate) fn decode_value(value: serde_json::Value, return_id_only: bool) -> Result<serde_json::Value, Error> {
    let decoded = match value {
        serde_json::Value::Null => global_id::decode(None)?,
        serde_json::Value::String(token) => global_id::decode(Some(&token))?,
        _ => return Err(Error::new(WRONG_SHAPE_MESSAGE)),
    };

    if return_id_only {
        Ok(decoded.id.map(serde_json::Value::String).unwrap_or(serde_json::Value::Null))
    } else {
        let serialized = serde_json::to_string(&decoded).map_err(|err| Error::new(err.to_string()))?;
        Ok(serde_json::Value::String(serialized))
    }
}

pub(crate) fn decodable_scalar_name(base: &str) -> String {
    format!("Decodable{base}")
}

/// Builds the scalar that replaces `original` on input fields tagged for
/// decoding: same configuration, renamed to keep its identity distinct from
/// the base scalar, with a parser that first applies the original scalar's
/// rules and then decodes the parsed string.
pub(crate) fn decoded_scalar(original: &ScalarType, return_id_only: bool) -> ScalarType {
    let original_parse = original.parse.clone();
    let mut scalar = ScalarType::new(decodable_scalar_name(&original.name));
    scalar.description = original.description.clone();
    scalar.with_parser(Arc::new(move |value| {
        let parsed = match &original_parse {
            Some(parse) => parse(value)?,
            None => value,
        };
        decode_value(parsed, return_id_only)
    }))
}
