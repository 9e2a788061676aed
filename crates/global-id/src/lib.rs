use std::fmt::Display;
use std::str::FromStr;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::Serialize;

/// A raw identifier together with the name of the type that owns it.
///
/// The wire format is the URL-safe, unpadded base64 encoding of
/// `"{id}:{type_name}"`. `Display` encodes, `FromStr` decodes.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct GlobalId {
    pub id: String,
    pub type_name: String,
}

impl GlobalId {
    pub fn new(id: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            type_name: type_name.into(),
        }
    }
}

impl Display for GlobalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // No padding makes tokens shorter and safe to paste into URLs.
        let encoded = URL_SAFE_NO_PAD.encode(format!("{}:{}", self.id, self.type_name));
        write!(f, "{encoded}")
    }
}

impl FromStr for GlobalId {
    type Err = GlobalIdError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        // Older issuers padded their tokens, so trailing `=` is tolerated.
        let bytes = URL_SAFE_NO_PAD
            .decode(token.trim_end_matches('='))
            .map_err(|_| GlobalIdError::InvalidGlobalId(token.to_string()))?;
        let decoded =
            String::from_utf8(bytes).map_err(|_| GlobalIdError::InvalidGlobalId(token.to_string()))?;

        match decoded.split(':').collect::<Vec<_>>().as_slice() {
            [id, type_name] => Ok(GlobalId::new(*id, *type_name)),
            _ => Err(GlobalIdError::InvalidGlobalId(token.to_string())),
        }
    }
}

/// The outcome of decoding a possibly absent token.
///
/// Both sides are absent when the token itself was absent. Serializes with
/// the `typeName` key and without absent sides, so the empty pair is `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecodedGlobalId {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "typeName", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
}

impl From<GlobalId> for DecodedGlobalId {
    fn from(GlobalId { id, type_name }: GlobalId) -> Self {
        Self {
            id: Some(id),
            type_name: Some(type_name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GlobalIdError {
    #[error("Invalid global ID: {0}")]
    InvalidGlobalId(String),
}

/// Encodes a raw id and its owning type name into an opaque token.
///
/// An absent id or type name yields `None` rather than an error; callers
/// treat this as "skip encoding". Ids containing `:` are not supported and
/// will fail to decode later.
pub fn encode(id: Option<&str>, type_name: Option<&str>) -> Option<String> {
    match (id, type_name) {
        (Some(id), Some(type_name)) => Some(GlobalId::new(id, type_name).to_string()),
        _ => None,
    }
}

/// Decodes a possibly absent opaque token.
///
/// An absent token yields an empty [`DecodedGlobalId`]. A present token that
/// does not decode to exactly two colon-delimited parts fails with
/// [`GlobalIdError::InvalidGlobalId`] carrying the original token.
pub fn decode(token: Option<&str>) -> Result<DecodedGlobalId, GlobalIdError> {
    match token {
        None => Ok(DecodedGlobalId::default()),
        Some(token) => token.parse::<GlobalId>().map(Into::into),
    }
}
