//! Schema rules that make a registry speak opaque global ids: an encode rule
//! wrapping tagged output fields so raw ids leave as tokens, and a decode rule
//! rewriting tagged arguments and input fields so tokens come back in as raw
//! ids. Both plug into the [`SchemaMapper`] rebuilding pass and can be applied
//! individually or composed.

mod decoded_scalar;
mod global_id_decode;
mod global_id_encode;
mod mapper;

pub use global_id_decode::{GlobalIdDecode, GLOBAL_ID_DECODE_DIRECTIVE, RETURN_ID_ONLY_ARGUMENT};
pub use global_id_encode::{GlobalIdEncode, GLOBAL_ID_ENCODE_DIRECTIVE, TYPE_NAME_ARGUMENT};
pub use global_id_registry::Registry;
pub use mapper::{map_schema, MapperCons, MapperContext, MapperNil, RuleError, SchemaMapper};

#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("{0:?}")]
    Validation(Vec<RuleError>),
}

impl From<Vec<RuleError>> for TransformError {
    fn from(errors: Vec<RuleError>) -> Self {
        Self::Validation(errors)
    }
}

/// Registers both directive declarations on the registry and applies both
/// rules in a single mapping pass. Returns the transformed registry together
/// with the directive SDL fragments to merge into the schema's textual
/// definition.
pub fn apply_global_id_directives(mut registry: Registry) -> Result<(Registry, String), TransformError> {
    let encode = GlobalIdEncode::default();
    let decode = GlobalIdDecode::default();

    registry.add_directive(encode.definition());
    registry.add_directive(decode.definition());

    let mut rules = MapperNil.with(encode).with(decode);
    let directives = rules.directives();
    let registry = map_schema(registry, &mut rules)?;

    Ok((registry, directives))
}
