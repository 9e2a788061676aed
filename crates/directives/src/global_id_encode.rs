use std::sync::Arc;

use futures::FutureExt;
use global_id_registry::{DirectiveLocation, MetaDirective, MetaField, MetaInputValue, Registry, ResolverContext};

use crate::mapper::{map_schema, MapperContext, SchemaMapper};
use crate::TransformError;

pub const GLOBAL_ID_ENCODE_DIRECTIVE: &str = "globalIdEncode";
pub const TYPE_NAME_ARGUMENT: &str = "typeName";

/// Rule wrapping the resolver of every output field tagged with the encode
/// directive, so raw ids leave the schema as opaque tokens.
pub struct GlobalIdEncode {
    directive_name: String,
}

impl GlobalIdEncode {
    pub fn new(directive_name: impl Into<String>) -> Self {
        Self {
            directive_name: directive_name.into(),
        }
    }

    pub fn directive_name(&self) -> &str {
        &self.directive_name
    }

    /// The declaration for registries built programmatically; [`SchemaMapper::directives`]
    /// carries the same declaration as SDL.
    pub fn definition(&self) -> MetaDirective {
        MetaDirective::new(&self.directive_name)
            .with_location(DirectiveLocation::FieldDefinition)
            .with_argument(MetaInputValue::new(TYPE_NAME_ARGUMENT, "String!"))
    }

    pub fn transform(&mut self, registry: Registry) -> Result<Registry, TransformError> {
        map_schema(registry, self).map_err(Into::into)
    }
}

impl Default for GlobalIdEncode {
    fn default() -> Self {
        Self::new(GLOBAL_ID_ENCODE_DIRECTIVE)
    }
}

impl SchemaMapper for GlobalIdEncode {
    fn directives(&self) -> String {
        format!(
            "directive @{}({TYPE_NAME_ARGUMENT}: String!) on FIELD_DEFINITION",
            self.directive_name
        )
    }

    fn map_object_field(
        &mut self,
        ctx: &mut MapperContext<'_>,
        parent_type: &str,
        field: &MetaField,
    ) -> Option<MetaField> {
        let directive = field.directive(&self.directive_name)?;

        let Some(type_name) = directive.string_argument(TYPE_NAME_ARGUMENT) else {
            ctx.report_error(
                format!("{parent_type}.{}", field.name),
                format!(
                    "The @{} directive expects a string `{TYPE_NAME_ARGUMENT}` argument",
                    self.directive_name
                ),
            );
            return None;
        };

        tracing::debug!("encoding global ids on {parent_type}.{}", field.name);

        let type_name = type_name.to_string();
        let original = field.resolver_or_default();

        let mut replacement = field.clone();
        replacement.resolver = Some(Arc::new(move |resolver_ctx: ResolverContext| {
            let original = original.clone();
            let type_name = type_name.clone();
            async move {
                let result = original(resolver_ctx).await?;
                // A null result stays null: absent values are skipped, not encoded.
                if result.is_null() {
                    return Ok(serde_json::Value::Null);
                }
                Ok(match global_id::encode(Some(&stringify_id(&result)), Some(&type_name)) {
                    Some(token) => serde_json::Value::String(token),
                    None => serde_json::Value::Null,
                })
            }
            .boxed()
        }));
        Some(replacement)
    }
}

/// Raw identifiers are opaque strings; non-string resolver results are
/// stringified before encoding.
fn stringify_id(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(id) => id.clone(),
        other => other.to_string(),
    }
}
