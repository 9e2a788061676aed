use std::collections::HashMap;
use std::sync::Arc;

use futures::FutureExt;
use global_id_registry::{DirectiveLocation, MetaDirective, MetaField, MetaInputValue, Registry, ResolverContext};

use crate::decoded_scalar::{decodable_scalar_name, decode_value, decoded_scalar};
use crate::mapper::{map_schema, MapperContext, SchemaMapper};
use crate::TransformError;

pub const GLOBAL_ID_DECODE_DIRECTIVE: &str = "globalIdDecode";
pub const RETURN_ID_ONLY_ARGUMENT: &str = "returnIdOnly";

/// Rule decoding incoming opaque tokens back into raw ids, in two places:
/// arguments tagged with the decode directive are rewritten per invocation
/// before the field's resolver runs, and tagged input-object fields have
/// their scalar type statically wrapped so decoding happens while the input
/// value is parsed.
pub struct GlobalIdDecode {
    directive_name: String,
    // Decodable scalars registered so far, with the returnIdOnly setting
    // baked into their parser. Shared base scalars must agree on it.
    wrapped_scalars: HashMap<String, bool>,
}

impl GlobalIdDecode {
    pub fn new(directive_name: impl Into<String>) -> Self {
        Self {
            directive_name: directive_name.into(),
            wrapped_scalars: HashMap::new(),
        }
    }

    pub fn directive_name(&self) -> &str {
        &self.directive_name
    }

    pub fn definition(&self) -> MetaDirective {
        MetaDirective::new(&self.directive_name)
            .with_location(DirectiveLocation::FieldDefinition)
            .with_location(DirectiveLocation::ArgumentDefinition)
            .with_location(DirectiveLocation::InputFieldDefinition)
            .with_argument(MetaInputValue::new(RETURN_ID_ONLY_ARGUMENT, "Boolean").with_default(true))
    }

    pub fn transform(&mut self, registry: Registry) -> Result<Registry, TransformError> {
        map_schema(registry, self).map_err(Into::into)
    }

    fn return_id_only(&self, directive: &global_id_registry::DirectiveInstance) -> bool {
        directive.bool_argument(RETURN_ID_ONLY_ARGUMENT).unwrap_or(true)
    }
}

impl Default for GlobalIdDecode {
    fn default() -> Self {
        Self::new(GLOBAL_ID_DECODE_DIRECTIVE)
    }
}

impl SchemaMapper for GlobalIdDecode {
    fn directives(&self) -> String {
        format!(
            "directive @{}({RETURN_ID_ONLY_ARGUMENT}: Boolean = true) on FIELD_DEFINITION | ARGUMENT_DEFINITION | INPUT_FIELD_DEFINITION",
            self.directive_name
        )
    }

    fn map_object_field(
        &mut self,
        _ctx: &mut MapperContext<'_>,
        parent_type: &str,
        field: &MetaField,
    ) -> Option<MetaField> {
        let tagged: Vec<(String, bool)> = field
            .args
            .values()
            .filter_map(|argument| {
                argument
                    .directive(&self.directive_name)
                    .map(|directive| (argument.name.clone(), self.return_id_only(directive)))
            })
            .collect();

        if tagged.is_empty() {
            return None;
        }

        tracing::debug!("decoding global id arguments on {parent_type}.{}", field.name);

        let original = field.resolver_or_default();

        let mut replacement = field.clone();
        replacement.resolver = Some(Arc::new(move |mut resolver_ctx: ResolverContext| {
            let original = original.clone();
            let tagged = tagged.clone();
            async move {
                // Rewrites are scoped to this invocation: the context owns its
                // argument map, untagged arguments pass through untouched.
                for (name, return_id_only) in &tagged {
                    let incoming = resolver_ctx.args.get(name).cloned().unwrap_or(serde_json::Value::Null);
                    let decoded = decode_value(incoming, *return_id_only)?;
                    resolver_ctx.args.insert(name.clone(), decoded);
                }
                original(resolver_ctx).await
            }
            .boxed()
        }));
        Some(replacement)
    }

    fn map_input_field(
        &mut self,
        ctx: &mut MapperContext<'_>,
        parent_type: &str,
        field: &MetaInputValue,
    ) -> Option<MetaInputValue> {
        let directive = field.directive(&self.directive_name)?;
        let return_id_only = self.return_id_only(directive);

        // Only a scalar wrapped in one of the four supported shapes is
        // rewritten; anything else is left for the host's own validation.
        let shape = field.ty.scalar_shape()?;
        let original_scalar = ctx.lookup_scalar(shape.named_type())?;

        let scalar_name = decodable_scalar_name(&original_scalar.name);
        match self.wrapped_scalars.get(&scalar_name) {
            Some(existing) if *existing != return_id_only => {
                ctx.report_error(
                    format!("{parent_type}.{}", field.name),
                    format!(
                        "The `{scalar_name}` scalar already decodes with {RETURN_ID_ONLY_ARGUMENT}: {existing}, it cannot also decode with {RETURN_ID_ONLY_ARGUMENT}: {return_id_only}"
                    ),
                );
                return None;
            }
            Some(_) => {}
            None => {
                let scalar = decoded_scalar(original_scalar, return_id_only);
                ctx.register_type(scalar);
                self.wrapped_scalars.insert(scalar_name.clone(), return_id_only);
            }
        }

        let mut replacement = field.clone();
        replacement.ty = shape.with_named_type(&scalar_name);
        Some(replacement)
    }
}

#[cfg(test)]
mod tests {
    use global_id_registry::{DirectiveInstance, Error, InputObjectType, ObjectType, ScalarType};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn decode_directive() -> DirectiveInstance {
        DirectiveInstance::new(GLOBAL_ID_DECODE_DIRECTIVE)
    }

    /// A resolver echoing the argument it receives, so tests can observe what
    /// the wrapping rewrote.
    fn echo_resolver(argument: &'static str) -> global_id_registry::ResolverFn {
        Arc::new(move |ctx: ResolverContext| {
            let value = ctx.arg(argument).cloned().unwrap_or(serde_json::Value::Null);
            async move { Ok(value) }.boxed()
        })
    }

    fn transformed_user_field(argument: MetaInputValue) -> MetaField {
        let mut registry = Registry::new();
        registry.insert_type(
            ObjectType::new("Query").with_field(
                MetaField::new("user", "User")
                    .with_argument(argument)
                    .with_resolver(echo_resolver("id")),
            ),
        );

        let registry = GlobalIdDecode::default().transform(registry).unwrap();
        registry
            .lookup_type("Query")
            .unwrap()
            .object()
            .unwrap()
            .field("user")
            .unwrap()
            .clone()
    }

    #[test]
    fn test_directive_sdl() {
        insta::assert_snapshot!(
            GlobalIdDecode::default().directives(),
            @"directive @globalIdDecode(returnIdOnly: Boolean = true) on FIELD_DEFINITION | ARGUMENT_DEFINITION | INPUT_FIELD_DEFINITION"
        );
    }

    #[tokio::test]
    async fn test_tagged_argument_is_rewritten_to_the_raw_id() {
        let field = transformed_user_field(MetaInputValue::new("id", "ID!").with_directive(decode_directive()));

        let resolved = field
            .resolve(ResolverContext::new(json!({})).with_arg("id", "NDI6VXNlcg"))
            .await;
        assert_eq!(resolved, Ok(json!("42")));
    }

    #[tokio::test]
    async fn test_return_id_only_false_substitutes_the_serialized_pair() {
        let field = transformed_user_field(
            MetaInputValue::new("id", "ID!")
                .with_directive(decode_directive().with_argument(RETURN_ID_ONLY_ARGUMENT, false)),
        );

        let resolved = field
            .resolve(ResolverContext::new(json!({})).with_arg("id", "NDI6VXNlcg"))
            .await;
        assert_eq!(resolved, Ok(json!(r#"{"id":"42","typeName":"User"}"#)));
    }

    #[tokio::test]
    async fn test_absent_argument_stays_absent() {
        let field = transformed_user_field(MetaInputValue::new("id", "ID").with_directive(decode_directive()));

        let resolved = field.resolve(ResolverContext::new(json!({}))).await;
        assert_eq!(resolved, Ok(serde_json::Value::Null));
    }

    #[tokio::test]
    async fn test_malformed_token_argument_fails_naming_the_token() {
        let field = transformed_user_field(MetaInputValue::new("id", "ID!").with_directive(decode_directive()));

        let resolved = field
            .resolve(ResolverContext::new(json!({})).with_arg("id", "not-valid-base64!!"))
            .await;
        assert_eq!(resolved, Err(Error::new("Invalid global ID: not-valid-base64!!")));
    }

    #[tokio::test]
    async fn test_non_string_argument_fails_with_the_wrong_shape_error() {
        let field = transformed_user_field(MetaInputValue::new("id", "ID!").with_directive(decode_directive()));

        let resolved = field
            .resolve(ResolverContext::new(json!({})).with_arg("id", 42))
            .await;
        assert_eq!(resolved, Err(Error::new("Global ID must be a string")));
    }

    #[tokio::test]
    async fn test_untagged_arguments_pass_through_raw() {
        let mut registry = Registry::new();
        registry.insert_type(
            ObjectType::new("Query").with_field(
                MetaField::new("user", "User")
                    .with_argument(MetaInputValue::new("id", "ID!").with_directive(decode_directive()))
                    .with_argument(MetaInputValue::new("version", "Int"))
                    .with_resolver(echo_resolver("version")),
            ),
        );

        let registry = GlobalIdDecode::default().transform(registry).unwrap();
        let field = registry.lookup_type("Query").unwrap().object().unwrap().field("user").unwrap();

        let resolved = field
            .resolve(
                ResolverContext::new(json!({}))
                    .with_arg("id", "NDI6VXNlcg")
                    .with_arg("version", 3),
            )
            .await;
        assert_eq!(resolved, Ok(json!(3)));
    }

    #[tokio::test]
    async fn test_field_without_tagged_arguments_is_unchanged() {
        let field = transformed_user_field(MetaInputValue::new("id", "ID!"));

        let resolved = field
            .resolve(ResolverContext::new(json!({})).with_arg("id", "NDI6VXNlcg"))
            .await;
        assert_eq!(resolved, Ok(json!("NDI6VXNlcg")));
    }

    fn filter_registry(input_field: MetaInputValue) -> Registry {
        let mut registry = Registry::new();
        registry.insert_type(ScalarType::new("ID"));
        registry.insert_type(InputObjectType::new("UserFilter").with_input_field(input_field));
        registry
    }

    fn transformed_filter_field(registry: &Registry, name: &str) -> MetaInputValue {
        registry
            .lookup_type("UserFilter")
            .unwrap()
            .input_object()
            .unwrap()
            .input_field(name)
            .unwrap()
            .clone()
    }

    #[test]
    fn test_tagged_input_field_gets_a_decodable_scalar() {
        let registry = filter_registry(MetaInputValue::new("id", "ID!").with_directive(decode_directive()));
        let registry = GlobalIdDecode::default().transform(registry).unwrap();

        assert_eq!(transformed_filter_field(&registry, "id").ty.as_str(), "DecodableID!");

        let scalar = registry.lookup_scalar("DecodableID").unwrap();
        assert_eq!(scalar.parse_value(json!("NDI6VXNlcg")), Ok(json!("42")));
    }

    #[test]
    fn test_decodable_scalar_honours_return_id_only_false() {
        let registry = filter_registry(
            MetaInputValue::new("id", "ID")
                .with_directive(decode_directive().with_argument(RETURN_ID_ONLY_ARGUMENT, false)),
        );
        let registry = GlobalIdDecode::default().transform(registry).unwrap();

        let scalar = registry.lookup_scalar("DecodableID").unwrap();
        assert_eq!(
            scalar.parse_value(json!("NDI6VXNlcg")),
            Ok(json!(r#"{"id":"42","typeName":"User"}"#))
        );
    }

    #[test]
    fn test_decodable_scalar_error_contract() {
        let registry = filter_registry(MetaInputValue::new("id", "ID!").with_directive(decode_directive()));
        let registry = GlobalIdDecode::default().transform(registry).unwrap();
        let scalar = registry.lookup_scalar("DecodableID").unwrap();

        assert_eq!(
            scalar.parse_value(json!("not-valid-base64!!")),
            Err(Error::new("Invalid global ID: not-valid-base64!!"))
        );
        assert_eq!(scalar.parse_value(json!(42)), Err(Error::new("Global ID must be a string")));
    }

    #[test]
    fn test_wrapping_preserves_list_structure() {
        let registry = filter_registry(MetaInputValue::new("ids", "[ID]!").with_directive(decode_directive()));
        let registry = GlobalIdDecode::default().transform(registry).unwrap();

        assert_eq!(transformed_filter_field(&registry, "ids").ty.as_str(), "[DecodableID]!");
    }

    #[test]
    fn test_unsupported_shapes_are_left_alone() {
        let registry = filter_registry(MetaInputValue::new("ids", "[ID!]").with_directive(decode_directive()));
        let registry = GlobalIdDecode::default().transform(registry).unwrap();

        assert_eq!(transformed_filter_field(&registry, "ids").ty.as_str(), "[ID!]");
        assert!(registry.lookup_scalar("DecodableID").is_none());
    }

    #[test]
    fn test_non_scalar_input_fields_are_left_alone() {
        let mut registry = Registry::new();
        registry.insert_type(
            InputObjectType::new("UserFilter")
                .with_input_field(MetaInputValue::new("nested", "NestedFilter").with_directive(decode_directive())),
        );
        registry.insert_type(InputObjectType::new("NestedFilter").with_input_field(MetaInputValue::new("id", "ID")));

        let registry = GlobalIdDecode::default().transform(registry).unwrap();
        assert_eq!(transformed_filter_field(&registry, "nested").ty.as_str(), "NestedFilter");
    }

    #[test]
    fn test_shared_base_scalar_is_wrapped_once() {
        let mut registry = Registry::new();
        registry.insert_type(ScalarType::new("ID"));
        registry.insert_type(
            InputObjectType::new("UserFilter")
                .with_input_field(MetaInputValue::new("id", "ID!").with_directive(decode_directive()))
                .with_input_field(MetaInputValue::new("friend", "ID").with_directive(decode_directive())),
        );

        let registry = GlobalIdDecode::default().transform(registry).unwrap();

        assert_eq!(transformed_filter_field(&registry, "id").ty.as_str(), "DecodableID!");
        assert_eq!(transformed_filter_field(&registry, "friend").ty.as_str(), "DecodableID");
        assert!(registry.lookup_scalar("DecodableID").is_some());
    }

    #[test]
    fn test_conflicting_return_id_only_on_a_shared_scalar_is_a_rule_error() {
        let mut registry = Registry::new();
        registry.insert_type(ScalarType::new("ID"));
        registry.insert_type(
            InputObjectType::new("UserFilter")
                .with_input_field(MetaInputValue::new("id", "ID!").with_directive(decode_directive()))
                .with_input_field(
                    MetaInputValue::new("friend", "ID")
                        .with_directive(decode_directive().with_argument(RETURN_ID_ONLY_ARGUMENT, false)),
                ),
        );

        let err = GlobalIdDecode::default().transform(registry).unwrap_err();
        let TransformError::Validation(errors) = err;
        assert_eq!(
            errors[0].to_string(),
            "[UserFilter.friend] The `DecodableID` scalar already decodes with returnIdOnly: true, it cannot also decode with returnIdOnly: false"
        );
    }

    #[test]
    fn test_definition_matches_sdl() {
        let definition = GlobalIdDecode::default().definition();
        assert_eq!(definition.name, GLOBAL_ID_DECODE_DIRECTIVE);
        assert_eq!(
            definition.locations,
            vec![
                DirectiveLocation::FieldDefinition,
                DirectiveLocation::ArgumentDefinition,
                DirectiveLocation::InputFieldDefinition,
            ]
        );
        assert_eq!(definition.args[RETURN_ID_ONLY_ARGUMENT].default_value, Some(json!(true)));
    }
}
