use futures::future::BoxFuture;
use indexmap::IndexMap;

use crate::{
    default_field_resolver, DirectiveInstance, Error, MetaFieldType, MetaInputValue, ResolverContext, ResolverFn,
};

/// An output field definition, carrying its directive occurrences and an
/// optional value-producing resolver. A field with no resolver falls back to
/// looking up its target name as a property of the parent object.
#[derive(Clone, Default)]
pub struct MetaField {
    pub name: String,
    pub mapped_name: Option<String>,
    pub description: Option<String>,
    pub args: IndexMap<String, MetaInputValue>,
    pub ty: MetaFieldType,
    pub directives: Vec<DirectiveInstance>,
    pub resolver: Option<ResolverFn>,
}

impl MetaField {
    pub fn new(name: impl Into<String>, ty: impl Into<MetaFieldType>) -> MetaField {
        MetaField {
            name: name.into(),
            ty: ty.into(),
            ..Default::default()
        }
    }

    pub fn with_resolver(mut self, resolver: ResolverFn) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn with_directive(mut self, directive: DirectiveInstance) -> Self {
        self.directives.push(directive);
        self
    }

    pub fn with_argument(mut self, argument: MetaInputValue) -> Self {
        self.args.insert(argument.name.clone(), argument);
        self
    }

    pub fn target_field_name(&self) -> &str {
        self.mapped_name.as_deref().unwrap_or(&self.name)
    }

    pub fn directive(&self, name: &str) -> Option<&DirectiveInstance> {
        self.directives.iter().find(|directive| directive.name == name)
    }

    /// The field's value-producing function, defaulting to parent-property
    /// lookup. Transformers capture this before installing a replacement.
    pub fn resolver_or_default(&self) -> ResolverFn {
        self.resolver
            .clone()
            .unwrap_or_else(|| default_field_resolver(self.target_field_name()))
    }

    /// Invokes the field's resolver. `Value::Null` is "no value", not an error.
    pub fn resolve(&self, ctx: ResolverContext) -> BoxFuture<'static, Result<serde_json::Value, Error>> {
        self.resolver_or_default()(ctx)
    }
}

impl std::fmt::Debug for MetaField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetaField")
            .field("name", &self.name)
            .field("mapped_name", &self.mapped_name)
            .field("args", &self.args)
            .field("ty", &self.ty)
            .field("directives", &self.directives)
            .field("resolver", &self.resolver.as_ref().map(|_| ".."))
            .finish_non_exhaustive()
    }
}
