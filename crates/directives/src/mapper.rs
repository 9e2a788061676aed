//! The schema-rebuilding pass the directive rules plug into.
//!
//! A [`SchemaMapper`] is an explicit visitor over the registry with one visit
//! function per entity kind. Each visit returns `None` for "unchanged" or
//! `Some` replacement; [`map_schema`] walks every entity exactly once, in
//! deterministic order, and applies the collected replacements and newly
//! registered types afterwards. Mappers compose through [`MapperNil`] /
//! [`MapperCons`] so several rules run in a single pass and their directive
//! declarations concatenate.

use std::fmt::{self, Display, Formatter};

use global_id_registry::{MetaField, MetaInputValue, MetaType, Registry, ScalarType};

pub trait SchemaMapper {
    /// The directive-declaration SDL fragment to merge into the schema's
    /// textual definition.
    fn directives(&self) -> String {
        String::new()
    }

    fn map_object_field(
        &mut self,
        _ctx: &mut MapperContext<'_>,
        _parent_type: &str,
        _field: &MetaField,
    ) -> Option<MetaField> {
        None
    }

    fn map_argument(
        &mut self,
        _ctx: &mut MapperContext<'_>,
        _parent_type: &str,
        _field_name: &str,
        _argument: &MetaInputValue,
    ) -> Option<MetaInputValue> {
        None
    }

    fn map_input_field(
        &mut self,
        _ctx: &mut MapperContext<'_>,
        _parent_type: &str,
        _field: &MetaInputValue,
    ) -> Option<MetaInputValue> {
        None
    }
}

/// Empty mapper
pub struct MapperNil;

impl MapperNil {
    pub const fn with<M>(self, mapper: M) -> MapperCons<M, Self> {
        MapperCons(mapper, self)
    }
}

/// Concat mapper
pub struct MapperCons<A, B>(A, B);

impl<A, B> MapperCons<A, B> {
    pub const fn with<M>(self, mapper: M) -> MapperCons<M, Self> {
        MapperCons(mapper, self)
    }
}

impl SchemaMapper for MapperNil {}

/// The monoid implementation for SchemaMapper: the first mapper's replacement
/// feeds the second, so rules stack on the same entity.
impl<A, B> SchemaMapper for MapperCons<A, B>
where
    A: SchemaMapper,
    B: SchemaMapper,
{
    fn directives(&self) -> String {
        format!("{}\n{}", self.0.directives(), self.1.directives())
    }

    fn map_object_field(
        &mut self,
        ctx: &mut MapperContext<'_>,
        parent_type: &str,
        field: &MetaField,
    ) -> Option<MetaField> {
        match self.0.map_object_field(ctx, parent_type, field) {
            Some(replacement) => Some(
                self.1
                    .map_object_field(ctx, parent_type, &replacement)
                    .unwrap_or(replacement),
            ),
            None => self.1.map_object_field(ctx, parent_type, field),
        }
    }

    fn map_argument(
        &mut self,
        ctx: &mut MapperContext<'_>,
        parent_type: &str,
        field_name: &str,
        argument: &MetaInputValue,
    ) -> Option<MetaInputValue> {
        match self.0.map_argument(ctx, parent_type, field_name, argument) {
            Some(replacement) => Some(
                self.1
                    .map_argument(ctx, parent_type, field_name, &replacement)
                    .unwrap_or(replacement),
            ),
            None => self.1.map_argument(ctx, parent_type, field_name, argument),
        }
    }

    fn map_input_field(
        &mut self,
        ctx: &mut MapperContext<'_>,
        parent_type: &str,
        field: &MetaInputValue,
    ) -> Option<MetaInputValue> {
        match self.0.map_input_field(ctx, parent_type, field) {
            Some(replacement) => Some(
                self.1
                    .map_input_field(ctx, parent_type, &replacement)
                    .unwrap_or(replacement),
            ),
            None => self.1.map_input_field(ctx, parent_type, field),
        }
    }
}

/// What a mapper sees while the schema is walked: the pre-transform registry
/// for lookups, the errors reported so far, and the types registered during
/// mapping (applied after the walk).
pub struct MapperContext<'a> {
    pub registry: &'a Registry,
    pub(crate) errors: Vec<RuleError>,
    pub(crate) pending_types: Vec<MetaType>,
}

impl<'a> MapperContext<'a> {
    pub(crate) fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            errors: Vec::new(),
            pending_types: Vec::new(),
        }
    }

    pub fn report_error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(RuleError::new(path, message));
    }

    pub fn register_type(&mut self, ty: impl Into<MetaType>) {
        self.pending_types.push(ty.into());
    }

    pub fn lookup_scalar(&self, name: &str) -> Option<&'a ScalarType> {
        self.registry.lookup_scalar(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleError {
    pub path: String,
    pub message: String,
}

impl RuleError {
    pub(crate) fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl Display for RuleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.path, self.message)
    }
}

enum Replacement {
    ObjectField {
        type_name: String,
        field_name: String,
        field: MetaField,
    },
    InputField {
        type_name: String,
        field_name: String,
        field: MetaInputValue,
    },
}

/// Walks every object field, argument and input field of the registry through
/// the mapper once and rebuilds the registry with the replacements applied.
/// Reported rule errors abort the transform.
pub fn map_schema<M: SchemaMapper>(registry: Registry, mapper: &mut M) -> Result<Registry, Vec<RuleError>> {
    let snapshot = registry.clone();
    let mut ctx = MapperContext::new(&snapshot);
    let mut replacements = Vec::new();

    for ty in snapshot.types.values() {
        match ty {
            MetaType::Object(object) => {
                for field in object.fields.values() {
                    let mut with_mapped_args: Option<MetaField> = None;
                    for argument in field.args.values() {
                        if let Some(replacement) = mapper.map_argument(&mut ctx, &object.name, &field.name, argument) {
                            with_mapped_args
                                .get_or_insert_with(|| field.clone())
                                .args
                                .insert(argument.name.clone(), replacement);
                        }
                    }

                    let base = with_mapped_args.as_ref().unwrap_or(field);
                    match mapper.map_object_field(&mut ctx, &object.name, base) {
                        Some(replacement) => replacements.push(Replacement::ObjectField {
                            type_name: object.name.clone(),
                            field_name: field.name.clone(),
                            field: replacement,
                        }),
                        None => {
                            if let Some(replacement) = with_mapped_args {
                                replacements.push(Replacement::ObjectField {
                                    type_name: object.name.clone(),
                                    field_name: field.name.clone(),
                                    field: replacement,
                                });
                            }
                        }
                    }
                }
            }
            MetaType::InputObject(input_object) => {
                for field in input_object.input_fields.values() {
                    if let Some(replacement) = mapper.map_input_field(&mut ctx, &input_object.name, field) {
                        replacements.push(Replacement::InputField {
                            type_name: input_object.name.clone(),
                            field_name: field.name.clone(),
                            field: replacement,
                        });
                    }
                }
            }
            MetaType::Scalar(_) => {}
        }
    }

    if !ctx.errors.is_empty() {
        return Err(ctx.errors);
    }

    let mut registry = registry;
    for ty in ctx.pending_types {
        if registry.lookup_type(ty.name()).is_none() {
            tracing::debug!("registering type {} created during schema mapping", ty.name());
            registry.insert_type(ty);
        }
    }

    for replacement in replacements {
        match replacement {
            Replacement::ObjectField {
                type_name,
                field_name,
                field,
            } => {
                if let Some(MetaType::Object(object)) = registry.types.get_mut(&type_name) {
                    tracing::debug!("replacing field {type_name}.{field_name}");
                    object.fields.insert(field_name, field);
                }
            }
            Replacement::InputField {
                type_name,
                field_name,
                field,
            } => {
                if let Some(MetaType::InputObject(input_object)) = registry.types.get_mut(&type_name) {
                    tracing::debug!("replacing input field {type_name}.{field_name}");
                    input_object.input_fields.insert(field_name, field);
                }
            }
        }
    }

    Ok(registry)
}
