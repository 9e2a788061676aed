use std::sync::Arc;

use indexmap::IndexMap;

use crate::{Error, MetaField, MetaInputValue};

#[derive(Clone, Debug)]
pub enum MetaType {
    Object(ObjectType),
    InputObject(InputObjectType),
    Scalar(ScalarType),
}

impl MetaType {
    pub fn name(&self) -> &str {
        match self {
            Self::Object(object) => &object.name,
            Self::InputObject(input_object) => &input_object.name,
            Self::Scalar(scalar) => &scalar.name,
        }
    }

    pub fn object(&self) -> Option<&ObjectType> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn input_object(&self) -> Option<&InputObjectType> {
        match self {
            Self::InputObject(input_object) => Some(input_object),
            _ => None,
        }
    }

    pub fn scalar(&self) -> Option<&ScalarType> {
        match self {
            Self::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }
}

impl From<ObjectType> for MetaType {
    fn from(object: ObjectType) -> Self {
        Self::Object(object)
    }
}

impl From<InputObjectType> for MetaType {
    fn from(input_object: InputObjectType) -> Self {
        Self::InputObject(input_object)
    }
}

impl From<ScalarType> for MetaType {
    fn from(scalar: ScalarType) -> Self {
        Self::Scalar(scalar)
    }
}

#[derive(Clone, Debug, Default)]
pub struct ObjectType {
    pub name: String,
    pub description: Option<String>,
    pub fields: IndexMap<String, MetaField>,
}

impl ObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_field(mut self, field: MetaField) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    pub fn field(&self, name: &str) -> Option<&MetaField> {
        self.fields.get(name)
    }
}

#[derive(Clone, Debug, Default)]
pub struct InputObjectType {
    pub name: String,
    pub description: Option<String>,
    pub input_fields: IndexMap<String, MetaInputValue>,
}

impl InputObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_input_field(mut self, field: MetaInputValue) -> Self {
        self.input_fields.insert(field.name.clone(), field);
        self
    }

    pub fn input_field(&self, name: &str) -> Option<&MetaInputValue> {
        self.input_fields.get(name)
    }
}

pub type ScalarParser = Arc<dyn Fn(serde_json::Value) -> Result<serde_json::Value, Error> + Send + Sync>;

/// A scalar type together with its input-parsing function. A scalar with no
/// parser accepts any value unchanged.
#[derive(Clone, Default)]
pub struct ScalarType {
    pub name: String,
    pub description: Option<String>,
    pub parse: Option<ScalarParser>,
}

impl ScalarType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_parser(mut self, parser: ScalarParser) -> Self {
        self.parse = Some(parser);
        self
    }

    /// Runs the scalar's input-parsing function over an incoming value.
    pub fn parse_value(&self, value: serde_json::Value) -> Result<serde_json::Value, Error> {
        match &self.parse {
            Some(parse) => parse(value),
            None => Ok(value),
        }
    }
}

impl std::fmt::Debug for ScalarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScalarType")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parse", &self.parse.as_ref().map(|_| ".."))
            .finish()
    }
}
