use std::fmt::Display;

use indexmap::IndexMap;

use crate::MetaInputValue;

/// The declaration of a directive, as registered on a [`crate::Registry`].
#[derive(Clone, Debug)]
pub struct MetaDirective {
    pub name: String,
    pub description: Option<String>,
    pub locations: Vec<DirectiveLocation>,
    pub args: IndexMap<String, MetaInputValue>,
    pub is_repeatable: bool,
}

impl MetaDirective {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            locations: Vec::new(),
            args: Default::default(),
            is_repeatable: false,
        }
    }

    pub fn with_location(mut self, location: DirectiveLocation) -> Self {
        self.locations.push(location);
        self
    }

    pub fn with_argument(mut self, argument: MetaInputValue) -> Self {
        self.args.insert(argument.name.clone(), argument);
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirectiveLocation {
    FieldDefinition,
    ArgumentDefinition,
    InputFieldDefinition,
}

impl Display for DirectiveLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::FieldDefinition => "FIELD_DEFINITION",
            Self::ArgumentDefinition => "ARGUMENT_DEFINITION",
            Self::InputFieldDefinition => "INPUT_FIELD_DEFINITION",
        };
        write!(f, "{name}")
    }
}

/// A directive occurrence on a field, argument or input field, carrying its
/// arguments as plain JSON values. Read once when a transformer visits the
/// entity, never mutated afterwards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DirectiveInstance {
    pub name: String,
    pub args: IndexMap<String, serde_json::Value>,
}

impl DirectiveInstance {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Default::default(),
        }
    }

    pub fn with_argument(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.args.insert(name.into(), value.into());
        self
    }

    pub fn argument(&self, name: &str) -> Option<&serde_json::Value> {
        self.args.get(name)
    }

    pub fn string_argument(&self, name: &str) -> Option<&str> {
        self.argument(name).and_then(serde_json::Value::as_str)
    }

    pub fn bool_argument(&self, name: &str) -> Option<bool> {
        self.argument(name).and_then(serde_json::Value::as_bool)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_typed_argument_accessors() {
        let directive = DirectiveInstance::new("globalIdDecode")
            .with_argument("returnIdOnly", false)
            .with_argument("typeName", "User");

        assert_eq!(directive.bool_argument("returnIdOnly"), Some(false));
        assert_eq!(directive.string_argument("typeName"), Some("User"));
        assert_eq!(directive.string_argument("returnIdOnly"), None);
        assert_eq!(directive.argument("missing"), None);
    }

    #[test]
    fn test_location_rendering() {
        assert_eq!(DirectiveLocation::FieldDefinition.to_string(), "FIELD_DEFINITION");
        assert_eq!(
            DirectiveLocation::InputFieldDefinition.to_string(),
            "INPUT_FIELD_DEFINITION"
        );
    }
}
