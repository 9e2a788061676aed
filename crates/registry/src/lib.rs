use std::collections::{BTreeMap, HashMap};

mod directives;
mod field_types;
mod fields;
mod input_value;
mod resolvers;
mod types;

pub use directives::*;
pub use field_types::*;
pub use fields::*;
pub use input_value::*;
pub use resolvers::*;
pub use types::*;

/// The schema representation the directive transformers walk: types keyed by
/// name, declared directives, and the operation roots.
#[derive(Clone, Debug)]
pub struct Registry {
    pub types: BTreeMap<String, MetaType>,
    pub directives: HashMap<String, MetaDirective>,
    pub query_type: String,
    pub mutation_type: Option<String>,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            types: Default::default(),
            directives: Default::default(),
            query_type: "Query".to_string(),
            mutation_type: None,
        }
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_type(&mut self, ty: impl Into<MetaType>) {
        let ty = ty.into();
        self.types.insert(ty.name().to_string(), ty);
    }

    pub fn lookup_type(&self, name: &str) -> Option<&MetaType> {
        self.types.get(name)
    }

    pub fn lookup_scalar(&self, name: &str) -> Option<&ScalarType> {
        self.lookup_type(name).and_then(MetaType::scalar)
    }

    pub fn add_directive(&mut self, directive: MetaDirective) {
        self.directives.insert(directive.name.clone(), directive);
    }
}

/// A request-time error produced by resolvers and scalar parsers.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    pub message: String,
}

impl Error {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<global_id::GlobalIdError> for Error {
    fn from(err: global_id::GlobalIdError) -> Self {
        Self::new(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_type_lookup() {
        let mut registry = Registry::new();
        registry.insert_type(ScalarType::new("ID"));
        registry.insert_type(ObjectType::new("Query"));

        assert!(registry.lookup_scalar("ID").is_some());
        assert!(registry.lookup_scalar("Query").is_none());
        assert!(registry.lookup_type("Missing").is_none());
    }

    #[test]
    fn test_global_id_error_conversion() {
        let err: Error = global_id::GlobalIdError::InvalidGlobalId("boom".to_string()).into();
        assert_eq!(err.message, "Invalid global ID: boom");
    }
}
