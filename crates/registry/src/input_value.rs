use crate::{DirectiveInstance, MetaFieldType};

/// An argument or input-object field definition.
#[derive(Clone, Debug, Default)]
pub struct MetaInputValue {
    pub name: String,
    pub description: Option<String>,
    pub ty: MetaFieldType,
    pub default_value: Option<serde_json::Value>,
    pub directives: Vec<DirectiveInstance>,
}

impl MetaInputValue {
    pub fn new(name: impl Into<String>, ty: impl Into<MetaFieldType>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_default(mut self, value: impl Into<serde_json::Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_directive(mut self, directive: DirectiveInstance) -> Self {
        self.directives.push(directive);
        self
    }

    pub fn directive(&self, name: &str) -> Option<&DirectiveInstance> {
        self.directives.iter().find(|directive| directive.name == name)
    }
}
