use std::fmt::Display;

/// A GraphQL type string such as `"ID!"`, `"[String]"` or `"[User]!"`.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq)]
pub struct MetaFieldType(String);

impl MetaFieldType {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The type name with all list/non-null wrappers stripped.
    pub fn named_type(&self) -> &str {
        self.0.trim_start_matches('[').trim_end_matches(['!', ']'])
    }

    pub fn is_non_null(&self) -> bool {
        self.0.ends_with('!')
    }

    pub fn is_list(&self) -> bool {
        self.0.starts_with('[')
    }

    /// Classifies the type into one of the four wrappings around a bare named
    /// type that declared-type decoding supports. Anything else, e.g. a list
    /// of non-null items or a nested list, yields `None`.
    pub fn scalar_shape(&self) -> Option<ScalarShape<'_>> {
        fn bare(name: &str) -> Option<&str> {
            (!name.is_empty() && !name.contains(['[', ']', '!'])).then_some(name)
        }

        let ty = self.0.as_str();
        if let Some(rest) = ty.strip_prefix('[') {
            if let Some(inner) = rest.strip_suffix("]!") {
                bare(inner).map(ScalarShape::NonNullList)
            } else {
                bare(rest.strip_suffix(']')?).map(ScalarShape::List)
            }
        } else if let Some(inner) = ty.strip_suffix('!') {
            bare(inner).map(ScalarShape::NonNull)
        } else {
            bare(ty).map(ScalarShape::Named)
        }
    }
}

impl Display for MetaFieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MetaFieldType {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for MetaFieldType {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One of the four supported wrappings of a named scalar type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScalarShape<'a> {
    /// `Name`
    Named(&'a str),
    /// `Name!`
    NonNull(&'a str),
    /// `[Name]`
    List(&'a str),
    /// `[Name]!`
    NonNullList(&'a str),
}

impl ScalarShape<'_> {
    pub fn named_type(&self) -> &str {
        match self {
            Self::Named(name) | Self::NonNull(name) | Self::List(name) | Self::NonNullList(name) => name,
        }
    }

    /// Rebuilds the identical wrapping around a different named type.
    pub fn with_named_type(&self, name: &str) -> MetaFieldType {
        match self {
            Self::Named(_) => name.into(),
            Self::NonNull(_) => format!("{name}!").into(),
            Self::List(_) => format!("[{name}]").into(),
            Self::NonNullList(_) => format!("[{name}]!").into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_named_type_strips_wrappers() {
        assert_eq!(MetaFieldType::from("ID").named_type(), "ID");
        assert_eq!(MetaFieldType::from("ID!").named_type(), "ID");
        assert_eq!(MetaFieldType::from("[String]").named_type(), "String");
        assert_eq!(MetaFieldType::from("[String!]!").named_type(), "String");
    }

    #[test]
    fn test_supported_scalar_shapes() {
        assert_eq!(MetaFieldType::from("ID").scalar_shape(), Some(ScalarShape::Named("ID")));
        assert_eq!(MetaFieldType::from("ID!").scalar_shape(), Some(ScalarShape::NonNull("ID")));
        assert_eq!(
            MetaFieldType::from("[ID]").scalar_shape(),
            Some(ScalarShape::List("ID"))
        );
        assert_eq!(
            MetaFieldType::from("[ID]!").scalar_shape(),
            Some(ScalarShape::NonNullList("ID"))
        );
    }

    #[test]
    fn test_unsupported_scalar_shapes() {
        assert_eq!(MetaFieldType::from("[ID!]").scalar_shape(), None);
        assert_eq!(MetaFieldType::from("[ID!]!").scalar_shape(), None);
        assert_eq!(MetaFieldType::from("[[ID]]").scalar_shape(), None);
        assert_eq!(MetaFieldType::from("").scalar_shape(), None);
    }

    #[test]
    fn test_rebuild_preserves_wrapping() {
        for (ty, expected) in [
            ("ID", "DecodableID"),
            ("ID!", "DecodableID!"),
            ("[ID]", "[DecodableID]"),
            ("[ID]!", "[DecodableID]!"),
        ] {
            let field_type = MetaFieldType::from(ty);
            let shape = field_type.scalar_shape().unwrap();
            assert_eq!(shape.with_named_type("DecodableID").as_str(), expected);
        }
    }
}
