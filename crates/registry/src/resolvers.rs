//! Dynamic field resolution.
//!
//! A resolver is the value-producing step of a single field: an asynchronous
//! function from the invocation context to a JSON value. Resolvers are plain
//! `Arc`ed closures so schema transformers can capture a field's original
//! resolver and install a wrapping replacement. The context owns its data,
//! which keeps every invocation independent and makes concurrent execution of
//! wrapped resolvers safe by construction.

use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use indexmap::IndexMap;

use crate::Error;

pub type ResolverFn =
    Arc<dyn Fn(ResolverContext) -> BoxFuture<'static, Result<serde_json::Value, Error>> + Send + Sync>;

/// The per-invocation inputs of a resolver: the parent object's value and the
/// caller-supplied arguments.
#[derive(Clone, Debug, Default)]
pub struct ResolverContext {
    pub parent: serde_json::Value,
    pub args: IndexMap<String, serde_json::Value>,
}

impl ResolverContext {
    pub fn new(parent: serde_json::Value) -> Self {
        Self {
            parent,
            args: Default::default(),
        }
    }

    pub fn with_arg(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.args.insert(name.into(), value.into());
        self
    }

    pub fn arg(&self, name: &str) -> Option<&serde_json::Value> {
        self.args.get(name)
    }
}

/// Builds a resolver returning the parent object's property of the given
/// name, or `Value::Null` when the parent has no such property or is not an
/// object.
pub fn default_field_resolver(property: impl Into<String>) -> ResolverFn {
    let property = property.into();
    Arc::new(move |ctx: ResolverContext| {
        let value = match ctx.parent {
            serde_json::Value::Object(ref object) => object.get(&property).cloned().unwrap_or(serde_json::Value::Null),
            _ => serde_json::Value::Null,
        };
        async move { Ok(value) }.boxed()
    })
}
