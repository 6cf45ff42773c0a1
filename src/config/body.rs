//! HCL body decoding
//!
//! Turns an HCL document into a JSON value tree that the typed configuration
//! model can deserialize. Attributes are evaluated as constant expressions.
//! Block labels become nested object keys, so `plugin "docker" { ... }`
//! decodes to `{"plugin": {"docker": {...}}}`. Repeated blocks with the same
//! identifier are deep-merged with later values winning. Quoted attribute
//! keys from HCL1-era files are accepted and keep their original spelling.

use hcl::eval::{Context, Evaluate};
use hcl::{Body, Structure};
use serde_json::{Map, Value};
use std::path::Path;

use super::compat;
use super::merge::merge_value;
use crate::error::LoadError;

/// Parse and decode an HCL document read from `path`.
pub fn decode(input: &str, path: &Path) -> Result<Value, LoadError> {
    let source = compat::rewrite_quoted_keys(input);
    let body = hcl::parse(&source)
        .map_err(|source| LoadError::Syntax { path: path.to_path_buf(), source })?;
    let ctx = Context::new();
    decode_body(&body, &ctx, path, "").map(Value::Object)
}

fn decode_body(
    body: &Body,
    ctx: &Context,
    path: &Path,
    scope: &str,
) -> Result<Map<String, Value>, LoadError> {
    let mut map = Map::new();

    for structure in body.iter() {
        match structure {
            Structure::Attribute(attr) => {
                let key = compat::restore_key(attr.key());
                let value = attr.expr().evaluate(ctx).map_err(|source| LoadError::Eval {
                    path: path.to_path_buf(),
                    key: qualified(scope, &key),
                    source,
                })?;
                map.insert(key.into_owned(), to_json(value));
            }
            Structure::Block(block) => {
                let ident = block.identifier();
                let inner_scope = qualified(scope, ident);
                let mut value = Value::Object(decode_body(block.body(), ctx, path, &inner_scope)?);
                for label in block.labels().iter().rev() {
                    let mut wrapper = Map::new();
                    wrapper.insert(label.as_str().to_string(), value);
                    value = Value::Object(wrapper);
                }
                match map.get_mut(ident) {
                    Some(existing) => merge_value(existing, value),
                    None => {
                        map.insert(ident.to_string(), value);
                    }
                }
            }
        }
    }

    Ok(map)
}

fn qualified(scope: &str, key: &str) -> String {
    if scope.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", scope, key)
    }
}

fn to_json(value: hcl::Value) -> Value {
    match value {
        hcl::Value::Null => Value::Null,
        hcl::Value::Bool(b) => Value::Bool(b),
        hcl::Value::Number(n) => number_to_json(&n),
        hcl::Value::String(s) => Value::String(s),
        hcl::Value::Array(items) => Value::Array(items.into_iter().map(to_json).collect()),
        hcl::Value::Object(entries) => Value::Object(
            entries
                .into_iter()
                .map(|(k, v)| (compat::restore_key(&k).into_owned(), to_json(v)))
                .collect(),
        ),
    }
}

fn number_to_json(n: &hcl::Number) -> Value {
    if let Some(u) = n.as_u64() {
        Value::from(u)
    } else if let Some(i) = n.as_i64() {
        Value::from(i)
    } else {
        n.as_f64().and_then(serde_json::Number::from_f64).map_or(Value::Null, Value::Number)
    }
}
