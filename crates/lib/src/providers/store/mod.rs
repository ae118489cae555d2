pub mod http;

use crate::{errors::StoreError, types::ContentItem};
use async_trait::async_trait;
use dyn_clone::DynClone;
use serde_json::Value;
use std::fmt::Debug;

/// A trait for the external store that content items are persisted to.
///
/// Implementations issue exactly one create call per invocation and never
/// retry on their own; retrying is a user decision.
#[async_trait]
pub trait ContentStore: Send + Sync + Debug + DynClone {
    /// Persists `item` and returns the store's `data` payload.
    ///
    /// A transport failure, a non-success status or a truthy `error` field in
    /// the response are all reported as `Err`.
    async fn create_record(&self, item: &ContentItem) -> Result<Value, StoreError>;
}

dyn_clone::clone_trait_object!(ContentStore);

/// Interprets the `error` field of a store response the way a JavaScript
/// caller would: `null`, `false`, `0` and `""` mean no error.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_truthy() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("conflict")));
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!({ "code": "23505" })));
        assert!(is_truthy(&json!([])));
    }
}
