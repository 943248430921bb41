use std::collections::HashMap;

/// A JSON document as returned by the gateway.
///
/// After [`normalize_keys`](crate::normalize::normalize_keys) every mapping
/// key in it is in canonical form.
pub type Document = serde_json::Value;

pub type Record<V> = HashMap<String, V>;
