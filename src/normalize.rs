//! Canonical key form for response documents.
//!
//! Gateway responses are opaque JSON documents. Before they reach the caller
//! every mapping key, at any depth, is rewritten to lowerCamelCase so that a
//! document never mixes key styles.

use std::collections::HashSet;

use serde_json::{Map, Value};

/// Recursively rewrites every mapping key to canonical form.
///
/// Sequences keep their length and order, scalars pass through unchanged.
/// No entry is ever dropped. A key whose canonical form is already present in
/// the same mapping keeps its original spelling. Applying it twice yields the
/// same document as applying it once.
pub fn normalize_keys(document: Value) -> Value {
    match document {
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_keys).collect()),
        Value::Object(map) => Value::Object(normalize_mapping(map)),
        scalar => scalar,
    }
}

/// Rewrites the keys of one mapping, keeping its arity and order.
///
/// A key is only rewritten when its canonical form is not already taken in
/// the mapping, by an original key or an earlier rewrite. Otherwise it is
/// kept verbatim, so `{"card_type", "cardType"}`
/// stays two entries.
fn normalize_mapping(map: Map<String, Value>) -> Map<String, Value> {
    let mut taken: HashSet<String> = map.keys().cloned().collect();
    map.into_iter()
        .map(|(key, value)| {
            let canonical = canonical_key(&key);
            let key = if canonical == key || !taken.insert(canonical.clone()) {
                key
            } else {
                canonical
            };
            (key, normalize_keys(value))
        })
        .collect()
}

/// Converts a single key to lowerCamelCase.
///
/// `merchant_customer_id`, `merchant-customer-id`, `MerchantCustomerId` all
/// become `merchantCustomerId`. Keys already in canonical form are returned
/// as-is, and keys made only of separators are left alone.
pub fn canonical_key(key: &str) -> String {
    if is_canonical(key) {
        return key.to_string();
    }

    let mut segments = key
        .split(is_separator)
        .filter(|segment| !segment.is_empty());

    let Some(first) = segments.next() else {
        return key.to_string();
    };

    let mut out = String::with_capacity(key.len());
    push_with_first(&mut out, &fold_acronym(first), |c| c.to_lowercase().collect());
    for segment in segments {
        push_with_first(&mut out, &fold_acronym(segment), |c| {
            c.to_uppercase().collect()
        });
    }
    out
}

/// `AVS` reads as one word: `AVS_RESPONSE` becomes `avsResponse`.
fn fold_acronym(segment: &str) -> String {
    if segment.chars().any(char::is_lowercase) {
        segment.to_string()
    } else {
        segment.to_lowercase()
    }
}

fn is_separator(c: char) -> bool {
    matches!(c, '_' | '-' | ' ')
}

fn is_canonical(key: &str) -> bool {
    !key.contains(is_separator) && !key.starts_with(|c: char| c.is_uppercase())
}

fn push_with_first(out: &mut String, segment: &str, first: impl Fn(char) -> String) {
    let mut chars = segment.chars();
    if let Some(c) = chars.next() {
        out.push_str(&first(c));
        out.push_str(chars.as_str());
    }
}
