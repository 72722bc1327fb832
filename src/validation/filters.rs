//! Pre-validation input normalization
//!
//! The numeric rules deliberately refuse to coerce; when the transport hands
//! over stringly or untrimmed data, a [`FilterChain`] normalizes the input
//! before the rules see it. Filters are pure: they produce a new value and
//! never touch the original, and only transform values of the type they
//! target — anything else passes through untouched.

use serde_json::Value;
use std::sync::Arc;

/// Transformation applied to one field's value
#[derive(Clone)]
pub struct Filter {
    field: String,
    apply: Arc<dyn Fn(Value) -> Value + Send + Sync>,
}

impl Filter {
    /// Create a filter for the given dot-path field
    pub fn new(
        field: impl Into<String>,
        apply: impl Fn(Value) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            field: field.into(),
            apply: Arc::new(apply),
        }
    }

    /// The field this filter rewrites
    pub fn field(&self) -> &str {
        &self.field
    }
}

impl std::fmt::Debug for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Filter")
            .field("field", &self.field)
            .finish_non_exhaustive()
    }
}

/// Filter: trim surrounding whitespace from a string
pub fn trim(field: &str) -> Filter {
    Filter::new(field, |value| match value {
        Value::String(s) => Value::String(s.trim().to_string()),
        other => other,
    })
}

/// Filter: lowercase a string (emails, status keywords)
pub fn lowercase(field: &str) -> Filter {
    Filter::new(field, |value| match value {
        Value::String(s) => Value::String(s.to_lowercase()),
        other => other,
    })
}

/// Filter: turn an empty or whitespace-only string into null
///
/// Form posts encode "left blank" as `""`; after this filter the required
/// rule treats both spellings the same way.
pub fn empty_to_null(field: &str) -> Filter {
    Filter::new(field, |value| match value {
        Value::String(s) if s.trim().is_empty() => Value::Null,
        other => other,
    })
}

/// Filter: round a number to the given decimal places (prices)
pub fn round_decimals(field: &str, decimals: u32) -> Filter {
    Filter::new(field, move |value| match value.as_f64() {
        Some(n) => {
            let factor = 10_f64.powi(decimals as i32);
            serde_json::json!((n * factor).round() / factor)
        }
        None => value,
    })
}

/// Per-field filters applied in declaration order
#[derive(Debug, Clone, Default)]
pub struct FilterChain {
    filters: Vec<Filter>,
}

impl FilterChain {
    /// Empty chain
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Append one filter, builder style
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Whether the chain holds no filters
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Apply every filter in order, producing the normalized input
    ///
    /// Fields absent from the input are left alone; filters do not create
    /// fields.
    pub fn apply(&self, input: Value) -> Value {
        let mut current = input;
        for filter in &self.filters {
            if let Some(slot) = lookup_path_mut(&mut current, &filter.field) {
                let old = slot.take();
                *slot = (filter.apply)(old);
            }
        }
        current
    }
}

fn lookup_path_mut<'a>(input: &'a mut Value, path: &str) -> Option<&'a mut Value> {
    let mut current = input;
    for segment in path.split('.') {
        current = current.as_object_mut()?.get_mut(segment)?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // === trim() ===

    #[test]
    fn test_trim_removes_whitespace() {
        let chain = FilterChain::new().filter(trim("title"));
        let out = chain.apply(json!({"title": "  vintage lamp  "}));
        assert_eq!(out, json!({"title": "vintage lamp"}));
    }

    #[test]
    fn test_trim_non_string_passthrough() {
        let chain = FilterChain::new().filter(trim("price"));
        let out = chain.apply(json!({"price": 42}));
        assert_eq!(out, json!({"price": 42}));
    }

    // === lowercase() ===

    #[test]
    fn test_lowercase_converts_string() {
        let chain = FilterChain::new().filter(lowercase("email"));
        let out = chain.apply(json!({"email": "Ana@Example.COM"}));
        assert_eq!(out, json!({"email": "ana@example.com"}));
    }

    // === empty_to_null() ===

    #[test]
    fn test_empty_to_null_blank_string() {
        let chain = FilterChain::new().filter(empty_to_null("note"));
        let out = chain.apply(json!({"note": "   "}));
        assert_eq!(out, json!({"note": null}));
    }

    #[test]
    fn test_empty_to_null_keeps_content() {
        let chain = FilterChain::new().filter(empty_to_null("note"));
        let out = chain.apply(json!({"note": "keep me"}));
        assert_eq!(out, json!({"note": "keep me"}));
    }

    // === round_decimals() ===

    #[test]
    fn test_round_decimals_two_places() {
        let chain = FilterChain::new().filter(round_decimals("price", 2));
        let out = chain.apply(json!({"price": 19.999}));
        assert_eq!(out, json!({"price": 20.0}));
    }

    #[test]
    fn test_round_decimals_non_number_passthrough() {
        let chain = FilterChain::new().filter(round_decimals("price", 2));
        let out = chain.apply(json!({"price": "19.99"}));
        assert_eq!(out, json!({"price": "19.99"}));
    }

    // === FilterChain ===

    #[test]
    fn test_chain_applies_in_order() {
        let chain = FilterChain::new()
            .filter(trim("email"))
            .filter(empty_to_null("email"));
        let out = chain.apply(json!({"email": "   "}));
        assert_eq!(out, json!({"email": null}));
    }

    #[test]
    fn test_chain_nested_field() {
        let chain = FilterChain::new().filter(trim("seller.name"));
        let out = chain.apply(json!({"seller": {"name": " Ana "}}));
        assert_eq!(out, json!({"seller": {"name": "Ana"}}));
    }

    #[test]
    fn test_chain_absent_field_untouched() {
        let chain = FilterChain::new().filter(trim("missing"));
        let input = json!({"title": "lamp"});
        assert_eq!(chain.apply(input.clone()), input);
    }

    #[test]
    fn test_chain_does_not_mutate_original() {
        let chain = FilterChain::new().filter(trim("title"));
        let input = json!({"title": " lamp "});
        let out = chain.apply(input.clone());
        assert_eq!(input, json!({"title": " lamp "}));
        assert_eq!(out, json!({"title": "lamp"}));
    }
}
