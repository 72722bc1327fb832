//! The rule contract: a named, pure predicate over one input field
//!
//! A [`Rule`] holds a field path, an optional flag, and a check closure. It
//! never mutates its input and carries no per-call state, so one instance is
//! safe to share across concurrent requests.

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// One field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Dot-path of the offending field
    pub field: String,

    /// Human-readable description of the violation
    pub message: String,

    /// Machine-readable sub-kind (e.g. `TOO_SHORT`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl FieldError {
    /// Create a field error without a code
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: None,
        }
    }

    /// Attach a machine-readable code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Failure reported by a check closure
///
/// The field name is added by the rule when the violation is turned into a
/// [`FieldError`], so check closures only describe what went wrong.
#[derive(Debug, Clone)]
pub struct Violation {
    /// Human-readable description
    pub message: String,

    /// Machine-readable sub-kind
    pub code: Option<String>,
}

impl Violation {
    /// Violation without a code
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    /// Violation with a machine-readable code
    pub fn coded(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: Some(code.into()),
        }
    }
}

/// Check signature shared by every rule
///
/// Arguments are the resolved field value (Null when absent) and the whole
/// input object, for checks that need sibling fields.
pub type CheckFn = Arc<dyn Fn(&Value, &Value) -> Result<(), Violation> + Send + Sync>;

/// A named check over one field of an input object
#[derive(Clone)]
pub struct Rule {
    field: String,
    optional: bool,
    check: CheckFn,
}

static NULL: Value = Value::Null;

impl Rule {
    /// Create a rule for the given dot-path field
    pub fn new(
        field: impl Into<String>,
        check: impl Fn(&Value, &Value) -> Result<(), Violation> + Send + Sync + 'static,
    ) -> Self {
        Self {
            field: field.into(),
            optional: false,
            check: Arc::new(check),
        }
    }

    /// Mark the rule optional: an absent or empty value passes without
    /// invoking the check
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// The field this rule checks
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Whether absent values short-circuit to pass
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Run the rule against one input object
    ///
    /// Returns the field error on failure, `None` on pass. A null or
    /// non-object input resolves every field to absent; nothing panics.
    pub fn apply(&self, input: &Value) -> Option<FieldError> {
        let value = lookup_path(input, &self.field).unwrap_or(&NULL);
        if self.optional && is_absent(value) {
            return None;
        }
        match (self.check)(value, input) {
            Ok(()) => None,
            Err(violation) => Some(FieldError {
                field: self.field.clone(),
                message: violation.message,
                code: violation.code,
            }),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("field", &self.field)
            .field("optional", &self.optional)
            .finish_non_exhaustive()
    }
}

/// Resolve a dot-path against an input object
///
/// Returns `None` when any step of the path is missing or not an object.
pub fn lookup_path<'a>(input: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = input;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Missing, null, empty string, or empty sequence
pub fn is_absent(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
