//! Validation failures reported by the schema registry.

use std::fmt;

use serde::Serialize;

use super::SchemaName;

/// Path reported for a value that is itself the validated root.
pub const ROOT_PATH: &str = "$";

/// Machine-readable reason a single field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCode {
    /// A required field was absent.
    MissingField,
    /// The value had the wrong JSON type.
    WrongType,
    /// A number was supplied where an integer is required.
    NotInteger,
    /// An integer was zero or negative.
    NotPositive,
    /// A string was empty or whitespace.
    EmptyString,
    /// A string was not an absolute http(s) URL.
    InvalidUrl,
    /// A string was not a `YYYY-MM-DD` calendar date.
    InvalidDate,
    /// A string fell outside the permitted label set.
    NotEnumMember,
    /// A nested schema reference had no registry entry.
    UnknownSchema,
}

impl ViolationCode {
    /// Snake-case label used on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::WrongType => "wrong_type",
            Self::NotInteger => "not_integer",
            Self::NotPositive => "not_positive",
            Self::EmptyString => "empty_string",
            Self::InvalidUrl => "invalid_url",
            Self::InvalidDate => "invalid_date",
            Self::NotEnumMember => "not_enum_member",
            Self::UnknownSchema => "unknown_schema",
        }
    }
}

impl fmt::Display for ViolationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field that broke its declared rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    field: String,
    code: ViolationCode,
    message: String,
}

impl Violation {
    pub(super) fn new(path: &str, code: ViolationCode, expected: impl AsRef<str>) -> Self {
        let field = if path.is_empty() { ROOT_PATH } else { path };
        let message = match code {
            ViolationCode::MissingField => format!("{field} is required: expected {}", expected.as_ref()),
            _ => format!("{field} must be {}", expected.as_ref()),
        };
        Self {
            field: field.to_owned(),
            code,
            message,
        }
    }

    /// Dotted and indexed path to the field, e.g. `members[0].name`.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Reason the field failed.
    pub fn code(&self) -> ViolationCode {
        self.code
    }

    /// Human-readable explanation.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Every violation found while validating one value against one schema.
///
/// ## Invariants
/// - `violations` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{schema} validation failed with {} violation(s)", .violations.len())]
pub struct ValidationErrors {
    schema: SchemaName,
    violations: Vec<Violation>,
}

impl ValidationErrors {
    pub(super) fn new(schema: SchemaName, violations: Vec<Violation>) -> Self {
        debug_assert!(!violations.is_empty(), "validation errors need a violation");
        Self { schema, violations }
    }

    /// Schema the value was validated against.
    pub fn schema(&self) -> SchemaName {
        self.schema
    }

    /// Violations in the order the fields were checked.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Paths of every violating field.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.violations.iter().map(Violation::field)
    }
}

pub(super) fn field_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_owned()
    } else {
        format!("{parent}.{name}")
    }
}

pub(super) fn index_path(parent: &str, index: usize) -> String {
    format!("{parent}[{index}]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "userID", "userID")]
    #[case("members[0]", "name", "members[0].name")]
    #[case("version", "labels", "version.labels")]
    fn joins_field_paths(#[case] parent: &str, #[case] name: &str, #[case] expected: &str) {
        assert_eq!(field_path(parent, name), expected);
    }

    #[test]
    fn indexes_array_paths() {
        assert_eq!(index_path("members", 3), "members[3]");
    }

    #[test]
    fn root_violation_uses_root_marker() {
        let violation = Violation::new("", ViolationCode::WrongType, "an object");
        assert_eq!(violation.field(), ROOT_PATH);
        assert_eq!(violation.message(), "$ must be an object");
    }

    #[test]
    fn serialises_snake_case_codes() {
        let violation = Violation::new("userID", ViolationCode::NotPositive, "a positive integer");
        let value = serde_json::to_value(&violation).expect("violation serialises");
        assert_eq!(value["field"], "userID");
        assert_eq!(value["code"], "not_positive");
        assert_eq!(value["message"], "userID must be a positive integer");
    }
}
