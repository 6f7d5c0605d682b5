//! Field constraints and the checks behind them.
//!
//! Constraints compose: [`Constraint::Optional`] and [`Constraint::ArrayOf`]
//! wrap any other constraint, [`Constraint::Schema`] defers to another
//! registry entry, and [`Constraint::Object`] describes an inline object.

use chrono::NaiveDate;
use serde_json::{Map, Value};
use url::Url;

use super::violation::{Violation, ViolationCode, field_path, index_path};
use super::{SchemaName, SchemaRegistry};

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// One named field of a schema or inline object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: &'static str,
    constraint: Constraint,
}

impl Field {
    /// Pair a field name with its constraint.
    pub fn new(name: &'static str, constraint: Constraint) -> Self {
        Self { name, constraint }
    }

    /// Wire name of the field.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Rule the field's value must satisfy.
    pub fn constraint(&self) -> &Constraint {
        &self.constraint
    }
}

/// Validation rule for a single value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// Any integer. Numeric strings are coerced.
    Integer,
    /// An integer greater than zero. Numeric strings are coerced.
    PositiveInt,
    /// Any finite number. Numeric strings are coerced.
    Number,
    /// `true` or `false`.
    Boolean,
    /// Any string, including the empty string.
    String,
    /// A string with at least one non-whitespace character.
    NonEmptyString,
    /// An absolute `http` or `https` URL.
    UrlString,
    /// A calendar date in `YYYY-MM-DD` form.
    IsoDate,
    /// A string drawn from a closed set of labels.
    EnumMember(&'static [&'static str]),
    /// The wrapped rule, or an absent or `null` value.
    Optional(Box<Constraint>),
    /// An array whose every element satisfies the wrapped rule.
    ArrayOf(Box<Constraint>),
    /// An object satisfying another registry entry.
    Schema(SchemaName),
    /// An inline object with its own field set.
    Object(Vec<Field>),
}

impl Constraint {
    /// Wrap `inner` so the value may be absent or `null`.
    pub fn optional(inner: Constraint) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// Require an array of values satisfying `inner`.
    pub fn array_of(inner: Constraint) -> Self {
        Self::ArrayOf(Box::new(inner))
    }

    /// Require membership in `labels`.
    pub const fn one_of(labels: &'static [&'static str]) -> Self {
        Self::EnumMember(labels)
    }

    /// Whether an absent value satisfies this rule.
    pub fn accepts_absent(&self) -> bool {
        matches!(self, Self::Optional(_))
    }

    /// Short description used in violation messages and documentation.
    pub fn expectation(&self) -> String {
        match self {
            Self::Integer => "an integer".to_owned(),
            Self::PositiveInt => "a positive integer".to_owned(),
            Self::Number => "a number".to_owned(),
            Self::Boolean => "a boolean".to_owned(),
            Self::String => "a string".to_owned(),
            Self::NonEmptyString => "a non-empty string".to_owned(),
            Self::UrlString => "an absolute http(s) URL".to_owned(),
            Self::IsoDate => "a YYYY-MM-DD date".to_owned(),
            Self::EnumMember(labels) => format!("one of {labels:?}"),
            Self::Optional(inner) => format!("{} or null", inner.expectation()),
            Self::ArrayOf(inner) => format!("an array of {}", inner.expectation()),
            Self::Schema(name) => format!("a {name} object"),
            Self::Object(_) => "an object".to_owned(),
        }
    }

    /// Check `value` against this rule, returning the coerced value or
    /// recording every violation found under `path`.
    pub(super) fn check(
        &self,
        value: &Value,
        path: &str,
        registry: &SchemaRegistry,
        violations: &mut Vec<Violation>,
    ) -> Option<Value> {
        match self {
            Self::Optional(inner) => {
                if value.is_null() {
                    Some(Value::Null)
                } else {
                    inner.check(value, path, registry, violations)
                }
            }
            Self::ArrayOf(inner) => check_array(inner, value, path, registry, violations),
            Self::Schema(name) => registry.check_schema(*name, value, path, violations),
            Self::Object(fields) => check_object(fields, value, path, registry, violations),
            scalar => match scalar.check_scalar(value) {
                Ok(coerced) => Some(coerced),
                Err(code) => {
                    violations.push(Violation::new(path, code, self.expectation()));
                    None
                }
            },
        }
    }

    fn check_scalar(&self, value: &Value) -> Result<Value, ViolationCode> {
        match self {
            Self::Integer => coerce_integer(value),
            Self::PositiveInt => {
                let coerced = coerce_integer(value)?;
                let positive = coerced
                    .as_i64()
                    .map_or_else(|| coerced.as_u64().is_some_and(|n| n > 0), |n| n > 0);
                if positive {
                    Ok(coerced)
                } else {
                    Err(ViolationCode::NotPositive)
                }
            }
            Self::Number => coerce_number(value),
            Self::Boolean => value
                .as_bool()
                .map(Value::Bool)
                .ok_or(ViolationCode::WrongType),
            Self::String => expect_str(value).map(|s| Value::String(s.to_owned())),
            Self::NonEmptyString => {
                let text = expect_str(value)?;
                if text.trim().is_empty() {
                    Err(ViolationCode::EmptyString)
                } else {
                    Ok(Value::String(text.to_owned()))
                }
            }
            Self::UrlString => {
                let text = expect_str(value)?;
                if is_http_url(text) {
                    Ok(Value::String(text.to_owned()))
                } else {
                    Err(ViolationCode::InvalidUrl)
                }
            }
            Self::IsoDate => {
                let text = expect_str(value)?;
                NaiveDate::parse_from_str(text, ISO_DATE_FORMAT)
                    .map(|_| Value::String(text.to_owned()))
                    .map_err(|_| ViolationCode::InvalidDate)
            }
            Self::EnumMember(labels) => {
                let text = expect_str(value)?;
                if labels.contains(&text) {
                    Ok(Value::String(text.to_owned()))
                } else {
                    Err(ViolationCode::NotEnumMember)
                }
            }
            Self::Optional(_) | Self::ArrayOf(_) | Self::Schema(_) | Self::Object(_) => {
                Err(ViolationCode::WrongType)
            }
        }
    }
}

/// Check every declared field of an object, carrying undeclared fields
/// through untouched.
pub(super) fn check_object(
    fields: &[Field],
    value: &Value,
    path: &str,
    registry: &SchemaRegistry,
    violations: &mut Vec<Violation>,
) -> Option<Value> {
    let Some(object) = value.as_object() else {
        violations.push(Violation::new(path, ViolationCode::WrongType, "an object"));
        return None;
    };

    let before = violations.len();
    let mut output: Map<String, Value> = object.clone();
    for field in fields {
        let child = field_path(path, field.name());
        match object.get(field.name()) {
            None if field.constraint().accepts_absent() => {}
            None => violations.push(Violation::new(
                &child,
                ViolationCode::MissingField,
                field.constraint().expectation(),
            )),
            Some(raw) => {
                if let Some(coerced) = field.constraint().check(raw, &child, registry, violations) {
                    output.insert(field.name().to_owned(), coerced);
                }
            }
        }
    }

    (violations.len() == before).then_some(Value::Object(output))
}

fn check_array(
    inner: &Constraint,
    value: &Value,
    path: &str,
    registry: &SchemaRegistry,
    violations: &mut Vec<Violation>,
) -> Option<Value> {
    let Some(items) = value.as_array() else {
        violations.push(Violation::new(path, ViolationCode::WrongType, "an array"));
        return None;
    };

    let before = violations.len();
    let coerced: Vec<Value> = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| inner.check(item, &index_path(path, index), registry, violations))
        .collect();

    (violations.len() == before).then_some(Value::Array(coerced))
}

fn expect_str(value: &Value) -> Result<&str, ViolationCode> {
    value.as_str().ok_or(ViolationCode::WrongType)
}

fn coerce_integer(value: &Value) -> Result<Value, ViolationCode> {
    match value {
        Value::Number(number) if number.is_i64() || number.is_u64() => Ok(value.clone()),
        Value::Number(_) => Err(ViolationCode::NotInteger),
        Value::String(text) => {
            let trimmed = text.trim();
            if let Ok(parsed) = trimmed.parse::<i64>() {
                Ok(Value::from(parsed))
            } else if let Ok(parsed) = trimmed.parse::<u64>() {
                Ok(Value::from(parsed))
            } else if trimmed.parse::<f64>().is_ok_and(f64::is_finite) {
                Err(ViolationCode::NotInteger)
            } else {
                Err(ViolationCode::WrongType)
            }
        }
        _ => Err(ViolationCode::WrongType),
    }
}

fn coerce_number(value: &Value) -> Result<Value, ViolationCode> {
    match value {
        Value::Number(_) => Ok(value.clone()),
        Value::String(text) => {
            let trimmed = text.trim();
            if let Ok(parsed) = trimmed.parse::<i64>() {
                return Ok(Value::from(parsed));
            }
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|parsed| parsed.is_finite())
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .ok_or(ViolationCode::WrongType)
        }
        _ => Err(ViolationCode::WrongType),
    }
}

fn is_http_url(text: &str) -> bool {
    Url::parse(text)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false)
}
