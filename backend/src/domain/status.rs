//! Provider response-status classification.
//!
//! The music-metadata provider documents a closed set of response codes. Each
//! recognised code maps to exactly one [`StatusDescriptor`] held in a static
//! table; the table is never mutated, so every request handler shares it by
//! reference.
//!
//! Unrecognised codes are an ordinary outcome: [`describe`] falls back to
//! [`UNRECOGNIZED_STATUS`] and [`classify`] returns `None`, leaving the
//! caller to branch on "known" versus "unknown" explicitly.
//!
//! ```
//! use cratedig::domain::status::{classify, describe, UNRECOGNIZED_STATUS};
//!
//! let not_found = classify(404).expect("404 is recognised");
//! assert_eq!(not_found.name(), "Not Found");
//! assert!(!not_found.is_success());
//! assert_eq!(describe(418), UNRECOGNIZED_STATUS);
//! ```

use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Name reported by [`describe`] for codes outside the recognised set.
pub const UNRECOGNIZED_STATUS: &str = "unrecognized status code";

/// Description of one recognised provider response code.
///
/// ## Invariants
/// - `code` belongs to the recognised set and is unique within the table.
/// - `name` is unique within the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusDescriptor {
    code: u16,
    name: &'static str,
    details: &'static str,
}

impl StatusDescriptor {
    const fn new(code: u16, name: &'static str, details: &'static str) -> Self {
        Self {
            code,
            name,
            details,
        }
    }

    /// Numeric response code.
    #[must_use]
    pub const fn code(&self) -> u16 {
        self.code
    }

    /// Canonical short label, e.g. `"Not Found"`.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Human-readable explanation of what the code means for a caller.
    #[must_use]
    pub const fn details(&self) -> &'static str {
        self.details
    }

    /// Whether the code sits in the `2xx` success band.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.code >= 200 && self.code < 300
    }
}

impl Serialize for StatusDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("StatusDescriptor", 4)?;
        state.serialize_field("code", &self.code)?;
        state.serialize_field("name", self.name)?;
        state.serialize_field("details", self.details)?;
        state.serialize_field("is_success", &self.is_success())?;
        state.end()
    }
}

static DESCRIPTORS: [StatusDescriptor; 9] = [
    StatusDescriptor::new(
        200,
        "OK",
        "The request was successful, and the requested data is provided in the response body.",
    ),
    StatusDescriptor::new(
        201,
        "Created",
        "A POST to a list of resources created a new one. The ID of the newly-created resource is provided in the body of the response.",
    ),
    StatusDescriptor::new(
        204,
        "No Content",
        "The request was successful, and the server has no additional information to convey, so the response body is empty.",
    ),
    StatusDescriptor::new(
        401,
        "Unauthorized",
        "The resource requires authentication before it can be accessed.",
    ),
    StatusDescriptor::new(
        403,
        "Forbidden",
        "The caller is not allowed to access this resource, whether or not it has authenticated.",
    ),
    StatusDescriptor::new(
        404,
        "Not Found",
        "The requested resource does not exist.",
    ),
    StatusDescriptor::new(
        405,
        "Method Not Allowed",
        "The HTTP verb is not supported by the resource.",
    ),
    StatusDescriptor::new(
        422,
        "Unprocessable Entity",
        "The request was well-formed, but something is semantically wrong with its body: malformed JSON, a missing or mistyped parameter, or an action that makes no sense.",
    ),
    StatusDescriptor::new(
        500,
        "Internal Server Error",
        "The provider failed while attempting to process the request.",
    ),
];

/// Whether an arbitrary integer code falls in the `2xx` success band.
///
/// Unlike [`StatusDescriptor::is_success`] this accepts codes outside the
/// recognised set, including negative values.
#[must_use]
pub fn is_success_code(code: impl Into<i64>) -> bool {
    (200..300).contains(&code.into())
}

/// Look up the descriptor for `code`, or `None` when the code is not
/// recognised.
#[must_use]
pub fn classify(code: impl Into<i64>) -> Option<&'static StatusDescriptor> {
    let code = code.into();
    DESCRIPTORS
        .iter()
        .find(|descriptor| i64::from(descriptor.code) == code)
}

/// Canonical name for `code`, or [`UNRECOGNIZED_STATUS`]. Total over every
/// integer input.
#[must_use]
pub fn describe(code: impl Into<i64>) -> &'static str {
    classify(code).map_or(UNRECOGNIZED_STATUS, StatusDescriptor::name)
}

/// Every recognised descriptor, ordered by code.
#[must_use]
pub fn descriptors() -> &'static [StatusDescriptor] {
    &DESCRIPTORS
}
