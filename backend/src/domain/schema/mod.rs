//! Named data-shape contracts for the catalogue API.
//!
//! The registry holds one [`Schema`] per [`SchemaName`]. Entity schemas come
//! in pairs: an `Info` summary and a `Resource` built by extending the
//! summary, so the resource always declares every summary field. Route
//! parameters and response envelopes are registered alongside them.
//!
//! Validation checks every declared field, coerces numeric strings where a
//! field is numeric, and carries undeclared fields through untouched. A
//! failure lists every violating field rather than stopping at the first.
//!
//! ```
//! use cratedig::domain::schema::{validate, SchemaName};
//! use serde_json::json;
//!
//! let params = validate(SchemaName::VinylParams, &json!({ "userID": "7", "versionID": 42 }))
//!     .expect("params are valid");
//! assert_eq!(params["userID"], 7);
//!
//! let err = validate(SchemaName::VinylParams, &json!({ "userID": -1 })).unwrap_err();
//! assert!(err.fields().any(|field| field == "userID"));
//! ```

mod constraint;
mod definitions;
mod violation;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use serde_json::Value;

pub use constraint::{Constraint, Field};
pub use violation::{ROOT_PATH, ValidationErrors, Violation, ViolationCode};

macro_rules! schema_names {
    ($($(#[$meta:meta])* $variant:ident),+ $(,)?) => {
        /// Key of a registry entry; doubles as the OpenAPI component name.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum SchemaName {
            $($(#[$meta])* $variant,)+
        }

        impl SchemaName {
            /// Every registered name, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Component name, e.g. `"ArtistInfo"`.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant),)+
                }
            }
        }
    };
}

schema_names! {
    /// Image summary.
    ImageInfo,
    /// Image with provider links.
    ImageResource,
    /// Artist summary.
    ArtistInfo,
    /// Full artist record.
    ArtistResource,
    /// Label summary.
    LabelInfo,
    /// Full label record.
    LabelResource,
    /// Track summary.
    TrackInfo,
    /// Track with credits.
    TrackResource,
    /// Release summary.
    ReleaseInfo,
    /// Full release record.
    ReleaseResource,
    /// Release version summary.
    ReleaseVersionInfo,
    /// Full release version record.
    ReleaseVersionResource,
    /// Public user summary.
    UserInfo,
    /// Full user account.
    UserAccount,
    /// Key of one owned item.
    VinylRecordInfo,
    /// One owned item with its grading and history.
    VinylRecord,
    /// Crate summary.
    VinylCrateInfo,
    /// Crate with its records.
    VinylCrate,
    /// Marketplace listing summary.
    ListingInfo,
    /// Marketplace listing with user and version.
    ListingResource,
    /// Pagination envelope.
    Pagination,
    /// Route parameters for vinyl routes.
    VinylParams,
    /// Route parameters for user routes.
    UserParams,
    /// Route parameters for crate routes.
    CrateParams,
    /// Route parameters for the status route.
    StatusParams,
    /// Query parameters for paginated listings.
    PageParams,
    /// Optional body for adding or updating a vinyl record.
    VinylDetails,
    /// Body for creating a crate.
    NewCrate,
    /// Response for a stored vinyl record.
    AddVinylResponse,
    /// Response for a page of the collection.
    CrateListResponse,
    /// Response for a created crate.
    CrateResponse,
    /// Response for a removal.
    RemovedResponse,
    /// Response describing a provider status code.
    StatusDescriptor,
}

impl SchemaName {
    /// Entity pairs as `(info, resource)`.
    pub const ENTITY_PAIRS: &'static [(Self, Self)] = &[
        (Self::ImageInfo, Self::ImageResource),
        (Self::ArtistInfo, Self::ArtistResource),
        (Self::LabelInfo, Self::LabelResource),
        (Self::TrackInfo, Self::TrackResource),
        (Self::ReleaseInfo, Self::ReleaseResource),
        (Self::ReleaseVersionInfo, Self::ReleaseVersionResource),
        (Self::UserInfo, Self::UserAccount),
        (Self::VinylRecordInfo, Self::VinylRecord),
        (Self::VinylCrateInfo, Self::VinylCrate),
        (Self::ListingInfo, Self::ListingResource),
    ];
}

impl fmt::Display for SchemaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, ordered set of field constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    name: SchemaName,
    description: &'static str,
    fields: Vec<Field>,
}

impl Schema {
    /// Start an empty schema.
    pub fn new(name: SchemaName, description: &'static str) -> Self {
        Self {
            name,
            description,
            fields: Vec::new(),
        }
    }

    /// Start a schema holding every field of `base`.
    pub fn extend(name: SchemaName, base: &Schema, description: &'static str) -> Self {
        Self {
            name,
            description,
            fields: base.fields.clone(),
        }
    }

    /// Append a field.
    #[must_use]
    pub fn field(mut self, name: &'static str, constraint: Constraint) -> Self {
        self.fields.push(Field::new(name, constraint));
        self
    }

    /// Registry key.
    pub fn name(&self) -> SchemaName {
        self.name
    }

    /// One-line summary for documentation.
    pub fn description(&self) -> &'static str {
        self.description
    }

    /// Declared fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Look up a declared field by wire name.
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name() == name)
    }
}

/// Process-wide catalogue of schemas, built once on first use.
#[derive(Debug)]
pub struct SchemaRegistry {
    schemas: BTreeMap<SchemaName, Schema>,
}

impl SchemaRegistry {
    /// Shared registry instance.
    pub fn global() -> &'static Self {
        static REGISTRY: OnceLock<SchemaRegistry> = OnceLock::new();
        REGISTRY.get_or_init(|| Self::from_schemas(definitions::all()))
    }

    fn from_schemas(schemas: impl IntoIterator<Item = Schema>) -> Self {
        Self {
            schemas: schemas
                .into_iter()
                .map(|schema| (schema.name(), schema))
                .collect(),
        }
    }

    /// Schema registered under `name`.
    pub fn get(&self, name: SchemaName) -> Option<&Schema> {
        self.schemas.get(&name)
    }

    /// Every schema, ordered by name declaration.
    pub fn iter(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.values()
    }

    /// Validate `value` against the schema registered under `name`.
    ///
    /// Returns the coerced value on success, or every violation found.
    pub fn validate(&self, name: SchemaName, value: &Value) -> Result<Value, ValidationErrors> {
        let mut violations = Vec::new();
        match self.check_schema(name, value, "", &mut violations) {
            Some(validated) if violations.is_empty() => Ok(validated),
            _ => Err(ValidationErrors::new(name, violations)),
        }
    }

    fn check_schema(
        &self,
        name: SchemaName,
        value: &Value,
        path: &str,
        violations: &mut Vec<Violation>,
    ) -> Option<Value> {
        let Some(schema) = self.get(name) else {
            violations.push(Violation::new(
                path,
                ViolationCode::UnknownSchema,
                format!("a registered {name} schema"),
            ));
            return None;
        };
        constraint::check_object(schema.fields(), value, path, self, violations)
    }
}

/// Validate `value` against the global registry entry `name`.
pub fn validate(name: SchemaName, value: &Value) -> Result<Value, ValidationErrors> {
    SchemaRegistry::global().validate(name, value)
}
