//! Typed collection entities handed between ports and adapters.
//!
//! Field names on the wire match the registry schemas of the same name, so a
//! serialised [`VinylRecord`] validates against `SchemaName::VinylRecord`.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use super::Grading;

/// Identity of one owned item: the nth copy of a release version held by a
/// user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VinylKey {
    /// Owning user.
    #[serde(rename = "userID")]
    pub user_id: u64,
    /// Release version the item is a copy of.
    #[serde(rename = "versionID")]
    pub version_id: u64,
    /// One-based copy index within the user's holdings of the version.
    pub item: u64,
}

impl VinylKey {
    /// Build a key from its parts.
    pub const fn new(user_id: u64, version_id: u64, item: u64) -> Self {
        Self {
            user_id,
            version_id,
            item,
        }
    }
}

/// Optional details supplied when storing a record.
///
/// Each field distinguishes three cases: absent (`None`) keeps the stored
/// value, `null` (`Some(None)`) clears it, and a value replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VinylDetails {
    /// Crate the record is filed in.
    #[serde(rename = "crateID", default, deserialize_with = "present")]
    pub crate_id: Option<Option<String>>,
    /// Date the item was last graded.
    #[serde(default, deserialize_with = "present")]
    pub date_graded: Option<Option<NaiveDate>>,
    /// Date the item was sold.
    #[serde(default, deserialize_with = "present")]
    pub date_sold: Option<Option<NaiveDate>>,
    /// Date the item was traded away.
    #[serde(default, deserialize_with = "present")]
    pub date_traded: Option<Option<NaiveDate>>,
    /// Grade of the media itself.
    #[serde(default, deserialize_with = "present")]
    pub media_grade: Option<Option<Grading>>,
    /// Grade of the sleeve.
    #[serde(default, deserialize_with = "present")]
    pub sleeve_grade: Option<Option<Grading>>,
    /// Replacement tag set; `null` empties it.
    #[serde(default, deserialize_with = "present")]
    pub tags: Option<Option<Vec<String>>>,
    /// Free-text notes.
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
}

/// Marks a field as present, so `null` arrives as `Some(None)` while
/// `#[serde(default)]` leaves absent fields at `None`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// One item in a user's collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VinylRecord {
    #[serde(flatten)]
    key: VinylKey,
    #[serde(rename = "releaseID")]
    release_id: u64,
    #[serde(rename = "crateID", default, skip_serializing_if = "Option::is_none")]
    crate_id: Option<String>,
    date_added: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date_graded: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date_sold: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date_traded: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    media_grade: Option<Grading>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sleeve_grade: Option<Grading>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
}

impl VinylRecord {
    /// New ungraded record added on `date_added`.
    pub fn new(key: VinylKey, release_id: u64, date_added: NaiveDate) -> Self {
        Self {
            key,
            release_id,
            crate_id: None,
            date_added,
            date_graded: None,
            date_sold: None,
            date_traded: None,
            media_grade: None,
            sleeve_grade: None,
            tags: Vec::new(),
            notes: None,
        }
    }

    /// Overlay the supplied details: absent fields keep the stored value and
    /// explicit nulls clear it.
    #[must_use]
    pub fn with_details(mut self, details: VinylDetails) -> Self {
        let VinylDetails {
            crate_id,
            date_graded,
            date_sold,
            date_traded,
            media_grade,
            sleeve_grade,
            tags,
            notes,
        } = details;
        self.crate_id = crate_id.unwrap_or(self.crate_id);
        self.date_graded = date_graded.unwrap_or(self.date_graded);
        self.date_sold = date_sold.unwrap_or(self.date_sold);
        self.date_traded = date_traded.unwrap_or(self.date_traded);
        self.media_grade = media_grade.unwrap_or(self.media_grade);
        self.sleeve_grade = sleeve_grade.unwrap_or(self.sleeve_grade);
        if let Some(tags) = tags {
            self.tags = tags.unwrap_or_default();
        }
        self.notes = notes.unwrap_or(self.notes);
        self
    }

    /// Same record stored under item `item`.
    #[must_use]
    pub fn with_item(mut self, item: u64) -> Self {
        self.key.item = item;
        self
    }

    /// Identity of the record.
    pub fn key(&self) -> VinylKey {
        self.key
    }

    /// Release the version belongs to.
    pub fn release_id(&self) -> u64 {
        self.release_id
    }

    /// Crate the record is filed in.
    pub fn crate_id(&self) -> Option<&str> {
        self.crate_id.as_deref()
    }

    /// Date the record joined the collection.
    pub fn date_added(&self) -> NaiveDate {
        self.date_added
    }

    /// Date the item was sold.
    pub fn date_sold(&self) -> Option<NaiveDate> {
        self.date_sold
    }

    /// Date the item was traded away.
    pub fn date_traded(&self) -> Option<NaiveDate> {
        self.date_traded
    }

    /// Grade of the media.
    pub fn media_grade(&self) -> Option<Grading> {
        self.media_grade
    }

    /// Grade of the sleeve.
    pub fn sleeve_grade(&self) -> Option<Grading> {
        self.sleeve_grade
    }

    /// Tags in insertion order.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Free-text notes.
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Remove the record from whichever crate holds it.
    pub fn clear_crate(&mut self) {
        self.crate_id = None;
    }
}

/// Crate to create for a user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewCrate {
    /// Display name.
    pub name: String,
    /// Optional longer description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Named grouping of a user's records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VinylCrate {
    #[serde(rename = "crateID")]
    crate_id: String,
    #[serde(rename = "userID")]
    user_id: u64,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    records: Vec<VinylKey>,
}

impl VinylCrate {
    /// Empty crate owned by `user_id`.
    pub fn new(crate_id: impl Into<String>, user_id: u64, request: NewCrate) -> Self {
        Self {
            crate_id: crate_id.into(),
            user_id,
            name: request.name,
            description: request.description,
            records: Vec::new(),
        }
    }

    /// Attach the keys of the records filed in this crate.
    #[must_use]
    pub fn with_records(mut self, records: Vec<VinylKey>) -> Self {
        self.records = records;
        self
    }

    /// Crate identifier.
    pub fn crate_id(&self) -> &str {
        &self.crate_id
    }

    /// Owning user.
    pub fn user_id(&self) -> u64 {
        self.user_id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Records filed in the crate.
    pub fn records(&self) -> &[VinylKey] {
        &self.records
    }
}

/// What the provider reports about a release version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseVersionSummary {
    /// Release version identifier.
    pub version_id: u64,
    /// Release the version belongs to.
    pub release_id: u64,
    /// Title as printed on the version.
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::{SchemaName, validate};
    use serde_json::json;

    fn added() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date")
    }

    #[test]
    fn serialised_record_satisfies_registry_schema() {
        let record = VinylRecord::new(VinylKey::new(7, 42, 1), 1000, added()).with_details(
            VinylDetails {
                media_grade: Some(Some(Grading::VeryGoodPlus)),
                tags: Some(Some(vec!["house".to_owned()])),
                ..VinylDetails::default()
            },
        );
        let value = serde_json::to_value(&record).expect("record serialises");
        assert_eq!(value["userID"], 7);
        assert_eq!(value["date_added"], "2024-03-01");
        assert_eq!(value["media_grade"], "VG+");
        assert!(validate(SchemaName::VinylRecord, &value).is_ok());
    }

    #[test]
    fn details_only_overwrite_supplied_fields() {
        let first = VinylRecord::new(VinylKey::new(1, 2, 1), 3, added()).with_details(VinylDetails {
            notes: Some(Some("first pressing".to_owned())),
            sleeve_grade: Some(Some(Grading::Good)),
            ..VinylDetails::default()
        });
        let updated = first.with_details(VinylDetails {
            media_grade: Some(Some(Grading::NearMint)),
            ..VinylDetails::default()
        });
        assert_eq!(updated.notes(), Some("first pressing"));
        assert_eq!(updated.sleeve_grade(), Some(Grading::Good));
        assert_eq!(updated.media_grade(), Some(Grading::NearMint));
    }

    #[test]
    fn details_deserialise_from_validated_body() {
        let body = validate(
            SchemaName::VinylDetails,
            &json!({ "crateID": "disco", "date_graded": "2024-05-01", "tags": ["a"] }),
        )
        .expect("body is valid");
        let details: VinylDetails = serde_json::from_value(body).expect("details deserialise");
        assert_eq!(details.crate_id, Some(Some("disco".to_owned())));
        assert_eq!(details.date_graded, Some(NaiveDate::from_ymd_opt(2024, 5, 1)));
        assert_eq!(details.notes, None);
    }

    #[test]
    fn explicit_nulls_clear_stored_values() {
        let sold = NaiveDate::from_ymd_opt(2024, 9, 9);
        let stored = VinylRecord::new(VinylKey::new(1, 2, 1), 3, added()).with_details(VinylDetails {
            crate_id: Some(Some("disco".to_owned())),
            media_grade: Some(Some(Grading::VeryGood)),
            tags: Some(Some(vec!["funk".to_owned()])),
            ..VinylDetails::default()
        });

        let body = validate(
            SchemaName::VinylDetails,
            &json!({ "crateID": null, "media_grade": null, "tags": null, "date_sold": "2024-09-09" }),
        )
        .expect("body is valid");
        let details: VinylDetails = serde_json::from_value(body).expect("details deserialise");
        let updated = stored.with_details(details);

        assert_eq!(updated.crate_id(), None);
        assert_eq!(updated.media_grade(), None);
        assert!(updated.tags().is_empty());
        assert_eq!(updated.date_sold(), sold);
        assert_eq!(updated.date_traded(), None);
    }

    #[test]
    fn crate_serialises_record_keys() {
        let krate = VinylCrate::new(
            "c-1",
            7,
            NewCrate {
                name: "Disco".to_owned(),
                description: None,
            },
        )
        .with_records(vec![VinylKey::new(7, 42, 1)]);
        let value = serde_json::to_value(&krate).expect("crate serialises");
        assert_eq!(value["records"], json!([{ "userID": 7, "versionID": 42, "item": 1 }]));
        assert!(validate(SchemaName::VinylCrate, &value).is_ok());
    }
}
