//! DTOs for decoding provider release payloads.
//!
//! Only the fields the collection needs are decoded; the provider's many other
//! fields are ignored.

use serde::Deserialize;

use crate::domain::catalogue::ReleaseVersionSummary;

#[derive(Debug, Deserialize)]
pub(super) struct ReleaseVersionDto {
    pub(super) id: u64,
    #[serde(default)]
    pub(super) title: String,
    #[serde(default)]
    pub(super) master_id: Option<u64>,
}

impl ReleaseVersionDto {
    pub(super) fn into_summary(self, requested: u64) -> Result<ReleaseVersionSummary, String> {
        if self.id != requested {
            return Err(format!(
                "requested release version {requested} but received {}",
                self.id
            ));
        }

        // Versions without a master release stand as their own release.
        let release_id = self.master_id.filter(|id| *id > 0).unwrap_or(self.id);
        Ok(ReleaseVersionSummary {
            version_id: self.id,
            release_id,
            title: self.title,
        })
    }
}
