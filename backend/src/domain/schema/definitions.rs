//! Registry contents.
//!
//! Each `Resource` schema starts from its `Info` schema via
//! [`Schema::extend`], so the two cannot drift apart.

use super::{Constraint as C, Field, Schema, SchemaName as N};
use crate::domain::catalogue::{Currency, DataQuality, Grading, ImageKind, MediaFormat};

fn list_of(name: N) -> C {
    C::array_of(C::Schema(name))
}

fn maybe(inner: C) -> C {
    C::optional(inner)
}

fn image() -> [Schema; 2] {
    let info = Schema::new(N::ImageInfo, "Artwork attached to an artist, label or release.")
        .field("type", C::one_of(ImageKind::LABELS))
        .field("uri", C::UrlString)
        .field("width", C::PositiveInt)
        .field("height", C::PositiveInt);
    let resource = Schema::extend(N::ImageResource, &info, "Artwork with provider links.")
        .field("uri150", maybe(C::UrlString))
        .field("resource_url", maybe(C::UrlString));
    [info, resource]
}

fn artist() -> [Schema; 2] {
    let info = Schema::new(N::ArtistInfo, "Artist summary as embedded in other records.")
        .field("id", C::PositiveInt)
        .field("name", C::NonEmptyString)
        .field("resource_url", C::UrlString)
        .field("active", C::Boolean);
    let resource = Schema::extend(N::ArtistResource, &info, "Full artist record.")
        .field("namevariations", C::array_of(C::String))
        .field("releases_url", C::UrlString)
        .field("profile", maybe(C::String))
        .field("uri", maybe(C::UrlString))
        .field("urls", C::array_of(C::UrlString))
        .field("images", list_of(N::ImageInfo))
        .field("members", list_of(N::ArtistInfo))
        .field("data_quality", C::one_of(DataQuality::LABELS));
    [info, resource]
}

fn label() -> [Schema; 2] {
    let info = Schema::new(N::LabelInfo, "Label summary as embedded in other records.")
        .field("id", C::PositiveInt)
        .field("name", C::NonEmptyString)
        .field("catno", maybe(C::String))
        .field("resource_url", maybe(C::UrlString));
    let resource = Schema::extend(N::LabelResource, &info, "Full label record.")
        .field("profile", maybe(C::String))
        .field("contact_info", maybe(C::String))
        .field("urls", C::array_of(C::UrlString))
        .field("images", list_of(N::ImageInfo))
        .field("sublabels", list_of(N::LabelInfo))
        .field("parent_label", maybe(C::Schema(N::LabelInfo)))
        .field("data_quality", C::one_of(DataQuality::LABELS));
    [info, resource]
}

fn track() -> [Schema; 2] {
    let info = Schema::new(N::TrackInfo, "Track as listed on a release version.")
        .field("position", C::String)
        .field("title", C::NonEmptyString)
        .field("duration", maybe(C::String));
    let resource = Schema::extend(N::TrackResource, &info, "Track with its credits.")
        .field("type_", maybe(C::String))
        .field("artists", list_of(N::ArtistInfo))
        .field("extraartists", list_of(N::ArtistInfo));
    [info, resource]
}

fn release() -> [Schema; 2] {
    let info = Schema::new(N::ReleaseInfo, "Release summary.")
        .field("releaseID", C::PositiveInt)
        .field("title", C::NonEmptyString)
        .field("year", C::String);
    let resource = Schema::extend(N::ReleaseResource, &info, "Full release record.")
        .field("data_quality", C::one_of(DataQuality::LABELS))
        .field("thumb", C::UrlString)
        .field("tracklist", C::array_of(C::String))
        .field("artist_ids", C::array_of(C::PositiveInt))
        .field("credit_ids", C::array_of(C::PositiveInt))
        .field("notes", C::String);
    [info, resource]
}

fn release_version() -> [Schema; 2] {
    let info = Schema::new(N::ReleaseVersionInfo, "One pressing or edition of a release.")
        .field("versionID", C::PositiveInt)
        .field("title", C::String)
        .field("artists", list_of(N::ArtistInfo))
        .field("featured", list_of(N::ArtistInfo))
        .field("labels", list_of(N::LabelInfo))
        .field("formats", C::array_of(C::one_of(MediaFormat::LABELS)))
        .field("images", list_of(N::ImageInfo))
        .field("genres", C::array_of(C::String))
        .field("styles", C::array_of(C::String))
        .field("country", C::String)
        .field("released", C::String)
        .field("notes", maybe(C::String))
        .field("tracklist", list_of(N::TrackInfo));
    let resource = Schema::extend(
        N::ReleaseVersionResource,
        &info,
        "Release version with provider metadata.",
    )
    .field("main_release", C::PositiveInt)
    .field("data_quality", C::one_of(DataQuality::LABELS))
    .field("when", maybe(C::IsoDate))
    .field("resource_url", maybe(C::UrlString));
    [info, resource]
}

fn user() -> [Schema; 2] {
    let info = Schema::new(N::UserInfo, "Public user summary.")
        .field("id", C::PositiveInt)
        .field("username", C::NonEmptyString)
        .field("active", maybe(C::Boolean));
    let resource = Schema::extend(N::UserAccount, &info, "Full user account.")
        .field("fullname", maybe(C::String))
        .field("about", maybe(C::String))
        .field("discogsID", maybe(C::String))
        .field("avatar", C::UrlString);
    [info, resource]
}

fn vinyl_record_fields(schema: Schema) -> Schema {
    schema
        .field("releaseID", C::PositiveInt)
        .field("crateID", maybe(C::String))
        .field("date_added", C::IsoDate)
        .field("date_graded", maybe(C::IsoDate))
        .field("date_sold", maybe(C::IsoDate))
        .field("date_traded", maybe(C::IsoDate))
        .field("media_grade", maybe(C::one_of(Grading::LABELS)))
        .field("sleeve_grade", maybe(C::one_of(Grading::LABELS)))
        .field("tags", C::array_of(C::NonEmptyString))
        .field("notes", maybe(C::String))
}

fn vinyl_record() -> [Schema; 2] {
    let info = Schema::new(N::VinylRecordInfo, "Key of one item in a user's collection.")
        .field("userID", C::PositiveInt)
        .field("versionID", C::PositiveInt)
        .field("item", C::PositiveInt);
    let resource = vinyl_record_fields(Schema::extend(
        N::VinylRecord,
        &info,
        "One owned item with its grading and history.",
    ));
    [info, resource]
}

fn vinyl_crate() -> [Schema; 2] {
    let info = Schema::new(N::VinylCrateInfo, "Named grouping of a user's records.")
        .field("crateID", C::NonEmptyString)
        .field("userID", C::PositiveInt)
        .field("name", C::NonEmptyString);
    let resource = Schema::extend(N::VinylCrate, &info, "Crate with its records.")
        .field("description", maybe(C::String))
        .field("records", list_of(N::VinylRecordInfo));
    [info, resource]
}

fn listing() -> [Schema; 2] {
    let info = Schema::new(N::ListingInfo, "Marketplace listing key.")
        .field("userID", C::PositiveInt)
        .field("versionID", C::PositiveInt)
        .field("item", C::PositiveInt);
    let resource = Schema::extend(N::ListingResource, &info, "Marketplace listing.")
        .field("user", C::Schema(N::UserInfo))
        .field("version", C::Schema(N::ReleaseVersionInfo))
        .field("price", maybe(C::Number))
        .field("currency", maybe(C::one_of(Currency::LABELS)));
    [info, resource]
}

fn pagination() -> Schema {
    let link = || maybe(C::UrlString);
    Schema::new(N::Pagination, "Position of a page within a listing.")
        .field("page", C::PositiveInt)
        .field("pages", C::PositiveInt)
        .field("items", C::Integer)
        .field("per_page", C::PositiveInt)
        .field(
            "urls",
            C::Object(vec![
                Field::new("first", link()),
                Field::new("prev", link()),
                Field::new("next", link()),
                Field::new("last", link()),
            ]),
        )
}

fn route_params() -> [Schema; 5] {
    [
        Schema::new(N::VinylParams, "Path parameters of the vinyl routes.")
            .field("userID", C::PositiveInt)
            .field("versionID", C::PositiveInt)
            .field("item", maybe(C::PositiveInt)),
        Schema::new(N::UserParams, "Path parameters of the user routes.")
            .field("userID", C::PositiveInt),
        Schema::new(N::CrateParams, "Path parameters of the crate routes.")
            .field("userID", C::PositiveInt)
            .field("crateID", C::NonEmptyString),
        Schema::new(N::StatusParams, "Path parameters of the status route.")
            .field("code", C::Integer),
        Schema::new(N::PageParams, "Query parameters of paginated listings.")
            .field("page", maybe(C::PositiveInt))
            .field("per_page", maybe(C::PositiveInt)),
    ]
}

fn request_bodies() -> [Schema; 2] {
    [
        Schema::new(N::VinylDetails, "Optional details stored with a vinyl record; null clears a field.")
            .field("crateID", maybe(C::NonEmptyString))
            .field("date_graded", maybe(C::IsoDate))
            .field("date_sold", maybe(C::IsoDate))
            .field("date_traded", maybe(C::IsoDate))
            .field("media_grade", maybe(C::one_of(Grading::LABELS)))
            .field("sleeve_grade", maybe(C::one_of(Grading::LABELS)))
            .field("tags", maybe(C::array_of(C::NonEmptyString)))
            .field("notes", maybe(C::String)),
        Schema::new(N::NewCrate, "Crate to create.")
            .field("name", C::NonEmptyString)
            .field("description", maybe(C::String)),
    ]
}

fn responses() -> [Schema; 5] {
    [
        Schema::new(N::AddVinylResponse, "A stored vinyl record.")
            .field("success", C::Boolean)
            .field("vinyl", C::Schema(N::VinylRecord)),
        Schema::new(N::CrateListResponse, "One page of a user's collection.")
            .field("success", C::Boolean)
            .field("records", list_of(N::VinylRecord))
            .field("pagination", C::Schema(N::Pagination)),
        Schema::new(N::CrateResponse, "A stored crate.")
            .field("success", C::Boolean)
            .field("crate", C::Schema(N::VinylCrate)),
        Schema::new(N::RemovedResponse, "Acknowledgement of a removal.")
            .field("success", C::Boolean),
        Schema::new(N::StatusDescriptor, "Meaning of a provider response code.")
            .field("code", C::Integer)
            .field("name", C::NonEmptyString)
            .field("details", C::NonEmptyString)
            .field("is_success", C::Boolean),
    ]
}

/// Every registry entry.
pub(super) fn all() -> Vec<Schema> {
    let mut schemas = Vec::with_capacity(N::ALL.len());
    for pair in [
        image(),
        artist(),
        label(),
        track(),
        release(),
        release_version(),
        user(),
        vinyl_record(),
        vinyl_crate(),
        listing(),
    ] {
        schemas.extend(pair);
    }
    schemas.push(pagination());
    schemas.extend(route_params());
    schemas.extend(request_bodies());
    schemas.extend(responses());
    schemas
}
