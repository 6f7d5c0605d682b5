//! Catalogue vocabulary and collection entities.

mod vinyl;
mod vocabulary;

pub use vinyl::{NewCrate, ReleaseVersionSummary, VinylCrate, VinylDetails, VinylKey, VinylRecord};
pub use vocabulary::{
    Currency, DataQuality, Grading, ImageKind, MediaFormat, ParseCurrencyError,
    ParseDataQualityError, ParseGradingError, ParseImageKindError, ParseMediaFormatError,
};
