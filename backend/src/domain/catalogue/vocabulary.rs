//! Closed vocabularies shared by the catalogue schemas.
//!
//! Each vocabulary is a fieldless enum whose wire form is the provider's
//! label. The label lists double as the member sets for enumerated schema
//! constraints, so a value accepted by the schema registry always parses into
//! the matching enum.

use std::fmt;
use std::str::FromStr;

macro_rules! define_vocabulary {
    (
        $(#[$outer:meta])*
        pub enum $name:ident / $error:ident ($what:literal) {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $label:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )+
        }

        impl $name {
            /// Every member, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];
            /// Wire labels, in declaration order.
            pub const LABELS: &'static [&'static str] = &[$($label),+];

            /// Wire label for this member.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        #[doc = concat!("Parse error for [`", stringify!($name), "`].")]
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $error {
            /// Rejected input.
            pub input: String,
        }

        impl fmt::Display for $error {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!("invalid ", $what, ": {:?}"), self.input)
            }
        }

        impl std::error::Error for $error {}

        impl FromStr for $name {
            type Err = $error;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($label => Ok(Self::$variant),)+
                    _ => Err($error {
                        input: value.to_owned(),
                    }),
                }
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

define_vocabulary! {
    /// Condition rating for a physical item's media or sleeve.
    ///
    /// `Unknown` (the empty label) marks an item that has not been graded.
    pub enum Grading / ParseGradingError ("grading") {
        /// Not yet graded.
        Unknown => "",
        /// Mint.
        Mint => "M",
        /// Near Mint.
        NearMint => "NM",
        /// Very Good Plus.
        VeryGoodPlus => "VG+",
        /// Very Good.
        VeryGood => "VG",
        /// Good Plus.
        GoodPlus => "G+",
        /// Good.
        Good => "G",
        /// Fair.
        Fair => "F",
        /// Poor.
        Poor => "P",
    }
}

define_vocabulary! {
    /// Physical or digital format of a release version.
    pub enum MediaFormat / ParseMediaFormatError ("media format") {
        /// Multi-item box set.
        BoxSet => "Box Set",
        /// Cassette tape.
        Cassette => "Cassette",
        /// Compact disc.
        Cd => "CD",
        /// Digital file.
        File => "File",
        /// Vinyl record.
        Vinyl => "Vinyl",
    }
}

define_vocabulary! {
    /// Provider-assigned confidence in a catalogue entry.
    pub enum DataQuality / ParseDataQualityError ("data quality") {
        /// Freshly submitted, not yet reviewed.
        NewSubmission => "New Submission",
        /// Edited recently.
        RecentlyEdited => "Recently Edited",
        /// Reviewed and correct.
        Correct => "Correct",
        /// Awaiting votes.
        NeedsVote => "Needs Vote",
        /// Requires substantial corrections.
        NeedsMajorChanges => "Needs Major Changes",
        /// Requires small corrections.
        NeedsMinorChanges => "Needs Minor Changes",
        /// Known to be wrong.
        EntirelyIncorrect => "Entirely Incorrect",
    }
}

define_vocabulary! {
    /// Role of an image attached to an artist, label or release.
    pub enum ImageKind / ParseImageKindError ("image kind") {
        /// Main artwork.
        Primary => "primary",
        /// Supplementary artwork.
        Secondary => "secondary",
    }
}

define_vocabulary! {
    /// Currencies accepted for marketplace listings.
    pub enum Currency / ParseCurrencyError ("currency") {
        /// U.S. Dollar.
        Usd => "USD",
        /// Pound Sterling.
        Gbp => "GBP",
        /// Euro.
        Eur => "EUR",
        /// Canadian Dollar.
        Cad => "CAD",
        /// Australian Dollar.
        Aud => "AUD",
        /// Japanese Yen.
        Jpy => "JPY",
        /// Swiss Franc.
        Chf => "CHF",
        /// Mexican Peso.
        Mxn => "MXN",
        /// Brazilian Real.
        Brl => "BRL",
        /// New Zealand Dollar.
        Nzd => "NZD",
        /// Swedish Krona.
        Sek => "SEK",
        /// South African Rand.
        Zar => "ZAR",
    }
}

impl Currency {
    /// Human-readable currency name.
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Usd => "U.S. Dollar",
            Self::Gbp => "Pound Sterling",
            Self::Eur => "Euro",
            Self::Cad => "Canadian Dollar",
            Self::Aud => "Australian Dollar",
            Self::Jpy => "Japanese Yen",
            Self::Chf => "Swiss Franc",
            Self::Mxn => "Mexican Peso",
            Self::Brl => "Brazilian Real",
            Self::Nzd => "New Zealand Dollar",
            Self::Sek => "Swedish Krona",
            Self::Zar => "South African Rand",
        }
    }
}
