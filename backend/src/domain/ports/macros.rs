//! `define_port_error!`: port error enums with constructors and stable kinds.
//!
//! A variant listed as `Name { field: Type, .. } => "message"` becomes a
//! `thiserror` variant, a snake-case constructor taking `impl Into<Type>` for
//! each field, and an arm of `kind()`, which returns the same snake-case name
//! for use as a structured log field.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )+
        }

        ::paste::paste! {
            impl $name {
                $(
                    /// Build the variant of the same name.
                    pub fn [<$variant:snake>]($( $( $field: impl Into<$ty> ),* )?) -> Self {
                        Self::$variant $( { $( $field: $field.into() ),* } )?
                    }
                )+

                /// Snake-case variant name, stable across message changes.
                pub const fn kind(&self) -> &'static str {
                    match self {
                        $( Self::$variant { .. } => stringify!([<$variant:snake>]), )+
                    }
                }
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    use rstest::rstest;

    define_port_error! {
        pub enum ShelfError {
            Offline => "shelf offline",
            Missing { slot: u32 } => "slot {slot} is empty",
            Jammed { slot: u32, reason: String } => "slot {slot} jammed: {reason}",
        }
    }

    #[test]
    fn fields_accept_convertible_arguments() {
        assert_eq!(
            ShelfError::jammed(3_u32, "warped sleeve"),
            ShelfError::Jammed {
                slot: 3,
                reason: "warped sleeve".to_owned()
            }
        );
    }

    #[rstest]
    #[case(ShelfError::offline(), "offline", "shelf offline")]
    #[case(ShelfError::missing(9_u32), "missing", "slot 9 is empty")]
    #[case(ShelfError::jammed(1_u32, "dust"), "jammed", "slot 1 jammed: dust")]
    fn kinds_and_messages(
        #[case] error: ShelfError,
        #[case] kind: &str,
        #[case] message: &str,
    ) {
        assert_eq!(error.kind(), kind);
        assert_eq!(error.to_string(), message);
    }
}
