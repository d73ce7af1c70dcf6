//! Closed vocabularies and shared value types
//!
//! Every vocabulary carries the integer code stored in the database. Codes are
//! validated once, at deserialization or row decoding, through `TryFrom<i32>`
//! and are trusted afterwards.

pub mod gene;
pub mod geneset;
pub mod messages;
pub mod species;
pub mod user;

pub use gene::GeneIdentifier;
pub use geneset::{GenesetAccess, GenesetScoreType, GenesetTier, ScoreType};
pub use messages::{Message, MessageResponse, MessageType};
pub use species::Species;
pub use user::AppRole;

/// Declare an enum backed by fixed integer codes.
///
/// Generates `code()`, `name()`, `ALL`, `TryFrom<i32>`, `From<Self> for i32`,
/// `Display` (the human name) and serde as the bare integer.
macro_rules! coded_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident ($vocabulary:literal) {
            $($(#[$vmeta:meta])* $variant:ident = $code:literal => $label:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[derive(serde::Serialize, serde::Deserialize)]
        #[serde(try_from = "i32", into = "i32")]
        $vis enum $name {
            $($(#[$vmeta])* $variant = $code,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub fn code(self) -> i32 {
                self as i32
            }

            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl TryFrom<i32> for $name {
            type Error = $crate::GwError;

            fn try_from(code: i32) -> ::std::result::Result<Self, Self::Error> {
                match code {
                    $($code => Ok($name::$variant),)+
                    other => Err($crate::GwError::invalid_code($vocabulary, other)),
                }
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> i32 {
                value.code()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

pub(crate) use coded_enum;

/// Lowercase and collapse internal whitespace, for name lookups.
pub(crate) fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
