//! UUID-backed record identifiers.

use thiserror::Error;

/// Raised when a path segment or reference is not a record identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{value}` is not a valid record identifier")]
pub struct InvalidRecordId {
    /// The rejected input.
    pub value: String,
}

/// Canonical join key for an identifier given in any textual form.
///
/// UUIDs normalise to lowercase hyphenated text so the aggregator can match
/// keys produced by different stores; anything else is trimmed and lowercased.
pub fn canonical_key(raw: &str) -> String {
    match uuid::Uuid::parse_str(raw.trim()) {
        Ok(uuid) => uuid.hyphenated().to_string(),
        Err(_) => raw.trim().to_ascii_lowercase(),
    }
}

macro_rules! define_record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(::uuid::Uuid);

        impl $name {
            /// Parse an identifier, accepting any UUID spelling.
            pub fn new(
                raw: impl AsRef<str>,
            ) -> Result<Self, $crate::domain::record_id::InvalidRecordId> {
                let raw = raw.as_ref();
                ::uuid::Uuid::parse_str(raw.trim()).map(Self).map_err(|_| {
                    $crate::domain::record_id::InvalidRecordId {
                        value: raw.to_owned(),
                    }
                })
            }

            /// Generate a fresh identifier.
            pub fn random() -> Self {
                Self(::uuid::Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            pub const fn from_uuid(uuid: ::uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Access the underlying UUID.
            pub const fn as_uuid(&self) -> &::uuid::Uuid {
                &self.0
            }

            /// Lowercase hyphenated form used as a join key.
            pub fn canonical_key(&self) -> String {
                self.0.hyphenated().to_string()
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.0.hyphenated(), f)
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::domain::record_id::InvalidRecordId;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.to_string()
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::domain::record_id::InvalidRecordId;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

pub(crate) use define_record_id;
