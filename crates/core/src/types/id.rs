//! Object ids and newtype wrappers for type-safe entity references.
//!
//! Every stored entity is keyed by an [`ObjectId`]: 12 bytes rendered as
//! exactly 24 hexadecimal characters. Use the `define_id!` macro to create
//! wrappers that prevent accidentally mixing ids from different entity types.

use core::fmt;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when parsing an [`ObjectId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ObjectIdError {
    /// The input is not exactly 24 characters long.
    #[error("object id must be {expected} characters (got {actual})")]
    InvalidLength {
        /// Required length.
        expected: usize,
        /// Length of the rejected input.
        actual: usize,
    },
    /// The input contains a non-hexadecimal character.
    #[error("object id must contain only hexadecimal characters")]
    InvalidCharacter,
}

/// A 12-byte document identifier.
///
/// ## Layout
///
/// - bytes 0..4: seconds since the Unix epoch, big-endian
/// - bytes 4..9: random value fixed for the lifetime of the process
/// - bytes 9..12: counter, big-endian, wrapping
///
/// ## Examples
///
/// ```
/// use bazaar_core::ObjectId;
///
/// assert!(ObjectId::parse("65a1f0c2e4b0a1b2c3d4e5f6").is_ok());
/// assert!(ObjectId::parse("65A1F0C2E4B0A1B2C3D4E5F6").is_ok());
///
/// assert!(ObjectId::parse("65a1f0c2").is_err());                  // too short
/// assert!(ObjectId::parse("zza1f0c2e4b0a1b2c3d4e5f6").is_err());  // not hex
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 12]);

static PROCESS_UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();
static COUNTER: OnceLock<AtomicU32> = OnceLock::new();

impl ObjectId {
    /// Length of the hexadecimal representation.
    pub const HEX_LENGTH: usize = 24;

    /// Parse an `ObjectId` from its 24-character hexadecimal form.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly 24 hexadecimal characters.
    pub fn parse(s: &str) -> Result<Self, ObjectIdError> {
        if s.len() != Self::HEX_LENGTH {
            return Err(ObjectIdError::InvalidLength {
                expected: Self::HEX_LENGTH,
                actual: s.len(),
            });
        }

        let mut bytes = [0_u8; 12];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| ObjectIdError::InvalidCharacter)?;
        Ok(Self(bytes))
    }

    /// Returns `true` if `s` is a well-formed object id.
    #[must_use]
    pub fn is_valid(s: &str) -> bool {
        Self::parse(s).is_ok()
    }

    /// Generate a fresh id from the current time, the process value and the counter.
    #[must_use]
    pub fn generate() -> Self {
        let seconds = u32::try_from(chrono::Utc::now().timestamp()).unwrap_or(u32::MAX);
        let process = PROCESS_UNIQUE.get_or_init(rand::random::<[u8; 5]>);
        let count = COUNTER
            .get_or_init(|| AtomicU32::new(rand::random::<u32>()))
            .fetch_add(1, Ordering::Relaxed);

        let mut bytes = [0_u8; 12];
        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..9].copy_from_slice(process);
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);
        Self(bytes)
    }

    /// Seconds since the Unix epoch encoded in the first four bytes.
    #[must_use]
    pub const fn timestamp(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    /// Returns the raw bytes.
    #[must_use]
    pub const fn bytes(&self) -> [u8; 12] {
        self.0
    }

    /// Returns the lowercase hexadecimal form.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::str::FromStr for ObjectId {
    type Err = ObjectIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

// SQLx support (with postgres feature). Stored as CHAR(24) text.
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for ObjectId {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for ObjectId {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::parse(s.trim_end())?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for ObjectId {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.to_hex(), buf)
    }
}

/// Macro to define a type-safe id wrapper around [`ObjectId`].
///
/// Creates a newtype with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - `generate()`, `parse()`, `as_object_id()`
/// - `Display`, `FromStr` and `From<ObjectId>`
/// - `sqlx` `Type`, `Encode`, and `Decode` implementations (with `postgres` feature)
///
/// # Example
///
/// ```rust
/// # use bazaar_core::define_id;
/// define_id!(WishlistId);
/// define_id!(ReviewId);
///
/// let wishlist = WishlistId::generate();
/// let review = ReviewId::parse("65a1f0c2e4b0a1b2c3d4e5f6").unwrap();
///
/// // These are different types, so this won't compile:
/// // let _: WishlistId = review;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name($crate::ObjectId);

        impl $name {
            /// Generate a new id.
            #[must_use]
            pub fn generate() -> Self {
                Self($crate::ObjectId::generate())
            }

            /// Parse an id from its 24-character hexadecimal form.
            ///
            /// # Errors
            ///
            /// Returns an error if the input is not a well-formed object id.
            pub fn parse(s: &str) -> ::core::result::Result<Self, $crate::ObjectIdError> {
                $crate::ObjectId::parse(s).map(Self)
            }

            /// Get the underlying object id.
            #[must_use]
            pub const fn as_object_id(&self) -> $crate::ObjectId {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::ObjectIdError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl From<$crate::ObjectId> for $name {
            fn from(id: $crate::ObjectId) -> Self {
                Self(id)
            }
        }

        impl From<$name> for $crate::ObjectId {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <$crate::ObjectId as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <$crate::ObjectId as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let id = <$crate::ObjectId as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                Ok(Self(id))
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <$crate::ObjectId as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

// Define standard entity IDs
define_id!(ProductId);
define_id!(CategoryId);
define_id!(CartId);
define_id!(CartItemId);
