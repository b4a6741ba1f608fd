//! Cart line quantity.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Errors that can occur when constructing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// The input is not an integral number.
    #[error("quantity must be an integer")]
    NotAnInteger,
    /// The input is zero or negative.
    #[error("quantity must be greater than zero")]
    NotPositive,
    /// The input does not fit in the storage type.
    #[error("quantity must be at most {max}")]
    TooLarge {
        /// Maximum allowed quantity.
        max: i32,
    },
}

/// A strictly positive item count.
///
/// ## Examples
///
/// ```
/// use bazaar_core::Quantity;
/// use serde_json::json;
///
/// assert!(Quantity::from_json(&json!(3)).is_ok());
/// assert!(Quantity::from_json(&json!(2.0)).is_ok());   // integral float
///
/// assert!(Quantity::from_json(&json!(0)).is_err());
/// assert!(Quantity::from_json(&json!(1.5)).is_err());
/// assert!(Quantity::from_json(&json!("2")).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Quantity(i32);

impl Quantity {
    /// Create a quantity from an integer.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::NotPositive` for zero or negative input and
    /// `QuantityError::TooLarge` if the value exceeds `i32::MAX`.
    pub fn new(value: i64) -> Result<Self, QuantityError> {
        if value <= 0 {
            return Err(QuantityError::NotPositive);
        }
        i32::try_from(value)
            .map(Self)
            .map_err(|_| QuantityError::TooLarge { max: i32::MAX })
    }

    /// Create a quantity from an untyped JSON value.
    ///
    /// Floats with no fractional part are accepted; strings never are.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::NotAnInteger` if the value is not an integral number.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, QuantityError> {
        if let Some(n) = value.as_i64() {
            return Self::new(n);
        }
        if value.is_u64() {
            return Err(QuantityError::TooLarge { max: i32::MAX });
        }

        let float = value.as_f64().ok_or(QuantityError::NotAnInteger)?;
        if !float.is_finite() || float.fract() != 0.0 {
            return Err(QuantityError::NotAnInteger);
        }
        if float <= 0.0 {
            return Err(QuantityError::NotPositive);
        }
        if float > f64::from(i32::MAX) {
            return Err(QuantityError::TooLarge { max: i32::MAX });
        }
        #[allow(clippy::cast_possible_truncation)] // Range and integrality checked above
        let n = float as i32;
        Ok(Self(n))
    }

    /// Get the underlying value.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = i64::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Quantity {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i32 as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <i32 as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Quantity {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let n = <i32 as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(i64::from(n))?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Quantity {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i32 as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}
