//! Convert JSON payload values to types that sqlx can bind.

use crate::error::AppError;
use serde_json::Value;
use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::Database;

/// A value bound to one PostgreSQL placeholder.
#[derive(Clone, Debug, PartialEq)]
pub enum PgBindValue {
    Null,
    /// NULL destined for a binary column. Declared as BYTEA, because a
    /// generic text-typed null cannot be cast to bytea on the server.
    NullBytes,
    Bool(bool),
    I64(i64),
    F64(f64),
    String(String),
    /// Decoded binary (e.g. a profile image after base64 decode).
    Bytes(Vec<u8>),
}

impl PgBindValue {
    pub fn from_json(v: &Value) -> Result<Self, AppError> {
        Ok(match v {
            Value::Null => PgBindValue::Null,
            Value::Bool(b) => PgBindValue::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    PgBindValue::I64(i)
                } else if let Some(f) = n.as_f64() {
                    PgBindValue::F64(f)
                } else {
                    return Err(AppError::Validation(format!("unrepresentable number: {}", n)));
                }
            }
            Value::String(s) => PgBindValue::String(s.clone()),
            Value::Array(_) | Value::Object(_) => {
                return Err(AppError::Validation(
                    "nested arrays and objects are not valid field values".into(),
                ))
            }
        })
    }
}

impl<'q> Encode<'q, Postgres> for PgBindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        Ok(match self {
            PgBindValue::Null => <Option<i32> as Encode<Postgres>>::encode_by_ref(&None, buf)?,
            PgBindValue::NullBytes => {
                <Option<Vec<u8>> as Encode<Postgres>>::encode_by_ref(&None, buf)?
            }
            PgBindValue::Bool(b) => <bool as Encode<Postgres>>::encode_by_ref(b, buf)?,
            PgBindValue::I64(n) => <i64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            PgBindValue::F64(n) => <f64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            PgBindValue::String(s) => {
                let s_ref: &str = s.as_str();
                <&str as Encode<Postgres>>::encode_by_ref(&s_ref, buf)?
            }
            PgBindValue::Bytes(b) => {
                let b_ref: &[u8] = b.as_slice();
                <&[u8] as Encode<Postgres>>::encode_by_ref(&b_ref, buf)?
            }
        })
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        Some(match self {
            PgBindValue::Null => PgTypeInfo::with_name("TEXT"),
            PgBindValue::NullBytes => PgTypeInfo::with_name("BYTEA"),
            PgBindValue::Bool(_) => PgTypeInfo::with_name("BOOL"),
            PgBindValue::I64(_) => PgTypeInfo::with_name("INT8"),
            PgBindValue::F64(_) => PgTypeInfo::with_name("FLOAT8"),
            PgBindValue::String(_) => PgTypeInfo::with_name("TEXT"),
            PgBindValue::Bytes(_) => PgTypeInfo::with_name("BYTEA"),
        })
    }
}

impl sqlx::Type<Postgres> for PgBindValue {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("TEXT")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_convert() {
        assert_eq!(PgBindValue::from_json(&Value::Null).unwrap(), PgBindValue::Null);
        assert_eq!(PgBindValue::from_json(&json!(true)).unwrap(), PgBindValue::Bool(true));
        assert_eq!(PgBindValue::from_json(&json!(42)).unwrap(), PgBindValue::I64(42));
        assert_eq!(PgBindValue::from_json(&json!(1.5)).unwrap(), PgBindValue::F64(1.5));
        assert_eq!(
            PgBindValue::from_json(&json!("hi")).unwrap(),
            PgBindValue::String("hi".into())
        );
    }

    #[test]
    fn binary_null_declares_bytea() {
        use sqlx::encode::Encode;
        assert_eq!(
            PgBindValue::NullBytes.produces(),
            Some(PgTypeInfo::with_name("BYTEA"))
        );
        // The generic null stays text-typed; it relies on the builder's
        // cast, which exists from text to every non-binary column type.
        assert_eq!(
            PgBindValue::Null.produces(),
            Some(PgTypeInfo::with_name("TEXT"))
        );
    }

    #[test]
    fn nested_values_are_rejected() {
        assert!(matches!(
            PgBindValue::from_json(&json!([1, 2])),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            PgBindValue::from_json(&json!({"a": 1})),
            Err(AppError::Validation(_))
        ));
    }
}
