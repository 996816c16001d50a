use anyhow::bail;
use serde_json::{Number, Value};
use sqlx::{postgres::PgRow, Row};

use crate::error::Error;
use crate::meta::{col_value::ColValue, pg::pg_col_type::PgColType};

pub struct PgColValueConvertor {}

impl PgColValueConvertor {
    /// Cast appended to a column in extract SQL so the value arrives in a
    /// text form that round-trips through a snapshot. Empty means no cast.
    pub fn get_extract_type(col_type: &PgColType) -> String {
        if col_type.is_array() {
            return "text[]".to_string();
        }

        let extract_type = match col_type.alias.as_str() {
            "citext" | "hstore" | "char" | "varchar" | "text" | "json" | "jsonb" | "xml"
            | "uuid" | "inet" | "cidr" | "macaddr" | "macaddr8" => "text",

            "bit" | "varbit" => "text",

            "numeric" | "decimal" => "text",

            "date" | "timestamp" | "time" => "text",

            "timestamptz" | "timetz" => "text",

            "interval" | "money" | "oid" => "text",

            // no need to cast
            _ => "",
        };

        if extract_type.is_empty() && (col_type.is_enum() || col_type.is_user_defined()) {
            return "text".to_string();
        }
        extract_type.to_string()
    }

    pub fn from_query(row: &PgRow, col: &str, col_type: &PgColType) -> anyhow::Result<ColValue> {
        let value: Option<Vec<u8>> = row.get_unchecked(col);
        if value.is_none() {
            return Ok(ColValue::None);
        }

        if col_type.is_array() {
            let value: Vec<String> = row.try_get(col)?;
            return Ok(ColValue::StringArray(value));
        }

        if col_type.is_enum() {
            let value: String = row.try_get(col)?;
            return Ok(ColValue::Enum(value));
        }

        let col_value = match col_type.alias.as_str() {
            "bool" => {
                let value: bool = row.try_get(col)?;
                ColValue::Bool(value)
            }

            "int2" => {
                let value: i16 = row.try_get(col)?;
                ColValue::Short(value)
            }

            "int4" => {
                let value: i32 = row.try_get(col)?;
                ColValue::Long(value)
            }

            "int8" => {
                let value: i64 = row.try_get(col)?;
                ColValue::LongLong(value)
            }

            "float4" => {
                let value: f32 = row.try_get(col)?;
                ColValue::Float(value)
            }

            "float8" => {
                let value: f64 = row.try_get(col)?;
                ColValue::Double(value)
            }

            "numeric" | "decimal" => {
                let value: String = row.try_get(col)?;
                ColValue::Decimal(value)
            }

            "timestamptz" => {
                let value: String = row.try_get(col)?;
                ColValue::Timestamp(value)
            }

            "timestamp" => {
                let value: String = row.try_get(col)?;
                ColValue::DateTime(value)
            }

            "time" | "timetz" => {
                let value: String = row.try_get(col)?;
                ColValue::Time(value)
            }

            "date" => {
                let value: String = row.try_get(col)?;
                ColValue::Date(value)
            }

            "json" | "jsonb" => {
                let value: String = row.try_get(col)?;
                ColValue::Json(value)
            }

            _ => {
                let value: String = row.try_get(col)?;
                ColValue::String(value)
            }
        };
        Ok(col_value)
    }

    /// Snapshot form of a value: JSON scalars for scalars, arrays for
    /// arrays, inline documents for json columns.
    pub fn to_snapshot_value(col_value: &ColValue) -> anyhow::Result<Value> {
        let value = match col_value {
            ColValue::None => Value::Null,
            ColValue::Bool(v) => Value::Bool(*v),
            ColValue::Short(v) => Value::Number((*v).into()),
            ColValue::Long(v) => Value::Number((*v).into()),
            ColValue::LongLong(v) => Value::Number((*v).into()),
            ColValue::Float(v) => Self::float_to_value(*v as f64),
            ColValue::Double(v) => Self::float_to_value(*v),
            // decimals stay strings so precision is never lost
            ColValue::Decimal(v) => Value::String(v.clone()),
            ColValue::Time(v)
            | ColValue::Date(v)
            | ColValue::DateTime(v)
            | ColValue::Timestamp(v)
            | ColValue::String(v)
            | ColValue::Enum(v) => Value::String(v.clone()),
            ColValue::Json(v) => serde_json::from_str(v)?,
            ColValue::StringArray(v) => {
                Value::Array(v.iter().map(|s| Value::String(s.clone())).collect())
            }
        };
        Ok(value)
    }

    /// Typed parse of a snapshot value against the live column type. A
    /// mismatch means the snapshot no longer fits the schema and the
    /// restore must fail rather than write garbage.
    pub fn from_snapshot_value(value: &Value, col_type: &PgColType) -> anyhow::Result<ColValue> {
        if value.is_null() {
            return Ok(ColValue::None);
        }

        if col_type.is_array() {
            let Value::Array(items) = value else {
                return Self::mismatch(value, col_type);
            };
            let mut strs = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(s) => strs.push(s.clone()),
                    _ => return Self::mismatch(value, col_type),
                }
            }
            return Ok(ColValue::StringArray(strs));
        }

        if col_type.is_enum() {
            let Value::String(s) = value else {
                return Self::mismatch(value, col_type);
            };
            if let Some(enum_values) = &col_type.enum_values {
                if !enum_values.contains(s) {
                    bail! {Error::SnapshotError(format!(
                        r#""{}" is not a value of enum type "{}""#,
                        s, col_type.name
                    ))}
                }
            }
            return Ok(ColValue::Enum(s.clone()));
        }

        let col_value = match col_type.alias.as_str() {
            "bool" => match value {
                Value::Bool(v) => ColValue::Bool(*v),
                _ => return Self::mismatch(value, col_type),
            },

            "int2" => match i16::try_from(Self::as_int(value, col_type)?) {
                Ok(v) => ColValue::Short(v),
                Err(_) => return Self::mismatch(value, col_type),
            },

            "int4" => match i32::try_from(Self::as_int(value, col_type)?) {
                Ok(v) => ColValue::Long(v),
                Err(_) => return Self::mismatch(value, col_type),
            },

            "int8" => ColValue::LongLong(Self::as_int(value, col_type)?),

            "float4" => ColValue::Float(Self::as_float(value, col_type)? as f32),

            "float8" => ColValue::Double(Self::as_float(value, col_type)?),

            "numeric" | "decimal" => match value {
                Value::String(s) => ColValue::Decimal(s.clone()),
                Value::Number(n) => ColValue::Decimal(n.to_string()),
                _ => return Self::mismatch(value, col_type),
            },

            "timestamptz" => ColValue::Timestamp(Self::as_str(value, col_type)?),

            "timestamp" => ColValue::DateTime(Self::as_str(value, col_type)?),

            "time" | "timetz" => ColValue::Time(Self::as_str(value, col_type)?),

            "date" => ColValue::Date(Self::as_str(value, col_type)?),

            "json" | "jsonb" => ColValue::Json(value.to_string()),

            _ => ColValue::String(Self::as_str(value, col_type)?),
        };
        Ok(col_value)
    }

    fn as_int(value: &Value, col_type: &PgColType) -> anyhow::Result<i64> {
        match value.as_i64() {
            Some(v) => Ok(v),
            Option::None => Self::mismatch(value, col_type),
        }
    }

    fn as_float(value: &Value, col_type: &PgColType) -> anyhow::Result<f64> {
        match value {
            Value::Number(n) => match n.as_f64() {
                Some(v) => Ok(v),
                Option::None => Self::mismatch(value, col_type),
            },
            // NaN and infinities are exported as strings
            Value::String(s) => match s.parse::<f64>() {
                Ok(v) => Ok(v),
                Err(_) => Self::mismatch(value, col_type),
            },
            _ => Self::mismatch(value, col_type),
        }
    }

    fn as_str(value: &Value, col_type: &PgColType) -> anyhow::Result<String> {
        match value {
            Value::String(s) => Ok(s.clone()),
            _ => Self::mismatch(value, col_type),
        }
    }

    fn float_to_value(v: f64) -> Value {
        match Number::from_f64(v) {
            Some(n) => Value::Number(n),
            Option::None => Value::String(v.to_string()),
        }
    }

    fn mismatch<T>(value: &Value, col_type: &PgColType) -> anyhow::Result<T> {
        bail! {Error::SnapshotError(format!(
            "value {} does not match column type {}",
            value, col_type.name
        ))}
    }
}
