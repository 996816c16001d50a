use sqlx::{postgres::PgArguments, query::Query, Postgres};

use crate::meta::{col_value::ColValue, pg::pg_col_type::PgColType};

pub trait SqlxPgExt<'q> {
    fn bind_col_value<'b: 'q>(self, col_value: Option<&'b ColValue>, col_type: &PgColType) -> Self;
}

impl<'q> SqlxPgExt<'q> for Query<'q, Postgres, PgArguments> {
    fn bind_col_value<'b: 'q>(self, col_value: Option<&'b ColValue>, col_type: &PgColType) -> Self {
        if let Some(value) = col_value {
            match value {
                ColValue::Bool(v) => self.bind(v),
                ColValue::Short(v) => self.bind(v),
                ColValue::Long(v) => self.bind(v),
                ColValue::LongLong(v) => self.bind(v),
                ColValue::Float(v) => self.bind(v),
                ColValue::Double(v) => self.bind(v),
                ColValue::Decimal(v) => self.bind(v),
                ColValue::Time(v) => self.bind(v),
                ColValue::Date(v) => self.bind(v),
                ColValue::DateTime(v) => self.bind(v),
                ColValue::Timestamp(v) => self.bind(v),
                ColValue::String(v) => self.bind(v),
                ColValue::Enum(v) => self.bind(v),
                ColValue::Json(v) => self.bind(v),
                ColValue::StringArray(v) => self.bind(v),
                ColValue::None => match col_type.alias.as_str() {
                    "bool" => {
                        let none: Option<bool> = Option::None;
                        self.bind(none)
                    }

                    "int2" => {
                        let none: Option<i16> = Option::None;
                        self.bind(none)
                    }

                    "int4" => {
                        let none: Option<i32> = Option::None;
                        self.bind(none)
                    }

                    "int8" => {
                        let none: Option<i64> = Option::None;
                        self.bind(none)
                    }

                    "float4" => {
                        let none: Option<f32> = Option::None;
                        self.bind(none)
                    }

                    "float8" => {
                        let none: Option<f64> = Option::None;
                        self.bind(none)
                    }

                    _ => {
                        let none: Option<String> = Option::None;
                        self.bind(none)
                    }
                },
            }
        } else {
            let none: Option<String> = Option::None;
            self.bind(none)
        }
    }
}
