use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColValue {
    None,
    Bool(bool),
    Short(i16),
    Long(i32),
    LongLong(i64),
    Float(f32),
    Double(f64),
    Decimal(String),
    Time(String),
    Date(String),
    DateTime(String),
    Timestamp(String),
    String(String),
    Enum(String),
    Json(String),
    StringArray(Vec<String>),
}

impl std::fmt::Display for ColValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.to_option_string().unwrap_or("NULL".to_string())
        )
    }
}

impl ColValue {
    pub fn to_option_string(&self) -> Option<String> {
        match self {
            ColValue::Bool(v) => Some(v.to_string()),
            ColValue::Short(v) => Some(v.to_string()),
            ColValue::Long(v) => Some(v.to_string()),
            ColValue::LongLong(v) => Some(v.to_string()),
            ColValue::Float(v) => Some(v.to_string()),
            ColValue::Double(v) => Some(v.to_string()),
            ColValue::Decimal(v) => Some(v.to_string()),
            ColValue::Time(v) => Some(v.to_string()),
            ColValue::Date(v) => Some(v.to_string()),
            ColValue::DateTime(v) => Some(v.to_string()),
            ColValue::Timestamp(v) => Some(v.to_string()),
            ColValue::String(v) => Some(v.to_string()),
            ColValue::Enum(v) => Some(v.to_string()),
            ColValue::Json(v) => Some(v.to_string()),
            ColValue::StringArray(v) => Some(format!("{{{}}}", v.join(","))),
            ColValue::None => Option::None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, ColValue::None)
    }
}
