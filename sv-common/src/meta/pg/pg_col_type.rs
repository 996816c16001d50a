use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PgColType {
    pub name: String,
    pub alias: String,
    pub category: String,
    pub element_name: String,
    pub enum_values: Option<Vec<String>>,
}

impl std::fmt::Display for PgColType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", json!(self))
    }
}

impl PgColType {
    pub fn is_enum(&self) -> bool {
        "E" == self.category
    }

    pub fn is_array(&self) -> bool {
        "A" == self.category
    }

    pub fn is_user_defined(&self) -> bool {
        "U" == self.category
    }

    /// Type name usable in a `$n::type` placeholder cast.
    pub fn cast_name(&self) -> String {
        if self.is_array() {
            return format!("{}[]", self.element_name);
        }
        if self.is_enum() || self.is_user_defined() {
            // user-defined names may be mixed case
            return format!(r#""{}""#, self.name);
        }
        self.alias.clone()
    }
}
