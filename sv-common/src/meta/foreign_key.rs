use serde::Serialize;
use strum::{Display, EnumString, IntoStaticStr};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Display, EnumString, IntoStaticStr)]
pub enum RefAction {
    #[strum(serialize = "cascade")]
    Cascade,
    #[strum(serialize = "restrict")]
    Restrict,
    #[strum(serialize = "set-null")]
    SetNull,
    #[strum(serialize = "no-action")]
    NoAction,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForeignKey {
    pub col: String,
    pub ref_tb: String,
    pub ref_col: String,
    pub on_update: RefAction,
    pub on_delete: RefAction,
}

impl ForeignKey {
    pub fn new(
        col: &str,
        ref_tb: &str,
        ref_col: &str,
        on_update: RefAction,
        on_delete: RefAction,
    ) -> Self {
        Self {
            col: col.to_string(),
            ref_tb: ref_tb.to_string(),
            ref_col: ref_col.to_string(),
            on_update,
            on_delete,
        }
    }

    pub fn is_self_reference(&self, tb: &str) -> bool {
        self.ref_tb == tb
    }
}
