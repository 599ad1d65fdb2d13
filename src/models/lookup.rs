//! Lookup lists used by the creation forms

use super::id::string_or_number;
use serde::{Deserialize, Serialize};

/// Role option from `/role/list-in-group`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
}

/// Company option from `/company/list`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Company {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
}

/// Province or city from `/area/list-children`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Area {
    #[serde(deserialize_with = "string_or_number")]
    pub code: String,
    pub name: String,
}

/// Body of `/area/list-children` when asking for a province's cities
#[derive(Debug, Clone, Serialize)]
pub struct AreaQuery<'a> {
    pub parent: &'a str,
}

/// Body of `/role/add`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRole {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
