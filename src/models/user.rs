//! User list and user creation models

use super::id::string_or_number;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Date format used on the wire and in the forms
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One row of the `/user/page` result
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRow {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    pub name: Option<String>,

    pub account: Option<String>,

    pub group_name: Option<String>,

    pub role_name: Option<String>,

    /// Sent as a code or a label depending on the deployment
    pub user_type: Option<JsonValue>,

    pub start_date: Option<String>,

    pub end_date: Option<String>,
}

impl UserRow {
    /// Table cells in column order, `-` for anything missing
    pub fn cells(&self) -> [String; 7] {
        let text = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
        [
            text(&self.name),
            text(&self.account),
            text(&self.group_name),
            text(&self.role_name),
            self.user_type
                .as_ref()
                .map(display_value)
                .unwrap_or_else(|| "-".to_string()),
            text(&self.start_date),
            text(&self.end_date),
        ]
    }
}

/// Format a JSON value for display
pub fn display_value(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => "-".to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::String(s) => s.clone(),
        JsonValue::Array(arr) => format!("[{} items]", arr.len()),
        JsonValue::Object(_) => "{...}".to_string(),
    }
}

/// `data` of a successful `/user/page` response
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPage {
    pub content: Vec<UserRow>,
    pub total_elements: u64,
}

/// Body of `/user/page`. `page` is zero-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPageQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    pub page: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_path: Option<String>,

    pub size: usize,
}

/// Body of `/user/add`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub account: String,
    pub password: String,
    pub org_id: String,
    pub company_id: String,
    pub province: String,
    pub city: String,
    pub map_level: u32,
    #[serde(with = "ymd")]
    pub start_date: NaiveDate,
    #[serde(with = "ymd")]
    pub end_date: NaiveDate,
    pub freeze_upon_expiration: bool,
    pub role_ids: Vec<i64>,
    pub parent_path: String,
}

/// `YYYY-MM-DD` dates on the wire
mod ymd {
    use super::DATE_FORMAT;
    use chrono::NaiveDate;
    use serde::Serializer;

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&date.format(DATE_FORMAT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_query_omits_absent_fields() {
        let query = UserPageQuery {
            search: None,
            page: 0,
            parent_path: None,
            size: 20,
        };
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({"page": 0, "size": 20})
        );

        let query = UserPageQuery {
            search: Some("Zhang".to_string()),
            page: 2,
            parent_path: Some(String::new()),
            size: 20,
        };
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({"search": "Zhang", "page": 2, "parentPath": "", "size": 20})
        );
    }

    #[test]
    fn test_user_page_decodes_partial_rows() {
        let page: UserPage = serde_json::from_value(json!({
            "content": [
                {"id": 11, "name": "Zhang Wei", "account": "zhangwei", "groupName": "Depot East",
                 "roleName": "Dispatcher", "userType": 1, "startDate": "2024-01-01", "endDate": "2025-01-01"},
                {"id": "12", "name": "Li Na"}
            ],
            "totalElements": 42
        }))
        .unwrap();

        assert_eq!(page.total_elements, 42);
        assert_eq!(page.content[0].cells()[4], "1");
        assert_eq!(page.content[1].id, "12");
        assert_eq!(page.content[1].cells()[1], "-");
    }

    #[test]
    fn test_new_user_wire_format() {
        let user = NewUser {
            name: "Zhang Wei".to_string(),
            account: "zhangwei".to_string(),
            password: "secret".to_string(),
            org_id: "7".to_string(),
            company_id: "c1".to_string(),
            province: "44".to_string(),
            city: "4401".to_string(),
            map_level: 12,
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 2, 28).unwrap(),
            freeze_upon_expiration: true,
            role_ids: vec![1, 4],
            parent_path: "/3/".to_string(),
        };

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["orgId"], "7");
        assert_eq!(value["startDate"], "2024-03-01");
        assert_eq!(value["endDate"], "2025-02-28");
        assert_eq!(value["freezeUponExpiration"], true);
        assert_eq!(value["roleIds"], json!([1, 4]));
        assert_eq!(value["parentPath"], "/3/");
        assert!(value.get("confirmPassword").is_none());
    }
}
