//! Organization endpoints

use super::{ApiError, FleetClient};
use crate::models::OrgNode;

impl FleetClient {
    /// Organization hierarchy visible to the signed-in account
    pub async fn list_groups(&self) -> Result<Vec<OrgNode>, ApiError> {
        self.post_empty::<Vec<OrgNode>>("group/list-for-self")
            .await?
            .into_data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test]
    async fn test_list_groups() {
        let server = MockServer::start_async().await;
        let m = server.mock(|when, then| {
            when.method(Method::POST).path("/group/list-for-self");
            then.status(200).json_body(json!({
                "code": 0,
                "data": [{"id": "3", "name": "Head office", "children": [{"id": "7", "name": "Depot East"}]}],
                "msg": "success"
            }));
        });

        let client = FleetClient::new(server.base_url(), None, Duration::from_secs(5)).unwrap();
        let groups = client.list_groups().await.unwrap();

        m.assert();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].children()[0].name, "Depot East");
    }

    #[tokio::test]
    async fn test_list_groups_rejected() {
        let server = MockServer::start_async().await;
        let _m = server.mock(|when, then| {
            when.method(Method::POST).path("/group/list-for-self");
            then.status(200)
                .json_body(json!({"code": 401, "data": null, "msg": "session expired"}));
        });

        let client = FleetClient::new(server.base_url(), None, Duration::from_secs(5)).unwrap();
        let err = client.list_groups().await.unwrap_err();

        assert_eq!(err.user_message("Failed to load organization tree"), "session expired");
    }
}
