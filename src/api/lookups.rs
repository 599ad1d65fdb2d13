//! Company and administrative area lookups

use super::{ApiError, FleetClient};
use crate::models::{Area, AreaQuery, Company};

impl FleetClient {
    /// Companies a user can belong to
    pub async fn list_companies(&self) -> Result<Vec<Company>, ApiError> {
        self.post_empty::<Vec<Company>>("company/list")
            .await?
            .into_data()
    }

    /// Provinces when `parent` is `None`, otherwise the cities of that province
    pub async fn list_areas(&self, parent: Option<&str>) -> Result<Vec<Area>, ApiError> {
        let envelope = match parent {
            Some(parent) => {
                self.post_json::<_, Vec<Area>>("area/list-children", &AreaQuery { parent })
                    .await?
            }
            None => self.post_empty::<Vec<Area>>("area/list-children").await?,
        };
        envelope.into_data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test]
    async fn test_list_cities_of_province() {
        let server = MockServer::start_async().await;
        let m = server.mock(|when, then| {
            when.method(Method::POST)
                .path("/area/list-children")
                .json_body(json!({"parent": "44"}));
            then.status(200).json_body(json!({
                "code": 0,
                "data": [{"code": 4401, "name": "Guangzhou"}, {"code": "4403", "name": "Shenzhen"}],
                "msg": "success"
            }));
        });

        let client = FleetClient::new(server.base_url(), None, Duration::from_secs(5)).unwrap();
        let cities = client.list_areas(Some("44")).await.unwrap();

        m.assert();
        assert_eq!(cities[0].code, "4401");
        assert_eq!(cities[1].name, "Shenzhen");
    }

    #[tokio::test]
    async fn test_list_companies() {
        let server = MockServer::start_async().await;
        let _m = server.mock(|when, then| {
            when.method(Method::POST).path("/company/list");
            then.status(200).json_body(json!({
                "code": 0,
                "data": [{"id": 9, "name": "Yunxiang Taxi"}],
                "msg": "success"
            }));
        });

        let client = FleetClient::new(server.base_url(), None, Duration::from_secs(5)).unwrap();
        let companies = client.list_companies().await.unwrap();

        assert_eq!(companies[0].id, "9");
    }
}
