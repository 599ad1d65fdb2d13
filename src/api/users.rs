//! User endpoints

use super::{ApiError, FleetClient};
use crate::models::{NewUser, UserPage, UserPageQuery};

impl FleetClient {
    /// One page of users matching the query
    pub async fn page_users(&self, query: &UserPageQuery) -> Result<UserPage, ApiError> {
        self.post_json::<_, UserPage>("user/page", query)
            .await?
            .into_data()
    }

    /// Create a user
    pub async fn add_user(&self, user: &NewUser) -> Result<(), ApiError> {
        self.post_json::<_, serde_json::Value>("user/add", user)
            .await?
            .into_ack()
    }
}
