//! Role endpoints

use super::{ApiError, FleetClient};
use crate::models::{NewRole, Role};

impl FleetClient {
    /// Roles assignable within the caller's group
    pub async fn list_roles(&self) -> Result<Vec<Role>, ApiError> {
        self.post_empty::<Vec<Role>>("role/list-in-group")
            .await?
            .into_data()
    }

    /// Create a role
    pub async fn add_role(&self, role: &NewRole) -> Result<(), ApiError> {
        self.post_json::<_, serde_json::Value>("role/add", role)
            .await?
            .into_ack()
    }
}
