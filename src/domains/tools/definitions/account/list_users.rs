//! Tool for listing all workspace users.

use std::sync::Arc;

use futures::FutureExt;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domains::rework::{ReworkClient, ReworkClients};
use crate::domains::tools::definitions::common::{parse_params, pick};
use crate::domains::tools::error::ToolError;
use crate::domains::tools::registry::ToolDefinition;
use crate::domains::tools::schema::{FieldKind, FieldSpec, InputSchema};

const USER_PROPERTIES: &[&str] = &["all", "active", "inactive"];

#[derive(Debug, Deserialize)]
struct ListUsersParams {
    #[allow(dead_code)]
    properties: String,
}

pub struct ListUsersTool;

impl ListUsersTool {
    pub const NAME: &'static str = "list_users";

    const DESCRIPTION: &'static str = "Get users of Rework, returns an array of users containing username, id and name. \
         Every question about a user (assignee, creator, etc.) should use this tool first to \
         get the username and user id, and put them into the params if needed. \
         If you want a user and have not found anyone yet, take the closest match.";

    pub fn definition(clients: &Arc<ReworkClients>) -> ToolDefinition {
        let clients = Arc::clone(clients);
        ToolDefinition::new(Self::NAME, Self::DESCRIPTION, Self::schema(), move |args| {
            let clients = Arc::clone(&clients);
            async move {
                let _params = parse_params::<ListUsersParams>(args)?;
                Self::run(&clients.account).await
            }
            .boxed()
        })
    }

    fn schema() -> InputSchema {
        InputSchema::new().field(
            FieldSpec::new("properties", FieldKind::Enum(USER_PROPERTIES))
                .required()
                .describe(
                    "Required properties, 'all' for all users, 'active' for active users, \
                     'inactive' for inactive users",
                ),
        )
    }

    async fn run(client: &ReworkClient) -> Result<Value, ToolError> {
        let data = client.request("/account/v1/user/all", &Map::new()).await?;
        Ok(Self::summarize(&data))
    }

    fn summarize(data: &Value) -> Value {
        let users = data
            .get("users")
            .and_then(Value::as_array)
            .map(|users| {
                users
                    .iter()
                    .map(|user| Value::Object(pick(user, &["name", "id", "username"])))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        Value::Array(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_users_projected_to_summary_fields() {
        let data = json!({"users": [
            {"name": "Alice Smith", "id": "1", "username": "alice", "email": "dropped"},
            {"name": "Bob Jones", "id": "2", "username": "bob"}
        ]});
        let result = ListUsersTool::summarize(&data);
        assert_eq!(
            result,
            json!([
                {"name": "Alice Smith", "id": "1", "username": "alice"},
                {"name": "Bob Jones", "id": "2", "username": "bob"}
            ])
        );
    }

    #[test]
    fn test_properties_is_required_enum() {
        let schema = ListUsersTool::schema();
        assert!(schema.validate(json!({}).as_object().unwrap()).is_err());
        assert!(
            schema
                .validate(json!({"properties": "everyone"}).as_object().unwrap())
                .is_err()
        );
        assert!(
            schema
                .validate(json!({"properties": "active"}).as_object().unwrap())
                .is_ok()
        );
    }
}
