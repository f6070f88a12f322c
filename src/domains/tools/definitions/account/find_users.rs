//! Tool for resolving free-text user references to canonical records.

use std::sync::Arc;

use futures::FutureExt;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::domains::matching::match_name;
use crate::domains::rework::{ReworkClient, ReworkClients};
use crate::domains::tools::definitions::common::{insert_opt, parse_params};
use crate::domains::tools::error::ToolError;
use crate::domains::tools::registry::ToolDefinition;
use crate::domains::tools::schema::{FieldKind, FieldSpec, InputSchema};

const USER_PROPERTIES: &[&str] = &["all", "active", "inactive"];

#[derive(Debug, Deserialize)]
struct FindUsersParams {
    #[allow(dead_code)]
    properties: String,
    #[serde(default)]
    q: Option<String>,
}

pub struct FindUsersTool;

impl FindUsersTool {
    pub const NAME: &'static str = "find_users";

    const DESCRIPTION: &'static str = "Find users of Rework, returns an array of users containing username, id, name and \
         score (0-100, higher is better). Every question about a user (assignee, creator, etc.) \
         should use this tool first to get the username and user id, and put them into the \
         params if needed. If you want a user and have not found anyone yet, take the closest match.";

    pub fn definition(clients: &Arc<ReworkClients>) -> ToolDefinition {
        let clients = Arc::clone(clients);
        ToolDefinition::new(Self::NAME, Self::DESCRIPTION, Self::schema(), move |args| {
            let clients = Arc::clone(&clients);
            async move {
                let params = parse_params::<FindUsersParams>(args)?;
                Self::run(params, &clients.account).await
            }
            .boxed()
        })
    }

    fn schema() -> InputSchema {
        InputSchema::new()
            .field(
                FieldSpec::new("properties", FieldKind::Enum(USER_PROPERTIES))
                    .required()
                    .describe(
                        "Required properties, 'all' for all users, 'active' for active users, \
                         'inactive' for inactive users",
                    ),
            )
            .field(
                FieldSpec::new("q", FieldKind::String)
                    .describe("Optional search query to filter users by name."),
            )
    }

    async fn run(params: FindUsersParams, client: &ReworkClient) -> Result<Value, ToolError> {
        let mut body = Map::new();
        insert_opt(&mut body, "q", &params.q);

        let data = client.request("/account/v1/user/all", &body).await?;
        Ok(Self::rank(&data, params.q.as_deref()))
    }

    /// Score every user against the query, drop non-matches, and order by
    /// descending score. The sort is stable: score ties keep the backend's
    /// original ordering.
    fn rank(data: &Value, query: Option<&str>) -> Value {
        let mut ranked: Vec<(u8, Value)> = data
            .get("users")
            .and_then(Value::as_array)
            .map(|users| {
                users
                    .iter()
                    .filter_map(|user| {
                        let name = user.get("name").and_then(Value::as_str).unwrap_or_default();
                        let result = match_name(name, query);
                        result.is_match.then(|| {
                            (
                                result.score,
                                json!({
                                    "name": user.get("name").cloned().unwrap_or(Value::Null),
                                    "id": user.get("id").cloned().unwrap_or(Value::Null),
                                    "username": user.get("username").cloned().unwrap_or(Value::Null),
                                    "score": result.score,
                                }),
                            )
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        ranked.sort_by(|a, b| b.0.cmp(&a.0));
        Value::Array(ranked.into_iter().map(|(_, user)| user).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn users() -> Value {
        json!({"users": [
            {"name": "Bob Jones", "id": "1", "username": "bob"},
            {"name": "Alice Adams", "id": "2", "username": "aadams"},
            {"name": "Alice Brown", "id": "3", "username": "abrown"},
        ]})
    }

    #[test]
    fn test_non_matches_filtered_out() {
        let ranked = FindUsersTool::rank(&users(), Some("alice"));
        let ranked = ranked.as_array().unwrap();
        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|u| u["name"].as_str().unwrap().contains("Alice")));
    }

    #[test]
    fn test_ties_keep_original_order() {
        // Both Alices are prefix matches with equal scores; backend order wins.
        let ranked = FindUsersTool::rank(&users(), Some("alice"));
        let ranked = ranked.as_array().unwrap();
        assert_eq!(ranked[0]["id"], json!("2"));
        assert_eq!(ranked[1]["id"], json!("3"));
        assert_eq!(ranked[0]["score"], ranked[1]["score"]);
    }

    #[test]
    fn test_empty_query_keeps_everyone_at_full_score() {
        let ranked = FindUsersTool::rank(&users(), None);
        let ranked = ranked.as_array().unwrap();
        assert_eq!(ranked.len(), 3);
        assert!(ranked.iter().all(|u| u["score"] == json!(100)));
        // Original order preserved
        assert_eq!(ranked[0]["id"], json!("1"));
    }
}
