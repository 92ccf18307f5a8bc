//! Identity procedures: `getMe` and `getMyProjects`
//!
//! The remote service is loose about numeric ids (numbers on most
//! installs, numeric strings on some), so ids go through lenient
//! deserializers. A result that is not the expected shape at all is a
//! `RpcError::Decoding`; `getMyProjects` only fails that way when the
//! result is not a list, entries that are not objects are skipped.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::rpc::{call_as, RpcCaller, RpcResult};
use crate::types::CancellationToken;

pub const GET_ME: &str = "getMe";
pub const GET_MY_PROJECTS: &str = "getMyProjects";

/// The authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Me {
    #[serde(deserialize_with = "required_id")]
    pub id: i64,
    #[serde(default, deserialize_with = "optional_string")]
    pub username: Option<String>,
    /// Application role; `None` when absent, null, non-string or empty
    #[serde(default, deserialize_with = "optional_string")]
    pub role: Option<String>,
}

impl Me {
    pub fn username(&self) -> &str {
        self.username.as_deref().unwrap_or_default()
    }
}

/// One entry of `getMyProjects`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MyProject {
    #[serde(default, deserialize_with = "optional_id")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "optional_string")]
    pub name: Option<String>,
    /// The caller's role in this project
    ///
    /// Any string is kept, including `""`: a blank live role still marks
    /// the project as populated. Non-string values count as absent.
    #[serde(default, deserialize_with = "any_string")]
    pub role: Option<String>,
}

pub async fn get_me(caller: &dyn RpcCaller, cancel: &CancellationToken) -> RpcResult<Me> {
    call_as(caller, cancel, GET_ME, Value::Null).await
}

pub async fn get_my_projects(
    caller: &dyn RpcCaller,
    cancel: &CancellationToken,
) -> RpcResult<Vec<MyProject>> {
    let entries: Vec<Value> = call_as(caller, cancel, GET_MY_PROJECTS, Value::Null).await?;
    Ok(project_entries(entries))
}

fn project_entries(entries: Vec<Value>) -> Vec<MyProject> {
    entries
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect()
}

fn id_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn required_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    id_from_value(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid user ID format: {}", value)))
}

fn optional_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(id_from_value(&Value::deserialize(deserializer)?))
}

fn optional_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) if !s.is_empty() => Ok(Some(s)),
        _ => Ok(None),
    }
}

fn any_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::{decode_result, MockRpcCaller, RpcError};
    use serde_json::json;

    #[test]
    fn test_me_numeric_and_string_ids() {
        let me: Me = decode_result(GET_ME, json!({"id": 7, "username": "alice", "role": "app-manager"})).unwrap();
        assert_eq!(me.id, 7);
        assert_eq!(me.username(), "alice");
        assert_eq!(me.role.as_deref(), Some("app-manager"));

        let me: Me = decode_result(GET_ME, json!({"id": "12", "username": "bob"})).unwrap();
        assert_eq!(me.id, 12);
        assert_eq!(me.role, None);
    }

    #[test]
    fn test_me_blank_role_is_none() {
        let me: Me = decode_result(GET_ME, json!({"id": 1, "role": ""})).unwrap();
        assert_eq!(me.role, None);
        let me: Me = decode_result(GET_ME, json!({"id": 1, "role": null})).unwrap();
        assert_eq!(me.role, None);
        assert_eq!(me.username(), "");
    }

    #[test]
    fn test_me_bad_shape_is_decoding_error() {
        let err = decode_result::<Me>(GET_ME, json!(false)).unwrap_err();
        assert!(matches!(err, RpcError::Decoding { .. }));

        let err = decode_result::<Me>(GET_ME, json!({"id": "abc"})).unwrap_err();
        assert!(err.to_string().contains("invalid user ID format"));
    }

    #[test]
    fn test_my_projects_tolerates_partial_entries() {
        let projects: Vec<MyProject> = decode_result(
            GET_MY_PROJECTS,
            json!([
                {"id": 1, "name": "Alpha", "role": "project-manager"},
                {"id": "2", "role": "project-viewer"},
                {"id": 3},
                {"name": "no id", "role": "project-member"},
                {"id": 4, "role": 5}
            ]),
        )
        .unwrap();

        assert_eq!(projects.len(), 5);
        assert_eq!(projects[0].id, Some(1));
        assert_eq!(projects[1].id, Some(2));
        assert_eq!(projects[1].role.as_deref(), Some("project-viewer"));
        assert_eq!(projects[2].role, None);
        assert_eq!(projects[3].id, None);
        assert_eq!(projects[4].role, None);
    }

    #[test]
    fn test_my_projects_blank_role_is_kept() {
        let projects: Vec<MyProject> =
            decode_result(GET_MY_PROJECTS, json!([{"id": 5, "role": ""}, {"id": 6, "role": null}])).unwrap();
        assert_eq!(projects[0].role.as_deref(), Some(""));
        assert_eq!(projects[1].role, None);
    }

    #[tokio::test]
    async fn test_my_projects_skips_non_object_entries() {
        let mock = MockRpcCaller::new().with_result(
            GET_MY_PROJECTS,
            json!([{"id": 5, "role": "project-viewer"}, null, 7, "x", {"id": 8, "role": "project-member"}]),
        );
        let projects = get_my_projects(&mock, &CancellationToken::new()).await.unwrap();

        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].id, Some(5));
        assert_eq!(projects[0].role.as_deref(), Some("project-viewer"));
        assert_eq!(projects[1].id, Some(8));
    }

    #[tokio::test]
    async fn test_my_projects_not_a_list_is_decoding_error() {
        let mock = MockRpcCaller::new().with_result(GET_MY_PROJECTS, json!({"id": 5}));
        let err = get_my_projects(&mock, &CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, RpcError::Decoding { .. }));
    }
}
