//! Zabbix JSON-RPC API client
//!
//! Blocking transport for the four remote operations the tool consumes:
//! login, version probe, namespace listing, and configuration export.
//! Every request is issued and awaited in sequence. There is no retry
//! logic: any transport failure or API error object aborts the run.

use std::cell::Cell;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{Error, Result};

/// A template group as returned by the remote namespace listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Hierarchical group name (`Root/Child`)
    pub name: String,
    /// Opaque remote identifier
    pub id: String,
}

/// A template row as returned by a group listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSummary {
    /// Template name, unique within a reconciliation run
    pub name: String,
    /// Opaque remote identifier, used only for export
    pub id: String,
}

/// Remote operations consumed by discovery and reconciliation
///
/// The production implementation is [`ApiClient`]; tests substitute an
/// in-memory source.
pub trait TemplateSource {
    /// List every template group known to the remote system
    ///
    /// # Errors
    ///
    /// Returns [`Error::Remote`] on any transport or API failure.
    fn list_groups(&self) -> Result<Vec<Group>>;

    /// List the templates belonging to a group
    ///
    /// # Errors
    ///
    /// Returns [`Error::Remote`] on any transport or API failure.
    fn list_templates(&self, group_id: &str) -> Result<Vec<TemplateSummary>>;

    /// Export the full configuration of a template as raw JSON text
    ///
    /// # Errors
    ///
    /// Returns [`Error::Remote`] on any transport or API failure.
    fn export_template(&self, template_id: &str) -> Result<String>;
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: Value,
    id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    auth: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcFailure>,
}

#[derive(Debug, Deserialize)]
struct RpcFailure {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

impl fmt::Display for RpcFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "code {}: {}", self.code, self.message)?;
        if let Some(detail) = self.data.as_ref().and_then(Value::as_str) {
            write!(f, " ({detail})")?;
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct GroupRow {
    groupid: String,
    name: String,
}

#[derive(Deserialize)]
struct TemplateRow {
    templateid: String,
    name: String,
}

/// Blocking JSON-RPC client for the Zabbix API
pub struct ApiClient {
    http: reqwest::blocking::Client,
    url: String,
    auth: Option<String>,
    next_id: Cell<u64>,
}

impl ApiClient {
    /// Create a client for the given API endpoint URL
    ///
    /// # Errors
    ///
    /// Returns [`Error::Remote`] if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| Error::remote("client setup", e))?;

        Ok(Self {
            http,
            url: url.into(),
            auth: None,
            next_id: Cell::new(1),
        })
    }

    /// Authenticate and store the session token for subsequent calls
    ///
    /// # Errors
    ///
    /// Returns [`Error::Remote`] if the credentials are rejected or the
    /// endpoint is unreachable.
    pub fn login(&mut self, username: &str, password: &str) -> Result<()> {
        let result = self.call(
            "user.login",
            json!({"username": username, "password": password}),
            None,
        )?;

        let token = result
            .as_str()
            .ok_or_else(|| Error::remote("user.login", "response is not a session token"))?;
        self.auth = Some(token.to_string());

        Ok(())
    }

    /// Query the remote API version (no authentication required)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Remote`] if the endpoint is unreachable.
    pub fn api_version(&self) -> Result<String> {
        let result = self.call("apiinfo.version", json!([]), None)?;

        result
            .as_str()
            .map(ToString::to_string)
            .ok_or_else(|| Error::remote("apiinfo.version", "response is not a version string"))
    }

    fn call_authed(&self, method: &str, params: Value) -> Result<Value> {
        self.call(method, params, self.auth.as_deref())
    }

    fn call(&self, method: &str, params: Value, auth: Option<&str>) -> Result<Value> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let request = RpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id,
            auth,
        };

        let response = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .map_err(|e| Error::remote(method, e))?;

        if !response.status().is_success() {
            return Err(Error::remote(
                method,
                format!("http status {}", response.status()),
            ));
        }

        let body: RpcResponse = response.json().map_err(|e| Error::remote(method, e))?;

        if let Some(failure) = body.error {
            return Err(Error::remote(method, failure));
        }

        body.result
            .ok_or_else(|| Error::remote(method, "response carries neither result nor error"))
    }
}

impl TemplateSource for ApiClient {
    fn list_groups(&self) -> Result<Vec<Group>> {
        let result = self.call_authed("hostgroup.get", json!({"output": ["groupid", "name"]}))?;

        let rows: Vec<GroupRow> =
            serde_json::from_value(result).map_err(|e| Error::remote("hostgroup.get", e))?;

        Ok(rows
            .into_iter()
            .map(|row| Group {
                name: row.name,
                id: row.groupid,
            })
            .collect())
    }

    fn list_templates(&self, group_id: &str) -> Result<Vec<TemplateSummary>> {
        let result = self.call_authed(
            "template.get",
            json!({"output": ["templateid", "name"], "groupids": [group_id]}),
        )?;

        let rows: Vec<TemplateRow> =
            serde_json::from_value(result).map_err(|e| Error::remote("template.get", e))?;

        Ok(rows
            .into_iter()
            .map(|row| TemplateSummary {
                name: row.name,
                id: row.templateid,
            })
            .collect())
    }

    fn export_template(&self, template_id: &str) -> Result<String> {
        let result = self.call_authed(
            "configuration.export",
            json!({"format": "json", "options": {"templates": [template_id]}}),
        )?;

        result
            .as_str()
            .map(ToString::to_string)
            .ok_or_else(|| Error::remote("configuration.export", "export payload is not a string"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_includes_auth_when_present() {
        let request = RpcRequest {
            jsonrpc: "2.0",
            method: "template.get",
            params: json!({"groupids": ["12"]}),
            id: 7,
            auth: Some("token"),
        };

        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["jsonrpc"], "2.0");
        assert_eq!(body["method"], "template.get");
        assert_eq!(body["id"], 7);
        assert_eq!(body["auth"], "token");
    }

    #[test]
    fn test_request_omits_auth_when_absent() {
        let request = RpcRequest {
            jsonrpc: "2.0",
            method: "apiinfo.version",
            params: json!([]),
            id: 1,
            auth: None,
        };

        let body = serde_json::to_value(&request).unwrap();

        assert!(body.get("auth").is_none());
    }

    #[test]
    fn test_response_error_object() {
        let body: RpcResponse = serde_json::from_str(
            r#"{"jsonrpc":"2.0","error":{"code":-32602,"message":"Invalid params.","data":"No permissions."},"id":1}"#,
        )
        .unwrap();

        let failure = body.error.unwrap();
        assert_eq!(failure.code, -32602);
        assert!(failure.to_string().contains("Invalid params."));
        assert!(failure.to_string().contains("No permissions."));
    }

    #[test]
    fn test_response_result_only() {
        let body: RpcResponse =
            serde_json::from_str(r#"{"jsonrpc":"2.0","result":"6.4.0","id":1}"#).unwrap();

        assert_eq!(body.result, Some(json!("6.4.0")));
        assert!(body.error.is_none());
    }

    #[test]
    fn test_group_rows_deserialize() {
        let rows: Vec<GroupRow> = serde_json::from_value(json!([
            {"groupid": "4", "name": "Root"},
            {"groupid": "9", "name": "Root/Child"}
        ]))
        .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].groupid, "9");
        assert_eq!(rows[1].name, "Root/Child");
    }
}
