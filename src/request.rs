//! Request descriptors for the Transcriptic endpoints.
//!
//! Each constructor only assembles a verb, a path relative to the API root and
//! the query parameters; nothing here touches the network. Identifiers are
//! concatenated as given, without escaping or validation.

use reqwest::Method;

// ---------------------------------------------------------------------------
// Query values
// ---------------------------------------------------------------------------

/// A single query-string value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Str(String),
    Bool(bool),
}

impl QueryValue {
    /// Wire form of the value. Booleans go out as `1` / `0`.
    pub fn encode(&self) -> String {
        match self {
            QueryValue::Str(s) => s.clone(),
            QueryValue::Bool(true) => "1".to_string(),
            QueryValue::Bool(false) => "0".to_string(),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Str(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Str(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Bool(value)
    }
}

// ---------------------------------------------------------------------------
// Run creation parameters
// ---------------------------------------------------------------------------

/// Parameters for [`ApiRequest::create_run`].
///
/// Launch request IDs are not supported, so a protocol is always required.
#[derive(Debug, Clone)]
pub struct CreateRunParams {
    /// Protocol object, sent as bracketed query keys
    /// (`protocol[instructions][0][op]=seal`). A JSON string is sent verbatim.
    pub protocol: serde_json::Value,
    pub title: String,
    pub test_mode: bool,
}

impl CreateRunParams {
    /// Parameters with `test_mode` off.
    pub fn new(protocol: serde_json::Value, title: impl Into<String>) -> Self {
        Self {
            protocol,
            title: title.into(),
            test_mode: false,
        }
    }

    pub fn test_mode(mut self, enabled: bool) -> Self {
        self.test_mode = enabled;
        self
    }
}

// ---------------------------------------------------------------------------
// Request descriptor
// ---------------------------------------------------------------------------

/// Verb, relative path and query of one API call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API root, without a leading `/`.
    pub path: String,
    pub query: Vec<(String, QueryValue)>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
        }
    }

    /// Append a query parameter, keeping declaration order.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Append a structured value as bracketed query keys.
    ///
    /// Objects and arrays expand into `key[field]` / `key[0]` pairs, scalars
    /// become a single pair, nulls and empty containers produce nothing.
    pub fn nested_query(mut self, key: impl Into<String>, value: &serde_json::Value) -> Self {
        flatten_into(key.into(), value, &mut self.query);
        self
    }

    /// Query pairs in their wire form.
    pub fn encoded_query(&self) -> Vec<(&str, String)> {
        self.query
            .iter()
            .map(|(k, v)| (k.as_str(), v.encode()))
            .collect()
    }

    // -- endpoints -----------------------------------------------------------

    /// `POST {org}?name=...`
    pub fn create_project(organization: &str, name: &str) -> Self {
        Self::new(Method::POST, organization).query("name", name)
    }

    /// `GET {org}/{project}/runs`
    pub fn get_runs(organization: &str, project: &str) -> Self {
        Self::new(Method::GET, format!("{organization}/{project}/runs"))
    }

    /// `POST {org}/{project}/runs?protocol[..]=...&title=...&test_mode=...`
    pub fn create_run(organization: &str, project: &str, params: &CreateRunParams) -> Self {
        Self::new(Method::POST, format!("{organization}/{project}/runs"))
            .nested_query("protocol", &params.protocol)
            .query("title", params.title.as_str())
            .query("test_mode", params.test_mode)
    }

    /// `GET {org}/{project}/runs/{run}`
    pub fn get_run(organization: &str, project: &str, run: &str) -> Self {
        Self::new(Method::GET, format!("{organization}/{project}/runs/{run}"))
    }

    /// `GET {org}/samples/{container}`
    pub fn get_container(organization: &str, container: &str) -> Self {
        Self::new(Method::GET, format!("{organization}/samples/{container}"))
    }

    /// `GET {org}/samples/{container}/{well_index}`
    ///
    /// The well index may be numeric (0-indexed) or alphanumeric (`A1`).
    pub fn get_aliquot(organization: &str, container: &str, well_index: &str) -> Self {
        Self::new(
            Method::GET,
            format!("{organization}/samples/{container}/{well_index}"),
        )
    }

    /// `GET {org}/protocols.json`
    pub fn get_protocols(organization: &str) -> Self {
        Self::new(Method::GET, format!("{organization}/protocols.json"))
    }

    /// `GET {org}/protocols/{protocol}.json`
    pub fn get_protocol(organization: &str, protocol: &str) -> Self {
        Self::new(Method::GET, format!("{organization}/protocols/{protocol}.json"))
    }

    /// `GET datasets/{dataset}.json`. Datasets are not scoped to an organization.
    pub fn get_dataset(dataset: &str) -> Self {
        Self::new(Method::GET, format!("datasets/{dataset}.json"))
    }
}

fn flatten_into(key: String, value: &serde_json::Value, out: &mut Vec<(String, QueryValue)>) {
    use serde_json::Value;

    match value {
        Value::Null => {}
        Value::Bool(b) => out.push((key, QueryValue::Bool(*b))),
        Value::Number(n) => out.push((key, QueryValue::Str(n.to_string()))),
        Value::String(s) => out.push((key, QueryValue::Str(s.clone()))),
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                flatten_into(format!("{key}[{i}]"), item, out);
            }
        }
        Value::Object(fields) => {
            for (name, field) in fields {
                flatten_into(format!("{key}[{name}]"), field, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_project_posts_to_the_organization() {
        let req = ApiRequest::create_project("kz-lab", "Assays");
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.path, "kz-lab");
        assert_eq!(req.query, vec![("name".to_string(), QueryValue::from("Assays"))]);
    }

    #[test]
    fn get_runs_has_no_query() {
        let req = ApiRequest::get_runs("kz-lab", "p1");
        assert_eq!(req.method, Method::GET);
        assert_eq!(req.path, "kz-lab/p1/runs");
        assert!(req.query.is_empty());
    }

    #[test]
    fn create_run_defaults_test_mode_off() {
        let params = CreateRunParams::new(json!({ "refs": {}, "instructions": [] }), "Run A");
        let req = ApiRequest::create_run("kz-lab", "p1", &params);
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.path, "kz-lab/p1/runs");
        assert_eq!(
            req.encoded_query(),
            vec![("title", "Run A".to_string()), ("test_mode", "0".to_string())]
        );
        assert_eq!(req.query[1].1, QueryValue::Bool(false));
    }

    #[test]
    fn create_run_expands_protocol_into_bracketed_keys() {
        let protocol = json!({
            "refs": {
                "plate": { "new": "96-pcr", "store": { "where": "cold_4" }, "discard": null }
            },
            "instructions": [
                { "op": "seal", "object": "plate" },
                { "op": "incubate", "duration": "5:minute", "shaking": false, "volume": 12.5 }
            ]
        });
        let req = ApiRequest::create_run("kz-lab", "p1", &CreateRunParams::new(protocol, "Run A"));
        assert_eq!(
            req.encoded_query(),
            vec![
                ("protocol[instructions][0][object]", "plate".to_string()),
                ("protocol[instructions][0][op]", "seal".to_string()),
                ("protocol[instructions][1][duration]", "5:minute".to_string()),
                ("protocol[instructions][1][op]", "incubate".to_string()),
                ("protocol[instructions][1][shaking]", "0".to_string()),
                ("protocol[instructions][1][volume]", "12.5".to_string()),
                ("protocol[refs][plate][new]", "96-pcr".to_string()),
                ("protocol[refs][plate][store][where]", "cold_4".to_string()),
                ("title", "Run A".to_string()),
                ("test_mode", "0".to_string()),
            ]
        );
    }

    #[test]
    fn nested_query_handles_scalars_and_nulls() {
        let req = ApiRequest::new(Method::GET, "x")
            .nested_query("n", &json!(3))
            .nested_query("flag", &json!(true))
            .nested_query("gone", &json!(null))
            .nested_query("list", &json!(["a", []]));
        assert_eq!(
            req.encoded_query(),
            vec![
                ("n", "3".to_string()),
                ("flag", "1".to_string()),
                ("list[0]", "a".to_string()),
            ]
        );
    }

    #[test]
    fn create_run_passes_string_protocol_verbatim() {
        let params = CreateRunParams::new(json!("pr1abc"), "Run B").test_mode(true);
        let req = ApiRequest::create_run("kz-lab", "p1", &params);
        assert_eq!(req.query[0].1, QueryValue::from("pr1abc"));
        assert_eq!(req.query[2].1, QueryValue::Bool(true));
        assert_eq!(req.encoded_query()[2], ("test_mode", "1".to_string()));
    }

    #[test]
    fn get_run_appends_the_run_id() {
        let req = ApiRequest::get_run("kz-lab", "p1", "r1");
        assert_eq!(req.method, Method::GET);
        assert_eq!(req.path, "kz-lab/p1/runs/r1");
    }

    #[test]
    fn container_and_aliquot_paths() {
        assert_eq!(
            ApiRequest::get_container("kz-lab", "ct1").path,
            "kz-lab/samples/ct1"
        );
        let req = ApiRequest::get_aliquot("kz-lab", "ct1", "A1");
        assert_eq!(req.method, Method::GET);
        assert_eq!(req.path, "kz-lab/samples/ct1/A1");
        assert_eq!(
            ApiRequest::get_aliquot("kz-lab", "ct1", "0").path,
            "kz-lab/samples/ct1/0"
        );
    }

    #[test]
    fn protocol_paths_carry_json_suffix() {
        assert_eq!(
            ApiRequest::get_protocols("kz-lab").path,
            "kz-lab/protocols.json"
        );
        assert_eq!(
            ApiRequest::get_protocol("kz-lab", "pr1").path,
            "kz-lab/protocols/pr1.json"
        );
    }

    #[test]
    fn dataset_path_has_no_organization() {
        let req = ApiRequest::get_dataset("ds1");
        assert_eq!(req.method, Method::GET);
        assert_eq!(req.path, "datasets/ds1.json");
        assert!(req.query.is_empty());
    }

    #[test]
    fn identifiers_are_not_escaped() {
        let req = ApiRequest::get_run("", "a b", "../x");
        assert_eq!(req.path, "/a b/runs/../x");
    }
}
