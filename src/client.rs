use std::fmt;

use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, trace};

use crate::config::ClientConfig;
use crate::error::{Result, TranscripticError};
use crate::request::{ApiRequest, CreateRunParams};

pub const EMAIL_HEADER: &str = "x-user-email";
pub const TOKEN_HEADER: &str = "x-user-token";

const DEFAULT_USER_AGENT: &str = concat!("transcriptic-client/", env!("CARGO_PKG_VERSION"));

fn header_value(name: &'static str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| TranscripticError::InvalidHeader {
        name,
        message: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Public client
// ---------------------------------------------------------------------------

/// Blocking client for the Transcriptic API.
///
/// Every request carries the `X-User-Email` and `X-User-Token` headers given
/// at construction. Responses are returned untouched: a 404 or 500 is still
/// `Ok(response)`, only transport failures are errors.
///
/// ```no_run
/// use std::io::Read;
/// use transcriptic_client::TranscripticClient;
///
/// let client = TranscripticClient::new("me@lab.org", "s3cret").unwrap();
/// let mut response = client.get_runs("kz-lab", "p1").unwrap();
/// let mut body = String::new();
/// response.read_to_string(&mut body).unwrap();
/// println!("{}: {body}", response.status());
/// ```
#[derive(Clone)]
pub struct TranscripticClient {
    base_url: String,
    email: String,
    http: Client,
}

impl TranscripticClient {
    /// Create a client for the public API endpoint.
    ///
    /// No network call is made and the credentials are not checked.
    pub fn new(email: &str, token: &str) -> Result<Self> {
        Self::from_config(&ClientConfig::new(email, token))
    }

    /// Create a client from an explicit configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(EMAIL_HEADER),
            header_value("X-User-Email", &config.email)?,
        );
        let mut token = header_value("X-User-Token", &config.token)?;
        token.set_sensitive(true);
        headers.insert(HeaderName::from_static(TOKEN_HEADER), token);

        let user_agent = match config.user_agent.as_deref() {
            Some(ua) => header_value("User-Agent", ua)?,
            None => HeaderValue::from_static(DEFAULT_USER_AGENT),
        };

        let mut builder = Client::builder()
            .default_headers(headers)
            .user_agent(user_agent);
        if let Some(timeout) = config.timeout() {
            if timeout.is_zero() {
                return Err(TranscripticError::InvalidConfig(
                    "timeout must be greater than zero".into(),
                ));
            }
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            email: config.email.clone(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Build the full URL for a path relative to the API root.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Send a request and return the raw response.
    ///
    /// Transport errors are returned as [`TranscripticError::RequestFailed`]
    /// wrapping the `reqwest::Error` as-is. There is no retry.
    pub fn send(&self, request: &ApiRequest) -> Result<Response> {
        debug!(
            method = %request.method,
            path = %request.path,
            query_params = request.query.len(),
            "sending Transcriptic request"
        );

        let mut builder = self
            .http
            .request(request.method.clone(), self.url(&request.path));
        if !request.query.is_empty() {
            builder = builder.query(&request.encoded_query());
        }
        let response = builder.send()?;

        trace!(status = response.status().as_u16(), path = %request.path, "received response");
        Ok(response)
    }

    // -- endpoints -----------------------------------------------------------

    /// Create a project in an organization.
    pub fn create_project(&self, organization: &str, name: &str) -> Result<Response> {
        self.send(&ApiRequest::create_project(organization, name))
    }

    /// List all runs in a project.
    pub fn get_runs(&self, organization: &str, project: &str) -> Result<Response> {
        self.send(&ApiRequest::get_runs(organization, project))
    }

    /// Submit a run. Use [`CreateRunParams::new`] for the default `test_mode = false`.
    pub fn create_run(
        &self,
        organization: &str,
        project: &str,
        params: &CreateRunParams,
    ) -> Result<Response> {
        self.send(&ApiRequest::create_run(organization, project, params))
    }

    /// Get a single run.
    pub fn get_run(&self, organization: &str, project: &str, run: &str) -> Result<Response> {
        self.send(&ApiRequest::get_run(organization, project, run))
    }

    /// Get a container.
    pub fn get_container(&self, organization: &str, container: &str) -> Result<Response> {
        self.send(&ApiRequest::get_container(organization, container))
    }

    /// Get the aliquot in one well of a container.
    pub fn get_aliquot(
        &self,
        organization: &str,
        container: &str,
        well_index: &str,
    ) -> Result<Response> {
        self.send(&ApiRequest::get_aliquot(organization, container, well_index))
    }

    /// List the packaged protocols available in an organization.
    pub fn get_protocols(&self, organization: &str) -> Result<Response> {
        self.send(&ApiRequest::get_protocols(organization))
    }

    /// Get a single protocol.
    pub fn get_protocol(&self, organization: &str, protocol: &str) -> Result<Response> {
        self.send(&ApiRequest::get_protocol(organization, protocol))
    }

    /// Get a dataset.
    pub fn get_dataset(&self, dataset: &str) -> Result<Response> {
        self.send(&ApiRequest::get_dataset(dataset))
    }
}

impl fmt::Debug for TranscripticClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranscripticClient")
            .field("base_url", &self.base_url)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}
