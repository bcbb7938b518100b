//! Request descriptor and the client that executes it.
//!
//! An [`ApiRequest`] describes one REST call against the client's fixed base
//! URL. [`ApiClient::execute`] sends it with the bearer token read from the
//! token store at call time.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::token::{FileTokenStore, TokenStore};

/// HTTP methods a request may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub const ALLOWED: [HttpMethod; 5] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
        }
    }

    fn allowed_list() -> String {
        Self::ALLOWED
            .iter()
            .map(HttpMethod::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl core::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = ClientError;

    /// ASCII case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALLOWED
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                ClientError::invalid_argument(format!(
                    "unsupported HTTP method {s:?}; allowed methods: {}",
                    Self::allowed_list()
                ))
            })
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(value: HttpMethod) -> Self {
        match value {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Patch => reqwest::Method::PATCH,
        }
    }
}

/// A file sent in a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Body of a request.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    /// `application/x-www-form-urlencoded` fields.
    Form(Vec<(String, String)>),
    /// `multipart/form-data`, one part per file under the given field name.
    Files { field: String, files: Vec<Attachment> },
}

/// Descriptor of a single REST call.
///
/// The base URL is fixed at construction; everything else is last-write-wins
/// until the request is executed.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    base_url: String,
    path: String,
    method: HttpMethod,
    params: BTreeMap<String, String>,
    body: RequestBody,
    headers: BTreeMap<String, String>,
}

impl ApiRequest {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            path: String::new(),
            method: HttpMethod::default(),
            params: BTreeMap::new(),
            body: RequestBody::Empty,
            headers: BTreeMap::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Full target URL (`base_url + path`).
    pub fn url(&self) -> String {
        format!("{}{}", self.base_url, self.path)
    }

    /// Set the method by name; fails for anything outside get/post/put/delete/patch.
    pub fn set_method(&mut self, method: &str) -> ClientResult<&mut Self> {
        self.method = method.parse()?;
        Ok(self)
    }

    /// Typed form of [`set_method`](Self::set_method); cannot fail.
    pub fn with_method(&mut self, method: HttpMethod) -> &mut Self {
        self.method = method;
        self
    }

    pub fn set_path(&mut self, path: impl Into<String>) -> &mut Self {
        self.path = path.into();
        self
    }

    pub fn set_params<K, V>(&mut self, params: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.params = params
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    pub fn set_headers<K, V>(&mut self, headers: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.headers = headers
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    pub fn set_body(&mut self, body: RequestBody) -> &mut Self {
        self.body = body;
        self
    }

    /// Serialize `payload` as the JSON body.
    pub fn set_json<P: Serialize + ?Sized>(&mut self, payload: &P) -> ClientResult<&mut Self> {
        let value = serde_json::to_value(payload).map_err(|e| ClientError::Encode(e.to_string()))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    pub fn set_form<K, V>(&mut self, fields: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.body = RequestBody::Form(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    pub fn set_files(&mut self, field: impl Into<String>, files: Vec<Attachment>) -> &mut Self {
        self.body = RequestBody::Files {
            field: field.into(),
            files,
        };
        self
    }

    /// Outgoing headers: caller headers, then the Authorization header.
    ///
    /// Any caller-supplied Authorization header is replaced by the bearer
    /// token, or dropped when there is no token.
    pub fn header_map(&self, token: Option<&str>) -> ClientResult<HeaderMap> {
        let mut map = HeaderMap::with_capacity(self.headers.len() + 1);
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ClientError::invalid_argument(format!("header name {name:?}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ClientError::invalid_argument(format!("header {name}: {e}")))?;
            map.insert(name, value);
        }

        map.remove(AUTHORIZATION);
        if let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| ClientError::invalid_argument(format!("bearer token: {e}")))?;
            value.set_sensitive(true);
            map.insert(AUTHORIZATION, value);
        }
        Ok(map)
    }

    fn multipart(field: &str, files: &[Attachment]) -> ClientResult<Form> {
        let mut form = Form::new();
        for file in files {
            let mut part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
            if let Some(content_type) = &file.content_type {
                part = part.mime_str(content_type).map_err(|e| {
                    ClientError::invalid_argument(format!("content type {content_type:?}: {e}"))
                })?;
            }
            form = form.part(field.to_string(), part);
        }
        Ok(form)
    }
}

/// Response of a successful (2xx) call.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ApiResponse {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON. An empty body decodes as `null`.
    pub fn json<T: DeserializeOwned>(&self) -> ClientResult<T> {
        let bytes: &[u8] = if self.body.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &self.body
        };
        serde_json::from_slice(bytes).map_err(|e| ClientError::Parse(e.to_string()))
    }
}

/// HTTP client bound to one backend.
///
/// Cheap to clone; clones share the connection pool and token store.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl core::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
        }
    }

    /// Client using the configured base URL and a file-backed token store.
    pub fn from_config(config: &ClientConfig) -> Self {
        let tokens = FileTokenStore::with_key(&config.token_file, config.token_key.clone());
        Self::new(config.api_url.clone(), Arc::new(tokens))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> &dyn TokenStore {
        self.tokens.as_ref()
    }

    /// New request descriptor bound to this client's base URL.
    pub fn request(&self) -> ApiRequest {
        ApiRequest::new(self.base_url.clone())
    }

    /// Send `request` with the bearer token currently in the token store.
    pub async fn execute(&self, request: &ApiRequest) -> ClientResult<ApiResponse> {
        let token = self.tokens.token()?;
        self.dispatch(request, token.as_deref()).await
    }

    /// Send `request` authorised with an explicit token instead of the store.
    pub(crate) async fn dispatch(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
    ) -> ClientResult<ApiResponse> {
        let headers = request.header_map(token)?;
        let url = request.url();

        let mut builder = self
            .http
            .request(request.method().into(), &url)
            .headers(headers);

        if !request.params().is_empty() {
            builder = builder.query(request.params());
        }

        builder = match request.body() {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Form(fields) => builder.form(fields),
            RequestBody::Files { field, files } => {
                builder.multipart(ApiRequest::multipart(field, files)?)
            }
        };

        tracing::debug!(method = %request.method(), url = %url, "dispatching request");

        let resp = builder
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp
            .bytes()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?
            .to_vec();

        if !status.is_success() {
            let body = String::from_utf8_lossy(&body).into_owned();
            tracing::warn!(
                method = %request.method(),
                url = %url,
                status = status.as_u16(),
                "request failed"
            );
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}
