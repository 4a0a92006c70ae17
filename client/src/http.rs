use url::Url;
use xmlrpc::{Request, Value};

use crate::{query::SearchQuery, ApiResponse, ClientError, Result};

/// Public XML-RPC endpoint of opensubtitles.org.
pub const DEFAULT_ENDPOINT: &str = "http://api.opensubtitles.org/xml-rpc";

/// Shared test useragent; a real deployment must register its own.
///
/// See https://trac.opensubtitles.org/projects/opensubtitles/wiki/DevReadFirst
pub const DEFAULT_USERAGENT: &str = "OSTestUserAgent";

/// Default ISO 639-1 language code.
pub const DEFAULT_LANGUAGE: &str = "en";

const METHOD_SERVER_INFO: &str = "ServerInfo";
const METHOD_LOG_IN: &str = "LogIn";
const METHOD_LOG_OUT: &str = "LogOut";

/// Methods dispatched without a session token. Matched against the wire
/// name, i.e. after [`ucfirst`] has run.
const SESSION_EXEMPT: [&str; 3] = [METHOD_SERVER_INFO, METHOD_LOG_IN, METHOD_LOG_OUT];

/// Configuration for a [`Client`].
///
/// `username` and `password` carry no default and are validated by
/// [`Client::create`]; everything else falls back to the public endpoint
/// defaults.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: String,
    pub useragent: String,
    pub language: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            useragent: DEFAULT_USERAGENT.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            username: None,
            password: None,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn useragent<S: Into<String>>(mut self, useragent: S) -> Self {
        self.useragent = useragent.into();
        self
    }

    pub fn language<S: Into<String>>(mut self, language: S) -> Self {
        self.language = language.into();
        self
    }

    pub fn username<S: Into<String>>(mut self, username: S) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn password<S: Into<String>>(mut self, password: S) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set both credentials at once.
    pub fn credentials<S: Into<String>>(mut self, username: S, password: S) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }
}

/// Blocking OpenSubtitles client.
///
/// Owns its configuration and the session token. The token is obtained
/// lazily on the first call that needs one and reused afterwards; it is
/// released by [`Client::log_out`] or, best-effort, on drop. Token state is
/// guarded by `&mut self`, so use one client per logical session rather
/// than sharing a client across threads.
#[derive(Debug)]
pub struct Client {
    endpoint: String,
    useragent: String,
    language: String,
    username: String,
    password: String,
    token: Option<String>,
    http: reqwest::blocking::Client,
}

impl Client {
    /// Create a client from `config`.
    ///
    /// Fails when either credential is absent or the endpoint is not a
    /// valid URL. Performs no network I/O.
    pub fn create(config: ClientConfig) -> Result<Self> {
        let (username, password) = match (config.username, config.password) {
            (Some(username), Some(password)) => (username, password),
            _ => return Err(ClientError::MissingCredentials),
        };
        Url::parse(&config.endpoint).map_err(|err| ClientError::InvalidUrl(err.to_string()))?;

        Ok(Self {
            endpoint: config.endpoint,
            useragent: config.useragent,
            language: config.language,
            username,
            password,
            token: None,
            http: reqwest::blocking::Client::new(),
        })
    }

    /// The cached session token, if a login has happened.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Return the session token, logging in first if none is cached.
    ///
    /// At most one LogIn round trip happens per client lifetime, however
    /// many session methods are invoked afterwards.
    pub fn obtain_token(&mut self) -> Result<String> {
        if let Some(token) = &self.token {
            return Ok(token.clone());
        }

        let response = self.invoke(
            METHOD_LOG_IN,
            vec![
                Value::String(self.username.clone()),
                Value::String(self.password.clone()),
                Value::String(self.language.clone()),
                Value::String(self.useragent.clone()),
            ],
        )?;
        let token = response
            .get("token")
            .and_then(Value::as_str)
            .ok_or(ClientError::MissingToken)?
            .to_owned();

        self.token = Some(token.clone());
        Ok(token)
    }

    /// Call an arbitrary API method.
    ///
    /// The first letter of `method` is uppercased before comparison and
    /// transmission. Only the first: `"logIn"` becomes `"LogIn"`, but
    /// `"serverinfo"` becomes `"Serverinfo"`, which does not match the
    /// session-exempt table and will be sent with a token. Callers are
    /// expected to pass PascalCase names.
    ///
    /// Unless the method is one of ServerInfo, LogIn or LogOut, the session
    /// token is prepended to `params` as the first positional parameter.
    pub fn invoke(&mut self, method: &str, mut params: Vec<Value>) -> Result<ApiResponse> {
        let method = ucfirst(method);
        if !SESSION_EXEMPT.contains(&method.as_str()) {
            let token = self.obtain_token()?;
            params.insert(0, Value::String(token));
        }

        tracing::debug!(method = %method, params = params.len(), "dispatching XML-RPC request");
        let response = {
            let mut request = Request::new(&method);
            for param in params {
                request = request.arg(param);
            }
            request.call(self.http.post(&self.endpoint))?
        };

        // Faults were already turned into errors by the codec; what is left
        // must still carry the literal "200 OK" status marker.
        let status = response
            .as_struct()
            .and_then(|members| members.get("status"))
            .and_then(Value::as_str);
        if status != Some("200 OK") {
            return Err(ClientError::InvalidResponseStatus);
        }

        Ok(ApiResponse::new(method, response))
    }

    /// Query server status and capabilities. No session needed.
    pub fn server_info(&mut self) -> Result<ApiResponse> {
        self.invoke(METHOD_SERVER_INFO, Vec::new())
    }

    /// Search for subtitles matching any of `queries`.
    pub fn search_subtitles(&mut self, queries: Vec<SearchQuery>) -> Result<ApiResponse> {
        let criteria: Vec<Value> = queries.into_iter().map(SearchQuery::into_value).collect();
        self.invoke("SearchSubtitles", vec![Value::Array(criteria)])
    }

    /// Download gzipped subtitle bodies by subtitle file id.
    pub fn download_subtitles(&mut self, ids: Vec<i32>) -> Result<ApiResponse> {
        let ids: Vec<Value> = ids.into_iter().map(Value::Int).collect();
        self.invoke("DownloadSubtitles", vec![Value::Array(ids)])
    }

    /// End the session. Clears the cached token; the next session method
    /// will log in again. Calling this without a cached token is a no-op.
    pub fn log_out(&mut self) -> Result<()> {
        if let Some(token) = self.token.take() {
            self.invoke(METHOD_LOG_OUT, vec![Value::String(token)])?;
        }
        Ok(())
    }
}

impl Drop for Client {
    /// Best-effort LogOut for a still-cached token. Failures are logged
    /// and swallowed; use [`Client::log_out`] to observe them.
    fn drop(&mut self) {
        if self.token.is_some() {
            if let Err(err) = self.log_out() {
                tracing::warn!(error = %err, "LogOut during teardown failed");
            }
        }
    }
}

/// Uppercase the first character only. Not title casing.
fn ucfirst(method: &str) -> String {
    let mut chars = method.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
