use std::{fmt, sync::Arc};

use url::Url;

use crate::{
    request::user_agent,
    resources::{
        ApiTokens, Databases, Feedback, Groups, Instances, Invoices, Locations, Organizations,
        Plans, Subscriptions, Tokens, Users,
    },
    transport::Transport,
    ClientOptions, ConfigError, Result, DEFAULT_BASE_URL,
};

/// HTTP client for the Turso platform API.
///
/// Cloning is cheap: clones share one immutable configuration and one
/// connection pool.
#[derive(Clone)]
pub struct TursoClient {
    transport: Arc<Transport>,
}

impl fmt::Debug for TursoClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TursoClient")
            .field("base_url", &self.transport.base_url.as_str())
            .field("organization", &self.transport.organization)
            .field("token", &"<redacted>")
            .field("options", &self.transport.options)
            .finish()
    }
}

impl TursoClient {
    /// Creates a client against the production API.
    ///
    /// An empty `organization` means requests are not organization scoped.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use turso_platform_http::TursoClient;
    ///
    /// let turso = TursoClient::new("my-api-token", "my-org").expect("valid configuration");
    /// ```
    pub fn new(token: impl Into<String>, organization: impl Into<String>) -> Result<Self> {
        Self::builder(token).organization(organization).build()
    }

    /// Starts a builder for overriding the base URL, HTTP client or options.
    pub fn builder(token: impl Into<String>) -> TursoClientBuilder {
        TursoClientBuilder {
            token: token.into(),
            organization: None,
            base_url: DEFAULT_BASE_URL.to_owned(),
            http: None,
            options: ClientOptions::default(),
        }
    }

    /// Creates a client from environment variables.
    ///
    /// Reads:
    /// - `TURSO_API_TOKEN`: platform API token (required)
    /// - `TURSO_ORG`: organization slug (optional)
    /// - `TURSO_API_BASE_URL`: API endpoint override (optional)
    ///
    /// # Example
    ///
    /// ```no_run
    /// use turso_platform_http::TursoClient;
    ///
    /// let turso = TursoClient::from_env().expect("missing TURSO_* env vars");
    /// ```
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("TURSO_API_TOKEN")
            .map_err(|_| ConfigError::MissingEnv("TURSO_API_TOKEN"))?;
        let mut builder = Self::builder(token);
        if let Ok(org) = std::env::var("TURSO_ORG") {
            builder = builder.organization(org);
        }
        if let Ok(url) = std::env::var("TURSO_API_BASE_URL") {
            builder = builder.base_url(url);
        }
        builder.build()
    }

    /// Organization every scoped request is made under, if any.
    pub fn organization(&self) -> Option<&str> {
        self.transport.organization()
    }

    pub fn base_url(&self) -> &Url {
        &self.transport.base_url
    }

    pub fn api_tokens(&self) -> ApiTokens<'_> {
        ApiTokens::new(&self.transport)
    }

    pub fn databases(&self) -> Databases<'_> {
        Databases::new(&self.transport)
    }

    pub fn feedback(&self) -> Feedback<'_> {
        Feedback::new(&self.transport)
    }

    pub fn groups(&self) -> Groups<'_> {
        Groups::new(&self.transport)
    }

    pub fn instances(&self) -> Instances<'_> {
        Instances::new(&self.transport)
    }

    pub fn invoices(&self) -> Invoices<'_> {
        Invoices::new(&self.transport)
    }

    pub fn locations(&self) -> Locations<'_> {
        Locations::new(&self.transport)
    }

    pub fn organizations(&self) -> Organizations<'_> {
        Organizations::new(&self.transport)
    }

    pub fn plans(&self) -> Plans<'_> {
        Plans::new(&self.transport)
    }

    pub fn subscriptions(&self) -> Subscriptions<'_> {
        Subscriptions::new(&self.transport)
    }

    pub fn tokens(&self) -> Tokens<'_> {
        Tokens::new(&self.transport)
    }

    pub fn users(&self) -> Users<'_> {
        Users::new(&self.transport)
    }

    #[cfg(test)]
    pub(crate) fn transport(&self) -> &Transport {
        &self.transport
    }
}

/// Builder for [`TursoClient`]. Validation happens in [`TursoClientBuilder::build`].
pub struct TursoClientBuilder {
    token: String,
    organization: Option<String>,
    base_url: String,
    http: Option<reqwest::Client>,
    options: ClientOptions,
}

impl fmt::Debug for TursoClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TursoClientBuilder")
            .field("base_url", &self.base_url)
            .field("organization", &self.organization)
            .field("token", &"<redacted>")
            .field("options", &self.options)
            .finish()
    }
}

impl TursoClientBuilder {
    pub fn organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Uses an existing connection pool instead of building one.
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Applies client options such as timeouts.
    pub fn options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(self) -> Result<TursoClient> {
        let token = normalize_token(&self.token);
        if token.is_empty() {
            return Err(ConfigError::MissingToken.into());
        }

        let base_url = parse_base_url(&self.base_url)?;

        let organization = self
            .organization
            .map(|org| org.trim().to_owned())
            .filter(|org| !org.is_empty());

        let http = match self.http {
            Some(http) => http,
            None => reqwest::Client::builder()
                .build()
                .map_err(ConfigError::HttpClient)?,
        };

        Ok(TursoClient {
            transport: Arc::new(Transport {
                http,
                base_url,
                token,
                organization,
                options: self.options,
                user_agent: user_agent(),
            }),
        })
    }
}

fn parse_base_url(raw: &str) -> std::result::Result<Url, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::MissingBaseUrl);
    }
    let url = Url::parse(trimmed).map_err(|err| ConfigError::InvalidBaseUrl {
        url: trimmed.to_owned(),
        reason: err.to_string(),
    })?;
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(ConfigError::InvalidBaseUrl {
            url: trimmed.to_owned(),
            reason: "expected an absolute URL with a host".to_owned(),
        });
    }
    Ok(url)
}

/// Strips a pasted `Bearer ` prefix; the scheme is added per request.
fn normalize_token(token: &str) -> String {
    let trimmed = token.trim();
    let prefix = trimmed.get(..7);
    if prefix.is_some_and(|value| value.eq_ignore_ascii_case("bearer ")) {
        trimmed[7..].trim_start().to_owned()
    } else {
        trimmed.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_token, TursoClient};
    use crate::{ConfigError, TursoError};

    fn config_error(result: crate::Result<TursoClient>) -> ConfigError {
        match result {
            Err(TursoError::Config(err)) => err,
            Err(other) => panic!("expected config error, got {other:?}"),
            Ok(_) => panic!("expected construction to fail"),
        }
    }

    #[test]
    fn normalize_token_strips_existing_prefix() {
        assert_eq!(normalize_token("bEaReR abc123"), "abc123");
        assert_eq!(normalize_token("  abc123 "), "abc123");
    }

    #[test]
    fn missing_token_fails_construction() {
        let err = config_error(TursoClient::new("", ""));
        assert!(matches!(err, ConfigError::MissingToken));

        let err = config_error(TursoClient::new("   ", "acme"));
        assert!(matches!(err, ConfigError::MissingToken));
    }

    #[test]
    fn missing_base_url_fails_construction() {
        let err = config_error(TursoClient::builder("token").base_url("").build());
        assert!(matches!(err, ConfigError::MissingBaseUrl));
    }

    #[test]
    fn relative_base_url_fails_construction() {
        for url in ["api.turso.tech", "/v1", "mailto:someone@example.com"] {
            let err = config_error(TursoClient::builder("token").base_url(url).build());
            assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }), "{url}");
        }
    }

    #[test]
    fn empty_organization_means_unscoped() {
        let client = TursoClient::new("token", "").expect("must build");
        assert_eq!(client.organization(), None);

        let client = TursoClient::new("token", "acme").expect("must build");
        assert_eq!(client.organization(), Some("acme"));
    }

    #[test]
    fn default_base_url_is_production() {
        let client = TursoClient::new("token", "").expect("must build");
        assert_eq!(client.base_url().as_str(), "https://api.turso.tech/");
    }

    #[test]
    fn custom_http_client_is_accepted() {
        let http = reqwest::Client::new();
        TursoClient::builder("token")
            .http_client(http)
            .build()
            .expect("must build");
    }

    #[test]
    fn debug_redacts_token() {
        let client = TursoClient::new("secret-token", "acme").expect("must build");
        let debug = format!("{client:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("secret-token"));
    }
}
