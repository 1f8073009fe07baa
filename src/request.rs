use std::time::Duration;

use reqwest::{header, Method};
use serde::Serialize;

use crate::{error::TransportError, transport::Transport};

/// Body of an outbound request.
pub(crate) enum Payload {
    Empty,
    Json(Vec<u8>),
    /// Streamed form; reqwest frames it and sets the boundary content type.
    Multipart(reqwest::multipart::Form),
}

impl Payload {
    pub(crate) fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, TransportError> {
        serde_json::to_vec(value)
            .map(Self::Json)
            .map_err(TransportError::Encode)
    }
}

/// `<library>/<version> (<os>/<arch>)`
pub(crate) fn user_agent() -> String {
    format!(
        "{}/{} ({}/{})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

impl Transport {
    /// Resolves `path` against the base URL and attaches auth, user agent
    /// and content type. Touches no network.
    pub(crate) fn build_request(
        &self,
        method: Method,
        path: &str,
        payload: Payload,
        timeout: Option<Duration>,
    ) -> Result<reqwest::Request, TransportError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|source| TransportError::Url {
                path: path.to_owned(),
                source,
            })?;

        let mut builder = self
            .http
            .request(method, url)
            .header(header::USER_AGENT, self.user_agent.as_str());
        if !self.token.is_empty() {
            builder = builder.bearer_auth(&self.token);
        }
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        builder = match payload {
            Payload::Empty => builder,
            Payload::Json(bytes) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(bytes),
            Payload::Multipart(form) => builder.multipart(form),
        };

        Ok(builder.build()?)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use reqwest::{header, Method};
    use serde_json::json;

    use super::{user_agent, Payload};
    use crate::{error::TransportError, TursoClient};

    fn client(base_url: &str) -> TursoClient {
        TursoClient::builder("secret-token")
            .base_url(base_url)
            .build()
            .expect("client must build")
    }

    #[test]
    fn relative_path_resolves_against_base() {
        let client = client("https://api.example.com");
        let request = client
            .transport()
            .build_request(Method::GET, "/v1/databases", Payload::Empty, None)
            .expect("must build");
        assert_eq!(
            request.url().as_str(),
            "https://api.example.com/v1/databases"
        );
        assert_eq!(request.method(), Method::GET);
    }

    #[test]
    fn absolute_url_overrides_host() {
        let client = client("https://api.example.com");
        let request = client
            .transport()
            .build_request(Method::GET, "https://region.turso.io", Payload::Empty, None)
            .expect("must build");
        assert_eq!(request.url().host_str(), Some("region.turso.io"));
    }

    #[test]
    fn query_string_survives_resolution() {
        let client = client("https://api.example.com");
        let request = client
            .transport()
            .build_request(
                Method::POST,
                "/v1/databases/db/auth/tokens?expiration=2w&authorization=read-only",
                Payload::Empty,
                None,
            )
            .expect("must build");
        assert_eq!(
            request.url().query(),
            Some("expiration=2w&authorization=read-only")
        );
    }

    #[test]
    fn auth_and_user_agent_headers_are_set() {
        let client = client("https://api.example.com");
        let request = client
            .transport()
            .build_request(Method::GET, "/v1/plans", Payload::Empty, None)
            .expect("must build");
        let headers = request.headers();
        assert_eq!(headers[header::AUTHORIZATION], "Bearer secret-token");
        assert_eq!(headers[header::USER_AGENT], user_agent().as_str());
        assert!(headers.get(header::CONTENT_TYPE).is_none());
    }

    #[test]
    fn json_body_sets_content_type() {
        let client = client("https://api.example.com");
        let payload = Payload::json(&json!({"name": "db"})).expect("must encode");
        let request = client
            .transport()
            .build_request(
                Method::POST,
                "/v1/databases",
                payload,
                Some(Duration::from_secs(1)),
            )
            .expect("must build");
        assert_eq!(request.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(request.timeout(), Some(&Duration::from_secs(1)));
        let body = request.body().and_then(|b| b.as_bytes()).expect("buffered body");
        assert_eq!(body, br#"{"name":"db"}"#);
    }

    #[test]
    fn multipart_form_sets_its_boundary() {
        let client = client("https://api.example.com");
        let form = reqwest::multipart::Form::new().text("file", "x");
        let content_type = format!("multipart/form-data; boundary={}", form.boundary());
        let request = client
            .transport()
            .build_request(
                Method::POST,
                "/v1/databases/dumps",
                Payload::Multipart(form),
                None,
            )
            .expect("must build");
        assert_eq!(
            request.headers()[header::CONTENT_TYPE],
            content_type.as_str()
        );
    }

    #[test]
    fn unparseable_path_is_transport_error() {
        let client = client("https://api.example.com");
        let err = client
            .transport()
            .build_request(Method::GET, "http://[::1", Payload::Empty, None)
            .expect_err("must fail");
        assert!(matches!(err, TransportError::Url { .. }));
    }

    #[test]
    fn user_agent_names_library_and_platform() {
        let agent = user_agent();
        assert!(agent.starts_with(concat!("turso-platform-http/", env!("CARGO_PKG_VERSION"))));
        assert!(agent.ends_with(&format!(
            "({}/{})",
            std::env::consts::OS,
            std::env::consts::ARCH
        )));
    }
}
