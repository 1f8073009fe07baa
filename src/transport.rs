use std::{path::Path, time::Duration};

use bytes::Bytes;
use reqwest::Method;
use serde::Serialize;
use tokio::io::AsyncRead;
use url::Url;

use crate::{
    classify::{classify, Call},
    request::Payload,
    scope::scoped_path,
    upload::MultipartUpload,
    ClientOptions, Result, TursoError,
};

/// Request pipeline shared by every resource client.
///
/// Immutable after construction; resource clients borrow it.
pub(crate) struct Transport {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: Url,
    pub(crate) token: String,
    pub(crate) organization: Option<String>,
    pub(crate) options: ClientOptions,
    pub(crate) user_agent: String,
}

impl Transport {
    pub(crate) fn organization(&self) -> Option<&str> {
        self.organization.as_deref()
    }

    /// Org-scoped path for a resource segment.
    pub(crate) fn scoped(&self, segment: &str) -> String {
        scoped_path(self.organization(), segment)
    }

    /// Executes one request. No retries; the response is owned by the caller.
    pub(crate) async fn execute(
        &self,
        request: reqwest::Request,
    ) -> std::result::Result<reqwest::Response, reqwest::Error> {
        self.http.execute(request).await
    }

    /// Runs the full pipeline and returns the body of a 200 response.
    pub(crate) async fn send(
        &self,
        call: &Call,
        method: Method,
        path: &str,
        payload: Payload,
    ) -> Result<Bytes> {
        let timeout = Some(Duration::from_millis(self.options.timeout_ms));
        self.round_trip(call, method, path, payload, timeout).await
    }

    pub(crate) async fn get(&self, call: &Call, path: &str) -> Result<Bytes> {
        self.send(call, Method::GET, path, Payload::Empty).await
    }

    pub(crate) async fn post(&self, call: &Call, path: &str) -> Result<Bytes> {
        self.send(call, Method::POST, path, Payload::Empty).await
    }

    pub(crate) async fn delete(&self, call: &Call, path: &str) -> Result<Bytes> {
        self.send(call, Method::DELETE, path, Payload::Empty).await
    }

    pub(crate) async fn post_json<B>(&self, call: &Call, path: &str, body: &B) -> Result<Bytes>
    where
        B: Serialize + ?Sized,
    {
        let payload =
            Payload::json(body).map_err(|err| TursoError::transport(call.operation, err))?;
        self.send(call, Method::POST, path, payload).await
    }

    pub(crate) async fn patch_json<B>(&self, call: &Call, path: &str, body: &B) -> Result<Bytes>
    where
        B: Serialize + ?Sized,
    {
        let payload =
            Payload::json(body).map_err(|err| TursoError::transport(call.operation, err))?;
        self.send(call, Method::PATCH, path, payload).await
    }

    /// Streams the file at `file` as a multipart `POST`.
    pub(crate) async fn upload(&self, call: &Call, path: &str, file: &Path) -> Result<Bytes> {
        let upload = MultipartUpload::from_path(file)
            .await
            .map_err(|err| TursoError::transport(call.operation, err))?;
        self.upload_multipart(call, path, upload).await
    }

    /// Streams an arbitrary reader as a multipart `POST` under `filename`.
    pub(crate) async fn upload_reader<R>(
        &self,
        call: &Call,
        path: &str,
        reader: R,
        filename: &str,
    ) -> Result<Bytes>
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        let upload = MultipartUpload::from_reader(reader, filename);
        self.upload_multipart(call, path, upload).await
    }

    async fn upload_multipart(
        &self,
        call: &Call,
        path: &str,
        upload: MultipartUpload,
    ) -> Result<Bytes> {
        // The guard lives until the round trip is over, then stops the producer.
        let (form, _producer) = upload
            .into_form()
            .map_err(|err| TursoError::transport(call.operation, err))?;
        let timeout = self.options.upload_timeout_ms.map(Duration::from_millis);
        self.round_trip(call, Method::POST, path, Payload::Multipart(form), timeout)
            .await
    }

    async fn round_trip(
        &self,
        call: &Call,
        method: Method,
        path: &str,
        payload: Payload,
        timeout: Option<Duration>,
    ) -> Result<Bytes> {
        let operation = call.operation;
        let request = self
            .build_request(method, path, payload, timeout)
            .map_err(|err| TursoError::transport(operation, err))?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            method = %request.method(),
            url = %request.url(),
            "sending {operation} request"
        );

        let response = self
            .execute(request)
            .await
            .map_err(|err| TursoError::transport(operation, err))?;
        let status = response.status();
        // Consuming the body hands the connection back to the pool.
        let body = response
            .bytes()
            .await
            .map_err(|err| TursoError::transport(operation, err))?;

        classify(call, self.organization(), status, &body)?;
        Ok(body)
    }
}
