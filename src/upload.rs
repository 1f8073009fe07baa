//! Streaming `multipart/form-data` bodies.
//!
//! A producer task reads the source in chunks and pushes them into a bounded
//! channel; the other end becomes the stream of the form's `file` part. The
//! part only ends cleanly after the producer has sent its end marker. A read
//! failure or a producer that stops early surfaces as a body error, so the
//! request fails instead of sending a truncated file.

use std::{
    io,
    path::Path,
    pin::Pin,
    task::{ready, Context, Poll},
};

use bytes::{Bytes, BytesMut};
use futures_core::Stream;
use reqwest::multipart::{Form, Part};
use tokio::{
    io::{AsyncRead, AsyncReadExt},
    sync::mpsc,
    task::JoinHandle,
};

/// Size of a single file chunk pushed through the pipe.
pub(crate) const CHUNK_SIZE: usize = 16 * 1024;
/// Number of chunks the pipe buffers before the producer waits.
pub(crate) const PIPE_CAPACITY: usize = 4;

/// Form field name the platform expects for uploaded files.
const FIELD_NAME: &str = "file";

enum Frame {
    Data(Bytes),
    End,
}

/// Multipart form whose single `file` part is streamed from a reader.
pub(crate) struct MultipartUpload {
    filename: String,
    body: PipeReader,
    producer: ProducerGuard,
}

impl MultipartUpload {
    /// Opens `path` and streams it under its base name.
    pub(crate) async fn from_path(path: &Path) -> io::Result<Self> {
        let file = tokio::fs::File::open(path).await?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::from_reader(file, &filename))
    }

    /// Spawns the producer for `reader`. Must be called inside a Tokio runtime.
    pub(crate) fn from_reader<R>(reader: R, filename: &str) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        let (tx, rx) = mpsc::channel(PIPE_CAPACITY);
        let producer = tokio::spawn(produce(reader, tx));

        Self {
            filename: filename.to_owned(),
            body: PipeReader { rx, done: false },
            producer: ProducerGuard(producer),
        }
    }

    /// Splits into the request form and the guard that stops the producer
    /// once the caller is done with the request.
    pub(crate) fn into_form(self) -> Result<(Form, ProducerGuard), reqwest::Error> {
        let part = Part::stream(reqwest::Body::wrap_stream(self.body))
            .file_name(self.filename)
            .mime_str("application/octet-stream")?;
        Ok((Form::new().part(FIELD_NAME, part), self.producer))
    }
}

async fn produce<R>(mut reader: R, tx: mpsc::Sender<io::Result<Frame>>)
where
    R: AsyncRead + Unpin,
{
    loop {
        let mut chunk = BytesMut::with_capacity(CHUNK_SIZE);
        match reader.read_buf(&mut chunk).await {
            Ok(0) => break,
            Ok(_) => {
                // A send error means the request went away; nobody is reading.
                if tx.send(Ok(Frame::Data(chunk.freeze()))).await.is_err() {
                    #[cfg(feature = "tracing")]
                    tracing::debug!("upload body dropped before the file was fully sent");
                    return;
                }
            }
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::debug!("upload source read failed: {err}");
                let _ = tx.send(Err(err)).await;
                return;
            }
        }
    }
    let _ = tx.send(Ok(Frame::End)).await;
}

/// Consumer end of the pipe.
struct PipeReader {
    rx: mpsc::Receiver<io::Result<Frame>>,
    done: bool,
}

impl Stream for PipeReader {
    type Item = io::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.done {
            return Poll::Ready(None);
        }
        let item = match ready!(self.rx.poll_recv(cx)) {
            Some(Ok(Frame::Data(bytes))) => Ok(bytes),
            Some(Ok(Frame::End)) => {
                self.done = true;
                return Poll::Ready(None);
            }
            Some(Err(err)) => {
                self.done = true;
                Err(err)
            }
            None => {
                self.done = true;
                Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "upload producer stopped before the end of the file",
                ))
            }
        };
        Poll::Ready(Some(item))
    }
}

/// Aborts the producer task when dropped.
pub(crate) struct ProducerGuard(JoinHandle<()>);

impl Drop for ProducerGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}

#[cfg(test)]
mod tests {
    use std::{
        future::poll_fn,
        io,
        pin::Pin,
        task::{Context, Poll},
    };

    use bytes::Bytes;
    use futures_core::Stream;
    use tokio::{
        io::{AsyncRead, ReadBuf},
        sync::mpsc,
    };

    use super::{Frame, MultipartUpload, PipeReader, CHUNK_SIZE, PIPE_CAPACITY};

    async fn next(reader: &mut PipeReader) -> Option<io::Result<Bytes>> {
        poll_fn(|cx| Pin::new(&mut *reader).poll_next(cx)).await
    }

    async fn drain(mut upload: MultipartUpload) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        while let Some(chunk) = next(&mut upload.body).await {
            out.extend_from_slice(&chunk?);
        }
        Ok(out)
    }

    fn payload(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    #[tokio::test]
    async fn streamed_bytes_are_identical() {
        let over_pipe = CHUNK_SIZE * PIPE_CAPACITY * 3 + 17;
        for len in [0, 1, 4096, over_pipe] {
            let data = payload(len);
            let upload = MultipartUpload::from_reader(io::Cursor::new(data.clone()), "seed.db");
            let body = drain(upload).await.expect("stream must finish cleanly");
            assert_eq!(body, data, "size {len}");
        }
    }

    #[tokio::test]
    async fn filename_is_base_name_of_path() {
        let dir = tempfile::tempdir().expect("must create temp dir");
        let path = dir.path().join("dump.sql");
        std::fs::write(&path, b"CREATE TABLE t(x);").expect("must write fixture");

        let upload = MultipartUpload::from_path(&path)
            .await
            .expect("must open fixture");
        assert_eq!(upload.filename, "dump.sql");
        let body = drain(upload).await.expect("stream must finish cleanly");
        assert_eq!(body, b"CREATE TABLE t(x);");
    }

    #[tokio::test]
    async fn missing_file_fails_to_open() {
        let dir = tempfile::tempdir().expect("must create temp dir");
        let err = MultipartUpload::from_path(&dir.path().join("absent.db"))
            .await
            .err()
            .expect("open must fail");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn form_carries_a_boundary() {
        let upload = MultipartUpload::from_reader(io::Cursor::new(Vec::new()), "seed.db");
        let (form, _producer) = upload.into_form().expect("form must build");
        assert!(!form.boundary().is_empty());
    }

    struct FailingReader {
        sent: bool,
    }

    impl AsyncRead for FailingReader {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            if self.sent {
                return Poll::Ready(Err(io::Error::other("disk failure")));
            }
            self.sent = true;
            buf.put_slice(b"partial");
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn read_failure_fails_the_stream() {
        let upload = MultipartUpload::from_reader(FailingReader { sent: false }, "seed.db");
        let err = drain(upload).await.expect_err("stream must fail");
        assert_eq!(err.to_string(), "disk failure");
    }

    #[tokio::test]
    async fn producer_vanishing_fails_the_stream() {
        let (tx, rx) = mpsc::channel(PIPE_CAPACITY);
        tx.send(Ok(Frame::Data(Bytes::from_static(b"head"))))
            .await
            .expect("receiver is alive");
        drop(tx);

        let mut reader = PipeReader { rx, done: false };
        assert!(next(&mut reader).await.expect("first chunk").is_ok());
        let err = next(&mut reader)
            .await
            .expect("terminal item")
            .expect_err("must be an error");
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        assert!(next(&mut reader).await.is_none());
    }
}
