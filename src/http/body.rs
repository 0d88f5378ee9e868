//! Response body module
//!
//! File contents are streamed from disk in fixed-size chunks so large assets
//! and ranges are never buffered whole. Dropping the body (client gone)
//! closes the file.

use std::io::{self, SeekFrom};
use std::path::Path;

use futures::TryStreamExt;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Empty, Full, StreamBody};
use hyper::body::{Bytes, Frame};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

use super::range::ByteRange;

/// Read size for streamed files
const CHUNK_SIZE: usize = 64 * 1024;

/// Body type of every engine response
pub type Body = UnsyncBoxBody<Bytes, io::Error>;

/// Empty body (304, 404, HEAD)
pub fn empty() -> Body {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// In-memory body
pub fn full(data: impl Into<Bytes>) -> Body {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Stream `path`, or only `range` of it
///
/// Read errors after the headers are sent surface as a body error, which
/// aborts the connection.
pub async fn file(path: &Path, range: Option<ByteRange>, size: u64) -> io::Result<Body> {
    let mut file = File::open(path).await?;

    let (start, len) = match range {
        Some(r) => (r.start, r.content_length()),
        None => (0, size),
    };
    if start > 0 {
        file.seek(SeekFrom::Start(start)).await?;
    }

    let stream = ReaderStream::with_capacity(file.take(len), CHUNK_SIZE).map_ok(Frame::data);
    Ok(StreamBody::new(stream).boxed_unsync())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn collect(body: Body) -> Bytes {
        body.collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_full_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt");
        std::fs::write(&path, "0123456789").unwrap();

        let body = file(&path, None, 10).await.unwrap();
        assert_eq!(collect(body).await, Bytes::from_static(b"0123456789"));
    }

    #[tokio::test]
    async fn test_range_slice() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt");
        std::fs::write(&path, "0123456789").unwrap();

        let range = ByteRange { start: 2, end: 5 };
        let body = file(&path, Some(range), 10).await.unwrap();
        assert_eq!(collect(body).await, Bytes::from_static(b"2345"));
    }

    #[tokio::test]
    async fn test_large_file_is_chunked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.bin");
        let data = vec![7u8; CHUNK_SIZE * 3 + 11];
        std::fs::write(&path, &data).unwrap();

        let mut body = file(&path, None, data.len() as u64).await.unwrap();
        let mut frames = 0;
        let mut total = 0;
        while let Some(frame) = body.frame().await {
            let chunk = frame.unwrap().into_data().unwrap();
            assert!(chunk.len() <= CHUNK_SIZE);
            total += chunk.len();
            frames += 1;
        }
        assert_eq!(total, data.len());
        assert!(frames >= 4);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(file(&dir.path().join("gone"), None, 0).await.is_err());
    }
}
