// Chunked JSON-lines streaming utilities
use crate::infrastructure::http_response::brotli;
use axum::body::Body;
use axum::http::{header, Response, StatusCode};
use axum::response::IntoResponse;
use bytes::{BufMut, Bytes, BytesMut};
use futures::stream::Stream;
use futures::StreamExt;
use serde::Serialize;

/// Create a chunked streaming response, one JSON document per line.
///
/// Compressed chunks are length-prefixed (4 bytes, big-endian) since a
/// Brotli payload may itself contain newlines.
pub async fn chunked_json_stream<S, T>(stream: S, compress: bool) -> Result<Response<Body>, StatusCode>
where
    S: Stream<Item = T> + Send + 'static,
    T: Serialize + Send + Sync + 'static,
{
    let byte_stream = stream.then(move |msg| async move { serialize_chunk(&msg, compress).await });

    let body = Body::from_stream(byte_stream);

    let content_type = if compress {
        "application/octet-stream"
    } else {
        "application/x-ndjson"
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::TRANSFER_ENCODING, "chunked")
        .body(body)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Serialize a single message to a chunk
pub async fn serialize_chunk<T: Serialize>(msg: &T, compress: bool) -> Result<Bytes, std::io::Error> {
    let mut buffer = serde_json::to_vec(msg).map_err(std::io::Error::other)?;

    if !compress {
        buffer.push(b'\n');
        return Ok(Bytes::from(buffer));
    }

    let payload = brotli(buffer).await?;
    let length = payload.len() as u32;
    let mut chunk = BytesMut::with_capacity(4 + payload.len());
    chunk.put_u32(length);
    chunk.put_slice(&payload);

    Ok(chunk.freeze())
}

/// Helper to create a streaming response from a receiver
pub async fn stream_from_receiver<T>(mut rx: tokio::sync::mpsc::Receiver<T>, compress: bool) -> impl IntoResponse
where
    T: Serialize + Send + Sync + 'static,
{
    let stream = async_stream::stream! {
        while let Some(msg) = rx.recv().await {
            yield msg;
        }
    };

    match chunked_json_stream(stream, compress).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_plain_chunk_is_one_line() {
        let chunk = serialize_chunk(&serde_json::json!({"seq": 1}), false).await.unwrap();
        assert_eq!(&chunk[..], b"{\"seq\":1}\n");
    }

    #[tokio::test]
    async fn test_compressed_chunk_is_length_prefixed() {
        let chunk = serialize_chunk(&serde_json::json!({"seq": 1}), true).await.unwrap();
        let declared = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]) as usize;
        assert_eq!(declared, chunk.len() - 4);
    }
}
