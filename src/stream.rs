//! Lazy line sequence over a streamed response
//!
//! Wraps the raw byte stream of an upstream response into a forward-only
//! sequence of text lines. Lines are the provider's wire-format chunks and
//! are not decoded further here.

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::{Stream, StreamExt};

use crate::client::drain_lines;
use crate::error::{PipeError, PipeResult};
use crate::logger;

type ByteStream = BoxStream<'static, Result<Bytes, reqwest::Error>>;

/// Forward-only stream of raw response lines.
///
/// Each item is one line exactly as the remote connection delivered it,
/// including empty separator lines. A transport failure yields a single
/// `Err` item and ends the sequence; dropping the stream aborts it.
pub struct LineStream {
    inner: Option<ByteStream>,
    buffer: Vec<u8>,
    ready: VecDeque<String>,
}

impl LineStream {
    /// Wrap a streamed HTTP response.
    pub(crate) fn new(response: reqwest::Response) -> Self {
        Self::from_bytes(response.bytes_stream().boxed())
    }

    fn from_bytes(inner: ByteStream) -> Self {
        Self {
            inner: Some(inner),
            buffer: Vec::new(),
            ready: VecDeque::new(),
        }
    }
}

impl Stream for LineStream {
    type Item = PipeResult<String>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            if let Some(line) = this.ready.pop_front() {
                return Poll::Ready(Some(Ok(line)));
            }

            let Some(inner) = this.inner.as_mut() else {
                return Poll::Ready(None);
            };

            match inner.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(chunk))) => {
                    this.ready
                        .extend(drain_lines(&mut this.buffer, chunk.as_ref()));
                }
                Poll::Ready(Some(Err(e))) => {
                    logger::error("stream", &format!("Stream bytes error: {}", e));
                    this.inner = None;
                    this.buffer.clear();
                    return Poll::Ready(Some(Err(PipeError::request(
                        format!("Stream error: {}", e),
                        None,
                    ))));
                }
                Poll::Ready(None) => {
                    this.inner = None;
                    // Flush a trailing line the remote never terminated.
                    if !this.buffer.is_empty() {
                        let mut line = std::mem::take(&mut this.buffer);
                        if line.last() == Some(&b'\r') {
                            line.pop();
                        }
                        this.ready
                            .push_back(String::from_utf8_lossy(&line).to_string());
                    }
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
