use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;

use crate::http::parser::{find_head_end, parse_request};
use crate::http::request::{Request, Version};
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;
use crate::routes::dispatcher::Dispatcher;

/// Bounds on how a single message is read.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionLimits {
    pub read_timeout: Duration,
    pub max_request_bytes: usize,
}

impl Default for ConnectionLimits {
    fn default() -> Self {
        Self {
            read_timeout: Duration::from_secs(10),
            max_request_bytes: 1024 * 1024,
        }
    }
}

#[derive(Debug)]
pub enum FrameError {
    TooLarge,
    TimedOut,
    Io(std::io::Error),
}

pub struct Connection<S> {
    stream: S,
    buffer: Vec<u8>,
    state: ConnectionState,
    dispatcher: Arc<Dispatcher>,
    limits: ConnectionLimits,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, dispatcher: Arc<Dispatcher>, limits: ConnectionLimits) -> Self {
        Self {
            stream,
            buffer: Vec::with_capacity(4096),
            state: ConnectionState::Reading,
            dispatcher,
            limits,
        }
    }

    /// Serves exactly one request, then closes.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::Reading => match self.read_request().await {
                    Ok(Some(req)) => {
                        self.state = ConnectionState::Processing(req);
                    }
                    Ok(None) => {
                        self.state = ConnectionState::Closed;
                    }
                    Err(FrameError::Io(e)) => return Err(e.into()),
                    Err(e) => {
                        tracing::warn!(error = ?e, bytes = self.buffer.len(), "Unreadable request");
                        let response = Response::bad_request();
                        self.state = ConnectionState::Writing(ResponseWriter::new(&response));
                    }
                },

                ConnectionState::Processing(req) => {
                    let response = self.dispatcher.respond(req).await;

                    tracing::info!(
                        method = ?req.method,
                        path = ?req.path,
                        status = response.status.as_u16(),
                        body = response.sends_body(),
                        "Request handled"
                    );

                    let writer = ResponseWriter::new(&response);
                    self.state = ConnectionState::Writing(writer);
                }

                ConnectionState::Writing(writer) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    // Every response ends the connection.
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    if let Err(e) = self.stream.shutdown().await {
                        tracing::debug!(error = %e, "Shutdown after response failed");
                    }
                    break;
                }
            }
        }

        Ok(())
    }

    /// Buffers one complete message and parses it.
    ///
    /// Returns `Ok(None)` when the peer closes without sending anything.
    pub async fn read_request(&mut self) -> Result<Option<Request>, FrameError> {
        loop {
            if let Some(len) = message_length(&self.buffer) {
                let request = parse_request(&self.buffer[..len]);
                self.buffer.drain(..len);
                return Ok(Some(request));
            }

            if self.buffer.len() > self.limits.max_request_bytes {
                return Err(FrameError::TooLarge);
            }

            let mut temp = [0u8; 4096];
            let n = timeout(self.limits.read_timeout, self.stream.read(&mut temp))
                .await
                .map_err(|_| FrameError::TimedOut)?
                .map_err(FrameError::Io)?;

            if n == 0 {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                // Peer finished sending; take what arrived.
                let request = parse_request(&self.buffer);
                self.buffer.clear();
                return Ok(Some(request));
            }

            self.buffer.extend_from_slice(&temp[..n]);
        }
    }
}

/// Length of the complete message at the start of `buf`, if it has fully arrived.
///
/// The head ends at the first blank line. The body then runs for
/// `content-length` bytes, or for chunked messages up to the blank line after
/// the zero-size chunk. An HTTP/1.1 client waiting on `Expect: 100-continue`
/// will not send its body, so such a message is complete as soon as the head
/// is. HTTP/1.0 never gets the interim response and is framed as usual.
pub fn message_length(buf: &[u8]) -> Option<usize> {
    let (_, body_start) = find_head_end(buf)?;
    let head = parse_request(&buf[..body_start]);

    let awaits_continue = head.header("expect") == Some("100-continue")
        && head.version.is_some_and(|v| v > Version::HTTP_1_0);
    if awaits_continue {
        return Some(buf.len());
    }

    if head.header("transfer-encoding") == Some("chunked") {
        return chunked_body_end(buf, body_start);
    }

    let end = body_start.checked_add(head.content_length())?;
    (buf.len() >= end).then_some(end)
}

fn chunked_body_end(buf: &[u8], body_start: usize) -> Option<usize> {
    let mut pos = body_start;

    loop {
        let (size_line, next) = next_line(buf, pos)?;
        pos = next;

        let token = std::str::from_utf8(size_line)
            .unwrap_or("")
            .split(';')
            .next()
            .unwrap_or("")
            .trim();
        if token.is_empty() {
            continue;
        }

        match usize::from_str_radix(token, 16) {
            Ok(0) => break,
            Ok(_) => {
                let (_, next) = next_line(buf, pos)?;
                pos = next;
            }
            // The parser stops decoding here too.
            Err(_) => return Some(buf.len()),
        }
    }

    // Trailers, up to the terminating blank line.
    loop {
        let (line, next) = next_line(buf, pos)?;
        pos = next;
        if line.is_empty() {
            return Some(pos);
        }
    }
}

/// The line starting at `start` without its terminator, and the offset after it.
fn next_line(buf: &[u8], start: usize) -> Option<(&[u8], usize)> {
    let rel = buf.get(start..)?.iter().position(|&b| b == b'\n')?;
    let end = start + rel;
    let line = &buf[start..end];
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    Some((line, end + 1))
}
