//! Line-oriented socket reader.
//!
//! Reads one logical line at a time directly from the connection, treating
//! `\n`, `\r\n` and a bare `\r` all as line terminators. The returned line
//! never contains the terminator. NUL bytes are dropped.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};

use crate::http::parser::ParseError;

/// Buffered reader over a connection, with the line semantics the request
/// parser depends on.
pub struct RequestReader<R> {
    inner: BufReader<R>,
}

impl<R: AsyncRead + Unpin> RequestReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner: BufReader::new(inner),
        }
    }

    /// Read one line, stripping the terminator.
    ///
    /// A connection closed or errored mid-line fails the read; there is no
    /// partial-line recovery.
    pub async fn read_line(&mut self) -> Result<Vec<u8>, ParseError> {
        let mut line = Vec::new();
        loop {
            let (consumed, terminator) = {
                let available = self.inner.fill_buf().await?;
                if available.is_empty() {
                    return Err(ParseError::SocketRead(std::io::Error::new(
                        std::io::ErrorKind::UnexpectedEof,
                        "connection closed before end of line",
                    )));
                }

                let mut consumed = 0;
                let mut terminator = None;
                for &byte in available {
                    consumed += 1;
                    match byte {
                        // NUL bytes are ignored entirely
                        0 => {}
                        b'\n' | b'\r' => {
                            terminator = Some(byte);
                            break;
                        }
                        other => line.push(other),
                    }
                }
                (consumed, terminator)
            };

            self.inner.consume(consumed);
            match terminator {
                Some(b'\n') => return Ok(line),
                Some(_) => {
                    self.consume_lf_after_cr().await;
                    return Ok(line);
                }
                None => {}
            }
        }
    }

    /// After a `\r` terminator, peek at the next byte: a following `\n`
    /// belongs to the same terminator and is discarded. Anything else
    /// (EOF and read errors included) leaves the stream untouched; the
    /// lone `\r` already ended the line.
    async fn consume_lf_after_cr(&mut self) {
        if let Ok(next) = self.inner.fill_buf().await {
            if next.first() == Some(&b'\n') {
                self.inner.consume(1);
            }
        }
    }

    /// Read exactly `len` bytes (the Content-Length body).
    ///
    /// The buffer grows with the bytes that actually arrive; `len` is a
    /// client-supplied number and must not size an up-front allocation.
    pub async fn read_exact_body(&mut self, len: usize) -> Result<Vec<u8>, ParseError> {
        let mut body = Vec::new();
        let read = (&mut self.inner)
            .take(len as u64)
            .read_to_end(&mut body)
            .await?;
        if read < len {
            return Err(ParseError::SocketRead(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "connection closed before full body",
            )));
        }
        Ok(body)
    }
}
