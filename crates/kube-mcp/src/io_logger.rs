//! Protocol traffic logging for `stdio --log-commands`.
//!
//! [`LoggedReader`] and [`LoggedWriter`] wrap the transport halves and emit each
//! chunk that passes through them at info level, tagged `[stdin]` / `[stdout]`.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tracing::info;

/// Logs every chunk read from the inner reader.
#[derive(Debug)]
pub struct LoggedReader<R> {
    inner: R,
}

impl<R> LoggedReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: AsyncRead + Unpin> AsyncRead for LoggedReader<R> {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let before = buf.filled().len();
        let poll = Pin::new(&mut self.inner).poll_read(cx, buf);
        if let Poll::Ready(Ok(())) = &poll {
            let chunk = &buf.filled()[before..];
            if !chunk.is_empty() {
                info!("[stdin]: received {} bytes: {}", chunk.len(), String::from_utf8_lossy(chunk));
            }
        }
        poll
    }
}

/// Logs every chunk accepted by the inner writer.
#[derive(Debug)]
pub struct LoggedWriter<W> {
    inner: W,
}

impl<W> LoggedWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: AsyncWrite + Unpin> AsyncWrite for LoggedWriter<W> {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let poll = Pin::new(&mut self.inner).poll_write(cx, buf);
        if let Poll::Ready(Ok(written)) = &poll {
            let chunk = &buf[..*written];
            info!("[stdout]: sending {} bytes: {}", chunk.len(), String::from_utf8_lossy(chunk));
        }
        poll
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_shutdown(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn test_reader_passes_bytes_through() {
        let mut reader = LoggedReader::new(&b"{\"jsonrpc\":\"2.0\"}\n"[..]);
        let mut out = String::new();
        reader.read_to_string(&mut out).await.unwrap();
        assert_eq!(out, "{\"jsonrpc\":\"2.0\"}\n");
    }

    #[tokio::test]
    async fn test_writer_passes_bytes_through() {
        let mut writer = LoggedWriter::new(Vec::new());
        writer.write_all(b"hello\n").await.unwrap();
        writer.flush().await.unwrap();
        assert_eq!(writer.into_inner(), b"hello\n");
    }
}
