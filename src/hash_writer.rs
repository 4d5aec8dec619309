use digest::Digest;
use pin_project_lite::pin_project;
use sha2::Sha256;
use std::io::{Error, Result};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::AsyncWrite;

pin_project! {
    /// Passes writes through to `inner` while digesting and counting every byte
    /// that was actually accepted.
    pub struct HashWriterAsync<AW, D> {
        #[pin]
        inner: AW,
        digest: D,
        total_bytes_written: u64,
    }
}

impl<AW, D> AsyncWrite for HashWriterAsync<AW, D>
where
    AW: AsyncWrite,
    D: Digest,
{
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<std::result::Result<usize, Error>> {
        let projection = self.project();
        let r = projection.inner.poll_write(cx, buf);
        if let Poll::Ready(Ok(num_bytes_written)) = r {
            projection.digest.update(&buf[..num_bytes_written]);
            *projection.total_bytes_written += num_bytes_written as u64;
        }
        r
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.project().inner.poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.project().inner.poll_shutdown(cx)
    }
}

impl<AW, D: Digest> HashWriterAsync<AW, D> {
    pub fn new(digest: D, inner: AW) -> HashWriterAsync<AW, D> {
        HashWriterAsync {
            digest,
            inner,
            total_bytes_written: 0,
        }
    }
}

impl<AW> HashWriterAsync<AW, Sha256> {
    pub fn new_sha256(inner: AW) -> HashWriterAsync<AW, Sha256> {
        Self::new(Sha256::new(), inner)
    }

    pub fn into_inner_sha256(self) -> (AW, [u8; 32], u64) {
        (
            self.inner,
            self.digest.finalize().into(),
            self.total_bytes_written,
        )
    }
}
