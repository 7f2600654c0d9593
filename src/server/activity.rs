// Connection activity module
// Wraps the socket to record when bytes last moved and whether a write is stalled

use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

/// What the connection watchdog should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Bytes are moving, or the limits have not been reached
    Active,
    /// No bytes in either direction for the idle timeout
    Idle,
    /// A write has been blocked without progress for the stall timeout
    WriteStalled,
}

/// I/O timestamps of one connection, in milliseconds since it was accepted
pub struct Activity {
    started: Instant,
    last_io_ms: AtomicU64,
    /// 0 when no write is pending, otherwise (time blocked since) + 1
    write_blocked_ms: AtomicU64,
}

impl Activity {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            last_io_ms: AtomicU64::new(0),
            write_blocked_ms: AtomicU64::new(0),
        }
    }

    fn now_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn record_read_at(&self, now_ms: u64) {
        self.last_io_ms.store(now_ms, Ordering::Relaxed);
    }

    fn record_write_at(&self, now_ms: u64) {
        self.last_io_ms.store(now_ms, Ordering::Relaxed);
        self.write_blocked_ms.store(0, Ordering::Relaxed);
    }

    fn record_write_blocked_at(&self, now_ms: u64) {
        // Keep the earliest time of an ongoing stall
        let _ = self.write_blocked_ms.compare_exchange(
            0,
            now_ms + 1,
            Ordering::Relaxed,
            Ordering::Relaxed,
        );
    }

    /// Judge the connection against the idle and write-stall limits
    ///
    /// `None` disables a limit.
    pub fn verdict(&self, idle: Option<Duration>, write_stall: Option<Duration>) -> Verdict {
        self.verdict_at(self.now_ms(), idle, write_stall)
    }

    fn verdict_at(&self, now_ms: u64, idle: Option<Duration>, write_stall: Option<Duration>) -> Verdict {
        let blocked = self.write_blocked_ms.load(Ordering::Relaxed);
        if blocked != 0 {
            let stalled_for = now_ms.saturating_sub(blocked - 1);
            if write_stall.is_some_and(|limit| stalled_for >= as_ms(limit)) {
                return Verdict::WriteStalled;
            }
            return Verdict::Active;
        }

        let quiet_for = now_ms.saturating_sub(self.last_io_ms.load(Ordering::Relaxed));
        if idle.is_some_and(|limit| quiet_for >= as_ms(limit)) {
            return Verdict::Idle;
        }
        Verdict::Active
    }
}

impl Default for Activity {
    fn default() -> Self {
        Self::new()
    }
}

fn as_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Socket wrapper feeding an [`Activity`]
pub struct TrackedIo<T> {
    inner: T,
    activity: Arc<Activity>,
}

impl<T> TrackedIo<T> {
    pub const fn new(inner: T, activity: Arc<Activity>) -> Self {
        Self { inner, activity }
    }

    fn track_write(&self, poll: &Poll<io::Result<usize>>) {
        let now = self.activity.now_ms();
        match poll {
            Poll::Ready(Ok(n)) if *n > 0 => self.activity.record_write_at(now),
            Poll::Pending => self.activity.record_write_blocked_at(now),
            Poll::Ready(_) => {}
        }
    }
}

impl<T: AsyncRead + Unpin> AsyncRead for TrackedIo<T> {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let before = buf.filled().len();
        let poll = Pin::new(&mut self.inner).poll_read(cx, buf);
        if matches!(poll, Poll::Ready(Ok(()))) && buf.filled().len() > before {
            self.activity.record_read_at(self.activity.now_ms());
        }
        poll
    }
}

impl<T: AsyncWrite + Unpin> AsyncWrite for TrackedIo<T> {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let poll = Pin::new(&mut self.inner).poll_write(cx, buf);
        self.track_write(&poll);
        poll
    }

    fn poll_write_vectored(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        bufs: &[io::IoSlice<'_>],
    ) -> Poll<io::Result<usize>> {
        let poll = Pin::new(&mut self.inner).poll_write_vectored(cx, bufs);
        self.track_write(&poll);
        poll
    }

    fn is_write_vectored(&self) -> bool {
        self.inner.is_write_vectored()
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

    const SECOND: Option<Duration> = Some(Duration::from_secs(1));

    #[test]
    fn test_idle_after_quiet_period() {
        let activity = Activity::new();
        activity.record_read_at(200);
        assert_eq!(activity.verdict_at(900, SECOND, SECOND), Verdict::Active);
        assert_eq!(activity.verdict_at(1_200, SECOND, SECOND), Verdict::Idle);
        assert_eq!(activity.verdict_at(1_200, None, SECOND), Verdict::Active);
    }

    #[test]
    fn test_progress_resets_stall() {
        let activity = Activity::new();
        activity.record_write_blocked_at(100);
        // A later block does not move the start of the stall
        activity.record_write_blocked_at(600);
        assert_eq!(activity.verdict_at(1_050, SECOND, SECOND), Verdict::Active);
        assert_eq!(activity.verdict_at(1_100, SECOND, SECOND), Verdict::WriteStalled);
        assert_eq!(activity.verdict_at(5_000, SECOND, None), Verdict::Active);

        activity.record_write_at(1_100);
        assert_eq!(activity.verdict_at(1_500, SECOND, SECOND), Verdict::Active);
    }

    #[test]
    fn test_pending_write_is_never_idle() {
        let activity = Activity::new();
        activity.record_write_blocked_at(0);
        assert_eq!(activity.verdict_at(10_000, SECOND, None), Verdict::Active);
    }

    #[tokio::test]
    async fn test_tracked_io_records_traffic() {
        let activity = Arc::new(Activity::new());
        let (client, server) = tokio::io::duplex(64);
        let mut tracked = TrackedIo::new(server, Arc::clone(&activity));
        let mut client = client;

        tracked.write_all(b"ping").await.unwrap();
        let mut buf = [0u8; 4];
        client.read_exact(&mut buf).await.unwrap();
        client.write_all(b"pong").await.unwrap();
        tracked.read_exact(&mut buf).await.unwrap();

        assert_eq!(&buf, b"pong");
        assert_eq!(activity.write_blocked_ms.load(Ordering::Relaxed), 0);
    }
}
