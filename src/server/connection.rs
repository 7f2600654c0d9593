// Connection handling module
// Serves a single accepted TCP connection with hyper

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use std::error::Error as StdError;
use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::MissedTickBehavior;

use super::activity::{Activity, TrackedIo, Verdict};
use crate::config::AppState;
use crate::handler;
use crate::logger;

/// How often a connection checks its idle and write-stall limits
const WATCHDOG_INTERVAL: Duration = Duration::from_millis(250);

/// Accept and process a connection, checking limits and logging.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address
/// * `state` - Shared application state
/// * `conn_counter` - Active connection counter
pub fn accept_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<AtomicUsize>,
) {
    // Increment counter first, then check limit (prevents race condition)
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            // Exceeded limit: rollback counter and reject
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection from {peer_addr} rejected."
            ));
            drop(stream);
            return;
        }
    }

    logger::log_connection_accepted(&peer_addr);

    handle_connection(
        stream,
        peer_addr,
        Arc::clone(state),
        Arc::clone(conn_counter),
    );
}

/// Connection limits in effect, `None` meaning disabled
struct Limits {
    header_read: Option<Duration>,
    keep_alive_idle: Option<Duration>,
    write_stall: Option<Duration>,
}

impl Limits {
    fn from_state(state: &AppState) -> Self {
        let performance = &state.config.performance;
        let seconds = |secs: u64| (secs > 0).then_some(Duration::from_secs(secs));
        Self {
            header_read: seconds(performance.read_timeout),
            keep_alive_idle: seconds(performance.keep_alive_timeout),
            write_stall: seconds(performance.write_timeout),
        }
    }
}

/// Handle a single connection in a spawned task.
///
/// This function:
/// 1. Wraps the TCP stream so socket activity is recorded
/// 2. Bounds header reads with hyper's `header_read_timeout`
/// 3. Serves the connection with the request handler
/// 4. Closes it gracefully when idle for `keep_alive_timeout` or on shutdown
/// 5. Aborts it when a write makes no progress for `write_timeout`
/// 6. Decrements connection counter when done
///
/// A download that keeps moving bytes is never cut off, however long it takes.
/// Dropping the connection future also drops any response body in flight, which
/// closes the file being streamed.
fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
    conn_counter: Arc<AtomicUsize>,
) {
    tokio::spawn(async move {
        let limits = Limits::from_state(&state);
        let activity = Arc::new(Activity::new());
        let io = TokioIo::new(TrackedIo::new(stream, Arc::clone(&activity)));

        let mut builder = http1::Builder::new();
        builder
            .timer(TokioTimer::new())
            .keep_alive(limits.keep_alive_idle.is_some());
        if let Some(header_read) = limits.header_read {
            builder.header_read_timeout(header_read);
        }

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| handler::handle_request(req, Arc::clone(&service_state), peer_addr)),
        );
        let mut conn = std::pin::pin!(conn);

        let mut watchdog = tokio::time::interval(WATCHDOG_INTERVAL);
        watchdog.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut closing = false;

        loop {
            tokio::select! {
                result = conn.as_mut() => {
                    if let Err(err) = result {
                        if is_client_disconnect(&err) {
                            logger::log_client_disconnect(&peer_addr, &err);
                        } else {
                            logger::log_connection_error(&err);
                        }
                    }
                    break;
                }

                () = state.shutdown.cancelled(), if !closing => {
                    closing = true;
                    conn.as_mut().graceful_shutdown();
                }

                _ = watchdog.tick() => {
                    match activity.verdict(limits.keep_alive_idle, limits.write_stall) {
                        Verdict::Active => {}
                        Verdict::Idle => {
                            if !closing {
                                closing = true;
                                conn.as_mut().graceful_shutdown();
                            }
                        }
                        Verdict::WriteStalled => {
                            logger::log_warning(&format!(
                                "Connection from {peer_addr} aborted: no write progress for {} seconds",
                                limits.write_stall.map_or(0, |d| d.as_secs())
                            ));
                            break;
                        }
                    }
                }
            }
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}

/// Whether a connection error only means the peer went away
fn is_client_disconnect(err: &hyper::Error) -> bool {
    err.is_incomplete_message() || has_disconnect_cause(err)
}

/// Walk the source chain looking for a reset, abort or broken pipe
fn has_disconnect_cause(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(err) = current {
        if let Some(io_err) = err.downcast_ref::<io::Error>() {
            if matches!(
                io_err.kind(),
                io::ErrorKind::BrokenPipe
                    | io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
            ) {
                return true;
            }
        }
        current = err.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("write to client failed")]
    struct WriteFailed(#[source] io::Error);

    #[test]
    fn test_disconnects_are_recognized() {
        for kind in [
            io::ErrorKind::BrokenPipe,
            io::ErrorKind::ConnectionReset,
            io::ErrorKind::ConnectionAborted,
        ] {
            assert!(has_disconnect_cause(&io::Error::from(kind)), "{kind:?}");
            assert!(has_disconnect_cause(&WriteFailed(io::Error::from(kind))), "{kind:?}");
        }
    }

    #[test]
    fn test_other_failures_are_not_disconnects() {
        assert!(!has_disconnect_cause(&io::Error::from(io::ErrorKind::PermissionDenied)));
        assert!(!has_disconnect_cause(&WriteFailed(io::Error::from(io::ErrorKind::OutOfMemory))));
        assert!(!has_disconnect_cause(&std::fmt::Error));
    }

    #[test]
    fn test_limits_treat_zero_as_disabled() {
        let mut cfg = crate::config::Config::load_from("does/not/exist/fileserve").unwrap();
        cfg.performance.read_timeout = 0;
        cfg.performance.keep_alive_timeout = 5;
        cfg.performance.write_timeout = 0;
        let limits = Limits::from_state(&AppState::new(&cfg));

        assert_eq!(limits.header_read, None);
        assert_eq!(limits.keep_alive_idle, Some(Duration::from_secs(5)));
        assert_eq!(limits.write_stall, None);
    }
}
