//! Tracing configuration and log routing.
//!
//! The server logs to stdout with a compact formatter. Setting
//! `DOCRAG_LOG_FILE` additionally appends logs to that path through a
//! non‑blocking writer, which keeps provider-call hot paths from contending
//! on file I/O. `RUST_LOG` controls filtering and defaults to `info`.

use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Configure tracing subscribers for stdout and, when requested, a log file.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_target(false).compact();

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer);

    match file_writer() {
        Some(writer) => {
            let file_layer = fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .with_ansi(false)
                .compact();
            registry.with(file_layer).init();
        }
        None => registry.init(),
    }
}

/// Build a non‑blocking appender for `DOCRAG_LOG_FILE`, if configured.
///
/// The worker guard is parked in a global so the writer survives for the
/// process lifetime. An unopenable path logs to stderr and falls back to
/// stdout-only logging rather than refusing to start.
fn file_writer() -> Option<NonBlocking> {
    let path = std::env::var("DOCRAG_LOG_FILE").ok()?;
    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
    {
        Ok(file) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            let _ = LOG_GUARD.set(guard);
            Some(non_blocking)
        }
        Err(err) => {
            eprintln!("Failed to open log file {path}: {err}");
            None
        }
    }
}
