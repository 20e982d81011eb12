//! Optional Sentry error tracking.
//!
//! The returned guard must be held until shutdown so buffered events are
//! flushed. An unparsable DSN disables reporting instead of failing start-up.

pub fn init(dsn: &str, environment: Option<&str>) -> sentry::ClientInitGuard {
    let dsn = dsn
        .parse::<sentry::types::Dsn>()
        .inspect_err(|e| tracing::warn!(error = %e, "invalid Sentry DSN, error tracking disabled"))
        .ok();

    sentry::init(sentry::ClientOptions {
        dsn,
        environment: environment.map(|e| e.to_string().into()),
        release: Some(concat!("region-nearby@", env!("CARGO_PKG_VERSION")).into()),
        ..Default::default()
    })
}
