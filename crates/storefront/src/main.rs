//! Shopfront Storefront - product page and cart drawer.
//!
//! This binary serves the public-facing storefront on port 3000.
//!
//! # Architecture
//!
//! - Axum web framework with HTMX for interactivity
//! - Askama templates for server-side rendering
//! - Shop backend REST API for products and the customer cart
//! - In-memory sessions for the bearer token and the cart mirror

#![cfg_attr(not(test), forbid(unsafe_code))]

use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shopfront_storefront::{app, config::StorefrontConfig, state::AppState};

/// Start Sentry when a DSN is configured.
///
/// The returned guard flushes pending events on drop, so `main` holds it.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let options = sentry::ClientOptions {
        dsn: config
            .sentry_dsn
            .as_deref()
            .and_then(|dsn| dsn.parse::<sentry::types::Dsn>().ok()),
        release: sentry::release_name!(),
        environment: config.sentry_environment.clone().map(Into::into),
        sample_rate: config.sentry_sample_rate,
        traces_sample_rate: config.sentry_traces_sample_rate,
        attach_stacktrace: true,
        ..Default::default()
    };
    if options.dsn.is_none() {
        return None;
    }

    Some(sentry::init(options))
}

/// Warnings and errors become Sentry events; info and debug become
/// breadcrumbs on the next event.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    event_filter_for(*metadata.level())
}

fn event_filter_for(level: tracing::Level) -> sentry_tracing::EventFilter {
    use sentry_tracing::EventFilter;
    use tracing::Level;

    if level <= Level::WARN {
        EventFilter::Event
    } else if level <= Level::DEBUG {
        EventFilter::Breadcrumb
    } else {
        EventFilter::Ignore
    }
}

/// Install the tracing subscriber. `RUST_LOG` overrides the default filter.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopfront_storefront=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    // Sentry goes first so the tracing layer has a client to report to
    let sentry_guard = init_sentry(&config);
    init_tracing();
    match (&sentry_guard, &config.sentry_dsn) {
        (Some(_), _) => tracing::info!("Sentry initialized"),
        (None, Some(_)) => tracing::warn!("SENTRY_DSN is not a valid DSN, Sentry disabled"),
        (None, None) => {}
    }

    tracing::info!(backend = %config.backend.base_url, "Using shop backend");

    let addr = config.socket_addr();
    let app = app(AppState::new(config))
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!(%addr, "storefront listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    drop(sentry_guard);
}

/// Resolves on Ctrl+C, or on SIGTERM where the platform has it.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = sigterm.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable, waiting for Ctrl+C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    let _ = tokio::signal::ctrl_c().await;

    tracing::info!("Shutdown signal received, draining connections");
}

#[cfg(test)]
mod tests {
    use sentry_tracing::EventFilter;
    use tracing::Level;

    use super::*;

    #[test]
    fn test_event_filter_levels() {
        assert!(matches!(event_filter_for(Level::ERROR), EventFilter::Event));
        assert!(matches!(event_filter_for(Level::WARN), EventFilter::Event));
        assert!(matches!(event_filter_for(Level::INFO), EventFilter::Breadcrumb));
        assert!(matches!(event_filter_for(Level::DEBUG), EventFilter::Breadcrumb));
        assert!(matches!(event_filter_for(Level::TRACE), EventFilter::Ignore));
    }
}
