//! region-nearby forwards HTTP requests with the caller's address attached
//! and resolves the AWS region nearest to them.
//!
//! Every inbound request gets the peer address appended to its
//! `X-Forwarded-For` header and is handed to a downstream handler: either
//! the in-process region resolver, which answers with the nearest replica
//! region, or an upstream HTTP service.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, init, validate,
//!   health, resolve).
//! - [`config`] -- Configuration loading, validation, and hot-reloading via the
//!   [`ConfigSource`](config::ConfigSource) trait.
//! - [`error`] -- Unified error types using `thiserror`.
//! - [`forward`] -- The request forwarder: connection context and
//!   `X-Forwarded-For` handling.
//! - [`handler`] -- The [`DownstreamHandler`](handler::DownstreamHandler) trait,
//!   the region resolver, and the upstream relay.
//! - [`health`] -- `GET /health` endpoint handler returning runtime diagnostics.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`region`] -- AWS and edge region catalogues and nearest-region search.
//! - [`server`] -- Axum server setup, shared application state, HTTP client, and
//!   graceful shutdown.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `yaml` | YAML config file support _(enabled by default)_ |
//! | `json` | JSON config file support |
//! | `toml` | TOML config file support |
//! | `sentry-integration` | Sentry error tracking |
//! | `file-backends` | All file format backends |
//! | `full` | All features |

// Binary crate: public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod forward;
pub mod handler;
pub mod health;
pub mod logging;
pub mod region;
pub mod server;

#[cfg(feature = "sentry-integration")]
pub mod sentry_integration;
