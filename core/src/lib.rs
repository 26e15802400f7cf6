//! Async client core for the studio API.
//!
//! # Overview
//! The studio API serves CRUD resources (hotspots, products, live rooms,
//! feedback, settings, analysis reports, scripts) and runs long jobs (video
//! analysis, script generation, hotspot crawling) as server-side tasks.
//!
//! # Design
//! - `ApiClient` is the single request pipeline. It is built once from a
//!   `ClientConfig` and shared by cloning; it holds no mutable state.
//! - Every call goes through a `Transport` (reqwest in production, fakes in
//!   tests) and every failure comes back as one `ApiError` shape.
//! - `ResponseKind` picks between the unwrapped JSON payload and the raw
//!   binary envelope; the result is the tagged `ApiResponse`.
//! - `TaskTracker` reads task snapshots; `poll::wait_for_task` is the loop
//!   on top, with its cadence spelled out in `PollPolicy`.
//! - Resource clients in `resources` only choose method, path, query and body.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod poll;
pub mod resources;
pub mod tasks;
pub mod transport;
pub mod types;

pub use client::{ApiClient, BearerToken, PassThrough, RequestInterceptor};
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, TransportError, FALLBACK_MESSAGE};
pub use http::{segment, ApiResponse, Body, HttpMethod, HttpRequest, HttpResponse, Query, ResponseKind};
pub use poll::{wait_for_task, PollPolicy, WaitError};
pub use tasks::{TaskHandle, TaskPhase, TaskProgress, TaskState, TaskSubmission, TaskTracker};
pub use transport::{HttpTransport, Transport};
