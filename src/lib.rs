#![cfg_attr(not(test), deny(clippy::panic))]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::too_many_arguments,
    clippy::too_many_lines,
    clippy::similar_names
)]

//! # roomcast-server
//!
//! The server-side control plane for a multi-room, one-to-many live
//! screen-sharing and chat application: a host streams to any number of
//! viewers while the server mediates room membership, presence,
//! reconnection, chat and reactions, and SFU resource lifecycle.

/// Optimized broadcast message handling
pub mod broadcast;

/// Server configuration and environment variables
pub mod config;

/// Domain error types shared across components
pub mod error;

/// Structured logging configuration
pub mod logging;

/// Media Engine Facade: worker pool, per-room router, transports/producers/consumers
pub mod media;

/// Metrics collection and reporting
pub mod metrics;

/// Profanity filter collaborator
pub mod profanity;

/// Presence & Reconnection Controller: grace-period timers
pub mod presence;

/// WebSocket message protocol definitions
pub mod protocol;

/// Room Registry: rooms, members, presence and connection mappings
pub mod registry;

/// Signaling Orchestrator: event dispatch and room lifecycle
pub mod server;

/// Chat history / reaction storage collaborator
pub mod storage;

/// WebSocket connection handling
pub mod websocket;
