//! # finsense-coach: AI Coach Client for FinSense
//!
//! Streams coach replies from the `/api/coach` endpoint and keeps a user's
//! conversation consistent while they arrive.
//!
//! ## Module Organization
//!
//! - [`config`] - TOML + environment configuration
//! - [`client`] - HTTP client and SSE read loop
//! - [`session`] - Conversation driver with live snapshots
//! - [`store`] - Transcript persistence seam
//! - [`error`] - Coach error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use finsense_coach::{CoachClient, CoachConfig, CoachSession};
//!
//! let config = CoachConfig::load(None)?;
//! let client = CoachClient::new(&config)?;
//! let mut session = CoachSession::open(client, db.chat(), &config.user.id).await?;
//!
//! let mut updates = session.subscribe();
//! let exchange = session.send("How can I save more?", Some(context)).await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod session;
pub mod store;

pub use client::{CoachClient, ReplyEvent};
pub use config::CoachConfig;
pub use error::{CoachError, CoachResult};
pub use session::CoachSession;
pub use store::TranscriptStore;
