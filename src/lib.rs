//! PDF Split Server
//!
//! An HTTP service that downloads a multi-page PDF (or accepts one in the
//! request body), splits it into one PDF per page, and serves each page as a
//! time-limited public download. A background sweeper deletes artifact sets
//! once their retention window has elapsed.
//!
//! # Modules
//!
//! - `store`: filesystem artifact store, one namespace per request
//! - `splitter`: per-page PDF extraction via lopdf
//! - `fetch`: bounded download of the source PDF
//! - `sweeper`: timer-driven retention enforcement
//! - `routes`: HTTP surface (split, file serving, health)

pub mod config;
pub mod error;
pub mod fetch;
pub mod routes;
pub mod splitter;
pub mod state;
pub mod store;
pub mod sweeper;

#[cfg(test)]
pub(crate) mod testutil;
