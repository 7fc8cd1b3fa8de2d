//! # Propz Architecture
//!
//! Propz tracks rental and purchase listings during a property search: record
//! them, filter them, mark favorites, compare a few side by side. It is a
//! **UI-agnostic library** with a thin CLI client on top.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (propz crate)                                          │
//! │  - Parses arguments, renders output, owns exit codes        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API (api.rs)                                               │
//! │  - Loads once, applies UI rules, returns CmdResult          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Store (store.rs) + Filter (filter.rs)                      │
//! │  - Records, criteria, derived view, busy flag, error slot   │
//! │  - CRUD orchestration, optimistic favorite toggle           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Remote table (remote/) + field mapping (mapping.rs)        │
//! │  - RestTable (hosted), FileTable (local), MemTable (tests)  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The owner of the rows is resolved by [`identity`] and handed to the store as a
//! plain [`identity::OwnerId`].
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward, code returns regular Rust types and never writes to
//! stdout/stderr or exits the process. Network and file access happen only inside
//! [`remote::RemoteTable`] implementations and the identity provider.
//!
//! ## Testing Strategy
//!
//! - **Store and API**: unit tests against [`remote::mem::MemTable`], including its
//!   failure simulation.
//! - **Local tables**: integration tests on a temp directory (`tests/`).
//! - **CLI**: end-to-end tests in the `propz` crate.

pub mod api;
pub mod config;
pub mod error;
pub mod filter;
pub mod identity;
pub mod init;
pub mod mapping;
pub mod model;
pub mod remote;
pub mod store;
