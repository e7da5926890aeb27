//! # Couture Architecture
//!
//! Couture is a **UI-agnostic hypermedia vault**: a tree of nodes (outfits,
//! clothing items, text, images, media, pdfs) whose content can be marked with
//! anchors, and anchors connected by links. It is a library that happens to
//! have a CLI client, not the other way round.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Turns expected failures into {success: false} responses  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Validation, tree invariants, cascades                    │
//! │  - Operates on Rust types, returns Rust types               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - DataStore trait over a per-document StorageBackend       │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Tree Truth
//!
//! A node's own `filePath.path` is the source of truth for where it sits.
//! Parents' `children` lists are a denormalized index: the store derives them
//! from paths on read and repairs stored lists that drifted. Writes span
//! several documents without a transaction, so every cascade is ordered and
//! idempotent, and `doctor` sweeps up after an interrupted one.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes regular Rust arguments, returns regular
//! Rust types, and never writes to stdout/stderr or exits the process. The
//! core emits `tracing` events; only the binary installs a subscriber.
//!
//! ## Testing Strategy
//!
//! 1. **Commands** (`commands/*.rs`): thorough unit tests against
//!    `InMemoryStore`. This is where most tests live.
//! 2. **API** (`api.rs`): dispatch and response shaping.
//! 3. **Integration** (`tests/`): end-to-end scenarios, the filesystem
//!    backend, the binary, and tree-shape properties.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic per operation family
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: Ids, paths, nodes, extents, anchors, links
//! - [`fields`]: Field registry and validated property updates
//! - [`index`]: Free-text search index
//! - [`config`]: Layered configuration
//! - [`logging`]: Subscriber setup for the binary
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod fields;
pub mod index;
pub mod logging;
pub mod model;
pub mod store;
