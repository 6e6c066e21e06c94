//! # ODT Editor
//!
//! Operation layer for collaborative ODT editing.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ controllers: member intent → operations     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ session: ordered, all-or-nothing batches    │
//! │  - Stamp timestamps                         │
//! │  - Apply prerequisites (implicit AddStyle)  │
//! │  - Commit, log specs, notify subscribers    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ ops + style registry → odt-document tree    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Every change is an operation**: styles included, so every member
//!    applies the same sequence
//! 2. **Specs are the wire format**: `spec()` is what gets logged, sent and
//!    replayed
//! 3. **All-or-nothing batches**: a failing operation leaves no trace
//!
//! ## Usage
//!
//! ```rust,ignore
//! use odt_editor::{ListController, ListType, Session, SessionContext};
//! use odt_document::Document;
//!
//! let mut session = Session::new(Document::load("report.json")?);
//! let lists = ListController::new(SessionContext::new("alice"));
//!
//! // Adds style L1 and wraps the paragraph under alice's cursor
//! lists.add_list(&mut session, ListType::Bullet)?;
//!
//! session.save_log("report.ops.json")?;
//! ```

pub mod controllers;
mod errors;
mod events;
mod operation;
pub mod ops;
mod session;
mod spec;
pub mod style_registry;

pub use controllers::{ImageController, ListController};
pub use errors::{EditorError, OpError, StateError};
pub use events::{EventNotifier, SignalHandler, SubscriptionId};
pub use operation::{OpHeader, Operation};
pub use session::{load_log, EnqueueReport, Session, SessionContext};
pub use spec::OperationSpec;
pub use style_registry::{ListType, StyleAllocation};
