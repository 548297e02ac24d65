//! # avlfile
//!
//! A persistent, file-backed AVL tree of fixed-size records:
//! - Logarithmic lookup, insert and remove by a caller-defined key
//! - In-place update of existing records
//! - Ordered (in-order) traversal with early abort
//! - Slot reuse after deletion, trailing index truncation
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        TreeFile<P>                           │
//! │           (open/close, capability gating, public API)        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ virtual indices (root 0, 2v+1, 2v+2)
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   Tree engine                                │
//! │      (find / insert / remove / rotate via arena subtree)     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  Index Map  │ ───────▶ │  Data File  │
//!   │ (v → slot)  │          │ + free list │
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │   Payload   │
//!                           │ (fixed len) │
//!                           └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod payload;
pub mod storage;
pub mod tree;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{AvlError, Result};
pub use config::Config;
pub use payload::{IdRecord, Payload};
pub use tree::{FileStats, TreeFile, TreeStats};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of avlfile
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
