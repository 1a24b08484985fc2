//! core
//!
//! Core domain types and notebook operations for refinenb.
//!
//! # Modules
//!
//! - [`notebook`] - Notebook document model and structural validation
//! - [`io`] - Loading, fingerprinting, and atomic saving
//! - [`extract`] - JSON projection of cell types and sources
//! - [`editable`] - Editable/deletable metadata toggling
//! - [`discover`] - Recursive notebook discovery
//! - [`lock`] - Per-notebook exclusive lock
//! - [`config`] - Configuration schema and loading
//! - [`types`] - Small shared value types
//!
//! # Design Principles
//!
//! - Unknown notebook fields are carried, never dropped
//! - Nothing here touches the network

pub mod config;
pub mod discover;
pub mod editable;
pub mod extract;
pub mod io;
pub mod lock;
pub mod notebook;
pub mod types;
