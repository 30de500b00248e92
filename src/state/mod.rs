/// State management module
///
/// This module handles all gallery state, including:
/// - Shared data structures (data.rs)
/// - Configuration and UI strings (config.rs)
/// - Batch pagination and the "load more" affordance (pagination.rs)
/// - The lightbox state machine (modal.rs)

pub mod config;
pub mod data;
pub mod modal;
pub mod pagination;
