//! Flora client: configuration, single-operation execution and batch dispatch.
//!
//! Implementation details are split into submodules under `src/client/`.

pub mod builder;
pub mod core;
pub mod dispatch;

pub use builder::FloraClientBuilder;
pub use core::FloraClient;
pub use dispatch::PendingOperation;
