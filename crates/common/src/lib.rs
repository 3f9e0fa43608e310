//! Common utilities and shared types for followgraph.
//!
//! This crate provides foundational components used across all followgraph crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **Identity**: The opaque user identity value type [`UserId`]
//! - **ID Generation**: ULID-based row identifiers via [`IdGenerator`]
//!
//! # Example
//!
//! ```no_run
//! use followgraph_common::{AppResult, Config, IdGenerator, UserId};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let user = UserId::from("alice");
//!     println!("{} -> {} ({})", user, id_gen.generate(), config.database.url);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::{IdGenerator, UserId};
