//! `notam-review` - Feedback collection form for synthetic NOTAM review
//!
//! This library provides the core functionality for presenting synthetic
//! NOTAM records to a reviewer, collecting structured feedback, and
//! persisting it to a per-user record store.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod record;
pub mod remote;
pub mod server;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use record::{Feedback, ImpactLevel, NotamText, UserRow};
pub use store::{Progress, UserStore};
