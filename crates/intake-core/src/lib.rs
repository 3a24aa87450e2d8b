//! Core types and state holders for the intake application.
//!
//! This crate is deliberately free of terminal and database dependencies.
//! Storage backends plug in through the [`slot::Slot`] port; presentation
//! layers drive [`session::FormSession`], [`bridge::EditBridge`] and
//! [`store::RecordStore`] one user intent at a time.

pub mod bridge;
pub mod error;
pub mod id;
pub mod record;
pub mod session;
pub mod slot;
pub mod store;
pub mod validate;

pub use error::{Error, Result};
