//! Background Tasks Module
//!
//! Contains background tasks that run for the lifetime of an open document.
//!
//! # Tasks
//! - File change poller: reports modification-time changes of a watched file

mod watch;

pub use watch::spawn_mtime_poller;
