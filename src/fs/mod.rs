//! Filesystem utilities.
//!
//! The only file the navigation stack writes is its diagnostic log. On the
//! V5 Brain this ends up on the SD card, which makes it possible to read
//! back what a controller did during an autonomous run.
//!
//! # Example
//!
//! ```ignore
//! use beacon_nav::fs::logger;
//! use log::{info, LevelFilter};
//!
//! logger::init(LevelFilter::Debug)?;
//! info!("Robot initialized successfully");
//! ```

/// Console + file logger.
pub mod logger;
