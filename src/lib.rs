//! Homework review status bot.
//!
//! Polls the status API on a fixed interval and relays each new verdict to a
//! Telegram chat.

pub mod api;
pub mod config;
pub mod error;
pub mod model;
pub mod notifier;
pub mod poller;
pub mod response;
