//! Laptop advisor — preference core for a multi-agent laptop buying assistant.
//!
//! An interviewer agent collects seven preferences from the user, this crate
//! keeps them per conversation and turns them into a web search query, and a
//! search-grounded recommender agent takes it from there. The agents run in
//! an external runtime; this crate provides their tools and descriptors.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod logging;

pub mod preferences;
pub mod session;

pub mod agents;
pub mod tools;
