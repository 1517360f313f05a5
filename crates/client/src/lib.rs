//! Client code for the shltr offline agent.
//!
//! This crate provides the HTTP fetch pipeline and URL handling shared by
//! the agent runtime: the concrete reqwest-backed client plus the `Fetcher`
//! trait the strategy executors are written against.

pub mod fetch;

pub use fetch::url::{UrlError, resolve, same_origin};
pub use fetch::{FetchClient, FetchConfig, FetchResponse, Fetcher};
