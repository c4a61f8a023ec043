// Pedantic: suppress noise for internal crate code.
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]

pub mod actions;
pub mod app;
pub mod catalog;
pub mod color;
pub mod components;
pub mod config;
pub mod detail;
pub mod engine;
pub mod facets;
pub mod fetch;
pub mod filter;
pub mod layout;
pub mod listing;
pub mod notice;
pub mod search;
pub mod sort;
pub mod theme;
pub mod types;
pub mod util;
pub mod views;
