//! sentiview: a client for a sentiment-analysis backend.
//!
//! Sends text to the backend for classification, renders the outcome, and
//! keeps a dashboard of aggregate charts and word clouds in sync with the
//! backend's statistics.

pub mod cli;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod diagnostics;
pub mod error;
pub mod models;
pub mod normalize;
pub mod page;
pub mod render;
pub mod web;
