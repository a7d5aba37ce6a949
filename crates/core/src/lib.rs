//! # fx-core
//!
//! Tools, engine and configuration for the USD/RUB exchange advisor.
//!
//! This crate provides:
//! - Statically typed tools: official rate, place search, demo bank
//!   quotes, operator prompt, and an optional geocoder
//! - A language-model client for the final recommendation
//! - Configuration loading from the `.fx-advisor/` directory
//! - The sequential pipeline engine and its run state
//!
//! ## Modules
//!
//! - [`tools`]: Tool trait and the adapters
//! - [`llm`]: Chat model trait, HTTP client and mock
//! - [`agents`]: Role registry
//! - [`config`]: Configuration and credentials
//! - [`engine`]: Pipeline execution engine and report
//! - [`state`]: Run state machine
//! - [`init`]: `.fx-advisor/` scaffolding

pub mod agents;
pub mod config;
pub mod engine;
pub mod init;
pub mod llm;
pub mod state;
pub mod tools;
