//! Run state management.
//!
//! This module provides the run state machine: status transitions, stage
//! tracking and log accumulation, each publishing an [`Event`].
//!
//! [`Event`]: fx_protocol::ipc::Event

pub mod run;
