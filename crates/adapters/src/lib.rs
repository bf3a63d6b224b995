// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Adapters for the processor's external collaborators

pub mod mds;
pub mod reply;
pub mod responder;
pub mod runner;

pub use mds::{FailureReason, MdsError, MdsMessage, MdsService};
pub use reply::{AggregateReplyBuilder, ReplyBuilder};
pub use responder::{NoOpResponder, Responder};
pub use runner::PluginRunner;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use mds::{FakeMdsService, MdsCall};
#[cfg(any(test, feature = "test-support"))]
pub use responder::{FakeResponder, ReplyCall, StatusCall};
#[cfg(any(test, feature = "test-support"))]
pub use runner::{FakePluginRunner, RunnerCall};
