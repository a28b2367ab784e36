// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Messaging
//!
//! The durable-queue completion intake: AMQP consumer, payload decoding,
//! and the reconnect policy.

pub mod consumer;

pub use consumer::{decode_report, CompletionConsumer, TASK_EXECUTION_UPDATE_QUEUE};
