// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! - `variable_sets` - key coverage and type shape of the four variants
//! - `poll_budget` - attempt bounds of the polling lifecycle

mod poll_budget;
mod variable_sets;
