// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed script views over repeated and map fields.
//!
//! Both wrappers hold script values that already passed the scalar codec,
//! so converting them back to storage cannot fail on a type check.

mod map;
mod repeated;

pub use map::MapField;
pub use repeated::RepeatedField;
