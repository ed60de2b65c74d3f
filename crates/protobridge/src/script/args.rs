// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Argument binding for native callables.

use crate::error::{BridgeError, Result};
use crate::script::{Kwargs, Value};

/// Arguments bound to a parameter list, in parameter order.
#[derive(Debug)]
pub struct BoundArgs {
    values: Vec<Option<Value>>,
}

impl BoundArgs {
    /// Take a parameter value; unbound parameters read as `None`.
    pub fn take(&mut self, index: usize) -> Value {
        self.take_opt(index).unwrap_or(Value::None)
    }

    /// Take a parameter value if it was bound.
    pub fn take_opt(&mut self, index: usize) -> Option<Value> {
        self.values.get_mut(index).and_then(Option::take)
    }
}

/// Bind positional then keyword arguments against `params`.
///
/// The first `required` parameters must be supplied.
pub fn unpack(
    callee: &str,
    args: &[Value],
    kwargs: &Kwargs,
    params: &[&str],
    required: usize,
) -> Result<BoundArgs> {
    if args.len() > params.len() {
        return Err(BridgeError::TooManyArguments {
            callee: callee.to_string(),
            max: params.len(),
            got: args.len(),
        });
    }

    let mut values: Vec<Option<Value>> = vec![None; params.len()];
    for (slot, arg) in values.iter_mut().zip(args) {
        *slot = Some(arg.clone());
    }

    for (name, value) in kwargs {
        let position = params
            .iter()
            .position(|p| *p == name.as_str())
            .ok_or_else(|| BridgeError::UnexpectedKeyword {
                callee: callee.to_string(),
                name: name.clone(),
            })?;
        if values[position].is_some() {
            return Err(BridgeError::DuplicateArgument {
                callee: callee.to_string(),
                name: name.clone(),
            });
        }
        values[position] = Some(value.clone());
    }

    for (slot, name) in values.iter().zip(params).take(required) {
        if slot.is_none() {
            return Err(BridgeError::MissingArgument {
                callee: callee.to_string(),
                name: (*name).to_string(),
            });
        }
    }

    Ok(BoundArgs { values })
}
