// src/evaluator/verify.rs

use serde_json::Value;

use crate::models::problem::Verification;
use crate::sandbox::{Callable, SandboxError};

/// Structured result of running the fixtures.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Passed,
    Mismatch {
        fixture: usize,
        expected: Value,
        actual: Value,
    },
}

impl Verification {
    /// Calls `callable` once per fixture, in order, stopping at the first mismatch.
    ///
    /// A mismatch is a `Verdict`; anything the callable raises is an `Err`.
    pub async fn verify(&self, callable: &mut dyn Callable) -> Result<Verdict, SandboxError> {
        for (index, fixture) in self.fixtures.iter().enumerate() {
            let actual = callable.call(&fixture.args).await?;
            if !structurally_equal(&actual, &fixture.expected) {
                return Ok(Verdict::Mismatch {
                    fixture: index,
                    expected: fixture.expected.clone(),
                    actual,
                });
            }
        }
        Ok(Verdict::Passed)
    }
}

/// Deep equality over JSON values with numbers compared by value, so `1` and `1.0` match.
pub fn structurally_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => x.as_f64() == y.as_f64(),
        },
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| structurally_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(key, x)| ys.get(key).is_some_and(|y| structurally_equal(x, y)))
        }
        _ => a == b,
    }
}
