// src/sandbox/mod.rs

//! Isolated compilation and invocation of untrusted solution code.
//!
//! A [`Sandbox`] turns a source snippet into a [`Callable`]; the callable is the
//! only handle the verification step gets on user code.

mod node;

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use node::{NodeSandbox, SandboxLimits};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SandboxError {
    /// The snippet does not parse, or does not define a callable entry point.
    #[error("{0}")]
    Compile(String),

    /// User code threw while running.
    #[error("{0}")]
    Runtime(String),

    #[error("execution timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The runtime could not be started or broke its protocol. Not the user's fault.
    #[error("code runner unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait Sandbox: Send + Sync {
    /// Compiles `snippet` in a fresh isolated context and returns a handle to the
    /// function named `entry_point` defined by it.
    async fn compile(
        &self,
        snippet: &str,
        entry_point: &str,
    ) -> Result<Box<dyn Callable>, SandboxError>;
}

/// A compiled user function. Dropping it releases the isolated context.
#[async_trait]
pub trait Callable: Send {
    /// Invokes the function with positional JSON arguments and returns its result as JSON.
    async fn call(&mut self, args: &[Value]) -> Result<Value, SandboxError>;
}
