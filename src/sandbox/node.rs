// src/sandbox/node.rs

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::time::timeout;

use super::{Callable, Sandbox, SandboxError};
use crate::config::Config;

const HARNESS: &str = include_str!("harness.js");

/// Extra time the host waits beyond the in-process timeout before killing the child.
const HOST_GRACE: Duration = Duration::from_millis(500);

/// Node.js startup can be slow on a cold machine.
const STARTUP_ALLOWANCE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct SandboxLimits {
    pub node_binary: String,
    pub call_timeout: Duration,
    pub memory_limit_mb: u32,
}

impl SandboxLimits {
    pub fn from_config(config: &Config) -> Self {
        Self {
            node_binary: config.node_binary.clone(),
            call_timeout: config.sandbox_call_timeout(),
            memory_limit_mb: config.sandbox_memory_limit_mb,
        }
    }
}

/// Runs each submission in its own Node.js child process.
///
/// The child gets an empty environment (plus `PATH`), no stdin other than the
/// protocol pipe, a V8 heap cap and is killed when the callable is dropped.
/// Inside the child, user code is evaluated in a `vm` context that has no
/// `require`, `process` or module scope.
pub struct NodeSandbox {
    limits: SandboxLimits,
}

impl NodeSandbox {
    pub fn new(limits: SandboxLimits) -> Self {
        Self { limits }
    }

    fn spawn(&self) -> Result<Child, SandboxError> {
        let mut command = Command::new(&self.limits.node_binary);
        command
            .arg(format!("--max-old-space-size={}", self.limits.memory_limit_mb))
            .arg("-e")
            .arg(HARNESS)
            .env_clear()
            .env(
                "SANDBOX_CALL_TIMEOUT_MS",
                self.limits.call_timeout.as_millis().to_string(),
            )
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        if let Some(path) = std::env::var_os("PATH") {
            command.env("PATH", path);
        }

        command.spawn().map_err(|e| {
            tracing::error!("Failed to spawn {}: {}", self.limits.node_binary, e);
            SandboxError::Unavailable(format!("failed to start {}: {}", self.limits.node_binary, e))
        })
    }
}

#[async_trait]
impl Sandbox for NodeSandbox {
    async fn compile(
        &self,
        snippet: &str,
        entry_point: &str,
    ) -> Result<Box<dyn Callable>, SandboxError> {
        let mut child = self.spawn()?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| SandboxError::Unavailable("child stdin not captured".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| SandboxError::Unavailable("child stdout not captured".to_string()))?;

        let mut process = NodeProcess {
            child,
            stdin,
            stdout: BufReader::new(stdout).lines(),
            call_timeout: self.limits.call_timeout,
        };

        let request = json!({ "op": "compile", "source": snippet, "entry": entry_point });
        process
            .exchange(&request, self.limits.call_timeout + STARTUP_ALLOWANCE)
            .await?;

        Ok(Box::new(process))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ReplyStatus {
    Ok,
    CompileError,
    RuntimeError,
    Timeout,
    ProtocolError,
}

#[derive(Debug, Deserialize)]
struct Reply {
    status: ReplyStatus,
    #[serde(default)]
    message: String,
    #[serde(default)]
    value: Value,
}

struct NodeProcess {
    child: Child,
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
    call_timeout: Duration,
}

impl NodeProcess {
    /// Sends one request line and waits for one reply line.
    async fn exchange(&mut self, request: &Value, budget: Duration) -> Result<Value, SandboxError> {
        let mut line = serde_json::to_vec(request)
            .map_err(|e| SandboxError::Unavailable(e.to_string()))?;
        line.push(b'\n');

        if let Err(e) = self.write(&line).await {
            return Err(self.exit_error(e).await);
        }

        let read = timeout(budget + HOST_GRACE, self.stdout.next_line()).await;
        let raw = match read {
            Ok(Ok(Some(raw))) => raw,
            Ok(Ok(None)) => return Err(self.exit_error("stdout closed").await),
            Ok(Err(e)) => return Err(self.exit_error(e).await),
            Err(_) => {
                tracing::warn!("Sandbox child exceeded its deadline; killing it");
                let _ = self.child.start_kill();
                return Err(SandboxError::Timeout(self.call_timeout));
            }
        };

        let reply: Reply = serde_json::from_str(&raw)
            .map_err(|e| SandboxError::Unavailable(format!("malformed sandbox reply: {}", e)))?;

        match reply.status {
            ReplyStatus::Ok => Ok(reply.value),
            ReplyStatus::CompileError => Err(SandboxError::Compile(reply.message)),
            ReplyStatus::RuntimeError => Err(SandboxError::Runtime(reply.message)),
            ReplyStatus::Timeout => Err(SandboxError::Timeout(self.call_timeout)),
            ReplyStatus::ProtocolError => Err(SandboxError::Unavailable(reply.message)),
        }
    }

    async fn write(&mut self, line: &[u8]) -> std::io::Result<()> {
        self.stdin.write_all(line).await?;
        self.stdin.flush().await
    }

    /// The child stopped talking: it crashed, ran out of heap or was killed.
    async fn exit_error(&mut self, cause: impl std::fmt::Display) -> SandboxError {
        let status = timeout(HOST_GRACE, self.child.wait()).await;
        match status {
            Ok(Ok(status)) if !status.success() => SandboxError::Runtime(format!(
                "solution process terminated abnormally ({})",
                status
            )),
            _ => SandboxError::Unavailable(format!("sandbox process stopped responding: {}", cause)),
        }
    }
}

#[async_trait]
impl Callable for NodeProcess {
    async fn call(&mut self, args: &[Value]) -> Result<Value, SandboxError> {
        let request = json!({ "op": "call", "args": args });
        let budget = self.call_timeout;
        self.exchange(&request, budget).await
    }
}
