// tests/common/mod.rs

#![allow(dead_code)]

use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use algoarena::{
    MIGRATOR,
    config::Config,
    problems::ProblemRegistry,
    routes,
    sandbox::{Callable, Sandbox, SandboxError},
    state::AppState,
};
use async_trait::async_trait;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub const CORRECT_TWO_SUM: &str = r#"// Write your code here
// twoSum: return the two indices
function twoSum(nums, target) {
  const seen = new Map();
  for (let i = 0; i < nums.length; i++) {
    if (seen.has(target - nums[i])) return [seen.get(target - nums[i]), i];
    seen.set(nums[i], i);
  }
  return [];
}"#;

pub const WRONG_TWO_SUM: &str = "function twoSum(nums, target) {\n  return [1, 0];\n}";

/// Single-connection in-memory database with the schema applied.
pub async fn memory_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("Failed to open in-memory SQLite");

    MIGRATOR.run(&pool).await.expect("Failed to migrate database");
    pool
}

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        server_addr: "127.0.0.1:0".to_string(),
        problems_path: None,
        node_binary: "node".to_string(),
        sandbox_call_timeout_ms: 1_000,
        sandbox_memory_limit_mb: 64,
        execution_api_url: "http://127.0.0.1:9".to_string(),
        execution_api_token: None,
        execution_api_timeout_secs: 5,
    }
}

/// Inserts a user row directly and returns its id.
pub async fn seed_user(pool: &SqlitePool, email: &str) -> i64 {
    let now = chrono::Utc::now();
    sqlx::query_scalar(
        "INSERT INTO users (email, display_name, password, created_at, updated_at) VALUES (?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(email)
    .bind("Seeded")
    .bind("not-a-hash")
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
    .expect("Failed to seed user")
}

#[derive(Debug, Clone, Copy)]
enum Behaviour {
    TwoSum,
    Constant,
    Throw,
    Hang,
}

/// Stand-in for the Node.js sandbox.
///
/// Picks a behaviour from the snippet text: `SYNTAX` fails to compile, `throw`
/// raises, `for (;;)` times out, `return [1, 0]` answers a constant, anything
/// else solves two-sum. Every compiled snippet is recorded.
#[derive(Debug, Default)]
pub struct ScriptedSandbox {
    pub compiled: Mutex<Vec<String>>,
    pub delay: Duration,
}

impl ScriptedSandbox {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            compiled: Mutex::new(Vec::new()),
            delay,
        })
    }

    pub fn compiled(&self) -> Vec<String> {
        self.compiled.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sandbox for ScriptedSandbox {
    async fn compile(
        &self,
        snippet: &str,
        _entry_point: &str,
    ) -> Result<Box<dyn Callable>, SandboxError> {
        self.compiled.lock().unwrap().push(snippet.to_string());
        tokio::time::sleep(self.delay).await;

        if snippet.contains("SYNTAX") {
            return Err(SandboxError::Compile("SyntaxError: Unexpected identifier".to_string()));
        }
        let behaviour = if snippet.contains("throw") {
            Behaviour::Throw
        } else if snippet.contains("for (;;)") {
            Behaviour::Hang
        } else if snippet.contains("return [1, 0]") {
            Behaviour::Constant
        } else {
            Behaviour::TwoSum
        };
        Ok(Box::new(ScriptedCallable { behaviour }))
    }
}

struct ScriptedCallable {
    behaviour: Behaviour,
}

#[async_trait]
impl Callable for ScriptedCallable {
    async fn call(&mut self, args: &[Value]) -> Result<Value, SandboxError> {
        match self.behaviour {
            Behaviour::Throw => Err(SandboxError::Runtime("ReferenceError: x is not defined".to_string())),
            Behaviour::Hang => Err(SandboxError::Timeout(Duration::from_millis(1_000))),
            Behaviour::Constant => Ok(json!([1, 0])),
            Behaviour::TwoSum => {
                let nums: Vec<i64> = serde_json::from_value(args[0].clone()).unwrap();
                let target = args[1].as_i64().unwrap();
                for i in 0..nums.len() {
                    for j in i + 1..nums.len() {
                        if nums[i] + nums[j] == target {
                            return Ok(json!([i, j]));
                        }
                    }
                }
                Ok(json!([]))
            }
        }
    }
}

pub struct TestApp {
    pub address: String,
    pub pool: SqlitePool,
    pub state: AppState,
}

pub async fn spawn_app_with(config: Config, sandbox: Arc<dyn Sandbox>) -> TestApp {
    let pool = memory_pool().await;
    let registry = ProblemRegistry::builtin().expect("builtin catalog");
    let state = AppState::new(pool.clone(), config, registry, sandbox).expect("state");

    let app = routes::create_router(state.clone());

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address,
        pool,
        state,
    }
}

pub async fn spawn_app(sandbox: Arc<dyn Sandbox>) -> TestApp {
    spawn_app_with(test_config(), sandbox).await
}

/// Registers a fresh user and returns a bearer token for it.
pub async fn register_and_login(client: &reqwest::Client, address: &str) -> String {
    let email = format!("u_{}@example.com", &uuid::Uuid::new_v4().to_string()[..8]);
    let password = "password123";

    let register = client
        .post(format!("{}/api/auth/register", address))
        .json(&json!({ "email": email, "display_name": "Tester", "password": password }))
        .send()
        .await
        .expect("Register failed");
    assert_eq!(register.status().as_u16(), 201);

    let login: Value = client
        .post(format!("{}/api/auth/login", address))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Login failed")
        .json()
        .await
        .expect("Failed to parse login json");

    login["token"].as_str().expect("Token not found").to_string()
}

pub fn node_available() -> bool {
    std::process::Command::new("node")
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}
