//! Root Route

/// Greeting, doubles as a liveness probe
pub async fn hello() -> &'static str {
    "Hello World!"
}
