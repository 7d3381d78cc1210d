// Shared across test binaries; not every binary uses every helper.
#![allow(dead_code)]

use anyhow::Context as _;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

/// Kill the child process when the test ends, pass or fail.
pub struct KillOnDrop(pub Child);

impl Drop for KillOnDrop {
    fn drop(&mut self) {
        let _ = self.0.kill();
    }
}

/// Pick an unused TCP port on localhost.
///
/// The port is not reserved; another process could still grab it between
/// this call and the bind. Good enough for tests.
pub fn pick_unused_port() -> anyhow::Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").context("bind ephemeral port")?;
    Ok(listener.local_addr()?.port())
}

/// Poll an HTTP URL until it answers with a success status.
pub async fn wait_http_ok(url: &str, timeout_dur: Duration) -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    let start = Instant::now();
    loop {
        if start.elapsed() > timeout_dur {
            anyhow::bail!("timed out waiting for {url}");
        }
        match client.get(url).send().await {
            Ok(resp) if resp.status().is_success() => return Ok(()),
            _ => tokio::time::sleep(Duration::from_millis(200)).await,
        }
    }
}

/// Spawn the adapter binary in streamable HTTP mode against a stub API.
pub fn spawn_adapter_http(port: u16, api_base_url: &str) -> anyhow::Result<Child> {
    let bin = env!("CARGO_BIN_EXE_unrelated-petstore-adapter");
    Command::new(bin)
        .arg("--http")
        .arg("--bind")
        .arg(format!("127.0.0.1:{port}"))
        .arg("--log-level")
        .arg("info")
        .env("API_BASE_URL", api_base_url)
        .env_remove("API_KEY")
        .spawn()
        .context("spawn adapter (http)")
}

/// Spawn the adapter binary in stdio mode with piped stdin/stdout.
pub fn spawn_adapter_stdio(api_base_url: &str) -> anyhow::Result<Child> {
    let bin = env!("CARGO_BIN_EXE_unrelated-petstore-adapter");
    Command::new(bin)
        .arg("--log-level")
        .arg("info")
        .env("API_BASE_URL", api_base_url)
        .env_remove("API_KEY")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .context("spawn adapter (stdio)")
}
