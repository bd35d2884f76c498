use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

#[derive(Debug, Deserialize)]
struct CreatedResponse {
    success: bool,
    id: i64,
}

#[derive(Debug, Deserialize)]
struct LogEntry {
    id: i64,
    timestamp: String,
    bristol_score: i64,
    has_mucus: bool,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("digestive_log_http_{}_{}", std::process::id(), nanos));
    path.push("logs.db");
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/health")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_digestive_log"))
        .env("HOST", "127.0.0.1")
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

fn entry(timestamp: &str, bristol_score: i64) -> serde_json::Value {
    serde_json::json!({
        "timestamp": timestamp,
        "bristol_score": bristol_score,
        "color": "Brown",
        "quantity": "Medium",
        "urgency": "Normal",
        "pain_level": 0,
        "notes": "",
        "has_blood": false,
        "has_mucus": true,
        "is_floating": false,
        "smell": "Normal"
    })
}

#[tokio::test]
async fn http_health_reports_ok() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;

    let health: HealthResponse = Client::new()
        .get(format!("{}/api/health", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health.status, "ok");
}

#[tokio::test]
async fn http_add_then_delete_round_trip() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let created: CreatedResponse = client
        .post(format!("{}/api/logs", server.base_url))
        .json(&entry("2030-06-01T09:00:00Z", 5))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(created.success);

    let logs: Vec<LogEntry> = client
        .get(format!("{}/api/logs", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let stored = logs
        .iter()
        .find(|log| log.id == created.id)
        .expect("missing created entry");
    assert_eq!(stored.timestamp, "2030-06-01T09:00:00Z");
    assert_eq!(stored.bristol_score, 5);
    assert!(stored.has_mucus);

    let response = client
        .delete(format!("{}/api/logs/{}", server.base_url, created.id))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let logs: Vec<LogEntry> = client
        .get(format!("{}/api/logs", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(logs.iter().all(|log| log.id != created.id));
}

#[tokio::test]
async fn http_rejects_out_of_range_score() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;

    let response = Client::new()
        .post(format!("{}/api/logs", server.base_url))
        .json(&entry("2030-06-01T09:00:00Z", 9))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("bristol_score"));
}

#[tokio::test]
async fn http_dashboard_page_renders() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;

    let response = Client::new().get(format!("{}/", server.base_url)).send().await.unwrap();
    assert!(response.status().is_success());
    let html = response.text().await.unwrap();
    assert!(html.contains("History"));
    assert!(html.contains(r#"href="/new""#));
}
