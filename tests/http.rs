use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LogEntry {
    date: String,
    weight: f64,
    change: f64,
    progress: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Profile {
    start_weight: f64,
    goal_weight: f64,
    start_date: String,
    goal_date: String,
    logs: Vec<LogEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Summary {
    total_days: i64,
    current_weight: f64,
    weight_progress_pct: f64,
}

#[derive(Debug, Deserialize)]
struct SeriesPoint {
    date: String,
    target: f64,
    actual: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SeriesResponse {
    points: Vec<SeriesPoint>,
}

#[derive(Debug, Deserialize)]
struct UsersResponse {
    users: Vec<String>,
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
    path.push(format!("weight_tracker_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/users")).send().await {
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
    let child = Command::new(env!("CARGO_BIN_EXE_weight_tracker"))
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

async fn get_json<T: serde::de::DeserializeOwned>(client: &Client, url: String) -> T {
    let response = client.get(url).send().await.unwrap();
    assert!(response.status().is_success());
    response.json().await.unwrap()
}

#[tokio::test]
async fn http_unknown_user_gets_default_profile() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let profile: Profile = get_json(&client, format!("{}/api/users/nobody", server.base_url)).await;
    assert_eq!(profile.start_weight, 116.4);
    assert_eq!(profile.goal_weight, 100.0);
    assert_eq!(profile.start_date, "2025-05-04");
    assert_eq!(profile.goal_date, "2025-09-27");
    assert!(profile.logs.is_empty());

    let users: UsersResponse = get_json(&client, format!("{}/api/users", server.base_url)).await;
    assert!(!users.users.iter().any(|user| user == "nobody"));
}

#[tokio::test]
async fn http_create_user_rejects_duplicates() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let created = client
        .post(format!("{}/api/users", server.base_url))
        .json(&serde_json::json!({ "name": "casey" }))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status().as_u16(), 201);

    let duplicate = client
        .post(format!("{}/api/users", server.base_url))
        .json(&serde_json::json!({ "name": " casey " }))
        .send()
        .await
        .unwrap();
    assert_eq!(duplicate.status().as_u16(), 409);

    let empty = client
        .post(format!("{}/api/users", server.base_url))
        .json(&serde_json::json!({ "name": "  " }))
        .send()
        .await
        .unwrap();
    assert_eq!(empty.status().as_u16(), 400);

    let users: UsersResponse = get_json(&client, format!("{}/api/users", server.base_url)).await;
    assert!(users.users.iter().any(|user| user == "casey"));
}

#[tokio::test]
async fn http_log_updates_summary_and_series() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = format!("{}/api/users/robin", server.base_url);

    let response = client
        .post(format!("{base}/logs"))
        .json(&serde_json::json!({ "date": "2025-06-01", "weight": 110 }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let profile: Profile = response.json().await.unwrap();
    assert_eq!(profile.logs.len(), 1);
    assert_eq!(profile.logs[0].date, "2025-06-01");
    assert_eq!(profile.logs[0].progress, 39.0);

    let summary: Summary = get_json(&client, format!("{base}/summary")).await;
    assert_eq!(summary.total_days, 146);
    assert_eq!(summary.current_weight, 110.0);
    assert_eq!(summary.weight_progress_pct, 39.0);

    let series: SeriesResponse = get_json(&client, format!("{base}/series")).await;
    assert_eq!(series.points.len(), 147);
    assert_eq!(series.points[0].target, 116.4);
    assert_eq!(series.points[146].target, 100.0);
    let logged = series
        .points
        .iter()
        .find(|point| point.date == "2025-06-01")
        .expect("missing logged day");
    assert_eq!(logged.actual, Some(110.0));
    assert_eq!(series.points[0].actual, None);

    let weekly: SeriesResponse = get_json(&client, format!("{base}/series?granularity=weekly")).await;
    assert_eq!(weekly.points.len(), 22);
}

#[tokio::test]
async fn http_log_replaces_same_date_and_ignores_bad_input() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = format!("{}/api/users/jordan", server.base_url);

    for weight in ["112", "111.5"] {
        let response = client
            .post(format!("{base}/logs"))
            .json(&serde_json::json!({ "date": "2025-05-10", "weight": weight }))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
    }

    let ignored = client
        .post(format!("{base}/logs"))
        .json(&serde_json::json!({ "date": "2025-05-11", "weight": "" }))
        .send()
        .await
        .unwrap();
    assert!(ignored.status().is_success());

    let profile: Profile = get_json(&client, base.clone()).await;
    assert_eq!(profile.logs.len(), 1);
    assert_eq!(profile.logs[0].weight, 111.5);
    assert_eq!(profile.logs[0].change, 0.0);
}

#[tokio::test]
async fn http_delete_log_is_idempotent() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = format!("{}/api/users/morgan", server.base_url);

    client
        .post(format!("{base}/logs"))
        .json(&serde_json::json!({ "date": "2025-05-10", "weight": 112 }))
        .send()
        .await
        .unwrap();

    for _ in 0..2 {
        let response = client
            .delete(format!("{base}/logs/2025-05-10"))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
        let profile: Profile = response.json().await.unwrap();
        assert!(profile.logs.is_empty());
    }

    let bad = client
        .delete(format!("{base}/logs/yesterday"))
        .send()
        .await
        .unwrap();
    assert_eq!(bad.status().as_u16(), 400);
}

#[tokio::test]
async fn http_settings_update_and_validation() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = format!("{}/api/users/taylor", server.base_url);

    let response = client
        .put(format!("{base}/settings"))
        .json(&serde_json::json!({ "goalWeight": "90", "goalDate": "2025-12-31" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let profile: Profile = response.json().await.unwrap();
    assert_eq!(profile.goal_weight, 90.0);
    assert_eq!(profile.goal_date, "2025-12-31");
    assert_eq!(profile.start_weight, 116.4);

    let rejected = client
        .put(format!("{base}/settings"))
        .json(&serde_json::json!({ "startDate": "soon" }))
        .send()
        .await
        .unwrap();
    assert_eq!(rejected.status().as_u16(), 400);

    let endless = client
        .put(format!("{base}/settings"))
        .json(&serde_json::json!({ "goalDate": "9999-12-31" }))
        .send()
        .await
        .unwrap();
    assert_eq!(endless.status().as_u16(), 400);

    let profile: Profile = get_json(&client, base.clone()).await;
    assert_eq!(profile.goal_date, "2025-12-31");
}

#[tokio::test]
async fn http_log_form_records_today_and_redirects() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    let response = client
        .post(format!("{}/log", server.base_url))
        .form(&[("user", "a b"), ("weight", "110"), ("date", "")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 303);
    assert_eq!(
        response.headers().get("location").unwrap().to_str().unwrap(),
        "/?user=a%20b"
    );

    let today = chrono::Local::now().date_naive().to_string();
    let profile: Profile = get_json(&client, format!("{}/api/users/a%20b", server.base_url)).await;
    let entry = profile
        .logs
        .iter()
        .find(|entry| entry.date == today)
        .expect("missing entry for today");
    assert_eq!(entry.weight, 110.0);

    let missing_user = client
        .post(format!("{}/log", server.base_url))
        .form(&[("user", ""), ("weight", "110")])
        .send()
        .await
        .unwrap();
    assert_eq!(missing_user.status().as_u16(), 400);
}

#[tokio::test]
async fn http_index_serves_page() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/?user=sam", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let body = response.text().await.unwrap();
    assert!(body.contains("Weight Tracker"));
    assert!(body.contains("data-user=\"sam\""));
}
