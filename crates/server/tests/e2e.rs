use std::net::SocketAddr;
use std::time::Duration;

use configs::AppConfig;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use server::startup::{build_app, serve_with_shutdown};

struct TestApp {
    base_url: String,
    stop: oneshot::Sender<()>,
    handle: JoinHandle<anyhow::Result<()>>,
}

impl TestApp {
    async fn shutdown(self) -> anyhow::Result<()> {
        let _ = self.stop.send(());
        self.handle.await?
    }
}

async fn start_server(seed: bool) -> anyhow::Result<TestApp> {
    let mut cfg = AppConfig::default();
    cfg.seed.enabled = seed;
    let app = build_app(&cfg).await?;

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    let (stop, rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(serve_with_shutdown(
        listener,
        app,
        async move {
            let _ = rx.await;
        },
        Duration::from_secs(2),
    ));

    Ok(TestApp { base_url, stop, handle })
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server(false).await?;
    let res = reqwest::get(format!("{}/health", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "ok");
    app.shutdown().await
}

#[tokio::test]
async fn e2e_seeded_listing() -> anyhow::Result<()> {
    let app = start_server(true).await?;
    let res = reqwest::get(format!("{}/persons?page=1&size=5", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["meta"]["totalRecords"], 16);
    assert_eq!(body["meta"]["currentPage"], 2);
    assert_eq!(body["meta"]["lastPage"], 4);
    assert_eq!(body["persons"].as_array().map(Vec::len), Some(5));
    app.shutdown().await
}

#[tokio::test]
async fn e2e_person_lifecycle() -> anyhow::Result<()> {
    let app = start_server(false).await?;
    let c = reqwest::Client::new();

    let res = c
        .post(format!("{}/persons", app.base_url))
        .json(&json!({"name": "Ada", "age": 36, "hobbies": ["Maths"]}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let created = res.json::<Value>().await?;
    let id = created["id"].as_str().unwrap_or_default().to_string();
    assert!(!id.is_empty());

    let res = c
        .put(format!("{}/persons/{id}", app.base_url))
        .json(&json!({"name": "Ada L", "age": 37, "hobbies": []}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?["name"], "Ada L");

    let res = c.get(format!("{}/persons", app.base_url)).send().await?;
    let page = res.json::<Value>().await?;
    assert_eq!(page["meta"]["totalRecords"], 1);
    assert_eq!(page["persons"][0]["id"], created["id"]);

    let res = c.delete(format!("{}/persons/{id}", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);

    let res = c.get(format!("{}/persons/{id}", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    app.shutdown().await
}

#[tokio::test]
async fn e2e_rejects_bad_payloads() -> anyhow::Result<()> {
    let app = start_server(false).await?;
    let c = reqwest::Client::new();

    let res = c
        .post(format!("{}/persons", app.base_url))
        .json(&json!({"name": "Old", "age": 500, "hobbies": []}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    let body = res.json::<Value>().await?;
    assert_eq!(body["errors"]["age"], "can not be greater than 120");

    let res = c
        .post(format!("{}/persons", app.base_url))
        .header("content-type", "application/json")
        .body("[1,2")
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let res = c.get(format!("{}/persons/nope", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    app.shutdown().await
}
