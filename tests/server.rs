//! End-to-end tests over a real listener.

use stackware::{Deleter, DirIndex, Logged, Server, Stack, StaticFiles, Uploader};
use std::net::SocketAddr;
use tokio::net::TcpListener;

async fn start_share_server(root: &std::path::Path) -> SocketAddr {
    let pipeline = Logged::new(
        Stack::new()
            .layer(StaticFiles::new("/", root).with_index("index.html"))
            .layer(DirIndex::new("/", root))
            .layer(Uploader::new("/", root))
            .layer(Deleter::new("/", root)),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = Server::new(pipeline).run(listener).await;
    });
    addr
}

#[tokio::test]
async fn serves_files_and_listings_over_the_wire() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("hello.txt"), "hello world").unwrap();
    std::fs::create_dir(dir.path().join("docs")).unwrap();
    std::fs::write(dir.path().join("docs/guide.md"), "# guide").unwrap();

    let addr = start_share_server(dir.path()).await;
    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    let res = client
        .get(format!("http://{addr}/hello.txt"))
        .send()
        .await
        .expect("server unreachable");
    assert_eq!(res.status(), 200);
    assert_eq!(
        res.headers().get("content-type").unwrap(),
        "text/plain"
    );
    assert!(res.headers().get("x-runtime").is_some());
    assert_eq!(res.text().await.unwrap(), "hello world");

    let res = client
        .get(format!("http://{addr}/docs"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let html = res.text().await.unwrap();
    assert!(html.contains("guide.md"));

    let res = client
        .get(format!("http://{addr}/missing"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
}

#[tokio::test]
async fn range_requests_over_the_wire() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("data.bin"), "0123456789").unwrap();

    let addr = start_share_server(dir.path()).await;
    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    let res = client
        .get(format!("http://{addr}/data.bin"))
        .header("range", "bytes=2-5")
        .send()
        .await
        .expect("server unreachable");
    assert_eq!(res.status(), 206);
    assert_eq!(
        res.headers().get("content-range").unwrap(),
        "bytes 2-5/10"
    );
    assert_eq!(res.text().await.unwrap(), "2345");

    let res = client
        .get(format!("http://{addr}/data.bin"))
        .header("range", "bytes=9-42")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 416);
}

#[tokio::test]
async fn upload_and_delete_over_the_wire() {
    let dir = tempfile::tempdir().unwrap();
    let addr = start_share_server(dir.path()).await;
    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    let res = client
        .put(format!("http://{addr}/drop.txt"))
        .body("dropped off")
        .send()
        .await
        .expect("server unreachable");
    assert_eq!(res.status(), 200);
    assert_eq!(
        std::fs::read_to_string(dir.path().join("drop.txt")).unwrap(),
        "dropped off"
    );

    let res = client
        .get(format!("http://{addr}/drop.txt"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.text().await.unwrap(), "dropped off");

    let res = client
        .delete(format!("http://{addr}/drop.txt"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert!(!dir.path().join("drop.txt").exists());

    // deleting again: no handler claims it, the host policy answers 404
    let res = client
        .delete(format!("http://{addr}/drop.txt"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
}
