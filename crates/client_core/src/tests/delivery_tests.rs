use super::*;

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use shared::domain::Attendance;
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};

#[derive(Clone)]
struct EndpointState {
    status: StatusCode,
    tx: Arc<Mutex<Option<oneshot::Sender<RsvpRecord>>>>,
}

async fn handle_rsvp(
    State(state): State<EndpointState>,
    Json(record): Json<RsvpRecord>,
) -> StatusCode {
    if let Some(tx) = state.tx.lock().await.take() {
        let _ = tx.send(record);
    }
    state.status
}

async fn spawn_endpoint(status: StatusCode) -> (Url, oneshot::Receiver<RsvpRecord>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let (tx, rx) = oneshot::channel();
    let state = EndpointState {
        status,
        tx: Arc::new(Mutex::new(Some(tx))),
    };
    let app = Router::new()
        .route("/exec", post(handle_rsvp))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    let url = Url::parse(&format!("http://{addr}/exec")).expect("url");
    (url, rx)
}

fn local_delivery() -> HttpDelivery {
    let http = Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("client");
    HttpDelivery::with_client(http)
}

#[tokio::test]
async fn posts_record_as_json() {
    let (url, record_rx) = spawn_endpoint(StatusCode::OK).await;
    let record = RsvpRecord::declined("Marilyn");

    let receipt = local_delivery()
        .deliver(&url, &record)
        .await
        .expect("deliver");
    assert_eq!(receipt.status, 200);

    let received = record_rx.await.expect("record");
    assert_eq!(received, record);
    assert_eq!(received.attendance, Attendance::No);
}

#[tokio::test]
async fn non_success_status_is_rejected() {
    let (url, _record_rx) = spawn_endpoint(StatusCode::INTERNAL_SERVER_ERROR).await;

    let err = local_delivery()
        .deliver(&url, &RsvpRecord::declined("Ian"))
        .await
        .expect_err("must fail");
    assert!(matches!(err, DeliveryError::Rejected { status: 500 }));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let url = Url::parse(&format!("http://{addr}/exec")).expect("url");

    let err = local_delivery()
        .deliver(&url, &RsvpRecord::declined("Ian"))
        .await
        .expect_err("must fail");
    assert!(matches!(err, DeliveryError::Transport(_)));
}
