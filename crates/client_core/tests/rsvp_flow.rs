use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use chrono::{NaiveDate, TimeZone, Utc};
use client_core::{
    DeliveryEndpoint, FixedClock, FormEvent, HttpDelivery, RsvpController, Settings, SubmitError,
};
use serde_json::Value;
use shared::domain::{Attendance, DietaryOption, LifecycleState, MealChoice, YesNo};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone, Default)]
struct Webhook {
    hits: Arc<AtomicUsize>,
    bodies: Arc<Mutex<Vec<Value>>>,
}

async fn receive(State(hook): State<Webhook>, Json(body): Json<Value>) -> StatusCode {
    hook.hits.fetch_add(1, Ordering::SeqCst);
    hook.bodies.lock().await.push(body);
    StatusCode::OK
}

async fn spawn_webhook() -> (String, Webhook) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let hook = Webhook::default();
    let app = Router::new()
        .route("/macros/exec", post(receive))
        .with_state(hook.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}/macros/exec"), hook)
}

fn settings(endpoint: &str) -> Settings {
    Settings {
        event_date: NaiveDate::from_ymd_opt(2027, 6, 19).expect("date"),
        manually_opened: true,
        delivery_endpoint: DeliveryEndpoint::parse(endpoint).expect("endpoint"),
        ..Settings::default()
    }
}

fn controller(settings: &Settings) -> RsvpController {
    let http = reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("client");
    let now = Utc
        .with_ymd_and_hms(2026, 11, 2, 18, 30, 0)
        .single()
        .expect("instant");
    RsvpController::with_dependencies(
        settings,
        Arc::new(HttpDelivery::with_client(http)),
        Arc::new(FixedClock(now)),
    )
}

#[tokio::test]
async fn full_rsvp_reaches_the_webhook_once() {
    let (url, hook) = spawn_webhook().await;
    let settings = settings(&url);
    let mut ctl = controller(&settings);
    assert_eq!(ctl.visibility().state, LifecycleState::Open);

    let events = vec![
        FormEvent::NameChanged("Marilyn Aram".into()),
        FormEvent::AttendanceChanged(Some(Attendance::Yes)),
        FormEvent::GuestCountChanged(Some(3)),
        FormEvent::GuestNameChanged {
            index: 1,
            name: "Ian Nicholls".into(),
        },
        FormEvent::GuestNameChanged {
            index: 2,
            name: "Rosa".into(),
        },
        FormEvent::MealSelected {
            index: 0,
            meal: MealChoice::Vegetarian,
        },
        FormEvent::MealSelected {
            index: 1,
            meal: MealChoice::Beef,
        },
        FormEvent::MealSelected {
            index: 2,
            meal: MealChoice::Fish,
        },
        FormEvent::DietaryToggled {
            index: 0,
            option: DietaryOption::None,
            checked: true,
        },
        FormEvent::DietaryToggled {
            index: 1,
            option: DietaryOption::NutAllergy,
            checked: true,
        },
        FormEvent::DietaryToggled {
            index: 2,
            option: DietaryOption::Other,
            checked: true,
        },
        FormEvent::DietaryDetailsChanged("Rosa cannot eat sesame".into()),
        FormEvent::OvernightChanged(Some(YesNo::Yes)),
        FormEvent::AccommodationChanged(Some("on-site".into())),
        FormEvent::SongRequestChanged("Valerie".into()),
    ];
    for event in events {
        ctl.handle(event).expect("event applies");
    }

    let notice = ctl.submit().await.expect("submitted");
    assert!(notice.message.contains("Marilyn Aram"));
    assert_eq!(hook.hits.load(Ordering::SeqCst), 1);

    let bodies = hook.bodies.lock().await;
    let body = &bodies[0];
    assert_eq!(body["attendance"], "yes");
    assert_eq!(body["numGuests"], 3);
    assert_eq!(body["guestNames"], serde_json::json!(["Ian Nicholls", "Rosa"]));
    assert_eq!(body["meals"]["0"], "vegetarian");
    assert_eq!(body["dietary"]["1"]["nut-allergy"], true);
    assert_eq!(body["dietaryDetails"], "Rosa cannot eat sesame");
    assert_eq!(body["accommodation"], "on-site");
    assert_eq!(body["songRequest"], "Valerie");

    assert!(ctl.form().name.is_empty());
    assert!(ctl.control().current().enabled);
}

#[tokio::test]
async fn sentinel_endpoint_never_touches_the_network() {
    let (_url, hook) = spawn_webhook().await;
    let settings = settings(client_core::config::UNCONFIGURED_ENDPOINT);
    let mut ctl = controller(&settings);

    ctl.handle(FormEvent::NameChanged("Ian".into()))
        .expect("name");
    ctl.handle(FormEvent::AttendanceChanged(Some(Attendance::No)))
        .expect("attendance");

    let err = ctl.submit().await.expect_err("not configured");
    assert!(matches!(err, SubmitError::NotConfigured));
    assert_eq!(hook.hits.load(Ordering::SeqCst), 0);
}
