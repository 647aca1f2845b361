//! End-to-end checks through the in-memory transport.

use std::sync::Arc;

use apiexpect::{Binder, Config, Expect, RecordingReporter};
use bytes::Bytes;
use http::{header, Method, StatusCode};
use http_body_util::Full;
use serde_json::{json, Value as Json};

/// Replies with the request body, served as JSON.
fn mirror() -> Binder {
    Binder::new(|req: http::Request<Bytes>| async move {
        let mut response = http::Response::new(Full::new(req.into_body()));
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        response
    })
}

/// `/foo` serves an object; `/bar` serves an array on GET and 204 on PUT.
fn routes() -> Binder {
    Binder::new(|req: http::Request<Bytes>| async move {
        let json = |body: &'static str| {
            let mut response = http::Response::new(Full::new(Bytes::from(body)));
            response.headers_mut().insert(
                header::CONTENT_TYPE,
                header::HeaderValue::from_static("application/json"),
            );
            response
        };
        let status = |status: StatusCode| {
            let mut response = http::Response::new(Full::new(Bytes::new()));
            *response.status_mut() = status;
            response
        };

        match (req.method(), req.uri().path()) {
            (_, "/foo") => json(r#"{"foo":123}"#),
            (&Method::GET, "/bar") => json("[true, false]"),
            (&Method::PUT, "/bar") => status(StatusCode::NO_CONTENT),
            _ => status(StatusCode::NOT_FOUND),
        }
    })
}

fn expect_with(reporter: &Arc<RecordingReporter>, client: Binder) -> Expect {
    Expect::with_config(
        Config::new(reporter.clone())
            .with_base_url("http://example.com")
            .with_client(client),
    )
}

fn document() -> Json {
    json!({
        "foo": ["bar", 123, false, null],
        "bar": "hello",
        "baz": 456
    })
}

#[tokio::test]
async fn test_traverse_response() {
    let reporter = Arc::new(RecordingReporter::new());
    let data = document();

    let mut response = expect_with(&reporter, mirror())
        .get("/url")
        .with_json(&data)
        .expect()
        .await;

    let mut m = response.json().object();
    m.equal(&data)
        .contains_key("foo")
        .contains_key("bar")
        .value_equal("foo", &data["foo"])
        .value_equal("bar", &data["bar"])
        .value_equal("baz", &data["baz"]);

    m.keys().contains_only(["foo", "bar", "baz"]);
    m.values()
        .contains_only([data["foo"].clone(), data["bar"].clone(), data["baz"].clone()]);

    m.value("foo")
        .array()
        .elements([json!("bar"), json!(123), json!(false), Json::Null]);
    m.value("bar").string().equal("hello");
    m.value("baz").number().equal(456);
    m.value("foo").array().element(2).boolean().is_false();
    m.value("foo").array().element(3).null();

    assert!(reporter.is_empty(), "{:?}", reporter.failures());
}

#[tokio::test]
async fn test_branches() {
    let reporter = Arc::new(RecordingReporter::new());

    let mut response = expect_with(&reporter, mirror())
        .get("/url")
        .with_json(&document())
        .expect()
        .await;

    let m1 = response.json().array();
    let mut m2 = response.json().object();

    let e1 = m2.value("foo").object();
    let e2 = m2.value("foo").array().element(999).string();
    let e3 = m2.value("foo").array().element(0).number();
    let mut e4 = m2.value("foo").array().element(0).string();
    e4.equal("bar");

    assert!(m1.is_failed());
    assert!(!m2.is_failed());
    assert!(e1.is_failed());
    assert!(e2.is_failed());
    assert!(e3.is_failed());
    assert!(!e4.is_failed());
    assert!(!response.is_failed());
    assert_eq!(reporter.count(), 4);
}

#[tokio::test]
async fn test_routes() {
    let reporter = Arc::new(RecordingReporter::new());
    let e = expect_with(&reporter, routes());

    e.get("/foo")
        .expect()
        .await
        .status(StatusCode::OK)
        .json()
        .object()
        .value_equal("foo", &123);

    e.get("/bar")
        .expect()
        .await
        .status(StatusCode::OK)
        .json()
        .array()
        .elements([true, false]);

    e.put("/bar")
        .expect()
        .await
        .status(StatusCode::NO_CONTENT)
        .no_content()
        .body()
        .empty();

    assert!(reporter.is_empty(), "{:?}", reporter.failures());
}

#[tokio::test]
async fn test_wrong_status_reported_once() {
    let reporter = Arc::new(RecordingReporter::new());
    let e = expect_with(&reporter, routes());

    let mut response = e.get("/missing").expect().await;
    response.status(StatusCode::OK).json().object().value_equal("foo", &123);
    response.status(StatusCode::OK);

    assert!(response.is_failed());
    assert_eq!(reporter.count(), 1);
    assert!(reporter.failures()[0].contains("404"));
}

#[tokio::test]
async fn test_custom_method() {
    let reporter = Arc::new(RecordingReporter::new());
    let e = expect_with(&reporter, Binder::echo());
    let method = Method::from_bytes(b"METHOD").unwrap();

    e.request(method, "/url")
        .expect()
        .await
        .json()
        .object()
        .value_equal("method", "METHOD")
        .value_equal("path", "/url");

    assert!(reporter.is_empty(), "{:?}", reporter.failures());
}

#[tokio::test]
#[should_panic(expected = "expected number == 124")]
async fn test_panic_reporter_stops_the_test() {
    let e = Expect::with_config(
        Config::new(Arc::new(apiexpect::PanicReporter::new()))
            .with_base_url("http://example.com")
            .with_client(routes()),
    );

    e.get("/foo")
        .expect()
        .await
        .json()
        .object()
        .value("foo")
        .number()
        .equal(124);
}
