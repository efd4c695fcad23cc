// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{profile_html, read_records, TestRun};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_one_available_one_timing_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(200).set_body_string(profile_html("Acme")))
        .expect(1)
        .mount(&server)
        .await;
    // Every attempt on /b outlives the 1s client timeout
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .expect(3)
        .mount(&server)
        .await;

    let run = TestRun::new(3, 50);
    run.write_input(&[format!("{}/a", server.uri()), format!("{}/b", server.uri())]);

    let summary = run.run().await;

    assert_eq!(summary.persisted, 1);
    assert_eq!(summary.gave_up, 1);
    let records = read_records(&run.output_path());
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].url, format!("{}/a", server.uri()));
    assert_eq!(records[0].name, "Acme");
    assert_eq!(records[0].tagline.as_deref(), Some("Acme tagline"));
    assert_eq!(records[0].about.as_deref(), Some("About Acme. More."));
    assert_eq!(records[0].market_tags.as_deref(), Some("SaaS, B2B"));
}

#[tokio::test]
async fn test_page_without_name_is_never_written() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nameless"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><body><p>empty</p></body></html>"),
        )
        .expect(4)
        .mount(&server)
        .await;

    let run = TestRun::new(4, 50);
    run.write_input(&[format!("{}/nameless", server.uri())]);

    let summary = run.run().await;

    assert_eq!(summary.gave_up, 1);
    assert!(read_records(&run.output_path()).is_empty());
}

#[tokio::test]
async fn test_transient_errors_are_retried_until_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string(profile_html("Flaky")))
        .expect(1)
        .mount(&server)
        .await;

    let run = TestRun::new(10, 50);
    run.write_input(&[format!("{}/flaky", server.uri())]);

    let summary = run.run().await;

    assert_eq!(summary.persisted, 1);
    let records = read_records(&run.output_path());
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "Flaky");
}

#[tokio::test]
async fn test_worst_case_requests_equal_attempt_budget() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(5)
        .mount(&server)
        .await;

    let run = TestRun::new(5, 50);
    run.write_input(&[format!("{}/down", server.uri())]);

    let summary = run.run().await;

    assert_eq!(summary.gave_up, 1);
    // MockServer verifies exactly five requests on drop
}
