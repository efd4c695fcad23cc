// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{profile_html, read_records, TestRun};
use std::collections::HashSet;
use std::time::Duration;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// 以路径作为名称返回个人资料页
struct EchoProfile {
    delay: Duration,
}

impl Respond for EchoProfile {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let name = request.url.path().trim_start_matches('/').to_string();
        ResponseTemplate::new(200)
            .set_body_string(profile_html(&name))
            .set_delay(self.delay)
    }
}

async fn echo_server(delay: Duration) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(EchoProfile { delay })
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_fresh_output_has_one_row_per_input_url() {
    let server = echo_server(Duration::ZERO).await;
    let urls: Vec<String> = (0..25).map(|i| format!("{}/p{i}", server.uri())).collect();

    let run = TestRun::new(3, 8);
    run.write_input(&urls);
    let summary = run.run().await;

    assert_eq!(summary.persisted, urls.len());
    let records = read_records(&run.output_path());
    let written: HashSet<String> = records.iter().map(|r| r.url.clone()).collect();
    let expected: HashSet<String> = urls.iter().cloned().collect();
    assert_eq!(records.len(), urls.len());
    assert_eq!(written, expected);
    assert!(records.iter().all(|r| !r.name.is_empty()));
}

#[tokio::test]
async fn test_header_written_once_across_runs() {
    let server = echo_server(Duration::ZERO).await;
    let run = TestRun::new(3, 4);
    run.write_input(&[format!("{}/first", server.uri())]);

    run.run().await;
    run.run().await;

    let content = std::fs::read_to_string(run.output_path()).unwrap();
    let headers = content
        .lines()
        .filter(|line| *line == "url,name,tagline,about,market_tags")
        .count();
    assert_eq!(headers, 1);
    assert_eq!(read_records(&run.output_path()).len(), 2);
}

#[tokio::test]
async fn test_duplicate_urls_follow_deduplicate_setting() {
    let server = echo_server(Duration::ZERO).await;
    let url = format!("{}/twice", server.uri());

    let run = TestRun::new(3, 4);
    run.write_input(&[url.clone(), url.clone()]);
    assert_eq!(run.run().await.persisted, 2);

    let mut dedup = TestRun::new(3, 4);
    dedup.settings.input.deduplicate = true;
    dedup.write_input(&[url.clone(), url]);
    assert_eq!(dedup.run().await.persisted, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrency_cap_with_real_requests() {
    let server = echo_server(Duration::from_millis(100)).await;
    let urls: Vec<String> = (0..5).map(|i| format!("{}/c{i}", server.uri())).collect();

    let run = TestRun::new(3, 2);
    run.write_input(&urls);
    let summary = run.run().await;

    assert_eq!(summary.persisted, 5);
    assert!(summary.peak_in_flight <= 2);
}
