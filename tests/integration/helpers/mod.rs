// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use harvestrs::config::settings::{
    ConcurrencySettings, ExtractionSettings, HttpSettings, InputSettings, OutputSettings,
    ProxySettings, RetrySettings, Settings, DEFAULT_USER_AGENT,
};
use harvestrs::domain::models::scraped_record::ScrapedRecord;
use harvestrs::domain::services::extraction_service::ExtractionService;
use harvestrs::engines::reqwest_engine::ReqwestFetcher;
use harvestrs::infrastructure::csv_sink::CsvSink;
use harvestrs::infrastructure::url_source;
use harvestrs::workers::manager::{RunSummary, WorkerManager};
use harvestrs::workers::scrape_worker::ScrapeWorker;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// 测试环境：临时目录中的输入文件与输出文件
pub struct TestRun {
    pub dir: TempDir,
    pub settings: Settings,
}

impl TestRun {
    /// 创建测试配置：1 秒超时、快速重试、直连
    pub fn new(max_attempts: u32, max_in_flight: usize) -> Self {
        let dir = TempDir::new().unwrap();
        let settings = Settings {
            input: InputSettings {
                path: dir.path().join("input.csv").display().to_string(),
                url_column: "main href".to_string(),
                deduplicate: false,
            },
            output: OutputSettings {
                path: dir.path().join("f6s_scraping.csv").display().to_string(),
            },
            http: HttpSettings {
                user_agent: DEFAULT_USER_AGENT.to_string(),
                timeout_secs: 1,
            },
            proxy: ProxySettings {
                enabled: false,
                scheme: "http".to_string(),
                host: String::new(),
                username: None,
                password: None,
            },
            retry: RetrySettings {
                max_attempts,
                backoff_secs: 0.01,
                backoff_multiplier: 1.0,
                max_backoff_secs: 0.01,
                jitter_factor: 0.0,
            },
            concurrency: ConcurrencySettings { max_in_flight },
            extraction: ExtractionSettings::default(),
        };
        Self { dir, settings }
    }

    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(&self.settings.output.path)
    }

    /// 写入输入表格
    pub fn write_input(&self, urls: &[String]) {
        let mut content = String::from("company,main href\n");
        for (i, url) in urls.iter().enumerate() {
            content.push_str(&format!("company {i},{url}\n"));
        }
        std::fs::write(&self.settings.input.path, content).unwrap();
    }

    /// 按二进制程序的方式组装并运行一次完整流程
    pub async fn run(&self) -> RunSummary {
        let settings = &self.settings;
        let urls = url_source::load_urls(&settings.input).unwrap();
        let sink = CsvSink::init(&settings.output.path).await.unwrap();
        let fetcher = ReqwestFetcher::new(&settings.http, &settings.proxy).unwrap();
        let extractor = ExtractionService::new(&settings.extraction).unwrap();
        let worker = ScrapeWorker::new(
            Arc::new(fetcher),
            Arc::new(extractor),
            Arc::new(sink),
            settings.retry_policy(),
        );
        WorkerManager::new(Arc::new(worker), settings.concurrency.max_in_flight)
            .run(urls)
            .await
    }
}

/// 读取输出文件中的所有记录
pub fn read_records(path: &Path) -> Vec<ScrapedRecord> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    reader.deserialize().map(|r| r.unwrap()).collect()
}

/// 个人资料页 HTML
pub fn profile_html(name: &str) -> String {
    format!(
        r#"<html><body>
            <h1 class="profile-name">{name}</h1>
            <p class="profile-tagline">{name} tagline</p>
            <div class="profile-description"><p>About {name}.</p><p>More.</p></div>
            <div class="markets-list">
                <a class="market-item">SaaS</a><a class="market-item">B2B</a>
            </div>
        </body></html>"#
    )
}
