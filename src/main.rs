// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::Context;
use harvestrs::config::settings::Settings;
use harvestrs::domain::services::extraction_service::ExtractionService;
use harvestrs::engines::reqwest_engine::ReqwestFetcher;
use harvestrs::engines::traits::PageFetcher;
use harvestrs::infrastructure::csv_sink::CsvSink;
use harvestrs::infrastructure::url_source;
use harvestrs::utils::telemetry;
use harvestrs::workers::manager::WorkerManager;
use harvestrs::workers::scrape_worker::ScrapeWorker;
use std::sync::Arc;
use tracing::info;

/// 主函数
///
/// 加载配置和目标 URL，处理完全部 URL 后退出
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting harvestrs...");

    // 2. Load configuration
    let settings = Settings::new().context("failed to load configuration")?;
    info!("Configuration loaded");

    // 3. Load target URLs
    let urls = url_source::load_urls(&settings.input)
        .with_context(|| format!("failed to load URLs from {}", settings.input.path))?;

    // 4. Prepare output file
    let sink = CsvSink::init(&settings.output.path)
        .await
        .with_context(|| format!("failed to prepare {}", settings.output.path))?;

    // 5. Initialize components
    let fetcher: Arc<dyn PageFetcher> = Arc::new(
        ReqwestFetcher::new(&settings.http, &settings.proxy)
            .context("failed to build HTTP client")?,
    );
    let extractor = ExtractionService::new(&settings.extraction)
        .context("invalid extraction selectors")?;
    let worker = ScrapeWorker::new(
        fetcher,
        Arc::new(extractor),
        Arc::new(sink),
        settings.retry_policy(),
    );

    // 6. Run
    let manager = WorkerManager::new(Arc::new(worker), settings.concurrency.max_in_flight);
    let summary = manager.run(urls).await;

    info!(
        "Done: {} written, {} given up, {} aborted -> {}",
        summary.persisted, summary.gave_up, summary.aborted, settings.output.path
    );
    Ok(())
}
