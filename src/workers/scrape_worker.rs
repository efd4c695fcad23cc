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

use std::sync::Arc;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

use crate::domain::services::extraction_service::ExtractionService;
use crate::engines::traits::PageFetcher;
use crate::infrastructure::csv_sink::CsvSink;
use crate::utils::errors::ScrapeError;
use crate::utils::retry_policy::RetryPolicy;

/// 单个 URL 的最终结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeOutcome {
    /// 记录已写入输出文件
    Persisted { attempts: u32 },
    /// 重试预算耗尽，未写入任何记录
    GaveUp { attempts: u32 },
}

/// 抓取工作者
///
/// 组合抓取引擎、提取服务和输出写入器，把一个 URL 处理到
/// “已写入”或“已放弃”两种终态之一。抓取、提取、写入中任何一步
/// 失败都计为一次失败尝试，并按同一个重试策略重试。
pub struct ScrapeWorker {
    fetcher: Arc<dyn PageFetcher>,
    extractor: Arc<ExtractionService>,
    sink: Arc<CsvSink>,
    retry_policy: RetryPolicy,
}

impl ScrapeWorker {
    /// 创建新的抓取工作器实例
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        extractor: Arc<ExtractionService>,
        sink: Arc<CsvSink>,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            sink,
            retry_policy,
        }
    }

    /// 处理一个 URL
    ///
    /// 永远不会向调用方返回错误，失败只体现在日志和返回的结果中。
    #[instrument(skip(self), fields(engine = self.fetcher.name()))]
    pub async fn process(&self, url: &str) -> ScrapeOutcome {
        let mut state = self.retry_policy.start();

        loop {
            match self.attempt(url).await {
                Ok(()) => {
                    return ScrapeOutcome::Persisted {
                        attempts: state.attempt() + 1,
                    };
                }
                Err(e) => {
                    let attempt = state.record_failure();
                    warn!(
                        stage = e.stage(),
                        retryable = e.is_retryable(),
                        "Error processing {} (attempt {}/{}): {}",
                        url,
                        attempt,
                        state.max_attempts(),
                        e
                    );

                    if state.is_exhausted() {
                        error!("Giving up on {} after {} attempts.", url, attempt);
                        return ScrapeOutcome::GaveUp { attempts: attempt };
                    }

                    sleep(self.retry_policy.backoff(attempt)).await;
                }
            }
        }
    }

    /// 一次完整尝试：抓取、提取、写入
    async fn attempt(&self, url: &str) -> Result<(), ScrapeError> {
        let html = self.fetcher.fetch(url).await?;
        let record = self.extractor.extract(url, &html)?;
        self.sink.append(&record).await?;

        info!(
            name = %record.name,
            tagline = record.tagline.as_deref().unwrap_or(""),
            market_tags = record.market_tags.as_deref().unwrap_or(""),
            "Scraped data from {}",
            url
        );
        Ok(())
    }
}
