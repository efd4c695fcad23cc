// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::workers::scrape_worker::{ScrapeOutcome, ScrapeWorker};

/// 一次运行的统计信息
///
/// 只包含计数，不保留任何抓取结果。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// 已写入输出文件的 URL 数
    pub persisted: usize,
    /// 重试耗尽后放弃的 URL 数
    pub gave_up: usize,
    /// 工作任务异常终止（panic 或未获准入）的 URL 数
    pub aborted: usize,
    /// 观测到的最大同时处理数
    pub peak_in_flight: usize,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.persisted + self.gave_up + self.aborted
    }
}

/// 在途工作器计数
#[derive(Debug, Default)]
struct InFlight {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl InFlight {
    fn enter(this: &Arc<Self>) -> InFlightGuard {
        let now = this.current.fetch_add(1, Ordering::SeqCst) + 1;
        this.peak.fetch_max(now, Ordering::SeqCst);
        InFlightGuard(this.clone())
    }

    fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

struct InFlightGuard(Arc<InFlight>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.current.fetch_sub(1, Ordering::SeqCst);
    }
}

/// 工作管理器
///
/// 为每个 URL 启动一个抓取任务，通过信号量限制同时处理的数量，
/// 并等待所有任务到达终态。单个 URL 的失败不会影响其它 URL。
pub struct WorkerManager {
    worker: Arc<ScrapeWorker>,
    max_in_flight: usize,
}

impl WorkerManager {
    pub fn new(worker: Arc<ScrapeWorker>, max_in_flight: usize) -> Self {
        Self {
            worker,
            max_in_flight: max_in_flight.max(1),
        }
    }

    /// 处理全部 URL
    ///
    /// 所有任务同时启动，超过上限的任务在信号量处等待。
    /// 返回时每个 URL 都已写入或已放弃。
    ///
    /// # 参数
    ///
    /// * `urls` - 目标 URL 列表
    pub async fn run(&self, urls: Vec<String>) -> RunSummary {
        let total = urls.len();
        info!(
            "Scraping {} URLs with at most {} in flight",
            total, self.max_in_flight
        );

        let semaphore = Arc::new(Semaphore::new(self.max_in_flight));
        let in_flight = Arc::new(InFlight::default());
        let mut tasks = JoinSet::new();

        for url in urls {
            tasks.spawn(admit(
                semaphore.clone(),
                in_flight.clone(),
                self.worker.clone(),
                url,
            ));
        }

        let mut summary = RunSummary::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Some(ScrapeOutcome::Persisted { attempts })) => {
                    summary.persisted += 1;
                    debug!("URL persisted after {} attempt(s)", attempts);
                }
                Ok(Some(ScrapeOutcome::GaveUp { .. })) => summary.gave_up += 1,
                Ok(None) => summary.aborted += 1,
                Err(e) => {
                    summary.aborted += 1;
                    error!("Scrape task aborted: {}", e);
                }
            }

            let done = summary.total();
            if done % 100 == 0 || done == total {
                info!("Progress: {}/{} URLs finished", done, total);
            }
        }

        summary.peak_in_flight = in_flight.peak();
        info!(
            persisted = summary.persisted,
            gave_up = summary.gave_up,
            aborted = summary.aborted,
            peak_in_flight = summary.peak_in_flight,
            "Scrape run finished"
        );
        summary
    }
}

/// 取得准入许可后处理一个 URL
///
/// 信号量被关闭时不处理该 URL，返回 `None`。
async fn admit(
    semaphore: Arc<Semaphore>,
    in_flight: Arc<InFlight>,
    worker: Arc<ScrapeWorker>,
    url: String,
) -> Option<ScrapeOutcome> {
    let _permit = match semaphore.acquire_owned().await {
        Ok(permit) => permit,
        Err(e) => {
            error!("Admission closed, skipping {}: {}", url, e);
            return None;
        }
    };
    let _guard = InFlight::enter(&in_flight);
    Some(worker.process(&url).await)
}
