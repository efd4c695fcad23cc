// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

use crate::domain::services::extraction_service::ExtractionError;
use crate::engines::traits::FetchError;
use crate::infrastructure::csv_sink::SinkError;

/// 单次抓取尝试的错误类型
///
/// 工作器对所有变体一视同仁：记录日志后按重试策略重试，
/// `is_retryable` 只影响日志字段。
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("write failed: {0}")]
    Sink(#[from] SinkError),
}

impl ScrapeError {
    /// 错误所属阶段，用于日志字段
    pub fn stage(&self) -> &'static str {
        match self {
            ScrapeError::Fetch(_) => "fetch",
            ScrapeError::Extraction(_) => "extract",
            ScrapeError::Sink(_) => "write",
        }
    }

    /// 是否为临时性故障，用于日志字段
    ///
    /// 只有抓取错误带有分类；提取与写入错误一律记为非临时性。
    pub fn is_retryable(&self) -> bool {
        match self {
            ScrapeError::Fetch(e) => e.is_retryable(),
            ScrapeError::Extraction(_) | ScrapeError::Sink(_) => false,
        }
    }
}
