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

use async_trait::async_trait;
use thiserror::Error;

/// 抓取引擎错误类型
#[derive(Error, Debug)]
pub enum FetchError {
    /// 请求失败（连接、代理、读取响应体等）
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// 超时
    #[error("timed out after {0}s")]
    Timeout(u64),
    /// 非 2xx 状态码
    #[error("HTTP status {0}")]
    Status(u16),
    /// 客户端构建失败
    #[error("client setup failed: {0}")]
    Setup(String),
}

impl FetchError {
    /// 判断错误是否属于临时性故障
    ///
    /// 作为工作器失败日志的 `retryable` 字段输出，工作器仍会重试所有抓取错误。
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Request(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            FetchError::Timeout(_) => true,
            FetchError::Status(code) => *code == 429 || (500..600).contains(code),
            FetchError::Setup(_) => false,
        }
    }
}

/// 页面抓取特质
///
/// 一次调用只发出一次请求，不做任何重试或等待。
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// 抓取页面并返回 HTML 文本
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;

    /// 引擎名称
    fn name(&self) -> &'static str;
}
