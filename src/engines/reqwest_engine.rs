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

use crate::config::settings::{HttpSettings, ProxySettings};
use crate::engines::traits::{FetchError, PageFetcher};
use async_trait::async_trait;
use std::time::Instant;
use tracing::{debug, info};

/// 抓取引擎
///
/// 基于reqwest实现的HTTP抓取引擎。客户端在启动时构建一次，
/// 所有工作器共享同一个连接池和代理配置。
pub struct ReqwestFetcher {
    client: reqwest::Client,
    timeout_secs: u64,
}

impl ReqwestFetcher {
    /// 根据HTTP和代理配置构建抓取引擎
    ///
    /// # 参数
    ///
    /// * `http` - User-Agent 与超时配置
    /// * `proxy` - 代理配置，未启用时直连
    ///
    /// # 返回值
    ///
    /// * `Ok(ReqwestFetcher)` - 构建成功
    /// * `Err(FetchError::Setup)` - 代理地址或客户端配置无效
    pub fn new(http: &HttpSettings, proxy: &ProxySettings) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(http.user_agent.as_str())
            .timeout(http.timeout());

        if proxy.enabled {
            let mut reqwest_proxy = reqwest::Proxy::all(proxy.url())
                .map_err(|e| FetchError::Setup(format!("Invalid proxy: {}", e)))?;
            if proxy.has_credentials() {
                reqwest_proxy = reqwest_proxy.basic_auth(
                    proxy.username.as_deref().unwrap_or_default(),
                    proxy.password.as_deref().unwrap_or_default(),
                );
            }
            builder = builder.proxy(reqwest_proxy);
            info!("Routing requests through proxy {}", proxy.url());
        } else {
            builder = builder.no_proxy();
        }

        let client = builder
            .build()
            .map_err(|e| FetchError::Setup(e.to_string()))?;

        Ok(Self {
            client,
            timeout_secs: http.timeout_secs,
        })
    }
}

#[async_trait]
impl PageFetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let start = Instant::now();
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.timeout_secs)
            } else {
                FetchError::Request(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let content = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.timeout_secs)
            } else {
                FetchError::Request(e)
            }
        })?;

        debug!(
            url,
            status = status.as_u16(),
            bytes = content.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(content)
    }

    fn name(&self) -> &'static str {
        "reqwest"
    }
}

#[cfg(test)]
#[path = "reqwest_engine_test.rs"]
mod tests;
