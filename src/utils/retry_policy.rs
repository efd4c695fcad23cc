// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::time::Duration;

/// 重试策略配置
///
/// 整个抓取流程只有这一层重试：抓取引擎本身不重试，
/// 由抓取工作器按照此策略对单个 URL 的完整处理过程进行重试。
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// 最大尝试次数（包含第一次）
    pub max_attempts: u32,
    /// 初始退避时间
    pub initial_backoff: Duration,
    /// 最大退避时间
    pub max_backoff: Duration,
    /// 退避乘数，1.0 即固定间隔
    pub backoff_multiplier: f64,
    /// 抖动因子 (0.0-1.0)
    pub jitter_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed(10, Duration::from_secs(2))
    }
}

impl RetryPolicy {
    /// 创建固定间隔的重试策略
    pub fn fixed(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            initial_backoff: interval,
            max_backoff: interval,
            backoff_multiplier: 1.0,
            jitter_factor: 0.0,
        }
    }

    /// 开始一次新的重试计数
    pub fn start(&self) -> RetryState {
        RetryState::new(self.max_attempts)
    }

    /// 计算第 `attempt` 次失败之后的退避时间
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let backoff_secs =
            self.initial_backoff.as_secs_f64() * self.backoff_multiplier.powi(exponent);

        let capped_backoff = backoff_secs.min(self.max_backoff.as_secs_f64());

        let final_backoff = if self.jitter_factor > 0.0 && capped_backoff > 0.0 {
            let jitter_range = capped_backoff * self.jitter_factor;
            let jitter = rand::random_range(-jitter_range..jitter_range);
            (capped_backoff + jitter).max(0.0)
        } else {
            capped_backoff
        };

        // Float rounding near the cap can overflow Duration
        Duration::try_from_secs_f64(final_backoff).unwrap_or(self.max_backoff)
    }
}

/// 单个 URL 的重试计数
///
/// 仅在一次处理过程中存在，成功或耗尽后即丢弃。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryState {
    attempt: u32,
    max_attempts: u32,
}

impl RetryState {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            attempt: 0,
            max_attempts,
        }
    }

    /// 记录一次失败的尝试，返回已失败的次数
    pub fn record_failure(&mut self) -> u32 {
        self.attempt += 1;
        self.attempt
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// 预算是否已经用尽
    pub fn is_exhausted(&self) -> bool {
        self.attempt >= self.max_attempts
    }
}
