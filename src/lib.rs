// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含抓取记录实体和字段提取服务
pub mod domain;

/// 引擎模块
///
/// 实现页面抓取引擎
pub mod engines;

/// 基础设施模块
///
/// 提供输入表格读取和 CSV 输出等外部资源访问
pub mod infrastructure;

/// 工具模块
///
/// 提供重试策略、错误类型和日志初始化
pub mod utils;

/// 工作器模块
///
/// 实现单个 URL 的抓取流程和并发控制
pub mod workers;
