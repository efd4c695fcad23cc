// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 负责与文件系统的交互：
/// - 输入（url_source）：从表格文件读取目标 URL
/// - 输出（csv_sink）：互斥地向共享 CSV 文件追加记录
pub mod csv_sink;
pub mod url_source;
