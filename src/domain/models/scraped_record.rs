// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 输出文件的列名，顺序与 [`ScrapedRecord`] 字段顺序一致
pub const CSV_HEADER: [&str; 5] = ["url", "name", "tagline", "about", "market_tags"];

/// 抓取记录实体
///
/// 一个 URL 成功处理后生成的固定结构记录。创建后不再修改，
/// 并且只会被写入输出文件一次。`url` 和 `name` 必定非空，
/// 其余字段缺失时在 CSV 中写为空字段。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedRecord {
    /// 页面地址
    pub url: String,
    /// 名称
    pub name: String,
    /// 标语
    pub tagline: Option<String>,
    /// 简介，多个段落以空格拼接
    pub about: Option<String>,
    /// 市场标签，以 ", " 拼接
    pub market_tags: Option<String>,
}
