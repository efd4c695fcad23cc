// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

use crate::config::settings::ExtractionSettings;
use crate::domain::models::scraped_record::ScrapedRecord;

/// 字段提取错误
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// 必需字段缺失或为空
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// 选择器无法解析
    #[error("invalid selector for {field}: {selector}")]
    InvalidSelector {
        field: &'static str,
        selector: String,
    },
}

/// 提取服务
///
/// 负责从个人资料页的 HTML 中提取固定字段。
/// 选择器在构造时解析一次，提取过程是纯函数，不做任何 I/O。
#[derive(Debug)]
pub struct ExtractionService {
    name: Selector,
    tagline: Selector,
    about: Selector,
    market_tags: Selector,
}

impl ExtractionService {
    /// 根据配置创建提取服务
    pub fn new(settings: &ExtractionSettings) -> Result<Self, ExtractionError> {
        Ok(Self {
            name: parse_selector("name", &settings.name_selector)?,
            tagline: parse_selector("tagline", &settings.tagline_selector)?,
            about: parse_selector("about", &settings.about_selector)?,
            market_tags: parse_selector("market_tags", &settings.market_tags_selector)?,
        })
    }

    /// 提取数据
    ///
    /// # 参数
    ///
    /// * `url` - 页面地址，原样写入记录
    /// * `html_content` - 页面 HTML
    ///
    /// # 返回值
    ///
    /// * `Ok(ScrapedRecord)` - 名称存在时的完整记录
    /// * `Err(ExtractionError::MissingField)` - 名称缺失或为空
    pub fn extract(&self, url: &str, html_content: &str) -> Result<ScrapedRecord, ExtractionError> {
        let document = Html::parse_document(html_content);

        let name = document
            .select(&self.name)
            .next()
            .map(element_text)
            .filter(|text| !text.is_empty())
            .ok_or(ExtractionError::MissingField("name"))?;

        let tagline = document
            .select(&self.tagline)
            .next()
            .map(element_text)
            .filter(|text| !text.is_empty());

        let about = join_matches(&document, &self.about, " ");
        let market_tags = join_matches(&document, &self.market_tags, ", ");

        Ok(ScrapedRecord {
            url: url.to_string(),
            name,
            tagline,
            about,
            market_tags,
        })
    }
}

fn parse_selector(field: &'static str, selector: &str) -> Result<Selector, ExtractionError> {
    Selector::parse(selector).map_err(|_| ExtractionError::InvalidSelector {
        field,
        selector: selector.to_string(),
    })
}

/// 元素的全部后代文本
///
/// 每个文本节点单独去除首尾空白，丢弃空节点后以单个空格连接。
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// 拼接所有匹配元素的文本，全部为空时返回 None
fn join_matches(document: &Html, selector: &Selector, separator: &str) -> Option<String> {
    let parts: Vec<String> = document
        .select(selector)
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(separator))
    }
}

#[cfg(test)]
#[path = "extraction_service_test.rs"]
mod tests;
