// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashSet;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use crate::config::settings::InputSettings;

/// 输入读取错误
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("cannot read input {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("malformed input: {0}")]
    Csv(#[from] csv::Error),

    #[error("column '{column}' not found in input (available: {available})")]
    MissingColumn { column: String, available: String },
}

/// 从表格文件加载目标 URL
///
/// 启动时一次性读入内存。空单元格会被跳过；无法解析为
/// http/https 地址的值会记录警告后跳过。
pub fn load_urls(settings: &InputSettings) -> Result<Vec<String>, SourceError> {
    let path = Path::new(&settings.path);
    let file = std::fs::File::open(path).map_err(|source| SourceError::Io {
        path: settings.path.clone(),
        source,
    })?;
    let urls = read_urls(file, &settings.url_column, settings.deduplicate)?;
    info!("Loaded {} URLs from {}", urls.len(), settings.path);
    Ok(urls)
}

/// 从任意读取器解析 URL 列
pub fn read_urls<R: io::Read>(
    reader: R,
    column: &str,
    deduplicate: bool,
) -> Result<Vec<String>, SourceError> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = rdr.headers()?.clone();
    let index = headers
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| SourceError::MissingColumn {
            column: column.to_string(),
            available: headers.iter().collect::<Vec<_>>().join(", "),
        })?;

    let mut urls = Vec::new();
    let mut seen = HashSet::new();
    let mut duplicates = 0usize;

    for (line, result) in rdr.records().enumerate() {
        let record = result?;
        let value = record.get(index).unwrap_or("").trim();
        if value.is_empty() {
            continue;
        }

        match Url::parse(value) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            _ => {
                warn!("Skipping row {}: '{}' is not an http(s) URL", line + 2, value);
                continue;
            }
        }

        if deduplicate && !seen.insert(value.to_string()) {
            duplicates += 1;
            continue;
        }
        urls.push(value.to_string());
    }

    if duplicates > 0 {
        info!("Dropped {} duplicate URLs", duplicates);
    }

    Ok(urls)
}
