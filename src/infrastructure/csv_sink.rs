// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::info;

use crate::domain::models::scraped_record::{ScrapedRecord, CSV_HEADER};

/// 输出文件写入错误
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("CSV encoding error: {0}")]
    Csv(#[from] csv::Error),
}

/// CSV 记录写入器
///
/// 输出文件是整个运行过程中唯一共享的可变资源。
/// 每次追加都在互斥锁内完成“打开、写入、刷新、关闭”，
/// 锁释放之前该行已经完整落盘。
#[derive(Debug)]
pub struct CsvSink {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CsvSink {
    /// 初始化输出文件
    ///
    /// 文件不存在时创建并写入表头；已存在的文件保持原样（不做迁移）。
    /// 在任何工作器启动之前调用。
    pub async fn init(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let path = path.as_ref().to_path_buf();

        let exists = tokio::fs::try_exists(&path)
            .await
            .map_err(|e| io_error(&path, e))?;
        if !exists {
            let header = encode_header()?;
            tokio::fs::write(&path, header)
                .await
                .map_err(|e| io_error(&path, e))?;
            info!("Created output file {} with header", path.display());
        } else {
            info!("Appending to existing output file {}", path.display());
        }

        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    /// 追加一条记录
    ///
    /// 只打开已存在的文件；文件在运行中被删除时返回 I/O 错误，
    /// 不会重新创建一个缺少表头的文件。
    pub async fn append(&self, record: &ScrapedRecord) -> Result<(), SinkError> {
        // Encode outside the critical section
        let row = encode_row(record)?;

        let _guard = self.lock.lock().await;
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| io_error(&self.path, e))?;
        file.write_all(&row)
            .await
            .map_err(|e| io_error(&self.path, e))?;
        file.flush().await.map_err(|e| io_error(&self.path, e))?;
        Ok(())
    }
}

fn encode_header() -> Result<Vec<u8>, SinkError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    finish(writer)
}

fn encode_row(record: &ScrapedRecord) -> Result<Vec<u8>, SinkError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.serialize(record)?;
    finish(writer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>, SinkError> {
    writer
        .into_inner()
        .map_err(|e| SinkError::Csv(csv::Error::from(e.into_error())))
}

fn io_error(path: &Path, source: io::Error) -> SinkError {
    SinkError::Io {
        path: path.display().to_string(),
        source,
    }
}
