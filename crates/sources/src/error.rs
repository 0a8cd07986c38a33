//! Source 错误类型

use contracts::SourceId;
use thiserror::Error;

/// Source 错误
#[derive(Debug, Error)]
pub enum SourceError {
    /// 线程创建失败
    #[error("failed to spawn task for source {source_id}: {message}")]
    SpawnFailed {
        /// 数据源 ID
        source_id: SourceId,
        /// 错误消息
        message: String,
    },

    /// 任务线程 panic
    #[error("task for source {source_id} panicked")]
    TaskPanicked {
        /// 数据源 ID
        source_id: SourceId,
    },
}

/// Source Result 类型别名
pub type Result<T> = std::result::Result<T, SourceError>;
