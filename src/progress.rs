use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 変換処理の進捗通知
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent<'a> {
    ArchiveStarted {
        archive: &'a str,
        index: usize,
        total: usize,
    },
    SubArchiveFinished {
        archive: &'a str,
        sub_archive: &'a str,
        features: usize,
    },
    DocumentFinished {
        archive: &'a str,
        document: &'a str,
        features: usize,
    },
    /// 処理を継続できたエラー
    Warning { location: &'a str, message: String },
    ArchiveFinished { archive: &'a str, features: usize },
}

/// 進捗の受け取り先
///
/// 入力ごとに並列処理される場合があるため `Send + Sync` を要求する。
pub trait ProgressSink: Send + Sync {
    fn on_event(&self, event: &ProgressEvent<'_>);
}

impl<F> ProgressSink for F
where
    F: Fn(&ProgressEvent<'_>) + Send + Sync,
{
    fn on_event(&self, event: &ProgressEvent<'_>) {
        self(event)
    }
}

/// 何もしない進捗通知
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_event(&self, _event: &ProgressEvent<'_>) {}
}

/// 中断要求フラグ
///
/// 最上位ZIPの処理前と、各サブZIP・各エントリの処理前に確認される。
#[derive(Debug, Default, Clone)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
