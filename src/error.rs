use std::fmt;
use std::num::ParseFloatError;

use thiserror::Error;

/// 建物抽出処理のエラー
#[derive(Debug, Error)]
pub enum Error {
    /// 入力ZIPのセントラルディレクトリが読めない（入力単位で致命的）
    #[error("Unreadable archive '{name}': {source}")]
    UnreadableArchive {
        name: String,
        #[source]
        source: zip::result::ZipError,
    },

    /// 入れ子ZIPが読めない（サブZIP単位で致命的）
    #[error("Unreadable sub-archive '{name}': {source}")]
    UnreadableSubArchive {
        name: String,
        #[source]
        source: zip::result::ZipError,
    },

    /// ZIPエントリの展開に失敗
    #[error("Failed to read archive entry '{name}': {source}")]
    EntryRead {
        name: String,
        #[source]
        source: zip::result::ZipError,
    },

    /// サブZIPも建築物XMLも含まないZIP（エラーではなく警告として扱う）
    #[error("No building data (-BldA-) found in '{name}'")]
    NoBuildingData { name: String },

    #[error("Document '{name}' is not valid UTF-8: {source}")]
    Encoding {
        name: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// XMLの構文エラー（文書単位で致命的）
    #[error("Malformed XML at byte {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    /// ルート要素がない、または閉じられていない要素が残ったまま終端に達した
    #[error("Incomplete XML document: {0}")]
    IncompleteDocument(IncompleteReason),

    /// ルート要素の外側に要素や文字列がある
    #[error("Unexpected content outside the root element at position {position}")]
    ContentOutsideRoot { position: u64 },

    /// 有限の数値として解釈できない座標トークン（ジオメトリ単位で致命的）
    #[error("Invalid coordinate token '{token}': {source}")]
    InvalidCoordinate {
        token: String,
        #[source]
        source: CoordinateIssue,
    },

    #[error("Failed to serialize GeoJSON: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Conversion cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncompleteReason {
    NoRootElement,
    UnclosedElements(usize),
}

impl fmt::Display for IncompleteReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRootElement => write!(f, "no root element found"),
            Self::UnclosedElements(n) => write!(f, "{} element(s) left unclosed", n),
        }
    }
}

/// 座標トークンを採用できない理由
#[derive(Debug, Error)]
pub enum CoordinateIssue {
    #[error(transparent)]
    NotANumber(#[from] ParseFloatError),
    /// `NaN` や `inf` はGeoJSONで表現できない
    #[error("coordinate is not a finite number")]
    NonFinite,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// 入力全体の処理を中断すべきエラーかどうか
    pub fn is_fatal_for_batch(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// 処理を継続できたエラーの記録
///
/// `location` は `archive/sub-archive/document` 形式のパス。
#[derive(Debug)]
pub struct Warning {
    pub location: String,
    pub error: Error,
}

impl Warning {
    pub fn new(location: impl Into<String>, error: Error) -> Self {
        Self {
            location: location.into(),
            error,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.error)
    }
}
