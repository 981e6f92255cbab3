pub mod collection;
pub mod error;
pub mod model;
pub mod parser;
pub mod progress;
pub mod writer;
pub mod zip_handler;

pub use collection::{
    BatchConverter, BatchReport, BatchSummary, BuildingCollection, ConvertOptions,
};
pub use error::{CoordinateIssue, Error, Result, Warning};
pub use model::{BuildingAttributes, BuildingFeature, Position, RawArchive};
pub use progress::{CancelFlag, NoProgress, ProgressEvent, ProgressSink};
pub use writer::GeoJsonWriter;
pub use zip_handler::{ArchiveKind, ZipHandler};

/// 既定の設定で複数のZIPを変換する
pub fn convert(inputs: &[RawArchive]) -> Result<BatchReport> {
    BatchConverter::default().convert(inputs, &NoProgress, &CancelFlag::new())
}
