//! 複数の最上位ZIPの結果を1つのFeatureCollectionにまとめる

use rayon::prelude::*;
use serde::{Serialize, Serializer};
use tracing::{info, warn};

use crate::error::{Error, Result, Warning};
use crate::model::{BuildingFeature, RawArchive};
use crate::progress::{CancelFlag, ProgressEvent, ProgressSink};
use crate::writer::{output_file_name, FeatureCollectionRef, GeoJsonWriter};
use crate::zip_handler::{ArchiveKind, ArchiveOutput, ZipHandler};

/// 変換の設定
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// 最上位ZIPごとに並列処理する（結果は入力順に結合される）
    pub parallel: bool,
    /// 各ZIPで処理するサブZIPの最大数
    pub max_sub_archives: Option<usize>,
    /// インデント付きで出力する
    pub pretty: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            max_sub_archives: None,
            pretty: true,
        }
    }
}

/// 発見順に並んだ建物フィーチャーの集まり
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildingCollection {
    features: Vec<BuildingFeature>,
}

impl BuildingCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// 末尾に追加する（並べ替えや重複除去はしない）
    pub fn extend(&mut self, features: impl IntoIterator<Item = BuildingFeature>) {
        self.features.extend(features);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn features(&self) -> &[BuildingFeature] {
        &self.features
    }

    pub fn into_features(self) -> Vec<BuildingFeature> {
        self.features
    }

    /// 先頭N件だけのコレクション
    pub fn preview(&self, n: usize) -> BuildingCollection {
        BuildingCollection {
            features: self.features.iter().take(n).cloned().collect(),
        }
    }

    pub fn serialized_size(&self, writer: &GeoJsonWriter) -> Result<u64> {
        writer.serialized_size(&self.features)
    }
}

impl From<Vec<BuildingFeature>> for BuildingCollection {
    fn from(features: Vec<BuildingFeature>) -> Self {
        Self { features }
    }
}

impl Serialize for BuildingCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        FeatureCollectionRef(&self.features).serialize(serializer)
    }
}

/// 入力1件ごとの処理結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveReport {
    pub name: String,
    pub kind: ArchiveKind,
    pub features: usize,
    pub warnings: usize,
}

/// 処理結果の集計（UI/CLI向け）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub inputs: usize,
    pub features: usize,
    pub size_bytes: u64,
}

impl BatchSummary {
    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / 1024.0 / 1024.0
    }
}

#[derive(Debug)]
pub struct BatchReport {
    pub collection: BuildingCollection,
    pub summary: BatchSummary,
    pub archives: Vec<ArchiveReport>,
    pub warnings: Vec<Warning>,
}

impl BatchReport {
    /// 全入力を通して建物が1件もなかった
    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    /// 入力名から決めた出力ファイル名
    pub fn output_file_name(&self) -> Option<String> {
        let names: Vec<&str> = self.archives.iter().map(|a| a.name.as_str()).collect();
        output_file_name(&names)
    }
}

/// 複数の基盤地図情報ZIPを1つのGeoJSONにまとめる
#[derive(Debug, Clone, Default)]
pub struct BatchConverter {
    options: ConvertOptions,
}

impl BatchConverter {
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    pub fn writer(&self) -> GeoJsonWriter {
        GeoJsonWriter::with_pretty(self.options.pretty)
    }

    /// 入力順に処理し、結果を入力順のまま結合する
    ///
    /// 読めない入力は警告として記録し、他の入力の処理を続ける。
    /// 中断された場合のみエラーを返す。
    pub fn convert(
        &self,
        inputs: &[RawArchive],
        progress: &dyn ProgressSink,
        cancel: &CancelFlag,
    ) -> Result<BatchReport> {
        let total = inputs.len();
        info!("Converting {} archives", total);

        let outputs: Vec<ArchiveOutput> = if self.options.parallel {
            inputs
                .par_iter()
                .enumerate()
                .map(|(index, archive)| self.process(index, total, archive, progress, cancel))
                .collect::<Result<Vec<_>>>()?
        } else {
            inputs
                .iter()
                .enumerate()
                .map(|(index, archive)| self.process(index, total, archive, progress, cancel))
                .collect::<Result<Vec<_>>>()?
        };

        let mut collection = BuildingCollection::new();
        let mut archives = Vec::with_capacity(total);
        let mut warnings = Vec::new();

        for (archive, output) in inputs.iter().zip(outputs) {
            archives.push(ArchiveReport {
                name: archive.name.clone(),
                kind: output.kind,
                features: output.features.len(),
                warnings: output.warnings.len(),
            });
            collection.extend(output.features);
            warnings.extend(output.warnings);
        }

        let summary = BatchSummary {
            inputs: total,
            features: collection.len(),
            size_bytes: collection.serialized_size(&self.writer())?,
        };

        if collection.is_empty() {
            warn!("No building data found in {} archives", total);
        } else {
            info!(
                "Converted {} buildings from {} archives ({:.2} MB)",
                summary.features,
                summary.inputs,
                summary.size_mb()
            );
        }

        Ok(BatchReport {
            collection,
            summary,
            archives,
            warnings,
        })
    }

    fn process(
        &self,
        index: usize,
        total: usize,
        archive: &RawArchive,
        progress: &dyn ProgressSink,
        cancel: &CancelFlag,
    ) -> Result<ArchiveOutput> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        progress.on_event(&ProgressEvent::ArchiveStarted {
            archive: &archive.name,
            index,
            total,
        });

        let output = match ZipHandler::new(archive)
            .with_max_sub_archives(self.options.max_sub_archives)
            .extract_buildings(progress, cancel)
        {
            Ok(output) => output,
            Err(err) if err.is_fatal_for_batch() => return Err(err),
            Err(err) => {
                warn!("{}: {}", archive.name, err);
                progress.on_event(&ProgressEvent::Warning {
                    location: &archive.name,
                    message: err.to_string(),
                });
                ArchiveOutput {
                    kind: ArchiveKind::Unreadable,
                    features: Vec::new(),
                    warnings: vec![Warning::new(archive.name.clone(), err)],
                }
            }
        };

        progress.on_event(&ProgressEvent::ArchiveFinished {
            archive: &archive.name,
            features: output.features.len(),
        });
        Ok(output)
    }
}
