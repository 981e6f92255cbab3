use std::io::{Cursor, Read, Seek};

use tracing::{debug, info, warn};
use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::{Error, Result, Warning};
use crate::model::{BuildingFeature, RawArchive};
use crate::parser::parse_building_xml;
use crate::progress::{CancelFlag, ProgressEvent, ProgressSink};

/// 建築物レイヤーのファイル名に含まれる識別子
pub const BUILDING_LAYER_MARKER: &str = "-BldA-";
pub const ZIP_EXTENSION: &str = ".zip";
pub const XML_EXTENSION: &str = ".xml";

/// エントリ読み込み時に事前確保するバッファの上限（ヘッダーの宣言サイズは信用しない）
const MAX_PREALLOCATION: u64 = 1 << 20;

/// 入れ子のZIPとして扱うエントリか
pub fn is_sub_archive(name: &str) -> bool {
    name.ends_with(ZIP_EXTENSION)
}

/// 建築物XMLとして扱うエントリか
pub fn is_building_xml(name: &str) -> bool {
    name.ends_with(XML_EXTENSION) && name.contains(BUILDING_LAYER_MARKER)
}

/// 最上位ZIPの構成
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    /// 地域ごとのサブZIPを含むZIP
    Nested { sub_archives: usize },
    /// 建築物XMLを直接含むZIP
    Flat { documents: usize },
    /// 建築物データを含まないZIP
    NoBuildingData,
    /// ZIPとして読めなかった入力
    Unreadable,
}

/// 1つの最上位ZIPから得られた結果
#[derive(Debug)]
pub struct ArchiveOutput {
    pub kind: ArchiveKind,
    pub features: Vec<BuildingFeature>,
    pub warnings: Vec<Warning>,
}

/// 基盤地図情報ZIPから建物ポリゴンを取り出す
pub struct ZipHandler<'a> {
    archive: &'a RawArchive,
    max_sub_archives: Option<usize>,
}

impl<'a> ZipHandler<'a> {
    pub fn new(archive: &'a RawArchive) -> Self {
        Self {
            archive,
            max_sub_archives: None,
        }
    }

    /// 処理するサブZIPの数を先頭からN個に制限する
    pub fn with_max_sub_archives(mut self, limit: Option<usize>) -> Self {
        self.max_sub_archives = limit;
        self
    }

    /// ZIP内のすべての建築物XMLを処理し、出現順にフィーチャーを返す
    ///
    /// ZIPとして読めない場合のみエラーを返す。サブZIPや文書単位の
    /// 失敗は警告として記録し、残りの処理を続ける。
    pub fn extract_buildings(
        &self,
        progress: &dyn ProgressSink,
        cancel: &CancelFlag,
    ) -> Result<ArchiveOutput> {
        let name = self.archive.name.as_str();
        info!("Processing ZIP file: {}", name);

        let mut zip = ZipArchive::new(Cursor::new(self.archive.bytes.as_slice())).map_err(
            |source| Error::UnreadableArchive {
                name: name.to_string(),
                source,
            },
        )?;

        let entries = entry_names(&zip);
        let sub_archives: Vec<_> = entries
            .iter()
            .filter(|(_, entry)| is_sub_archive(entry))
            .take(self.max_sub_archives.unwrap_or(usize::MAX))
            .collect();

        let mut walk = Walk {
            archive: name,
            progress,
            features: Vec::new(),
            warnings: Vec::new(),
        };

        let kind = if !sub_archives.is_empty() {
            info!("Found {} sub-archives in {}", sub_archives.len(), name);
            for (index, sub_name) in &sub_archives {
                if cancel.is_cancelled() {
                    return Err(Error::Cancelled);
                }
                walk.sub_archive(&mut zip, *index, sub_name, cancel)?;
            }
            ArchiveKind::Nested {
                sub_archives: sub_archives.len(),
            }
        } else {
            let documents: Vec<_> = entries
                .iter()
                .filter(|(_, entry)| is_building_xml(entry))
                .collect();

            if documents.is_empty() {
                walk.warn(
                    name.to_string(),
                    Error::NoBuildingData {
                        name: name.to_string(),
                    },
                );
                ArchiveKind::NoBuildingData
            } else {
                info!("Found {} building documents in {}", documents.len(), name);
                for (index, doc_name) in &documents {
                    if cancel.is_cancelled() {
                        return Err(Error::Cancelled);
                    }
                    let location = format!("{}/{}", name, doc_name);
                    let features = walk.document(&mut zip, *index, &location);
                    progress.on_event(&ProgressEvent::DocumentFinished {
                        archive: name,
                        document: doc_name,
                        features,
                    });
                }
                ArchiveKind::Flat {
                    documents: documents.len(),
                }
            }
        };

        info!(
            "Extracted {} buildings from {} ({} warnings)",
            walk.features.len(),
            name,
            walk.warnings.len()
        );

        Ok(ArchiveOutput {
            kind,
            features: walk.features,
            warnings: walk.warnings,
        })
    }
}

/// セントラルディレクトリ順のエントリ一覧
fn entry_names<R: Read + Seek>(zip: &ZipArchive<R>) -> Vec<(usize, String)> {
    (0..zip.len())
        .filter_map(|index| {
            zip.name_for_index(index)
                .map(|name| (index, name.to_string()))
        })
        .collect()
}

fn read_entry<R: Read + Seek>(
    zip: &mut ZipArchive<R>,
    index: usize,
    name: &str,
) -> Result<Vec<u8>> {
    let entry_error = |source| Error::EntryRead {
        name: name.to_string(),
        source,
    };

    let mut file = zip.by_index(index).map_err(entry_error)?;
    let mut bytes = Vec::with_capacity(file.size().min(MAX_PREALLOCATION) as usize);
    file.read_to_end(&mut bytes)
        .map_err(|e| entry_error(ZipError::Io(e)))?;
    Ok(bytes)
}

struct Walk<'a> {
    archive: &'a str,
    progress: &'a dyn ProgressSink,
    features: Vec<BuildingFeature>,
    warnings: Vec<Warning>,
}

impl Walk<'_> {
    fn warn(&mut self, location: String, error: Error) {
        warn!("{}: {}", location, error);
        self.progress.on_event(&ProgressEvent::Warning {
            location: &location,
            message: error.to_string(),
        });
        self.warnings.push(Warning::new(location, error));
    }

    fn sub_archive<R: Read + Seek>(
        &mut self,
        zip: &mut ZipArchive<R>,
        index: usize,
        sub_name: &str,
        cancel: &CancelFlag,
    ) -> Result<()> {
        let location = format!("{}/{}", self.archive, sub_name);
        debug!("Processing sub-archive: {}", location);

        let bytes = match read_entry(zip, index, sub_name) {
            Ok(bytes) => bytes,
            Err(err) => {
                self.warn(location, err);
                return Ok(());
            }
        };
        let mut sub_zip = match ZipArchive::new(Cursor::new(bytes)) {
            Ok(sub_zip) => sub_zip,
            Err(source) => {
                self.warn(
                    location,
                    Error::UnreadableSubArchive {
                        name: sub_name.to_string(),
                        source,
                    },
                );
                return Ok(());
            }
        };

        let documents: Vec<_> = entry_names(&sub_zip)
            .into_iter()
            .filter(|(_, entry)| is_building_xml(entry))
            .collect();

        let mut features = 0;
        for (doc_index, doc_name) in &documents {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            let doc_location = format!("{}/{}", location, doc_name);
            let count = self.document(&mut sub_zip, *doc_index, &doc_location);
            self.progress.on_event(&ProgressEvent::DocumentFinished {
                archive: self.archive,
                document: doc_name,
                features: count,
            });
            features += count;
        }

        self.progress.on_event(&ProgressEvent::SubArchiveFinished {
            archive: self.archive,
            sub_archive: sub_name,
            features,
        });
        Ok(())
    }

    /// 1文書を処理し、追加したフィーチャー数を返す
    fn document<R: Read + Seek>(
        &mut self,
        zip: &mut ZipArchive<R>,
        index: usize,
        location: &str,
    ) -> usize {
        let parsed = read_entry(zip, index, location).and_then(|bytes| {
            let xml = String::from_utf8(bytes).map_err(|source| Error::Encoding {
                name: location.to_string(),
                source,
            })?;
            parse_building_xml(&xml)
        });

        let parsed = match parsed {
            Ok(parsed) => parsed,
            Err(err) => {
                self.warn(location.to_string(), err);
                return 0;
            }
        };

        for err in parsed.rejected {
            self.warn(location.to_string(), err);
        }

        let count = parsed.features.len();
        debug!("Converted {} buildings from {}", count, location);
        let archive = self.archive;
        self.features.extend(parsed.features.into_iter().map(|mut feature| {
            feature.attributes.source_file = Some(archive.to_string());
            feature
        }));
        count
    }
}
