use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

use crate::error::Result;
use crate::model::BuildingFeature;

pub const GEOJSON_EXTENSION: &str = "geojson";
pub const GEOJSON_MIME_TYPE: &str = "application/geo+json";

/// `{"type": "FeatureCollection", "features": [...]}` としてシリアライズする
pub struct FeatureCollectionRef<'a>(pub &'a [BuildingFeature]);

impl Serialize for FeatureCollectionRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FeatureCollection", 2)?;
        state.serialize_field("type", "FeatureCollection")?;
        state.serialize_field("features", self.0)?;
        state.end()
    }
}

/// 書き込まれたバイト数だけを数える
#[derive(Default)]
struct ByteCounter(u64);

impl Write for ByteCounter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0 += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// GeoJSON出力
///
/// 非ASCII文字（建物種別の日本語など）はエスケープせずUTF-8のまま書き出す。
#[derive(Debug, Clone, Copy)]
pub struct GeoJsonWriter {
    pretty: bool,
}

impl Default for GeoJsonWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl GeoJsonWriter {
    /// インデント付きで出力するライター
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }

    pub fn with_pretty(pretty: bool) -> Self {
        Self { pretty }
    }

    pub fn is_pretty(&self) -> bool {
        self.pretty
    }

    pub fn write<W: Write>(&self, features: &[BuildingFeature], writer: W) -> Result<()> {
        let collection = FeatureCollectionRef(features);
        if self.pretty {
            serde_json::to_writer_pretty(writer, &collection)?;
        } else {
            serde_json::to_writer(writer, &collection)?;
        }
        Ok(())
    }

    pub fn write_file(&self, features: &[BuildingFeature], output_path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(output_path)?);
        self.write(features, &mut writer)?;
        writer.flush()?;
        tracing::info!(
            "Written GeoJSON: {:?} ({} features)",
            output_path,
            features.len()
        );
        Ok(())
    }

    pub fn to_string(&self, features: &[BuildingFeature]) -> Result<String> {
        let mut buf = Vec::new();
        self.write(features, &mut buf)?;
        // serde_jsonの出力は常にUTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// 出力した場合のバイト数（文字列を保持せずに計算する）
    pub fn serialized_size(&self, features: &[BuildingFeature]) -> Result<u64> {
        let mut counter = ByteCounter::default();
        self.write(features, &mut counter)?;
        Ok(counter.0)
    }
}

/// 入力ファイル名から出力ファイル名を決める
///
/// 入力が1つなら `<stem>_buildings.geojson`、複数なら先頭の入力を使って
/// `<stem>_merged_buildings.geojson` とする。
pub fn output_file_name<S: AsRef<str>>(input_names: &[S]) -> Option<String> {
    let first = input_names.first()?;
    let stem = Path::new(first.as_ref())
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("buildings");

    let suffix = if input_names.len() == 1 {
        "buildings"
    } else {
        "merged_buildings"
    };
    Some(format!("{}_{}.{}", stem, suffix, GEOJSON_EXTENSION))
}
