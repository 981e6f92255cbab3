use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

/// GeoJSONの座標順 `[経度, 緯度]`
pub type Position = [f64; 2];

/// 許可リスト属性の値
///
/// 外側の `None` は子要素が存在しないこと、`Some(None)` は子要素はあるが
/// テキストを持たないことを表す（後者は `null` として出力される）。
pub type AttributeValue = Option<Option<String>>;

/// 変換対象として受け取ったZIPファイル
#[derive(Debug, Clone)]
pub struct RawArchive {
    /// 表示名（通常はアップロード/入力ファイル名）
    pub name: String,
    pub bytes: Vec<u8>,
}

impl RawArchive {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// 建物フィーチャーの属性
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BuildingAttributes {
    /// 由来する最上位ZIPの表示名
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fid: AttributeValue,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub feature_type: AttributeValue,

    #[serde(rename = "orgGILvl", skip_serializing_if = "Option::is_none")]
    pub org_gi_lvl: AttributeValue,

    /// `gml:id` 属性
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gml_id: Option<String>,
}

/// 保持対象とする子要素（ID・種別・精度区分）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKey {
    Fid,
    Type,
    OrgGiLvl,
}

impl AttributeKey {
    /// 子要素のローカル名から対応するキーを返す
    pub fn from_local_name(local_name: &[u8]) -> Option<Self> {
        match local_name {
            b"fid" => Some(Self::Fid),
            b"type" => Some(Self::Type),
            b"orgGILvl" => Some(Self::OrgGiLvl),
            _ => None,
        }
    }
}

impl BuildingAttributes {
    pub fn slot_mut(&mut self, key: AttributeKey) -> &mut AttributeValue {
        match key {
            AttributeKey::Fid => &mut self.fid,
            AttributeKey::Type => &mut self.feature_type,
            AttributeKey::OrgGiLvl => &mut self.org_gi_lvl,
        }
    }
}

/// 建物ポリゴン1件
///
/// 外周リングのみを持ち、閉合は強制しない。
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingFeature {
    pub ring: Vec<Position>,
    pub attributes: BuildingAttributes,
}

impl BuildingFeature {
    /// ポリゴンとして扱うための最小頂点数
    pub const MIN_POSITIONS: usize = 3;

    /// 頂点数が足りない場合は `None`
    pub fn new(ring: Vec<Position>, attributes: BuildingAttributes) -> Option<Self> {
        if ring.len() < Self::MIN_POSITIONS {
            return None;
        }
        Some(Self { ring, attributes })
    }
}

struct PolygonGeometry<'a>(&'a [Position]);

impl Serialize for PolygonGeometry<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Geometry", 2)?;
        state.serialize_field("type", "Polygon")?;
        state.serialize_field("coordinates", &[self.0])?;
        state.end()
    }
}

impl Serialize for BuildingFeature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Feature", 3)?;
        state.serialize_field("type", "Feature")?;
        state.serialize_field("geometry", &PolygonGeometry(&self.ring))?;
        state.serialize_field("properties", &self.attributes)?;
        state.end()
    }
}
