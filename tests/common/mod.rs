#![allow(dead_code)]

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// テスト用の建物要素
pub struct Building {
    pub gml_id: String,
    pub fid: String,
    pub pos_list: String,
}

impl Building {
    /// `points` 個の頂点を持つ建物（頂点は `seed` ごとにずらす）
    pub fn with_points(seed: usize, points: usize) -> Self {
        let pos_list = (0..points)
            .map(|i| {
                let lat = 35.0 + seed as f64 * 0.001 + i as f64 * 0.0001;
                let lon = 139.0 + seed as f64 * 0.001 + (i % 2) as f64 * 0.0001;
                format!("{} {}", lat, lon)
            })
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            gml_id: format!("K{}", seed),
            fid: format!("fgoid:10-00200-11-{}", seed),
            pos_list,
        }
    }

    fn to_xml(&self) -> String {
        format!(
            r#"<BldA gml:id="{id}">
<fid>{fid}</fid>
<lfSpanFr gml:id="{id}-1"><gml:timePosition>2008-09-19</gml:timePosition></lfSpanFr>
<devDate gml:id="{id}-2"><gml:timePosition>2008-09-19</gml:timePosition></devDate>
<orgGILvl>2500</orgGILvl>
<vis>表示</vis>
<area>
<gml:Surface gml:id="{id}-3" srsName="fguuid:jgd2011.bl">
<gml:patches>
<gml:PolygonPatch>
<gml:exterior>
<gml:Ring>
<gml:curveMember>
<gml:Curve gml:id="{id}-4">
<gml:segments>
<gml:LineStringSegment>
<gml:posList>
{pos_list}
</gml:posList>
</gml:LineStringSegment>
</gml:segments>
</gml:Curve>
</gml:curveMember>
</gml:Ring>
</gml:exterior>
</gml:PolygonPatch>
</gml:patches>
</gml:Surface>
</area>
<type>普通建物</type>
</BldA>
"#,
            id = self.gml_id,
            fid = self.fid,
            pos_list = self.pos_list
        )
    }
}

/// 基盤地図情報形式の建築物XML
pub fn dataset_xml(buildings: &[Building]) -> Vec<u8> {
    let body: String = buildings.iter().map(Building::to_xml).collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Dataset xsi:schemaLocation="http://fgd.gsi.go.jp/spec/2008/FGD_GMLSchema FGD_GMLSchema.xsd"
 xmlns:gml="http://www.opengis.net/gml/3.2"
 xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
 xmlns:xlink="http://www.w3.org/1999/xlink"
 xmlns="http://fgd.gsi.go.jp/spec/2008/FGD_GMLSchema"
 gml:id="Dataset1">
<description>基盤地図情報ダウンロードデータ（GML版）</description>
{}</Dataset>
"#,
        body
    )
    .into_bytes()
}

/// `count` 件の有効な建物（各4頂点）を含むXML
pub fn dataset_with(seed: usize, count: usize) -> Vec<u8> {
    let buildings: Vec<_> = (0..count)
        .map(|i| Building::with_points(seed + i, 4))
        .collect();
    dataset_xml(&buildings)
}

pub fn zip_bytes(entries: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// メッシュ番号に対応する建築物XMLのファイル名
pub fn building_xml_name(mesh: &str, part: usize) -> String {
    format!("FG-GML-{}-BldA-20240101-{:04}.xml", mesh, part)
}

/// 配布形式どおり、メッシュごとのサブZIPを含むZIP
pub fn nested_archive(tiles: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let subs: Vec<(String, Vec<u8>)> = tiles
        .iter()
        .map(|(mesh, xml)| {
            let sub = zip_bytes(&[(building_xml_name(mesh, 1).as_str(), xml.clone())]);
            (format!("FG-GML-{}-ALL-20240101.zip", mesh), sub)
        })
        .collect();
    let entries: Vec<(&str, Vec<u8>)> = subs
        .iter()
        .map(|(name, data)| (name.as_str(), data.clone()))
        .collect();
    zip_bytes(&entries)
}
