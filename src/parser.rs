//! 基盤地図情報 建築物（BldA）XMLのパーサー
//!
//! 文書全体を名前空間付きで走査し、`fgd:BldA` 要素ごとに最初の
//! `gml:posList` と許可リストの直下子要素を取り出す。

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use tracing::{debug, warn};

use crate::error::{CoordinateIssue, Error, IncompleteReason, Result};
use crate::model::{AttributeKey, BuildingAttributes, BuildingFeature, Position};

/// 基盤地図情報のアプリケーションスキーマ名前空間
pub const FGD_NAMESPACE: &[u8] = b"http://fgd.gsi.go.jp/spec/2008/FGD_GMLSchema";
pub const GML_NAMESPACE: &[u8] = b"http://www.opengis.net/gml/3.2";

/// 建築物の外周線（建物ポリゴン）
pub const BUILDING_ELEMENT: &[u8] = b"BldA";
pub const POS_LIST_ELEMENT: &[u8] = b"posList";
const GML_ID_ATTRIBUTE: &[u8] = b"id";

const PROGRESS_INTERVAL: usize = 1000;

/// 1文書分の解析結果
#[derive(Debug, Default)]
pub struct ParsedDocument {
    pub features: Vec<BuildingFeature>,
    /// 見つかった建物要素の数（出力されなかったものを含む）
    pub buildings_found: usize,
    /// 座標を解釈できず除外した建物要素のエラー
    pub rejected: Vec<Error>,
}

/// 空白区切りの座標列をGeoJSON順の座標に変換する
///
/// 入力は「緯度 経度」の繰り返し。出力は `[経度, 緯度]`。
/// 対にならない末尾のトークンは捨てる。
pub fn parse_pos_list(text: &str) -> Result<Vec<Position>> {
    let tokens: Vec<&str> = text.split_whitespace().collect();

    tokens
        .chunks_exact(2)
        .map(|pair| {
            let lat = parse_coordinate(pair[0])?;
            let lon = parse_coordinate(pair[1])?;
            Ok([lon, lat])
        })
        .collect()
}

fn parse_coordinate(token: &str) -> Result<f64> {
    let invalid = |source| Error::InvalidCoordinate {
        token: token.to_string(),
        source,
    };

    let value = token
        .parse::<f64>()
        .map_err(|err| invalid(CoordinateIssue::NotANumber(err)))?;
    if !value.is_finite() {
        return Err(invalid(CoordinateIssue::NonFinite));
    }
    Ok(value)
}

enum PosListState {
    Searching,
    Capturing { depth: usize, text: String },
    /// 最初の `gml:posList` のテキスト（空なら `None`）
    Found(Option<String>),
}

struct ChildCapture {
    depth: usize,
    key: AttributeKey,
    text: String,
    /// 子要素の中に要素が現れた（以降の文字列は値に含めない）
    sealed: bool,
}

struct BuildingState {
    depth: usize,
    attributes: BuildingAttributes,
    child: Option<ChildCapture>,
    pos_list: PosListState,
}

impl BuildingState {
    fn push_text(&mut self, depth: usize, text: &str) {
        if let Some(child) = self.child.as_mut() {
            if child.depth == depth && !child.sealed {
                child.text.push_str(text);
            }
        }
        if let PosListState::Capturing {
            depth: pos_depth,
            text: buf,
        } = &mut self.pos_list
        {
            if *pos_depth == depth {
                buf.push_str(text);
            }
        }
    }

    fn close(&mut self, depth: usize) {
        if self.child.as_ref().is_some_and(|c| c.depth == depth) {
            if let Some(child) = self.child.take() {
                *self.attributes.slot_mut(child.key) = Some(non_empty(child.text));
            }
        }
        if matches!(self.pos_list, PosListState::Capturing { depth: d, .. } if d == depth) {
            if let PosListState::Capturing { text, .. } =
                std::mem::replace(&mut self.pos_list, PosListState::Searching)
            {
                self.pos_list = PosListState::Found(non_empty(text));
            }
        }
    }
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn is_bound_to(resolved: &ResolveResult, target: &[u8]) -> bool {
    matches!(resolved, ResolveResult::Bound(Namespace(uri)) if *uri == target)
}

struct DocumentParser<'i> {
    reader: NsReader<&'i [u8]>,
    depth: usize,
    seen_root: bool,
    root_closed: bool,
    current: Option<BuildingState>,
    parsed: ParsedDocument,
}

impl<'i> DocumentParser<'i> {
    fn new(xml: &'i str) -> Self {
        let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
        Self {
            reader: NsReader::from_str(xml),
            depth: 0,
            seen_root: false,
            root_closed: false,
            current: None,
            parsed: ParsedDocument::default(),
        }
    }

    fn xml_error(&self, source: quick_xml::Error) -> Error {
        Error::Xml {
            position: self.reader.error_position() as u64,
            source,
        }
    }

    fn outside_root(&self) -> Error {
        Error::ContentOutsideRoot {
            position: self.reader.buffer_position() as u64,
        }
    }

    /// ルート要素の外側に置けるのは空白のみ
    fn check_outside_text(&self, text: &str) -> Result<()> {
        if self.depth == 0 && !text.chars().all(|c| matches!(c, ' ' | '\t' | '\r' | '\n')) {
            return Err(self.outside_root());
        }
        Ok(())
    }

    fn run(mut self) -> Result<ParsedDocument> {
        loop {
            let event = match self.reader.read_event() {
                Ok(event) => event,
                Err(source) => return Err(self.xml_error(source)),
            };

            match event {
                Event::Start(e) => {
                    if self.root_closed {
                        return Err(self.outside_root());
                    }
                    self.depth += 1;
                    self.seen_root = true;
                    self.open(&e)?;
                }
                Event::Empty(e) => {
                    if self.root_closed {
                        return Err(self.outside_root());
                    }
                    self.seen_root = true;
                    self.depth += 1;
                    self.open(&e)?;
                    self.close();
                }
                Event::End(_) => self.close(),
                Event::Text(e) => {
                    let text = e.unescape().map_err(|err| self.xml_error(err.into()))?;
                    self.check_outside_text(&text)?;
                    if let Some(building) = self.current.as_mut() {
                        building.push_text(self.depth, &text);
                    }
                }
                Event::CData(e) => {
                    if self.depth == 0 {
                        return Err(self.outside_root());
                    }
                    let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                    if let Some(building) = self.current.as_mut() {
                        building.push_text(self.depth, &text);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if self.depth > 0 {
            return Err(Error::IncompleteDocument(IncompleteReason::UnclosedElements(
                self.depth,
            )));
        }
        if !self.seen_root {
            return Err(Error::IncompleteDocument(IncompleteReason::NoRootElement));
        }

        Ok(self.parsed)
    }

    fn open(&mut self, e: &BytesStart<'_>) -> Result<()> {
        let depth = self.depth;
        let (resolved, local) = self.reader.resolve_element(e.name());

        match self.current.as_mut() {
            None => {
                if is_bound_to(&resolved, FGD_NAMESPACE) && local.as_ref() == BUILDING_ELEMENT {
                    let gml_id = self.gml_id(e)?;
                    self.current = Some(BuildingState {
                        depth,
                        attributes: BuildingAttributes {
                            gml_id,
                            ..Default::default()
                        },
                        child: None,
                        pos_list: PosListState::Searching,
                    });
                }
            }
            Some(building) => {
                if let Some(child) = building.child.as_mut() {
                    if depth > child.depth {
                        child.sealed = true;
                    }
                }
                // 属性は直下の子要素のみ（名前空間は問わない）
                if depth == building.depth + 1 {
                    if let Some(key) = AttributeKey::from_local_name(local.as_ref()) {
                        building.child = Some(ChildCapture {
                            depth,
                            key,
                            text: String::new(),
                            sealed: false,
                        });
                    }
                }
                // ジオメトリは子孫全体から最初の1つだけ
                if matches!(building.pos_list, PosListState::Searching)
                    && is_bound_to(&resolved, GML_NAMESPACE)
                    && local.as_ref() == POS_LIST_ELEMENT
                {
                    building.pos_list = PosListState::Capturing {
                        depth,
                        text: String::new(),
                    };
                }
            }
        }

        Ok(())
    }

    fn gml_id(&self, e: &BytesStart<'_>) -> Result<Option<String>> {
        for attr in e.attributes() {
            let attr = attr.map_err(|err| self.xml_error(err.into()))?;
            let (resolved, local) = self.reader.resolve_attribute(attr.key);
            if is_bound_to(&resolved, GML_NAMESPACE) && local.as_ref() == GML_ID_ATTRIBUTE {
                let value = attr
                    .unescape_value()
                    .map_err(|err| self.xml_error(err.into()))?;
                return Ok(Some(value.into_owned()));
            }
        }
        Ok(None)
    }

    fn close(&mut self) {
        let depth = self.depth;
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.root_closed = true;
        }

        let Some(building) = self.current.as_mut() else {
            return;
        };
        building.close(depth);

        if building.depth == depth {
            if let Some(building) = self.current.take() {
                self.finish_building(building);
            }
        }
    }

    fn finish_building(&mut self, building: BuildingState) {
        self.parsed.buildings_found += 1;
        if self.parsed.buildings_found % PROGRESS_INTERVAL == 0 {
            debug!("Parsed {} building elements", self.parsed.buildings_found);
        }

        let text = match building.pos_list {
            PosListState::Found(Some(text)) => text,
            _ => {
                debug!(
                    "Skipping building without geometry (gml:id={:?})",
                    building.attributes.gml_id
                );
                return;
            }
        };

        match parse_pos_list(&text) {
            Ok(ring) => {
                if let Some(feature) = BuildingFeature::new(ring, building.attributes) {
                    self.parsed.features.push(feature);
                }
            }
            Err(err) => {
                warn!(
                    "Skipping building with invalid geometry (gml:id={:?}): {}",
                    building.attributes.gml_id, err
                );
                self.parsed.rejected.push(err);
            }
        }
    }
}

/// 建築物XML文書から建物フィーチャーを抽出する
///
/// XMLとして不正な文書はエラーとなり、その文書からは何も出力しない。
/// 座標が不正な建物要素は `rejected` に記録して残りの要素の処理を続ける。
pub fn parse_building_xml(xml: &str) -> Result<ParsedDocument> {
    let parsed = DocumentParser::new(xml).run()?;
    debug!(
        "Found {} building elements, {} features",
        parsed.buildings_found,
        parsed.features.len()
    );
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<Dataset xmlns="http://fgd.gsi.go.jp/spec/2008/FGD_GMLSchema"
         xmlns:gml="http://www.opengis.net/gml/3.2"
         gml:id="Dataset1">
{}
</Dataset>"#,
            body
        )
    }

    fn building(id: &str, fid: &str, pos_list: &str) -> String {
        format!(
            r#"<BldA gml:id="{id}">
  <fid>{fid}</fid>
  <lfSpanFr gml:id="{id}-1"><gml:timePosition>2020-01-01</gml:timePosition></lfSpanFr>
  <devDate gml:id="{id}-2"><gml:timePosition>2020-01-01</gml:timePosition></devDate>
  <orgGILvl>2500</orgGILvl>
  <vis>表示</vis>
  <area>
    <gml:Surface gml:id="{id}-3" srsName="JGD2011 / (B, L)">
      <gml:patches>
        <gml:PolygonPatch>
          <gml:exterior>
            <gml:Ring>
              <gml:curveMember>
                <gml:Curve gml:id="{id}-4">
                  <gml:segments>
                    <gml:LineStringSegment>
                      <gml:posList>{pos_list}</gml:posList>
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
</BldA>"#
        )
    }

    const SQUARE: &str = "35.0 139.0 35.0 139.1 35.1 139.1 35.0 139.0";

    #[test]
    fn test_parse_pos_list_swaps_axis_order() {
        let coords = parse_pos_list("35.5 139.25\n35.75 139.5").unwrap();
        assert_eq!(coords, vec![[139.25, 35.5], [139.5, 35.75]]);
    }

    #[test]
    fn test_parse_pos_list_empty_input() {
        assert!(parse_pos_list("").unwrap().is_empty());
        assert!(parse_pos_list(" \n\t ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_pos_list_drops_dangling_token() {
        let coords = parse_pos_list("1 2 3 4 5").unwrap();
        assert_eq!(coords, vec![[2.0, 1.0], [4.0, 3.0]]);

        // 対にならないトークンは数値として解釈しない
        let coords = parse_pos_list("1 2 x").unwrap();
        assert_eq!(coords, vec![[2.0, 1.0]]);
    }

    #[test]
    fn test_parse_pos_list_rejects_non_numeric() {
        let err = parse_pos_list("35.0 139.0 abc 139.1").unwrap_err();
        match err {
            Error::InvalidCoordinate { token, .. } => assert_eq!(token, "abc"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_pos_list_rejects_non_finite_values() {
        for text in ["NaN 139.0 35.0 139.1", "35.0 inf", "35.0 -infinity"] {
            match parse_pos_list(text).unwrap_err() {
                Error::InvalidCoordinate {
                    source: CoordinateIssue::NonFinite,
                    ..
                } => {}
                other => panic!("unexpected error for {:?}: {:?}", text, other),
            }
        }
    }

    #[test]
    fn test_non_finite_coordinates_skip_only_that_building() {
        let body = [
            building("K1", "a", "NaN 139.0 35.0 inf 35.1 139.1"),
            building("K2", "b", SQUARE),
        ]
        .concat();
        let parsed = parse_building_xml(&document(&body)).unwrap();

        assert_eq!(parsed.features.len(), 1);
        assert_eq!(parsed.features[0].attributes.gml_id.as_deref(), Some("K2"));
        assert_eq!(parsed.rejected.len(), 1);
    }

    #[test]
    fn test_parse_building_extracts_geometry_and_attributes() {
        let xml = document(&building("K1", "fgd-0001", SQUARE));
        let parsed = parse_building_xml(&xml).unwrap();

        assert_eq!(parsed.buildings_found, 1);
        assert_eq!(parsed.features.len(), 1);

        let feature = &parsed.features[0];
        assert_eq!(
            feature.ring,
            vec![[139.0, 35.0], [139.1, 35.0], [139.1, 35.1], [139.0, 35.0]]
        );
        assert_eq!(feature.attributes.fid, Some(Some("fgd-0001".to_string())));
        assert_eq!(
            feature.attributes.feature_type,
            Some(Some("普通建物".to_string()))
        );
        assert_eq!(feature.attributes.org_gi_lvl, Some(Some("2500".to_string())));
        assert_eq!(feature.attributes.gml_id, Some("K1".to_string()));
        assert_eq!(feature.attributes.source_file, None);
    }

    #[test]
    fn test_non_allow_listed_children_are_ignored() {
        let xml = document(&building("K1", "fgd-0001", SQUARE));
        let parsed = parse_building_xml(&xml).unwrap();

        let value = serde_json::to_value(&parsed.features[0]).unwrap();
        let properties = value["properties"].as_object().unwrap();
        let mut keys: Vec<&str> = properties.keys().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["fid", "gml_id", "orgGILvl", "type"]);
    }

    #[test]
    fn test_buildings_with_fewer_than_three_positions_are_dropped() {
        let body = [
            building("K1", "a", SQUARE),
            building("K2", "b", "35.0 139.0 35.1 139.1"),
            building("K3", "c", "35.0 139.0 35.1 139.1 35.2 139.2"),
        ]
        .concat();
        let parsed = parse_building_xml(&document(&body)).unwrap();

        assert_eq!(parsed.buildings_found, 3);
        let ids: Vec<_> = parsed
            .features
            .iter()
            .map(|f| f.attributes.gml_id.clone().unwrap())
            .collect();
        assert_eq!(ids, vec!["K1", "K3"]);
    }

    #[test]
    fn test_building_without_pos_list_is_skipped() {
        let body = r#"<BldA gml:id="K1"><fid>a</fid></BldA><BldA gml:id="K2"><area><gml:posList/></area></BldA>"#;
        let parsed = parse_building_xml(&document(body)).unwrap();

        assert_eq!(parsed.buildings_found, 2);
        assert!(parsed.features.is_empty());
        assert!(parsed.rejected.is_empty());
    }

    #[test]
    fn test_only_first_pos_list_is_used() {
        let body = r#"<BldA gml:id="K1">
  <area><gml:posList>1 2 3 4 5 6</gml:posList></area>
  <area><gml:posList>10 20 30 40 50 60 70 80</gml:posList></area>
</BldA>"#;
        let parsed = parse_building_xml(&document(body)).unwrap();

        assert_eq!(parsed.features.len(), 1);
        assert_eq!(parsed.features[0].ring, vec![[2.0, 1.0], [4.0, 3.0], [6.0, 5.0]]);
    }

    #[test]
    fn test_buildings_are_found_under_arbitrary_wrappers() {
        let body = format!(
            "<wrapper><inner>{}</inner></wrapper>{}",
            building("K1", "a", SQUARE),
            building("K2", "b", SQUARE)
        );
        let parsed = parse_building_xml(&document(&body)).unwrap();

        assert_eq!(parsed.features.len(), 2);
        assert_eq!(parsed.features[0].attributes.gml_id.as_deref(), Some("K1"));
        assert_eq!(parsed.features[1].attributes.gml_id.as_deref(), Some("K2"));
    }

    #[test]
    fn test_elements_outside_target_namespace_are_ignored() {
        let xml = format!(
            r#"<root xmlns:other="http://example.com/other" xmlns:gml="http://www.opengis.net/gml/3.2">
<other:BldA><gml:posList>{}</gml:posList></other:BldA>
<BldA><gml:posList>{}</gml:posList></BldA>
</root>"#,
            SQUARE, SQUARE
        );
        let parsed = parse_building_xml(&xml).unwrap();

        assert_eq!(parsed.buildings_found, 0);
        assert!(parsed.features.is_empty());
    }

    #[test]
    fn test_pos_list_must_be_in_gml_namespace() {
        let body = format!(
            r#"<BldA gml:id="K1"><area><posList>{}</posList></area></BldA>"#,
            SQUARE
        );
        let parsed = parse_building_xml(&document(&body)).unwrap();

        assert_eq!(parsed.buildings_found, 1);
        assert!(parsed.features.is_empty());
    }

    #[test]
    fn test_prefixed_target_namespace_is_resolved() {
        let xml = format!(
            r#"<fgd:Dataset xmlns:fgd="http://fgd.gsi.go.jp/spec/2008/FGD_GMLSchema" xmlns:g="http://www.opengis.net/gml/3.2">
<fgd:BldA g:id="P1"><fgd:fid>x</fgd:fid><g:posList>{}</g:posList></fgd:BldA>
</fgd:Dataset>"#,
            SQUARE
        );
        let parsed = parse_building_xml(&xml).unwrap();

        assert_eq!(parsed.features.len(), 1);
        let attributes = &parsed.features[0].attributes;
        assert_eq!(attributes.gml_id.as_deref(), Some("P1"));
        assert_eq!(attributes.fid, Some(Some("x".to_string())));
    }

    #[test]
    fn test_empty_attribute_child_is_kept_as_null() {
        let body = format!(
            r#"<BldA><fid/><type></type><gml:posList>{}</gml:posList></BldA>"#,
            SQUARE
        );
        let parsed = parse_building_xml(&document(&body)).unwrap();

        let attributes = &parsed.features[0].attributes;
        assert_eq!(attributes.fid, Some(None));
        assert_eq!(attributes.feature_type, Some(None));
        assert_eq!(attributes.org_gi_lvl, None);
        assert_eq!(attributes.gml_id, None);
    }

    #[test]
    fn test_nested_allow_listed_names_are_not_attributes() {
        let body = format!(
            r#"<BldA><area><type>nested</type><gml:posList>{}</gml:posList></area></BldA>"#,
            SQUARE
        );
        let parsed = parse_building_xml(&document(&body)).unwrap();

        assert_eq!(parsed.features[0].attributes.feature_type, None);
    }

    #[test]
    fn test_invalid_coordinates_skip_only_that_building() {
        let body = [
            building("K1", "a", SQUARE),
            building("K2", "b", "35.0 139.0 north 139.1 35.1 139.1"),
            building("K3", "c", SQUARE),
        ]
        .concat();
        let parsed = parse_building_xml(&document(&body)).unwrap();

        assert_eq!(parsed.features.len(), 2);
        assert_eq!(parsed.rejected.len(), 1);
        assert!(matches!(
            parsed.rejected[0],
            Error::InvalidCoordinate { .. }
        ));
    }

    #[test]
    fn test_escaped_text_is_unescaped() {
        let body = format!(
            r#"<BldA><fid>a&amp;b</fid><gml:posList>{}</gml:posList></BldA>"#,
            SQUARE
        );
        let parsed = parse_building_xml(&document(&body)).unwrap();

        assert_eq!(parsed.features[0].attributes.fid, Some(Some("a&b".to_string())));
    }

    #[test]
    fn test_mismatched_tags_are_malformed() {
        let xml = document(&format!(
            "{}<BldA><fid>x</type></BldA>",
            building("K1", "a", SQUARE)
        ));
        let err = parse_building_xml(&xml).unwrap_err();
        assert!(matches!(err, Error::Xml { .. }));
    }

    #[test]
    fn test_truncated_document_is_malformed() {
        let xml = document(&building("K1", "a", SQUARE));
        let truncated = &xml[..xml.len() - "</Dataset>".len()];
        assert!(parse_building_xml(truncated).is_err());
    }

    #[test]
    fn test_empty_document_is_malformed() {
        let err = parse_building_xml("").unwrap_err();
        assert!(matches!(
            err,
            Error::IncompleteDocument(IncompleteReason::NoRootElement)
        ));
    }

    #[test]
    fn test_document_without_buildings_yields_nothing() {
        let parsed = parse_building_xml(&document("<RdEdg/>")).unwrap();
        assert_eq!(parsed.buildings_found, 0);
        assert!(parsed.features.is_empty());
    }

    #[test]
    fn test_element_after_root_is_malformed() {
        let xml = format!(
            "{}\n<Dataset xmlns=\"http://fgd.gsi.go.jp/spec/2008/FGD_GMLSchema\" xmlns:gml=\"http://www.opengis.net/gml/3.2\">{}</Dataset>",
            document(""),
            building("K1", "a", SQUARE)
        );
        let err = parse_building_xml(&xml).unwrap_err();
        assert!(matches!(err, Error::ContentOutsideRoot { .. }));

        let xml = format!("<a/>{}", document(&building("K1", "a", SQUARE)).replace(
            r#"<?xml version="1.0" encoding="UTF-8"?>"#,
            ""
        ));
        assert!(matches!(
            parse_building_xml(&xml).unwrap_err(),
            Error::ContentOutsideRoot { .. }
        ));
    }

    #[test]
    fn test_text_outside_root_is_malformed() {
        let xml = format!("{}trailing", document(&building("K1", "a", SQUARE)));
        assert!(matches!(
            parse_building_xml(&xml).unwrap_err(),
            Error::ContentOutsideRoot { .. }
        ));

        // 末尾の空白は許容する
        let xml = format!("{}\n\t\n", document(&building("K1", "a", SQUARE)));
        assert_eq!(parse_building_xml(&xml).unwrap().features.len(), 1);
    }

    #[test]
    fn test_attribute_value_stops_at_first_nested_element() {
        let body = format!(
            r#"<BldA><type>普通建物<note>x</note>tail</type><fid>a<b/>b</fid><gml:posList>{}</gml:posList></BldA>"#,
            SQUARE
        );
        let parsed = parse_building_xml(&document(&body)).unwrap();

        let attributes = &parsed.features[0].attributes;
        assert_eq!(attributes.feature_type, Some(Some("普通建物".to_string())));
        assert_eq!(attributes.fid, Some(Some("a".to_string())));
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let xml = format!("\u{feff}{}", document(&building("K1", "a", SQUARE)));
        let parsed = parse_building_xml(&xml).unwrap();
        assert_eq!(parsed.features.len(), 1);
    }
}
