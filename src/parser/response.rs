//! Response Parser Module
//!
//! レスポンスXMLの`<r>`（行）/`<c>`（セル）要素から行レコードを抽出するモジュール。
//! スキーマ検証は行わず、対象外の要素・属性は無視します。

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use crate::error::WonderError;
use crate::types::{RawCell, RowRecord};

/// 行要素名
const ROW_TAG: &[u8] = b"r";
/// セル要素名
const CELL_TAG: &[u8] = b"c";

/// レスポンスXMLから行レコードを抽出
///
/// 文書中のすべての`<r>`要素（深さを問わない）を文書順に1レコードとし、
/// その中の`<c>`要素を1セルとして扱います。`<r/>`は空のレコードになります。
/// 行の中に行が入れ子になっている場合は`WonderError::Markup`になります。
///
/// # 引数
///
/// * `xml` - レスポンスXML文字列
///
/// # 戻り値
///
/// * `Ok(Vec<RowRecord>)` - 抽出に成功した場合
/// * `Err(WonderError)` - XMLが不正、またはセルの属性が不正な場合
///
/// # 使用例
///
/// ```rust
/// use wondergrid::{parse_rows, CellSpec};
///
/// # fn main() -> Result<(), wondergrid::WonderError> {
/// let records = parse_rows(r#"<data><r><c l="Total" r="2"/><c v="10"/></r></data>"#)?;
/// assert_eq!(records, vec![vec![CellSpec::spanned("Total", 2), CellSpec::value("10")]]);
/// # Ok(())
/// # }
/// ```
pub fn parse_rows(xml: &str) -> Result<Vec<RowRecord>, WonderError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut records: Vec<RowRecord> = Vec::new();
    let mut current: Option<RowRecord> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                ROW_TAG => {
                    reject_nested_row(current.as_ref(), records.len())?;
                    current = Some(RowRecord::new());
                }
                CELL_TAG => push_cell(&e, records.len(), current.as_mut())?,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                ROW_TAG => {
                    reject_nested_row(current.as_ref(), records.len())?;
                    records.push(RowRecord::new());
                }
                CELL_TAG => push_cell(&e, records.len(), current.as_mut())?,
                _ => {}
            },
            Event::End(e) => {
                if e.name().as_ref() == ROW_TAG {
                    if let Some(row) = current.take() {
                        records.push(row);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(row) = current.take() {
        records.push(row);
    }

    debug!(records = records.len(), "parsed response rows");

    Ok(records)
}

/// 行の中で次の行が始まっていないか検査（内部ヘルパー）
fn reject_nested_row(current: Option<&RowRecord>, row: usize) -> Result<(), WonderError> {
    match current {
        Some(_) => Err(WonderError::Markup(format!(
            "Nested <r> element inside row {}",
            row
        ))),
        None => Ok(()),
    }
}

/// `<c>`要素を現在の行に追加（内部ヘルパー）
///
/// 行の外にあるセルは無視されます。
fn push_cell(
    element: &BytesStart<'_>,
    row: usize,
    current: Option<&mut RowRecord>,
) -> Result<(), WonderError> {
    let Some(record) = current else {
        return Ok(());
    };

    let raw = read_cell_attributes(element)?;
    let spec = raw.into_spec(row, record.len())?;
    record.push(spec);

    Ok(())
}

/// `<c>`要素の`v`/`l`/`r`属性を読み取る（内部ヘルパー）
fn read_cell_attributes(element: &BytesStart<'_>) -> Result<RawCell, WonderError> {
    let mut raw = RawCell::default();

    for attr in element.attributes() {
        let attr = attr.map_err(|e| WonderError::Markup(format!("XML attribute error: {}", e)))?;
        let slot = match attr.key.as_ref() {
            b"v" => &mut raw.value,
            b"l" => &mut raw.label,
            b"r" => &mut raw.span,
            _ => continue,
        };
        *slot = Some(attr.unescape_value()?.into_owned());
    }

    Ok(raw)
}
