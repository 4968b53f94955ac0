//! Grid Module
//!
//! スパースでラベル圧縮された行/セル記述子の列から、稠密な2次元テーブルを
//! 復元するモジュール。複数行にまたがるラベル（スパン）の複製と、
//! 桁区切り付き数値の解析を行います。

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::api::SpanPolicy;
use crate::error::WonderError;
use crate::formatter::CellFormatter;
use crate::security::SecurityConfig;
use crate::types::{CellSpec, CellValue, RowRecord};

/// 復元されたテーブル
///
/// 行は絶対インデックスで参照され、スパン付きラベルによってデコード位置より
/// 先の行が作られることがあります。矩形であることはデコード後の性質であり、
/// デコード中は保証されません。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// 空のテーブルを生成
    pub fn new() -> Self {
        Self::default()
    }

    /// 行データからテーブルを生成
    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Self {
        Self { rows }
    }

    /// 行数を取得
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// 行がないかどうか
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// すべての行を取得
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// 指定された行を取得
    pub fn row(&self, row_idx: usize) -> Option<&[CellValue]> {
        self.rows.get(row_idx).map(Vec::as_slice)
    }

    /// テーブルの幅（すべての行が同じ幅の場合のみ`Some`）
    ///
    /// 空のテーブルの幅は0です。
    pub fn width(&self) -> Option<usize> {
        match self.ragged_row() {
            Some(_) => None,
            None => Some(self.rows.first().map_or(0, Vec::len)),
        }
    }

    /// すべての行が同じ幅かどうか
    pub fn is_rectangular(&self) -> bool {
        self.ragged_row().is_none()
    }

    /// 行データを取り出す
    pub fn into_rows(self) -> Vec<Vec<CellValue>> {
        self.rows
    }

    /// 先頭行と幅が異なる最初の行を探す（内部ヘルパー）
    ///
    /// # 戻り値
    ///
    /// `(行番号, 先頭行の幅, 該当行の幅)`
    pub(crate) fn ragged_row(&self) -> Option<(usize, usize, usize)> {
        let expected = self.rows.first()?.len();
        self.rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != expected)
            .map(|(idx, row)| (idx, expected, row.len()))
    }

    /// 指定された行を取得し、未作成なら作成する（内部ヘルパー）
    ///
    /// 間の行も空行として作成されます。
    fn realize_row(&mut self, row_idx: usize) -> &mut Vec<CellValue> {
        if row_idx >= self.rows.len() {
            self.rows.resize_with(row_idx + 1, Vec::new);
        }
        &mut self.rows[row_idx]
    }
}

/// スパン付き行ストリームのデコーダー
///
/// # 使用例
///
/// ```rust
/// use wondergrid::{CellSpec, CellValue, GridDecoder};
///
/// # fn main() -> Result<(), wondergrid::WonderError> {
/// let records = vec![
///     vec![CellSpec::spanned("Total", 2), CellSpec::value("10")],
///     vec![CellSpec::value("20")],
/// ];
///
/// let table = GridDecoder::default().decode(&records)?;
/// assert_eq!(table.row(1), Some(&[CellValue::from("Total"), CellValue::Number(20.0)][..]));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct GridDecoder {
    /// 0以下のスパンの扱い
    span_policy: SpanPolicy,

    /// リソース制限
    security: SecurityConfig,

    /// 値セルの解析
    formatter: CellFormatter,
}

impl GridDecoder {
    /// 指定したスパン方針でデコーダーを生成
    pub fn new(span_policy: SpanPolicy) -> Self {
        Self {
            span_policy,
            ..Self::default()
        }
    }

    /// スパン方針とリソース制限を指定してデコーダーを生成
    pub(crate) fn with_security(span_policy: SpanPolicy, security: SecurityConfig) -> Self {
        Self {
            span_policy,
            security,
            formatter: CellFormatter::new(),
        }
    }

    /// 行記述子の列をテーブルに復元
    ///
    /// 1. `current_row`を0で開始
    /// 2. 各レコードの開始時に、`current_row`の行がなければ作成
    /// 3. 値セル・ラベルは`current_row`の行に追加し、スパン付きラベルは
    ///    `current_row`から`span`行分の各行に追加（未作成の行は作成）
    /// 4. レコードの処理後に`current_row`を1進める
    ///
    /// # 引数
    ///
    /// * `records` - 記述順の行レコード
    ///
    /// # 戻り値
    ///
    /// * `Ok(Table)` - 復元に成功した場合
    /// * `Err(WonderError)` - 不正なスパン、またはリソース制限違反の場合。
    ///   部分的なテーブルは返されません。
    pub fn decode(&self, records: &[RowRecord]) -> Result<Table, WonderError> {
        debug!(records = records.len(), "decoding row records");

        self.security.check_row_count(records.len())?;

        let mut table = Table::new();

        for (current_row, record) in records.iter().enumerate() {
            table.realize_row(current_row);

            for (cell_idx, cell) in record.iter().enumerate() {
                match cell {
                    CellSpec::Value(raw) => {
                        let value = self.formatter.parse_value(raw);
                        table.realize_row(current_row).push(value);
                    }
                    CellSpec::Label(text) => {
                        table
                            .realize_row(current_row)
                            .push(CellValue::Text(text.clone()));
                    }
                    CellSpec::SpannedLabel { text, span } => {
                        let span = self.resolve_span(*span, current_row, cell_idx)?;
                        self.security.check_span(current_row, span)?;

                        trace!(row = current_row, span, label = %text, "replicating spanning label");

                        for target in current_row..current_row + span {
                            table
                                .realize_row(target)
                                .push(CellValue::Text(text.clone()));
                        }
                    }
                }
            }
        }

        debug!(rows = table.len(), width = ?table.width(), "decoded table");

        Ok(table)
    }

    /// スパン値を複製行数に変換（内部ヘルパー）
    fn resolve_span(&self, span: i64, row: usize, cell: usize) -> Result<usize, WonderError> {
        if span > 0 {
            return usize::try_from(span).map_err(|_| {
                WonderError::SecurityViolation(format!(
                    "Span of {} rows at row {} cannot be addressed",
                    span, row
                ))
            });
        }

        match self.span_policy {
            SpanPolicy::Strict => Err(WonderError::InvalidSpan {
                row,
                cell,
                span: span.to_string(),
            }),
            SpanPolicy::Permissive => {
                warn!(row, cell, span, "dropping label with non-positive span");
                Ok(0)
            }
        }
    }
}

/// デフォルト設定の`GridDecoder`で行記述子の列をテーブルに復元
pub fn decode(records: &[RowRecord]) -> Result<Table, WonderError> {
    GridDecoder::default().decode(records)
}
