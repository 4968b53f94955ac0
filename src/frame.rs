//! Frame Module
//!
//! 復元したテーブルに列ラベルを付与したデータフレームと、
//! そのMarkdown/CSV描画を提供するモジュール。

use std::io::Write;

use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use crate::api::OutputFormat;
use crate::error::WonderError;
use crate::formatter::CellFormatter;
use crate::grid::Table;
use crate::types::CellValue;

/// 期間グルーピングの後に続く、既定の列ラベル
pub const DEFAULT_TRAILING_COLUMNS: [&str; 3] =
    ["Deaths", "Population", "Crude Rate Per 100,000"];

/// Markdownの列の最小幅（区切り行の最小幅）
const MIN_COLUMN_WIDTH: usize = 3;

/// 列ラベル付きテーブル
///
/// すべての行の幅が列ラベルの数と一致することを保証します。
///
/// # 使用例
///
/// ```rust
/// use wondergrid::{CellValue, Frame, Table};
///
/// # fn main() -> Result<(), wondergrid::WonderError> {
/// let table = Table::from_rows(vec![vec![CellValue::from("2019"), CellValue::Number(1234.0)]]);
/// let frame = Frame::new(vec!["Year".to_string(), "Deaths".to_string()], table)?;
///
/// let deaths: Vec<_> = frame.column("Deaths").unwrap().collect();
/// assert_eq!(deaths, vec![&CellValue::Number(1234.0)]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    columns: Vec<String>,
    rows: Table,
}

impl Frame {
    /// 列ラベルとテーブルからフレームを生成
    ///
    /// # 戻り値
    ///
    /// * `Ok(Frame)` - すべての行の幅が列ラベルの数と一致する場合
    /// * `Err(WonderError::ColumnCountMismatch)` - 幅が一致しない行がある場合
    pub fn new(columns: Vec<String>, table: Table) -> Result<Self, WonderError> {
        let expected = columns.len();
        if let Some((row, cells)) = table
            .rows()
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != expected)
        {
            return Err(WonderError::ColumnCountMismatch {
                row,
                expected,
                actual: cells.len(),
            });
        }

        Ok(Self {
            columns,
            rows: table,
        })
    }

    /// 列ラベルを取得
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// テーブルを取得
    pub fn table(&self) -> &Table {
        &self.rows
    }

    /// テーブルを取り出す
    pub fn into_table(self) -> Table {
        self.rows
    }

    /// 指定したラベルの列の値を上から順に取得
    pub fn column<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a CellValue> + 'a> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.rows().iter().map(move |row| &row[idx]))
    }

    /// Markdownテーブルとして出力
    ///
    /// 先頭行に列ラベル、その後に区切り行とデータ行を出力します。
    /// 列幅は表示幅（全角文字は2）で揃えます。
    ///
    /// # 引数
    ///
    /// * `writer` - 出力先のライター
    ///
    /// # 戻り値
    ///
    /// * `Ok(())` - 出力に成功した場合
    /// * `Err(WonderError)` - 書き込みエラーが発生した場合
    pub fn render_markdown<W: Write>(&self, writer: &mut W) -> Result<(), WonderError> {
        if self.columns.is_empty() {
            return Ok(());
        }

        let lines = self.formatted_lines(OutputFormat::Markdown);

        // 1. 列幅の計算
        let col_widths = calculate_column_widths(&lines, self.columns.len());

        // 2. ヘッダー区切り行
        let separator = generate_separator(&col_widths);

        // 3. 各行の出力
        for (row_idx, line) in lines.iter().enumerate() {
            write!(writer, "|")?;

            for (content, &width) in line.iter().zip(&col_widths) {
                let padding = width.saturating_sub(content.width());
                write!(writer, " {}{} |", content, " ".repeat(padding))?;
            }

            writeln!(writer)?;

            if row_idx == 0 {
                writeln!(writer, "{}", separator)?;
            }
        }

        writer.flush()?;

        Ok(())
    }

    /// CSVとして出力
    ///
    /// 先頭行に列ラベル、その後にデータ行を出力します。
    pub fn render_csv<W: Write>(&self, writer: &mut W) -> Result<(), WonderError> {
        if self.columns.is_empty() {
            return Ok(());
        }

        for line in self.formatted_lines(OutputFormat::Csv) {
            writeln!(writer, "{}", line.join(","))?;
        }

        writer.flush()?;
        Ok(())
    }

    /// ヘッダーを含む全行をフォーマット済み文字列に変換（内部ヘルパー）
    fn formatted_lines(&self, format: OutputFormat) -> Vec<Vec<String>> {
        let formatter = CellFormatter::new();

        let header = self
            .columns
            .iter()
            .map(|label| formatter.format_cell(&CellValue::Text(label.clone()), format))
            .collect();

        std::iter::once(header)
            .chain(self.rows.rows().iter().map(|row| {
                row.iter()
                    .map(|value| formatter.format_cell(value, format))
                    .collect()
            }))
            .collect()
    }
}

/// 列幅を計算（内部ヘルパー）
fn calculate_column_widths(lines: &[Vec<String>], cols: usize) -> Vec<usize> {
    let mut widths = vec![MIN_COLUMN_WIDTH; cols];

    for line in lines {
        for (col_idx, content) in line.iter().enumerate() {
            widths[col_idx] = widths[col_idx].max(content.width());
        }
    }

    widths
}

/// ヘッダー区切り行を生成（内部ヘルパー）
///
/// セルの前後のスペース（各1文字）を含めた幅のハイフンを`|`で連結します。
fn generate_separator(col_widths: &[usize]) -> String {
    let mut separator = String::from("|");

    for &width in col_widths {
        separator.push_str(&"-".repeat(width + 2));
        separator.push('|');
    }

    separator
}
