//! Builder Module
//!
//! Fluent Builder APIを提供し、`Decoder`インスタンスを段階的に構築する。

use std::collections::HashSet;
use std::io::{BufWriter, Read, Write};

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::api::{OutputFormat, SpanPolicy};
use crate::error::WonderError;
use crate::frame::{Frame, DEFAULT_TRAILING_COLUMNS};
use crate::grid::{GridDecoder, Table};
use crate::output::OutputFormatter;
use crate::parser::parse_rows;
use crate::security::SecurityConfig;
use crate::types::RowRecord;

/// デコード処理の設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct DecoderConfig {
    /// 期間グルーピングの列ラベル（先頭側）
    pub groupings: Vec<String>,

    /// グルーピングの後に続く列ラベル
    pub trailing_columns: Vec<String>,

    /// 0以下のスパンの扱い
    pub span_policy: SpanPolicy,

    /// 矩形でないテーブルをエラーにするか
    pub require_rectangular: bool,

    /// 出力フォーマット
    pub output_format: OutputFormat,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            groupings: Vec::new(),
            trailing_columns: DEFAULT_TRAILING_COLUMNS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            span_policy: SpanPolicy::Strict,
            require_rectangular: false,
            output_format: OutputFormat::Markdown,
        }
    }
}

impl DecoderConfig {
    /// 列ラベル（グルーピング + 後続列）
    fn columns(&self) -> Vec<String> {
        self.groupings
            .iter()
            .chain(&self.trailing_columns)
            .cloned()
            .collect()
    }
}

/// Fluent Builder APIを提供する構造体
///
/// `Decoder`インスタンスを段階的に構築するためのビルダーです。
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust
/// use wondergrid::{DecoderBuilder, SpanPolicy};
///
/// # fn main() -> Result<(), wondergrid::WonderError> {
/// let decoder = DecoderBuilder::new()
///     .with_groupings(["Year"])
///     .with_span_policy(SpanPolicy::Permissive)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DecoderBuilder {
    /// 内部設定（構築中）
    config: DecoderConfig,
}

impl Default for DecoderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DecoderBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - グルーピング: なし
    /// - 後続列: `Deaths`, `Population`, `Crude Rate Per 100,000`
    /// - スパン方針: `SpanPolicy::Strict`
    /// - 矩形チェック: 無効（矩形でない場合は警告ログのみ）
    /// - 出力フォーマット: Markdown
    pub fn new() -> Self {
        Self {
            config: DecoderConfig::default(),
        }
    }

    /// 期間グルーピングの列ラベルを指定する
    ///
    /// テーブルの先頭側の列に対応します（例: `Year`, `Month`, `State`）。
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use wondergrid::DecoderBuilder;
    ///
    /// let builder = DecoderBuilder::new()
    ///     .with_groupings(["Year", "State"]);
    /// ```
    pub fn with_groupings<I, S>(mut self, groupings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.groupings = groupings.into_iter().map(Into::into).collect();
        self
    }

    /// グルーピングの後に続く列ラベルを指定する
    ///
    /// 既定の`Deaths`, `Population`, `Crude Rate Per 100,000`を置き換えます。
    pub fn with_trailing_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.trailing_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// 0以下のスパンの扱いを指定する
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use wondergrid::{DecoderBuilder, SpanPolicy};
    ///
    /// let builder = DecoderBuilder::new()
    ///     .with_span_policy(SpanPolicy::Permissive);
    /// ```
    pub fn with_span_policy(mut self, policy: SpanPolicy) -> Self {
        self.config.span_policy = policy;
        self
    }

    /// デコード結果が矩形でない場合にエラーとするかを指定する
    ///
    /// # 引数
    ///
    /// * `require: bool`:
    ///   * `true`: `WonderError::RaggedTable`を返す
    ///   * `false`: 警告ログを出力してテーブルをそのまま返す（デフォルト）
    pub fn require_rectangular(mut self, require: bool) -> Self {
        self.config.require_rectangular = require;
        self
    }

    /// 出力フォーマットを指定する
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use wondergrid::{DecoderBuilder, OutputFormat};
    ///
    /// let builder = DecoderBuilder::new()
    ///     .with_output_format(OutputFormat::Csv);
    /// ```
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    /// 設定を検証し、`Decoder`インスタンスを生成する
    ///
    /// # 戻り値
    ///
    /// * `Ok(Decoder)`: 設定が有効な場合
    /// * `Err(WonderError::Config)`: 列ラベルが空文字列、または重複している場合
    pub fn build(self) -> Result<Decoder, WonderError> {
        let mut seen = HashSet::new();

        for label in self.config.columns() {
            if label.trim().is_empty() {
                return Err(WonderError::Config(
                    "Column labels must not be empty".to_string(),
                ));
            }
            if !seen.insert(label.clone()) {
                return Err(WonderError::Config(format!(
                    "Duplicate column label: '{}'",
                    label
                )));
            }
        }

        Ok(Decoder::new(self.config))
    }
}

/// デコード処理のファサード
///
/// レスポンスXMLからテーブル・フレームを復元し、指定形式で出力するための
/// メインエントリーポイントです。
///
/// # 使用例
///
/// ```rust
/// use wondergrid::{CellValue, DecoderBuilder};
///
/// # fn main() -> Result<(), wondergrid::WonderError> {
/// let decoder = DecoderBuilder::new().build()?;
/// let table = decoder.decode_str(r#"<r><c l="Total" r="2"/><c v="10"/></r><r><c v="20"/></r>"#)?;
///
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.row(1), Some(&[CellValue::from("Total"), CellValue::Number(20.0)][..]));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Decoder {
    /// デコード設定
    config: DecoderConfig,

    /// テーブル復元
    grid: GridDecoder,

    /// リソース制限
    security: SecurityConfig,
}

impl Decoder {
    pub(crate) fn new(config: DecoderConfig) -> Self {
        Self::with_security(config, SecurityConfig::default())
    }

    /// リソース制限を指定して生成（内部ヘルパー）
    ///
    /// 同じ制限がテーブル復元にも適用されます。
    pub(crate) fn with_security(config: DecoderConfig, security: SecurityConfig) -> Self {
        Self {
            grid: GridDecoder::with_security(config.span_policy, security.clone()),
            security,
            config,
        }
    }

    /// 列ラベル（グルーピング + 後続列）を取得
    pub fn columns(&self) -> Vec<String> {
        self.config.columns()
    }

    /// 行レコードからテーブルを復元
    ///
    /// # 戻り値
    ///
    /// * `Ok(Table)` - 復元に成功した場合
    /// * `Err(WonderError)` - 不正なスパン、リソース制限違反、
    ///   または矩形チェック有効時に矩形でない場合
    pub fn decode_records(&self, records: &[RowRecord]) -> Result<Table, WonderError> {
        let table = self.grid.decode(records)?;

        if let Some((row, expected, actual)) = table.ragged_row() {
            if self.config.require_rectangular {
                return Err(WonderError::RaggedTable {
                    row,
                    expected,
                    actual,
                });
            }
            warn!(row, expected, actual, "decoded table is not rectangular");
        }

        Ok(table)
    }

    /// レスポンスXML文字列からテーブルを復元
    pub fn decode_str(&self, xml: &str) -> Result<Table, WonderError> {
        self.security.check_input_size(xml.len() as u64)?;

        let records = parse_rows(xml)?;
        self.decode_records(&records)
    }

    /// リーダーからレスポンスXMLを読み込み、テーブルを復元
    ///
    /// 入力サイズが上限（256MB）を超える場合は`WonderError::SecurityViolation`を返します。
    pub fn decode_reader<R: Read>(&self, input: R) -> Result<Table, WonderError> {
        let buffer = self.read_input(input)?;
        let xml = std::str::from_utf8(&buffer)?;
        self.decode_str(xml)
    }

    /// 独立した複数のレスポンスを並列に復元
    ///
    /// 結果は入力と同じ順序で返されます。いずれかが失敗した場合は
    /// エラーのみが返されます。
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use wondergrid::DecoderBuilder;
    ///
    /// # fn main() -> Result<(), wondergrid::WonderError> {
    /// let decoder = DecoderBuilder::new().build()?;
    /// let tables = decoder.decode_all(&[r#"<r><c v="1"/></r>"#, r#"<r><c v="2"/></r>"#])?;
    /// assert_eq!(tables.len(), 2);
    /// # Ok(())
    /// # }
    /// ```
    pub fn decode_all<S>(&self, inputs: &[S]) -> Result<Vec<Table>, WonderError>
    where
        S: AsRef<str> + Sync,
    {
        debug!(inputs = inputs.len(), "decoding responses in parallel");

        inputs
            .par_iter()
            .map(|xml| self.decode_str(xml.as_ref()))
            .collect()
    }

    /// テーブルに列ラベルを付与してフレームを生成
    pub fn frame(&self, table: Table) -> Result<Frame, WonderError> {
        Frame::new(self.columns(), table)
    }

    /// レスポンスXML文字列からフレームを生成
    pub fn frame_str(&self, xml: &str) -> Result<Frame, WonderError> {
        let table = self.decode_str(xml)?;
        self.frame(table)
    }

    /// レスポンスXMLを指定された出力形式に変換
    ///
    /// # 引数
    ///
    /// * `input` - レスポンスXMLを読み込むためのリーダー
    /// * `output` - 出力先のライター
    ///
    /// # 処理フロー
    ///
    /// 1. 入力の読み込みとサイズ検証
    /// 2. 行レコードの抽出とテーブルの復元
    /// 3. 列ラベルの付与
    /// 4. 出力フォーマットに応じて出力
    pub fn convert<R: Read, W: Write>(&self, input: R, mut output: W) -> Result<(), WonderError> {
        let table = self.decode_reader(input)?;
        let frame = self.frame(table)?;

        let formatter = OutputFormatter::from_format(self.config.output_format);

        let mut writer = BufWriter::new(&mut output);
        formatter.render(&frame, &mut writer)?;
        writer.flush()?;

        Ok(())
    }

    /// レスポンスXMLを指定された出力形式の文字列に変換
    pub fn convert_to_string<R: Read>(&self, input: R) -> Result<String, WonderError> {
        let mut buffer = Vec::new();
        self.convert(input, &mut buffer)?;

        let result = String::from_utf8(buffer).map_err(|e| {
            WonderError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })?;

        Ok(result)
    }

    /// 入力を上限サイズまで読み込む（内部ヘルパー）
    fn read_input<R: Read>(&self, input: R) -> Result<Vec<u8>, WonderError> {
        let limit = self.security.max_input_size;
        let mut buffer = Vec::new();
        input
            .take(limit.saturating_add(1))
            .read_to_end(&mut buffer)?;

        self.security.check_input_size(buffer.len() as u64)?;

        Ok(buffer)
    }
}
