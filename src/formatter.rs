//! Formatter Module
//!
//! セル値の解析と出力用フォーマット処理を提供するモジュール。
//! 桁区切り付きの数値テキスト（`"1,234"`）の解析もここで行います。

use crate::api::OutputFormat;
use crate::types::CellValue;

/// 桁区切り文字
const THOUSANDS_SEPARATOR: char = ',';

/// 数字の間にのみ置ける桁グループ区切り（`1_000`）
const DIGIT_GROUP_SEPARATOR: char = '_';

/// セルフォーマッター
///
/// セル値の解析・フォーマット処理のファサードとして機能します。
#[derive(Debug, Default)]
pub(crate) struct CellFormatter {
    /// 数値フォーマッター
    number_formatter: NumberFormatter,
}

impl CellFormatter {
    /// 新しいCellFormatterインスタンスを生成
    pub fn new() -> Self {
        Self::default()
    }

    /// 値セルの生テキストを解析
    ///
    /// 数値として解析できればその値、できなければ元のテキストをそのまま返します。
    /// この処理は失敗しません。
    pub fn parse_value(&self, raw: &str) -> CellValue {
        match self.number_formatter.parse(raw) {
            Some(n) => CellValue::Number(n),
            None => CellValue::Text(raw.to_string()),
        }
    }

    /// セル値を出力形式に合わせてフォーマット
    ///
    /// # 引数
    ///
    /// * `value` - セル値
    /// * `format` - 出力形式（エスケープ規則の選択に使用）
    ///
    /// # 戻り値
    ///
    /// フォーマット済み文字列
    pub fn format_cell(&self, value: &CellValue, format: OutputFormat) -> String {
        let text = match value {
            CellValue::Number(n) => self.number_formatter.format(*n),
            CellValue::Text(s) => s.clone(),
        };

        match format {
            OutputFormat::Markdown => escape_markdown(&text),
            OutputFormat::Csv => escape_csv(&text),
            OutputFormat::Json => text,
        }
    }
}

/// 数値フォーマッター
#[derive(Debug, Default)]
pub(crate) struct NumberFormatter;

impl NumberFormatter {
    /// 桁区切りを除去して数値として解析
    ///
    /// 前後の空白は無視します。`_`は数字に挟まれている場合のみ区切りとして
    /// 除去します。解析できない場合は`None`。
    pub fn parse(&self, raw: &str) -> Option<f64> {
        let stripped: Vec<char> = raw
            .trim()
            .chars()
            .filter(|&c| c != THOUSANDS_SEPARATOR)
            .collect();

        let mut cleaned = String::with_capacity(stripped.len());
        for (idx, &c) in stripped.iter().enumerate() {
            if c == DIGIT_GROUP_SEPARATOR {
                let prev = idx.checked_sub(1).and_then(|i| stripped.get(i));
                let next = stripped.get(idx + 1);
                if prev.is_some_and(char::is_ascii_digit)
                    && next.is_some_and(char::is_ascii_digit)
                {
                    continue;
                }
            }
            cleaned.push(c);
        }

        cleaned.parse::<f64>().ok()
    }

    /// 数値を文字列化（最短の往復可能表現）
    pub fn format(&self, value: f64) -> String {
        value.to_string()
    }
}

/// Markdown特殊文字をエスケープ
fn escape_markdown(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('|', "\\|")
        .replace('\n', "<br>")
}

/// CSV文字列をエスケープ
///
/// ダブルクォート、改行、カンマを含む場合はダブルクォートで囲み、
/// 内部のダブルクォートは2つにエスケープします。
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
