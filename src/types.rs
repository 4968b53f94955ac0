//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::WonderError;

/// 復元後のセルの値
///
/// JSONでは数値はそのまま数値、文字列は文字列として出力されます。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// 数値（桁区切りを除去して解析できた値）
    Number(f64),

    /// 文字列（ラベル、または数値として解析できなかった値）
    Text(String),
}

impl CellValue {
    /// 数値として取得
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(_) => None,
        }
    }

    /// 文字列として取得
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Number(_) => None,
            CellValue::Text(s) => Some(s),
        }
    }

    /// 数値かどうか
    pub fn is_number(&self) -> bool {
        matches!(self, CellValue::Number(_))
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

/// セル記述子
///
/// マークアップのフロントエンドから渡される、1セル分の指示です。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellSpec {
    /// 数値候補の生テキスト（例: `"1,234"`）
    ///
    /// 数値として解析できない場合は、元の文字列がそのまま残ります。
    Value(String),

    /// 現在の行にのみ配置されるラベル
    Label(String),

    /// `span`行にわたって複製されるラベル
    ///
    /// 現在の行から`span - 1`行先までの各行に同じラベルが配置されます。
    /// 0以下の値は`SpanPolicy`に従って扱われます。
    SpannedLabel {
        /// ラベル文字列
        text: String,
        /// 複製する行数
        span: i64,
    },
}

impl CellSpec {
    /// 値セルを生成
    pub fn value(raw: impl Into<String>) -> Self {
        CellSpec::Value(raw.into())
    }

    /// ラベルセルを生成
    pub fn label(text: impl Into<String>) -> Self {
        CellSpec::Label(text.into())
    }

    /// スパン付きラベルセルを生成
    pub fn spanned(text: impl Into<String>, span: i64) -> Self {
        CellSpec::SpannedLabel {
            text: text.into(),
            span,
        }
    }
}

/// 1行分のセル記述子（記述順）
pub type RowRecord = Vec<CellSpec>;

/// マークアップから抽出されたままのセル
///
/// `<c v="..." l="..." r="..."/>`の各属性に対応します。
/// `CellSpec`に変換するまで属性の組み合わせは検証されません。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCell {
    /// 値マーカー（`v`）
    pub value: Option<String>,
    /// ラベルマーカー（`l`）
    pub label: Option<String>,
    /// スパンマーカー（`r`）
    pub span: Option<String>,
}

impl RawCell {
    /// セル記述子に変換
    ///
    /// `v`があれば値セルになり、`l`と`r`は無視されます。
    /// `v`がない場合は`l`が必須で、`r`があればスパン付きラベルになります。
    ///
    /// # 引数
    ///
    /// * `row` - レコード番号（エラー報告用）
    /// * `cell` - レコード内のセル番号（エラー報告用）
    ///
    /// # 戻り値
    ///
    /// * `Ok(CellSpec)` - 変換に成功した場合
    /// * `Err(WonderError::MissingAttribute)` - `v`も`l`もない場合
    /// * `Err(WonderError::InvalidSpan)` - `r`が整数でない場合
    pub fn into_spec(self, row: usize, cell: usize) -> Result<CellSpec, WonderError> {
        if let Some(value) = self.value {
            return Ok(CellSpec::Value(value));
        }

        let Some(text) = self.label else {
            let attribute = if self.span.is_some() { "l" } else { "v or l" };
            return Err(WonderError::MissingAttribute {
                row,
                cell,
                attribute,
            });
        };

        match self.span {
            None => Ok(CellSpec::Label(text)),
            Some(span) => {
                let parsed = span
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| WonderError::InvalidSpan {
                        row,
                        cell,
                        span: span.clone(),
                    })?;
                Ok(CellSpec::SpannedLabel { text, span: parsed })
            }
        }
    }
}
