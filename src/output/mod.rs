//! Output Format Module
//!
//! Strategy Patternによる出力フォーマットの抽象化を提供するモジュール。

mod formatters;

use std::io::Write;

use crate::api::OutputFormat;
use crate::error::WonderError;
use crate::frame::Frame;

pub use formatters::*;

/// 出力フォーマッター（Strategy Pattern）
///
/// 各出力フォーマット（Markdown, JSON, CSV）をenumとして表現します。
#[derive(Debug, Clone, Copy)]
pub enum OutputFormatter {
    Markdown,
    Json,
    Csv,
}

impl OutputFormatter {
    /// 出力フォーマットからフォーマッターを生成
    pub fn from_format(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Markdown => OutputFormatter::Markdown,
            OutputFormat::Json => OutputFormatter::Json,
            OutputFormat::Csv => OutputFormatter::Csv,
        }
    }

    /// フレームを指定されたフォーマットで出力する
    ///
    /// # 引数
    ///
    /// * `frame` - 出力するフレーム
    /// * `writer` - 出力先のライター
    ///
    /// # 戻り値
    ///
    /// * `Ok(())` - 出力に成功した場合
    /// * `Err(WonderError)` - エラーが発生した場合
    pub fn render<W: Write>(&self, frame: &Frame, writer: &mut W) -> Result<(), WonderError> {
        match self {
            OutputFormatter::Markdown => MarkdownFormatter.render(frame, writer),
            OutputFormatter::Json => JsonFormatter.render(frame, writer),
            OutputFormatter::Csv => CsvFormatter.render(frame, writer),
        }
    }
}
