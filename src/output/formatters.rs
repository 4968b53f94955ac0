//! Output Formatters Implementation
//!
//! 各出力フォーマットの実装を提供するモジュール。

use std::io::Write;

use crate::error::WonderError;
use crate::frame::Frame;

/// Markdown形式のフォーマッター
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    pub fn render<W: Write>(&self, frame: &Frame, writer: &mut W) -> Result<(), WonderError> {
        frame.render_markdown(writer)
    }
}

/// JSON形式のフォーマッター
///
/// `{"columns": [...], "rows": [[...], ...]}`の形で出力します。
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn render<W: Write>(&self, frame: &Frame, writer: &mut W) -> Result<(), WonderError> {
        serde_json::to_writer_pretty(&mut *writer, frame)
            .map_err(|e| WonderError::Config(format!("JSON serialization error: {}", e)))?;
        writeln!(writer)?;
        writer.flush()?;

        Ok(())
    }
}

/// CSV形式のフォーマッター
pub struct CsvFormatter;

impl CsvFormatter {
    pub fn render<W: Write>(&self, frame: &Frame, writer: &mut W) -> Result<(), WonderError> {
        frame.render_csv(writer)
    }
}
