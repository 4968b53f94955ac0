//! Security Module
//!
//! 不正な入力によるリソース枯渇への対策を実装するモジュール。
//! 巨大なスパン値によるメモリ確保や、過大な入力サイズを検出します。

use crate::error::WonderError;

/// セキュリティ設定
///
/// デコード処理時のリソース制限を定義します。
#[derive(Debug, Clone)]
pub(crate) struct SecurityConfig {
    /// 入力XMLの最大サイズ（バイト）
    /// デフォルト: 256MB (268_435_456 bytes)
    pub max_input_size: u64,
    /// 1つのラベルが複製される最大行数
    /// デフォルト: 100,000
    pub max_span: usize,
    /// テーブルの最大行数
    /// デフォルト: 10,000,000
    pub max_rows: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_input_size: 268_435_456, // 256MB
            max_span: 100_000,
            max_rows: 10_000_000,
        }
    }
}

impl SecurityConfig {
    /// 入力サイズの検証
    pub fn check_input_size(&self, size: u64) -> Result<(), WonderError> {
        if size > self.max_input_size {
            return Err(WonderError::SecurityViolation(format!(
                "Input size exceeds maximum: {} bytes (max: {} bytes)",
                size, self.max_input_size
            )));
        }
        Ok(())
    }

    /// スパン値の検証
    ///
    /// `first_row`から`span`行を確保した結果が行数上限を超える場合も拒否します。
    pub fn check_span(&self, first_row: usize, span: usize) -> Result<(), WonderError> {
        if span > self.max_span {
            return Err(WonderError::SecurityViolation(format!(
                "Span of {} rows at row {} exceeds maximum: {}",
                span, first_row, self.max_span
            )));
        }
        self.check_row_count(first_row.saturating_add(span))
    }

    /// 行数の検証
    pub fn check_row_count(&self, rows: usize) -> Result<(), WonderError> {
        if rows > self.max_rows {
            return Err(WonderError::SecurityViolation(format!(
                "Table would grow to {} rows (max: {})",
                rows, self.max_rows
            )));
        }
        Ok(())
    }
}
