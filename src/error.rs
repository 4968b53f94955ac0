//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

use crate::period::Period;

/// wondergridクレート全体で使用するエラー型
///
/// 期間（Period）の構築・比較、期間集合の生成、レスポンスXMLの解析、
/// スパン付きテーブルの復元処理中に発生するすべてのエラーを統一的に扱います。
///
/// いずれのエラーも検出時点で同期的に返され、部分的な結果は返されません。
///
/// # エラーの種類
///
/// - `InvalidType`: 整数として解釈できない入力（例: `"20x0"`）
/// - `MonthOutOfRange`: 1〜12の範囲外の月
/// - `PeriodOrder`: 範囲指定の開始期間が終了期間より後
/// - `PeriodKindMismatch`: 範囲指定の開始と終了で期間の種類が異なる
/// - `MissingAttribute`: セルに値マーカーもラベルマーカーもない
/// - `InvalidSpan`: スパン値が正の整数でない
///
/// # 使用例
///
/// ```rust
/// use wondergrid::{CalendarMonth, PeriodSet, WonderError};
///
/// let begin = CalendarMonth::new(3, 2020).unwrap();
/// let end = CalendarMonth::new(1, 2020).unwrap();
///
/// match PeriodSet::range(begin, end) {
///     Err(WonderError::PeriodOrder { .. }) => {}
///     other => panic!("unexpected: {:?}", other),
/// }
/// ```
#[derive(Error, Debug)]
pub enum WonderError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// XMLの読み込み中に発生したエラー（quick-xml由来）
    ///
    /// タグの不整合、不正なエスケープなどが原因となります。
    #[error("Failed to parse response XML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// UTF-8文字列の変換エラー
    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// マークアップの構造エラー（属性の重複など）
    #[error("Malformed markup: {0}")]
    Markup(String),

    /// 型エラー
    ///
    /// 年や月として整数を期待する箇所に、整数として解釈できない値が
    /// 渡された場合に発生します。
    #[error("Invalid type: {0}")]
    InvalidType(String),

    /// 月が1〜12の範囲外
    #[error("Month must be between 1 and 12 (inclusive): {0}")]
    MonthOutOfRange(i64),

    /// 範囲指定の開始期間が終了期間より後
    #[error("Begin period must be before or equal to end period; begin: {begin}, end: {end}")]
    PeriodOrder {
        /// 開始期間
        begin: Period,
        /// 終了期間
        end: Period,
    },

    /// 範囲指定の開始期間と終了期間の種類が一致しない
    ///
    /// 開始と終了は、両方とも`Year`か、両方とも`CalendarMonth`である必要があります。
    #[error("Begin and end period kinds must match (both Year or both CalendarMonth); begin: {begin}, end: {end}")]
    PeriodKindMismatch {
        /// 開始期間
        begin: Period,
        /// 終了期間
        end: Period,
    },

    /// セルに必須の属性がない
    ///
    /// 値マーカー（`v`）もラベルマーカー（`l`）も持たないセルを検出した場合に
    /// 発生します。デコード全体が失敗し、部分的なテーブルは返されません。
    #[error("Cell {cell} of record {row} is missing the '{attribute}' attribute")]
    MissingAttribute {
        /// レコード番号（0始まり）
        row: usize,
        /// レコード内のセル番号（0始まり）
        cell: usize,
        /// 欠落している属性名
        attribute: &'static str,
    },

    /// スパン値が正の整数でない
    #[error("Cell {cell} of record {row} has an invalid span: '{span}'")]
    InvalidSpan {
        /// レコード番号（0始まり）
        row: usize,
        /// レコード内のセル番号（0始まり）
        cell: usize,
        /// 元のスパン値
        span: String,
    },

    /// デコード結果のテーブルが矩形でない
    ///
    /// `DecoderBuilder::require_rectangular(true)`が指定された場合のみ発生します。
    #[error("Decoded table is not rectangular: row {row} has {actual} cells, expected {expected}")]
    RaggedTable {
        /// 幅が一致しない行番号（0始まり）
        row: usize,
        /// 先頭行の幅
        expected: usize,
        /// 該当行の幅
        actual: usize,
    },

    /// 列ラベル数と行の幅が一致しない
    #[error("Row {row} has {actual} cells but {expected} column labels were supplied")]
    ColumnCountMismatch {
        /// 幅が一致しない行番号（0始まり）
        row: usize,
        /// 列ラベル数
        expected: usize,
        /// 該当行の幅
        actual: usize,
    },

    /// 設定の検証に失敗したエラー
    ///
    /// `DecoderBuilder::build()`時に設定を検証し、空の列ラベルや
    /// 重複した列ラベルが検出された場合に発生します。
    #[error("Configuration error: {0}")]
    Config(String),

    /// リソース制限に違反したエラー
    ///
    /// 巨大なスパン値や入力サイズなど、`SecurityConfig`の制限を超えた場合に
    /// 発生します。
    #[error("Security violation: {0}")]
    SecurityViolation(String),
}
