//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

/// 0以下のスパン値の扱い
///
/// 元のレスポンス形式はスパン値を検証しないため、互換動作も選択できます。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum SpanPolicy {
    /// 0以下のスパンを`WonderError::InvalidSpan`として拒否（デフォルト）
    #[default]
    Strict,

    /// 0以下のスパンを持つラベルを、どの行にも配置せずに読み飛ばす
    ///
    /// 検証を行わない従来の形式と同じ結果になります。
    Permissive,
}

/// 出力フォーマット
///
/// デコードしたテーブルを列ラベル付きで出力する際の形式を指定します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum OutputFormat {
    /// Markdown形式（デフォルト）
    ///
    /// # 出力例
    ///
    /// ```markdown
    /// | Year | Deaths | Population | Crude Rate Per 100,000 |
    /// |------|--------|------------|------------------------|
    /// | 2019 | 1234   | 4903185    | 25.2                   |
    /// ```
    #[default]
    Markdown,

    /// CSV（Comma-Separated Values）形式
    ///
    /// # 出力例
    ///
    /// ```csv
    /// Year,Deaths,Population,"Crude Rate Per 100,000"
    /// 2019,1234,4903185,25.2
    /// ```
    Csv,

    /// JSON形式
    ///
    /// 列ラベルの配列と、行ごとの値の配列を出力します。
    /// 数値セルはJSONの数値になります。
    ///
    /// # 出力例
    ///
    /// ```json
    /// {
    ///   "columns": ["Year", "Deaths"],
    ///   "rows": [["2019", 1234.0]]
    /// }
    /// ```
    Json,
}
