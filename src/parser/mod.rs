//! Parser Module
//!
//! quick-xmlを使用したレスポンスXML解析の実装。
//! イベント駆動で`<r>`/`<c>`要素を読み取り、行レコードを抽出します。

mod response;

pub use response::parse_rows;
