//! Parser Module
//!
//! calamineを使用したExcelファイル解析の実装。
//! ワークブックをシートモデルの列に変換します。

mod workbook;

pub(crate) use workbook::WorkbookParser;
