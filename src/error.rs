//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

/// xlsxbridgeクレート全体で使用するエラー型
///
/// このエラー型は、Excelファイルの読み込み、JSONペイロードの解析、
/// 双方向変換処理中に発生するすべてのエラーを統一的に扱うために使用されます。
///
/// # エラーの種類
///
/// - `Io`: I/O操作中に発生したエラー（ファイル読み込み失敗など）
/// - `Parse`: Excelファイルの解析中に発生したエラー（calamine由来）
/// - `Json`: JSON文字列の解析に失敗したエラー（serde_json由来）
/// - `Xlsx`: ワークブックの書き出しに失敗したエラー（rust_xlsxwriter由来）
/// - `Config`: 設定の検証に失敗したエラー（無効な日付形式など）
/// - `InvalidInputShape`: トップレベルJSONが配列でもシート名→配列の
///   オブジェクトでもない、またはシート値がフラットなオブジェクトの配列でない
/// - `InvalidFormatValue`: `[format]`ディレクティブの行高・列幅が数値でない、
///   または正の数でない
/// - `InvalidColumnIdentifier`: `columnWidths`のキーが列識別子として解釈できない
/// - `EmptyWorkbook`: 読み込んだワークブックにシートが1つも存在しない
/// - `LimitExceeded`: 入力サイズがリソース制限を超過した
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxbridge::XlsxJsonError;
/// use std::fs::File;
///
/// fn read_excel_file(path: &str) -> Result<(), XlsxJsonError> {
///     let file = File::open(path)?;  // Ioエラーが自動的に変換される
///     // ... 処理 ...
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum XlsxJsonError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Excelファイルの解析中に発生したエラー
    ///
    /// calamineクレートがExcelファイルを解析する際に発生したエラーです。
    /// ファイル形式が不正、破損したファイルなどが原因となります。
    #[error("Failed to parse Excel file: {0}")]
    Parse(#[from] calamine::Error),

    /// JSON文字列の解析エラー
    ///
    /// 入力されたJSON文字列が構文的に不正な場合に発生します。
    #[error("Invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    /// ワークブック書き出しエラー
    ///
    /// rust_xlsxwriterクレートがワークブックを構築・保存する際に発生した
    /// エラーです。不正なシート名、行・列の上限超過などが原因となります。
    #[error("Failed to write Excel workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// 設定の検証に失敗したエラー
    ///
    /// `ConverterBuilder::build()`時に設定を検証し、無効な設定が検出された
    /// 場合に発生します。例えば、カスタム日付形式が不正な場合や、出力ファイル
    /// 名が空の場合などです。
    #[error("Configuration error: {0}")]
    Config(String),

    /// 入力JSONの形状が不正なエラー
    ///
    /// トップレベルJSONが「レコード配列」でも「シート名→レコード配列の
    /// オブジェクト」でもない場合、またはレコードがフラットなオブジェクト
    /// （ネストした配列・オブジェクトを含まない）でない場合に発生します。
    #[error("Invalid input shape: {0}")]
    InvalidInputShape(String),

    /// 書式ディレクティブの値が不正なエラー
    ///
    /// `[format]`配下の行高・列幅が数値でない、0以下である、または
    /// `rowHeights`のキーが1始まりの整数でない場合に発生します。
    /// 変換全体が中断され、部分的なファイルは出力されません。
    #[error("Invalid format value: {0}")]
    InvalidFormatValue(String),

    /// 列識別子が不正なエラー
    ///
    /// `columnWidths`のキーが列文字（"A", "AB"など）としても1始まりの
    /// 10進数文字列（"1", "28"など）としても解釈できない場合に発生します。
    #[error("Invalid column identifier: {0}")]
    InvalidColumnIdentifier(String),

    /// ワークブックにシートが存在しないエラー
    ///
    /// 読み込み方向で、入力ワークブックにシートが1つも含まれていない場合に
    /// 発生します。
    #[error("Workbook contains no sheets")]
    EmptyWorkbook,

    /// リソース制限を超過したエラー
    ///
    /// 入力ワークブックまたはJSONペイロードのサイズが上限を超えた場合に
    /// 発生します。
    #[error("Resource limit exceeded: {0}")]
    LimitExceeded(String),
}
