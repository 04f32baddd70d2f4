//! Public API Types
//!
//! 公開APIで使用する型と定数を定義するモジュール。

/// XLSXファイルのMIMEタイプ
///
/// ホスト側プラットフォームがファイルBlobを返す際に使用するMIMEタイプです。
pub const XLSX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// 日付の出力形式
///
/// 読み込み方向で、Excelの日付セルをJSON文字列に変換する際の出力形式を
/// 指定します。
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DateFormat {
    /// ISO 8601形式（YYYY-MM-DD、時刻成分がある場合は YYYY-MM-DD HH:MM:SS）
    ///
    /// デフォルト。日付のみのセルは `2020-02-20`、時刻を含むセルは
    /// `2020-02-20 13:30:00` のように出力されます。
    Iso8601,

    /// カスタム形式（chrono互換フォーマット文字列）
    ///
    /// chrono互換のフォーマット文字列を使用して、カスタム日付形式を指定します。
    ///
    /// # フォーマット指定子（主要なもの）
    ///
    /// - `%Y`: 4桁の年（例: 2025）
    /// - `%m`: 2桁の月（01-12）
    /// - `%d`: 2桁の日（01-31）
    /// - `%H`: 24時間形式の時（00-23）
    /// - `%M`: 分（00-59）
    /// - `%S`: 秒（00-59）
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use xlsxbridge::{ConverterBuilder, DateFormat};
    ///
    /// # fn main() -> Result<(), xlsxbridge::XlsxJsonError> {
    /// let converter = ConverterBuilder::new()
    ///     .with_date_format(DateFormat::Custom("%Y年%m月%d日".to_string()))
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    Custom(String),
}
