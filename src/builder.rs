//! Builder Module
//!
//! Fluent Builder APIを提供し、`Converter`インスタンスを段階的に構築する。

use chrono::NaiveDate;
use serde_json::Value;
use std::io::{Read, Seek};

use crate::api::DateFormat;
use crate::error::XlsxJsonError;
use crate::format::resolve_plans;
use crate::formatter::CellFormatter;
use crate::parser::WorkbookParser;
use crate::security::SecurityConfig;
use crate::sheet::Sheet;
use crate::writer::{split_payload, InputShape, WorkbookWriter};

/// 出力ファイル名（および単一シート名）のデフォルト値
const DEFAULT_FILENAME: &str = "Converted_Data";

/// 変換処理の設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct ConversionConfig {
    /// 日付形式（読み込み方向）
    pub date_format: DateFormat,

    /// 出力ファイル名のステム。単一シート変換時のシート名としても使用される
    pub filename: String,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            date_format: DateFormat::Iso8601,
            filename: DEFAULT_FILENAME.to_string(),
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// `Converter`インスタンスを段階的に構築するためのビルダーです。
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみを
/// オーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxbridge::{ConverterBuilder, DateFormat};
///
/// # fn main() -> Result<(), xlsxbridge::XlsxJsonError> {
/// let converter = ConverterBuilder::new()
///     .with_filename("Quarterly Report")
///     .with_date_format(DateFormat::Iso8601)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConverterBuilder {
    /// 内部設定（構築中）
    config: ConversionConfig,
}

impl Default for ConverterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConverterBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - 日付形式: ISO 8601 (YYYY-MM-DD)
    /// - 出力ファイル名: "Converted_Data"
    pub fn new() -> Self {
        Self {
            config: ConversionConfig::default(),
        }
    }

    /// 日付の出力形式を指定する（読み込み方向）
    ///
    /// # 引数
    ///
    /// * `format: DateFormat`: 日付形式
    pub fn with_date_format(mut self, format: DateFormat) -> Self {
        self.config.date_format = format;
        self
    }

    /// 出力ファイル名のステムを指定する（書き込み方向）
    ///
    /// 単一シート変換（トップレベルが配列）の場合、この値はシート名と
    /// しても使用されます。実際のファイル名は空白をアンダースコアに
    /// 置換し、`.xlsx`を付加したものになります。
    ///
    /// # 引数
    ///
    /// * `filename`: ファイル名のステム（拡張子なし）
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.config.filename = filename.into();
        self
    }

    /// 設定を検証し、`Converter`インスタンスを生成する
    ///
    /// # 戻り値
    ///
    /// * `Ok(Converter)`: 設定が有効な場合、Converterインスタンス
    /// * `Err(XlsxJsonError::Config)`: 設定が無効な場合
    ///
    /// # 発生し得るエラー
    ///
    /// * ファイル名が空、またはパス区切り文字を含む
    /// * カスタム日付形式が不正な書式文字列
    pub fn build(self) -> Result<Converter, XlsxJsonError> {
        // 1. ファイル名の検証
        if self.config.filename.trim().is_empty() {
            return Err(XlsxJsonError::Config(
                "Output filename must not be empty".to_string(),
            ));
        }
        if self.config.filename.contains('/') || self.config.filename.contains('\\') {
            return Err(XlsxJsonError::Config(format!(
                "Output filename must not contain path separators: '{}'",
                self.config.filename
            )));
        }

        // 2. カスタム日付形式の検証
        if let DateFormat::Custom(ref format_str) = self.config.date_format {
            // テスト用の日付でフォーマット試行
            let test_date = NaiveDate::from_ymd_opt(2025, 1, 1)
                .ok_or_else(|| XlsxJsonError::Config("Failed to create test date".to_string()))?;
            let formatted = test_date.format(format_str).to_string();
            if formatted.is_empty() {
                return Err(XlsxJsonError::Config(format!(
                    "Invalid date format string: '{}'",
                    format_str
                )));
            }
        }

        // 3. Converterインスタンス生成
        Ok(Converter::new(self.config))
    }
}

/// JSON -> XLSX変換の結果
///
/// ワークブックのバイト列に加えて、出力ファイル名と非致命的な警告
/// （無視された`[format].sheets`エントリなど）をサイドチャネルとして
/// 保持します。警告は成功時にのみ返され、決してエラーにはなりません。
#[derive(Debug, Clone)]
pub struct JsonToXlsxOutput {
    /// 出力ファイル名（空白をアンダースコアに置換し、`.xlsx`を付加済み）
    pub filename: String,

    /// ワークブックのバイト列
    pub bytes: Vec<u8>,

    /// 人間可読の警告メッセージ
    pub warnings: Vec<String>,
}

impl JsonToXlsxOutput {
    /// ホスト側プラットフォームに返す成功メッセージを生成する
    pub fn summary(&self) -> String {
        format!("Excel file '{}' generated successfully", self.filename)
    }
}

/// 変換処理のファサード
///
/// XLSXとJSONの双方向変換を提供するメインエントリーポイントです。
/// `ConverterBuilder`を使用して構築された設定に基づいて変換処理を実行
/// します。
///
/// `build()`後は不変であり、グローバル状態を一切変更しないため、
/// ホスト側が複数の変換呼び出しを並行にディスパッチしても安全です。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxbridge::ConverterBuilder;
/// use std::fs::File;
///
/// # fn main() -> Result<(), xlsxbridge::XlsxJsonError> {
/// let converter = ConverterBuilder::new().build()?;
///
/// // XLSX -> JSON
/// let input = File::open("data.xlsx")?;
/// let json = converter.xlsx_to_json(input)?;
///
/// // JSON -> XLSX
/// let output = converter.json_to_xlsx(&json)?;
/// std::fs::write(&output.filename, &output.bytes)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Converter {
    /// 変換設定
    config: ConversionConfig,

    /// セルフォーマッター
    formatter: CellFormatter,

    /// リソース制限
    security: SecurityConfig,
}

impl Converter {
    pub(crate) fn new(config: ConversionConfig) -> Self {
        Self {
            formatter: CellFormatter::new(),
            security: SecurityConfig::default(),
            config,
        }
    }

    /// ワークブックをJSON文字列に変換する
    ///
    /// シートが1つの場合はレコード配列、複数の場合はシート名をキーと
    /// するオブジェクト（シート定義順）になります。列順序はヘッダーの
    /// 出現順がそのまま保持されます。
    ///
    /// 出力が構造化JSONではなく文字列であるのは、下流の汎用的な
    /// JSON再エンコードでヘッダー順が失われるのを避けるためです。
    ///
    /// # 引数
    ///
    /// * `input` - Excelファイルを読み込むためのリーダー（Read + Seekトレイトを実装）
    ///
    /// # 戻り値
    ///
    /// * `Ok(String)` - JSON文字列
    /// * `Err(XlsxJsonError::EmptyWorkbook)` - シートが存在しない場合
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use std::io::Cursor;
    /// use xlsxbridge::ConverterBuilder;
    ///
    /// # fn main() -> Result<(), xlsxbridge::XlsxJsonError> {
    /// let converter = ConverterBuilder::new().build()?;
    /// let excel_data: Vec<u8> = vec![]; // Excelファイルのバイト列
    /// let json = converter.xlsx_to_json(Cursor::new(excel_data))?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn xlsx_to_json<R: Read + Seek>(&self, input: R) -> Result<String, XlsxJsonError> {
        let value = self.xlsx_to_value(input)?;
        Ok(serde_json::to_string(&value)?)
    }

    /// ワークブックを構造化JSON値に変換する
    ///
    /// 内容は[`Converter::xlsx_to_json`]と同一です。デコード済みの値を
    /// 汎用的なJSON処理系で再エンコードすると、キー順序を保持しない
    /// 実装ではヘッダー順が失われる可能性があります。
    pub fn xlsx_to_value<R: Read + Seek>(&self, input: R) -> Result<Value, XlsxJsonError> {
        let mut parser = WorkbookParser::open(input, &self.security)?;
        let sheets = parser.parse_workbook(&self.formatter, &self.config)?;
        Ok(sheets_to_value(&sheets))
    }

    /// JSON文字列をワークブックに変換する
    ///
    /// トップレベルが配列の場合は単一シート（シート名は設定の
    /// ファイル名ステム）、オブジェクトの場合はキーごとに1シート
    /// （記述順）になります。予約キー`[format]`は書式ディレクティブ
    /// として解釈され、シートデータには含まれません。
    ///
    /// # 戻り値
    ///
    /// * `Ok(JsonToXlsxOutput)` - ワークブックのバイト列、出力ファイル名、
    ///   警告のリスト
    /// * `Err(XlsxJsonError::Json)` - JSON文字列が構文的に不正な場合
    /// * `Err(XlsxJsonError::InvalidInputShape)` - ペイロードの形状が不正な場合
    /// * `Err(XlsxJsonError::InvalidFormatValue)` - 書式値が不正な場合
    /// * `Err(XlsxJsonError::InvalidColumnIdentifier)` - 列識別子が不正な場合
    ///
    /// 失敗時はバイト列を一切返しません（部分的なファイルは生成されない）。
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use xlsxbridge::ConverterBuilder;
    ///
    /// # fn main() -> Result<(), xlsxbridge::XlsxJsonError> {
    /// let converter = ConverterBuilder::new().build()?;
    /// let payload = r#"{
    ///     "[format]": {"defaults": {"columnWidth": 15}},
    ///     "Sales": [{"Region": "East", "Total": "100"}]
    /// }"#;
    ///
    /// let output = converter.json_to_xlsx(payload)?;
    /// println!("{}", output.summary());
    /// for warning in &output.warnings {
    ///     eprintln!("warning: {}", warning);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn json_to_xlsx(&self, json_str: &str) -> Result<JsonToXlsxOutput, XlsxJsonError> {
        if json_str.len() as u64 > self.security.max_json_payload_size {
            return Err(XlsxJsonError::LimitExceeded(format!(
                "JSON payload size exceeds maximum: {} bytes (max: {} bytes)",
                json_str.len(),
                self.security.max_json_payload_size
            )));
        }

        let value: Value = serde_json::from_str(json_str)?;
        let (format_spec, shape) = split_payload(value)?;

        let sheets = match shape {
            InputShape::SingleSheet(records) => {
                vec![Sheet::from_records(&self.config.filename, &records)?]
            }
            InputShape::MultiSheet(sheet_map) => sheet_map
                .iter()
                .map(|(name, records)| Sheet::from_records(name, records))
                .collect::<Result<Vec<_>, _>>()?,
        };

        let sheet_names: Vec<String> = sheets.iter().map(|s| s.name.clone()).collect();
        let (plans, warnings) = resolve_plans(format_spec.as_ref(), &sheet_names)?;

        let bytes = WorkbookWriter::render(&sheets, &plans)?;

        Ok(JsonToXlsxOutput {
            filename: output_filename(&self.config.filename),
            bytes,
            warnings,
        })
    }
}

/// シート群をJSON値に変換する
///
/// 単一シートは裸の配列に縮約され、複数シートはシート名をキーとする
/// オブジェクト（挿入順）になります。
fn sheets_to_value(sheets: &[Sheet]) -> Value {
    if sheets.len() == 1 {
        Value::Array(sheets[0].to_json_rows())
    } else {
        let mut object = serde_json::Map::new();
        for sheet in sheets {
            object.insert(sheet.name.clone(), Value::Array(sheet.to_json_rows()));
        }
        Value::Object(object)
    }
}

/// 出力ファイル名を生成する（空白 -> アンダースコア、`.xlsx`付加）
fn output_filename(stem: &str) -> String {
    format!("{}.xlsx", stem.replace(' ', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converter_builder_new() {
        let builder = ConverterBuilder::new();
        assert_eq!(builder.config.date_format, DateFormat::Iso8601);
        assert_eq!(builder.config.filename, "Converted_Data");
    }

    #[test]
    fn test_with_date_format() {
        let builder = ConverterBuilder::new()
            .with_date_format(DateFormat::Custom("%Y年%m月%d日".to_string()));
        assert!(matches!(
            builder.config.date_format,
            DateFormat::Custom(ref s) if s == "%Y年%m月%d日"
        ));
    }

    #[test]
    fn test_with_filename() {
        let builder = ConverterBuilder::new().with_filename("Quarterly Report");
        assert_eq!(builder.config.filename, "Quarterly Report");
    }

    #[test]
    fn test_build_success() {
        let result = ConverterBuilder::new().build();
        assert!(result.is_ok());
    }

    #[test]
    fn test_build_with_empty_filename() {
        let result = ConverterBuilder::new().with_filename("  ").build();
        match result {
            Err(XlsxJsonError::Config(msg)) => {
                assert!(msg.contains("filename"));
            }
            _ => panic!("Expected Config error"),
        }
    }

    #[test]
    fn test_build_with_path_separator_in_filename() {
        let result = ConverterBuilder::new().with_filename("a/b").build();
        assert!(matches!(result, Err(XlsxJsonError::Config(_))));

        let result = ConverterBuilder::new().with_filename("a\\b").build();
        assert!(matches!(result, Err(XlsxJsonError::Config(_))));
    }

    #[test]
    fn test_build_with_valid_custom_date_format() {
        let result = ConverterBuilder::new()
            .with_date_format(DateFormat::Custom("%Y-%m-%d".to_string()))
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn test_build_with_invalid_custom_date_format() {
        // 空のフォーマット文字列は無効
        let result = ConverterBuilder::new()
            .with_date_format(DateFormat::Custom("".to_string()))
            .build();
        match result {
            Err(XlsxJsonError::Config(msg)) => {
                assert!(msg.contains("Invalid date format"));
            }
            _ => panic!("Expected Config error"),
        }
    }

    #[test]
    fn test_builder_method_chaining() {
        let builder = ConverterBuilder::new()
            .with_filename("Report")
            .with_date_format(DateFormat::Iso8601);

        assert_eq!(builder.config.filename, "Report");
        assert_eq!(builder.config.date_format, DateFormat::Iso8601);
    }

    #[test]
    fn test_output_filename_replaces_spaces() {
        assert_eq!(output_filename("Converted Data"), "Converted_Data.xlsx");
        assert_eq!(output_filename("Report"), "Report.xlsx");
        assert_eq!(output_filename("Q1 2026 Sales"), "Q1_2026_Sales.xlsx");
    }

    #[test]
    fn test_json_to_xlsx_with_invalid_json() {
        let converter = ConverterBuilder::new().build().unwrap();
        let result = converter.json_to_xlsx("{not valid json");
        assert!(matches!(result, Err(XlsxJsonError::Json(_))));
    }

    #[test]
    fn test_xlsx_to_json_with_invalid_input() {
        let converter = ConverterBuilder::new().build().unwrap();
        // 無効な入力データ（空のVec）
        let invalid_input: Vec<u8> = vec![];
        let result = converter.xlsx_to_json(std::io::Cursor::new(invalid_input));
        assert!(result.is_err());
    }

    #[test]
    fn test_summary_message() {
        let output = JsonToXlsxOutput {
            filename: "Converted_Data.xlsx".to_string(),
            bytes: vec![],
            warnings: vec![],
        };
        assert_eq!(
            output.summary(),
            "Excel file 'Converted_Data.xlsx' generated successfully"
        );
    }
}
