//! Writer Module
//!
//! JSONペイロードの分解とワークブックの書き出しを提供するモジュール。
//! rust_xlsxwriterを使用して、シートモデルと解決済み書式プランから
//! ワークブックのバイト列を生成します。

use indexmap::IndexMap;
use rust_xlsxwriter::Workbook;
use serde_json::Value;

use crate::column::{letters_to_index, MAX_COLUMNS};
use crate::error::XlsxJsonError;
use crate::format::{FormatPlan, FormatSpec, FORMAT_KEY};
use crate::sheet::Sheet;

/// Excelの最大行数
const MAX_ROWS: usize = 1_048_576;

/// トップレベルJSONの形状
///
/// エントリポイントで一度だけ判定され、以降の処理はこのタグ付き変種を
/// 前提とします（処理中の再判定は行いません）。
#[derive(Debug)]
pub(crate) enum InputShape {
    /// レコード配列（単一シート、シート名は設定から与えられる）
    SingleSheet(Vec<Value>),

    /// シート名 -> レコード配列（記述順を保持）
    MultiSheet(IndexMap<String, Vec<Value>>),
}

/// デコード済みペイロードを`[format]`とシートデータに分解する
///
/// 予約キー`[format]`はシートデータの走査を始める前にここで分離され、
/// シート処理の途中でインライン判定されることはありません。
///
/// # 戻り値
///
/// * `Err(XlsxJsonError::InvalidInputShape)` - トップレベルが配列でも
///   オブジェクトでもない、シート値が配列でない、またはデータキーが
///   1つも存在しない場合
/// * `Err(XlsxJsonError::InvalidFormatValue)` - `[format]`サブツリーの
///   型が不正な場合
pub(crate) fn split_payload(
    value: Value,
) -> Result<(Option<FormatSpec>, InputShape), XlsxJsonError> {
    match value {
        Value::Array(records) => Ok((None, InputShape::SingleSheet(records))),

        Value::Object(map) => {
            let mut format_value = None;
            let mut sheets: IndexMap<String, Vec<Value>> = IndexMap::new();

            for (key, entry) in map {
                if key == FORMAT_KEY {
                    format_value = Some(entry);
                    continue;
                }

                match entry {
                    Value::Array(records) => {
                        sheets.insert(key, records);
                    }
                    _ => {
                        return Err(XlsxJsonError::InvalidInputShape(format!(
                            "value for sheet '{}' must be an array of records",
                            key
                        )))
                    }
                }
            }

            if sheets.is_empty() {
                return Err(XlsxJsonError::InvalidInputShape(
                    "object payload contains no sheet data".to_string(),
                ));
            }

            let spec = match format_value {
                Some(value) => Some(FormatSpec::from_json(value)?),
                None => None,
            };

            Ok((spec, InputShape::MultiSheet(sheets)))
        }

        other => Err(XlsxJsonError::InvalidInputShape(format!(
            "top-level JSON must be an array of records or an object of sheet arrays, got {}",
            json_type_name(&other)
        ))),
    }
}

/// ワークブックライター
///
/// シートモデルの列と書式プランからワークブックのバイト列を生成します。
pub(crate) struct WorkbookWriter;

impl WorkbookWriter {
    /// シート群をワークブックとして描画し、バイト列を返す
    ///
    /// 各シートについて、ヘッダー行 -> データ行の順に全セルを文字列として
    /// 書き込み、最後に書式プラン（スカラー -> 特定マップの順）を適用
    /// します。失敗時はバイト列を一切返しません。
    ///
    /// # 引数
    ///
    /// * `sheets` - 描画するシート（出力順）
    /// * `plans` - シート名 -> 解決済み書式プラン
    pub fn render(
        sheets: &[Sheet],
        plans: &IndexMap<String, FormatPlan>,
    ) -> Result<Vec<u8>, XlsxJsonError> {
        let mut workbook = Workbook::new();

        for sheet in sheets {
            if sheet.columns.len() > MAX_COLUMNS as usize {
                return Err(XlsxJsonError::InvalidInputShape(format!(
                    "sheet '{}' has {} columns; XLSX supports at most {}",
                    sheet.name,
                    sheet.columns.len(),
                    MAX_COLUMNS
                )));
            }
            if sheet.rows.len() + 1 > MAX_ROWS {
                return Err(XlsxJsonError::InvalidInputShape(format!(
                    "sheet '{}' has {} rows; XLSX supports at most {} including the header",
                    sheet.name,
                    sheet.rows.len(),
                    MAX_ROWS
                )));
            }

            let worksheet = workbook.add_worksheet();
            worksheet.set_name(&sheet.name)?;

            // ヘッダー行
            for (col_idx, column) in sheet.columns.iter().enumerate() {
                worksheet.write_string(0, col_idx as u16, column)?;
            }

            // データ行（レコードに存在しない列は空セルのまま）
            for (row_idx, record) in sheet.rows.iter().enumerate() {
                for (col_idx, column) in sheet.columns.iter().enumerate() {
                    if let Some(value) = record.get(column) {
                        if !value.is_empty() {
                            worksheet.write_string((row_idx + 1) as u32, col_idx as u16, value)?;
                        }
                    }
                }
            }

            if let Some(plan) = plans.get(&sheet.name) {
                Self::apply_plan(worksheet, sheet, plan)?;
            }
        }

        Ok(workbook.save_to_buffer()?)
    }

    /// 1シートに書式プランを適用する
    ///
    /// スカラー層を先に全行・全列へ適用し、その後に特定マップ層で
    /// 個別の行・列を上書きします。
    fn apply_plan(
        worksheet: &mut rust_xlsxwriter::Worksheet,
        sheet: &Sheet,
        plan: &FormatPlan,
    ) -> Result<(), XlsxJsonError> {
        // スカラー行高: ヘッダー行を含む全行
        if let Some(height) = plan.row_height {
            let total_rows = sheet.rows.len() as u32 + 1;
            for row in 0..total_rows {
                worksheet.set_row_height(row, height)?;
            }
        }

        // スカラー列幅: 使用中の全列
        if let Some(width) = plan.column_width {
            for col in 0..sheet.columns.len() as u16 {
                worksheet.set_column_width(col, width)?;
            }
        }

        // 特定行高: キーの行1 = 最初のデータ行 = ワークシート行1（ヘッダーが行0）
        for (&row, &height) in &plan.row_heights {
            worksheet.set_row_height(row, height)?;
        }

        // 特定列幅: 正規化済み列文字 -> 0始まりの列インデックス
        for (letters, &width) in &plan.column_widths {
            let col = letters_to_index(letters)? - 1;
            worksheet.set_column_width(col as u16, width)?;
        }

        Ok(())
    }
}

/// エラーメッセージ用のJSON型名
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
