//! Format Directive Module
//!
//! JSONペイロードに混在する予約キー`[format]`のサブ言語を解析し、
//! シートごとの書式プラン（行高・列幅）に解決します。

mod parser;

pub(crate) use parser::resolve_plans;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::error::XlsxJsonError;

/// 書式ディレクティブの予約キー
///
/// XLSXのシート名には `/ \ ? * : [ ]` が使用できないため、このリテラルが
/// 実在のシート名と衝突することはありません。
pub(crate) const FORMAT_KEY: &str = "[format]";

/// `[format]`配下の1セクション（`defaults`または`sheets.<name>`）
///
/// スカラー層（`rowHeight`/`columnWidth`）と特定マップ層
/// （`rowHeights`/`columnWidths`）を持ちます。値の正値検証とキーの
/// 正規化は解決時（[`resolve_plans`]）に行われます。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct FormatSection {
    /// セクション全体に適用する既定の行高
    #[serde(rename = "rowHeight")]
    pub row_height: Option<f64>,

    /// セクション全体に適用する既定の列幅
    #[serde(rename = "columnWidth")]
    pub column_width: Option<f64>,

    /// 行番号（1始まり、1 = ヘッダー直後の最初のデータ行）-> 行高
    #[serde(rename = "rowHeights", default)]
    pub row_heights: IndexMap<String, f64>,

    /// 列識別子（列文字または1始まりの10進数文字列）-> 列幅
    #[serde(rename = "columnWidths", default)]
    pub column_widths: IndexMap<String, f64>,
}

/// デコードされた`[format]`サブツリー全体
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct FormatSpec {
    /// 全シートに適用される既定セクション
    #[serde(default)]
    pub defaults: Option<FormatSection>,

    /// シート名 -> シート別セクション（記述順を保持）
    #[serde(default)]
    pub sheets: IndexMap<String, FormatSection>,
}

impl FormatSpec {
    /// デコード済みJSON値から`FormatSpec`を構築する
    ///
    /// # 戻り値
    ///
    /// * `Err(XlsxJsonError::InvalidFormatValue)` - サブツリーの型が不正な
    ///   場合（数値であるべき値が文字列、セクションが配列など）
    pub fn from_json(value: Value) -> Result<Self, XlsxJsonError> {
        serde_json::from_value(value).map_err(|e| {
            XlsxJsonError::InvalidFormatValue(format!("malformed [format] directive: {}", e))
        })
    }
}

/// 1シート分に解決済みの書式プラン
///
/// 4層のマージ（グローバル既定スカラー -> シート別スカラー ->
/// グローバル特定マップ -> シート別特定マップ）の結果です。変換呼び出し
/// ごとに構築され、ワークブック書き出し時に消費された後は破棄されます。
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct FormatPlan {
    /// シート全行に適用する行高
    pub row_height: Option<f64>,

    /// シート全列に適用する列幅
    pub column_width: Option<f64>,

    /// 1始まりのデータ行番号 -> 行高
    pub row_heights: IndexMap<u32, f64>,

    /// 正規化済み列文字 -> 列幅
    pub column_widths: IndexMap<String, f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_full_shape() {
        let spec = FormatSpec::from_json(json!({
            "defaults": {
                "rowHeight": 20,
                "columnWidth": 15,
                "rowHeights": {"1": 30},
                "columnWidths": {"A": 25}
            },
            "sheets": {
                "S1": {"rowHeight": 10}
            }
        }))
        .unwrap();

        let defaults = spec.defaults.unwrap();
        assert_eq!(defaults.row_height, Some(20.0));
        assert_eq!(defaults.column_width, Some(15.0));
        assert_eq!(defaults.row_heights.get("1"), Some(&30.0));
        assert_eq!(defaults.column_widths.get("A"), Some(&25.0));
        assert_eq!(spec.sheets.get("S1").unwrap().row_height, Some(10.0));
    }

    #[test]
    fn test_from_json_empty_object() {
        let spec = FormatSpec::from_json(json!({})).unwrap();
        assert!(spec.defaults.is_none());
        assert!(spec.sheets.is_empty());
    }

    #[test]
    fn test_from_json_rejects_string_value() {
        let result = FormatSpec::from_json(json!({
            "defaults": {"rowHeight": "20"}
        }));

        match result {
            Err(XlsxJsonError::InvalidFormatValue(msg)) => {
                assert!(msg.contains("malformed [format]"));
            }
            _ => panic!("Expected InvalidFormatValue error"),
        }
    }

    #[test]
    fn test_from_json_rejects_unknown_field() {
        let result = FormatSpec::from_json(json!({
            "defaults": {"rowHeigth": 20}
        }));

        assert!(matches!(
            result,
            Err(XlsxJsonError::InvalidFormatValue(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        let result = FormatSpec::from_json(json!([1, 2, 3]));
        assert!(matches!(
            result,
            Err(XlsxJsonError::InvalidFormatValue(_))
        ));
    }

    #[test]
    fn test_format_key_is_not_a_valid_sheet_name() {
        // シート名に使用できない文字が含まれていることを確認
        assert!(FORMAT_KEY.contains('['));
        assert!(FORMAT_KEY.contains(']'));
    }
}
