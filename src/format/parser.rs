//! Format Plan Resolution
//!
//! `[format]`サブツリーを、実際に出力されるシートごとの[`FormatPlan`]に
//! 解決します。マージは明示的な4パスで行い、後の層が同一エントリのみを
//! 上書きします（再帰的なdeep-mergeは使用しません）。

use indexmap::IndexMap;

use super::{FormatPlan, FormatSpec};
use crate::column::canonical_column_key;
use crate::error::XlsxJsonError;

/// `[format]`ディレクティブをシートごとの書式プランに解決する
///
/// # 引数
///
/// * `spec` - デコード済みの`[format]`サブツリー（存在しない場合は`None`）
/// * `sheet_names` - 実際に出力されるシート名（出力順）
///
/// # 戻り値
///
/// * `Ok((plans, warnings))` - シート名 -> プランのマップ（`sheet_names`と
///   同順、全シート分のエントリを含む）と、非致命的な警告メッセージ
/// * `Err(XlsxJsonError::InvalidFormatValue)` - 数値でない・0以下の寸法値、
///   または不正な行番号キー
/// * `Err(XlsxJsonError::InvalidColumnIdentifier)` - 解釈できない列識別子
///
/// # マージ順序
///
/// 1. `defaults`のスカラー（全シートへ）
/// 2. `sheets.<name>`のスカラー（該当シートのみ上書き）
/// 3. `defaults`の特定マップ（全シートへエントリ単位でマージ）
/// 4. `sheets.<name>`の特定マップ（同一キーのエントリを上書き）
///
/// 出力シートに存在しない`sheets.<name>`エントリは警告として記録され、
/// その内容は検証されずに破棄されます（変換は継続）。
pub(crate) fn resolve_plans(
    spec: Option<&FormatSpec>,
    sheet_names: &[String],
) -> Result<(IndexMap<String, FormatPlan>, Vec<String>), XlsxJsonError> {
    let mut plans: IndexMap<String, FormatPlan> = sheet_names
        .iter()
        .map(|name| (name.clone(), FormatPlan::default()))
        .collect();
    let mut warnings = Vec::new();

    let spec = match spec {
        Some(spec) => spec,
        None => return Ok((plans, warnings)),
    };

    // パス1: グローバル既定スカラー
    if let Some(defaults) = &spec.defaults {
        if let Some(height) = defaults.row_height {
            let height = validate_dimension(height, "defaults.rowHeight")?;
            for plan in plans.values_mut() {
                plan.row_height = Some(height);
            }
        }
        if let Some(width) = defaults.column_width {
            let width = validate_dimension(width, "defaults.columnWidth")?;
            for plan in plans.values_mut() {
                plan.column_width = Some(width);
            }
        }
    }

    // パス2: シート別スカラー（未知のシート参照はここで警告して破棄）
    for (sheet_name, section) in &spec.sheets {
        let plan = match plans.get_mut(sheet_name.as_str()) {
            Some(plan) => plan,
            None => {
                warnings.push(format!(
                    "[format].sheets entry '{}' does not match any output sheet; its directives were ignored",
                    sheet_name
                ));
                continue;
            }
        };

        if let Some(height) = section.row_height {
            plan.row_height =
                Some(validate_dimension(height, &format!("sheets.{}.rowHeight", sheet_name))?);
        }
        if let Some(width) = section.column_width {
            plan.column_width =
                Some(validate_dimension(width, &format!("sheets.{}.columnWidth", sheet_name))?);
        }
    }

    // パス3: グローバル特定マップ（全シートへマージ）
    if let Some(defaults) = &spec.defaults {
        for (key, &value) in &defaults.row_heights {
            let row = parse_row_key(key)?;
            let value =
                validate_dimension(value, &format!("defaults.rowHeights['{}']", key))?;
            for plan in plans.values_mut() {
                plan.row_heights.insert(row, value);
            }
        }
        for (key, &value) in &defaults.column_widths {
            let column = canonical_column_key(key)?;
            let value =
                validate_dimension(value, &format!("defaults.columnWidths['{}']", key))?;
            for plan in plans.values_mut() {
                plan.column_widths.insert(column.clone(), value);
            }
        }
    }

    // パス4: シート別特定マップ（同一エントリを上書き）
    for (sheet_name, section) in &spec.sheets {
        let plan = match plans.get_mut(sheet_name.as_str()) {
            Some(plan) => plan,
            None => continue, // 警告はパス2で記録済み
        };

        for (key, &value) in &section.row_heights {
            let row = parse_row_key(key)?;
            let value = validate_dimension(
                value,
                &format!("sheets.{}.rowHeights['{}']", sheet_name, key),
            )?;
            plan.row_heights.insert(row, value);
        }
        for (key, &value) in &section.column_widths {
            let column = canonical_column_key(key)?;
            let value = validate_dimension(
                value,
                &format!("sheets.{}.columnWidths['{}']", sheet_name, key),
            )?;
            plan.column_widths.insert(column, value);
        }
    }

    Ok((plans, warnings))
}

/// 寸法値（行高・列幅）を検証する
///
/// 正の有限数のみを受理します。
fn validate_dimension(value: f64, context: &str) -> Result<f64, XlsxJsonError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(XlsxJsonError::InvalidFormatValue(format!(
            "{} must be a positive number, got {}",
            context, value
        )));
    }
    Ok(value)
}

/// `rowHeights`のキーを1始まりの行番号として解析する
///
/// 行1はヘッダー直後の最初のデータ行を指します。
fn parse_row_key(key: &str) -> Result<u32, XlsxJsonError> {
    let row: u32 = key.parse().map_err(|_| {
        XlsxJsonError::InvalidFormatValue(format!(
            "rowHeights key '{}' must be a positive integer (1 = first data row)",
            key
        ))
    })?;
    if row == 0 {
        return Err(XlsxJsonError::InvalidFormatValue(
            "rowHeights key '0' is invalid; row numbers are 1-based".to_string(),
        ));
    }
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec(value: serde_json::Value) -> FormatSpec {
        FormatSpec::from_json(value).unwrap()
    }

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_spec_yields_empty_plans() {
        let (plans, warnings) = resolve_plans(None, &names(&["S1", "S2"])).unwrap();

        assert_eq!(plans.len(), 2);
        assert_eq!(plans["S1"], FormatPlan::default());
        assert_eq!(plans["S2"], FormatPlan::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_default_scalars_apply_to_all_sheets() {
        let spec = spec(json!({"defaults": {"rowHeight": 20, "columnWidth": 15}}));
        let (plans, _) = resolve_plans(Some(&spec), &names(&["S1", "S2"])).unwrap();

        assert_eq!(plans["S1"].row_height, Some(20.0));
        assert_eq!(plans["S2"].row_height, Some(20.0));
        assert_eq!(plans["S1"].column_width, Some(15.0));
    }

    #[test]
    fn test_sheet_scalar_overrides_default_scalar() {
        let spec = spec(json!({
            "defaults": {"rowHeight": 20},
            "sheets": {"S1": {"rowHeight": 40}}
        }));
        let (plans, _) = resolve_plans(Some(&spec), &names(&["S1", "S2"])).unwrap();

        assert_eq!(plans["S1"].row_height, Some(40.0));
        assert_eq!(plans["S2"].row_height, Some(20.0));
    }

    #[test]
    fn test_default_maps_merge_into_all_sheets() {
        let spec = spec(json!({
            "defaults": {"rowHeights": {"2": 30}, "columnWidths": {"B": 18}}
        }));
        let (plans, _) = resolve_plans(Some(&spec), &names(&["S1", "S2"])).unwrap();

        assert_eq!(plans["S1"].row_heights.get(&2), Some(&30.0));
        assert_eq!(plans["S2"].row_heights.get(&2), Some(&30.0));
        assert_eq!(plans["S1"].column_widths.get("B"), Some(&18.0));
    }

    #[test]
    fn test_sheet_map_overrides_default_map_entrywise() {
        let spec = spec(json!({
            "defaults": {"columnWidths": {"A": 10, "B": 11}},
            "sheets": {"S1": {"columnWidths": {"A": 99}}}
        }));
        let (plans, _) = resolve_plans(Some(&spec), &names(&["S1", "S2"])).unwrap();

        // エントリ単位の上書き: "A"のみ置き換わり、"B"は既定値のまま
        assert_eq!(plans["S1"].column_widths.get("A"), Some(&99.0));
        assert_eq!(plans["S1"].column_widths.get("B"), Some(&11.0));
        assert_eq!(plans["S2"].column_widths.get("A"), Some(&10.0));
    }

    #[test]
    fn test_specific_map_coexists_with_scalar_default() {
        // スカラー既定15と特定マップA=25は別フィールドとして共存する
        let spec = spec(json!({
            "defaults": {"columnWidth": 15, "columnWidths": {"A": 25}}
        }));
        let (plans, _) = resolve_plans(Some(&spec), &names(&["Sheet1"])).unwrap();

        assert_eq!(plans["Sheet1"].column_width, Some(15.0));
        assert_eq!(plans["Sheet1"].column_widths.get("A"), Some(&25.0));
    }

    #[test]
    fn test_numeric_and_letter_column_keys_resolve_identically() {
        let letter = spec(json!({"defaults": {"columnWidths": {"A": 25}}}));
        let numeric = spec(json!({"defaults": {"columnWidths": {"1": 25}}}));

        let (letter_plans, _) = resolve_plans(Some(&letter), &names(&["S"])).unwrap();
        let (numeric_plans, _) = resolve_plans(Some(&numeric), &names(&["S"])).unwrap();

        assert_eq!(letter_plans["S"], numeric_plans["S"]);
        assert_eq!(letter_plans["S"].column_widths.get("A"), Some(&25.0));
    }

    #[test]
    fn test_numeric_key_overrides_letter_key_for_same_column() {
        // 同一マップ内で"1"と"A"が共存した場合も同じ列に解決される
        let spec = spec(json!({
            "defaults": {"columnWidths": {"A": 10}},
            "sheets": {"S": {"columnWidths": {"1": 20}}}
        }));
        let (plans, _) = resolve_plans(Some(&spec), &names(&["S"])).unwrap();

        assert_eq!(plans["S"].column_widths.len(), 1);
        assert_eq!(plans["S"].column_widths.get("A"), Some(&20.0));
    }

    #[test]
    fn test_unknown_sheet_reference_warns_and_continues() {
        let spec = spec(json!({
            "sheets": {"Ghost": {"rowHeight": 10}}
        }));
        let (plans, warnings) = resolve_plans(Some(&spec), &names(&["S1"])).unwrap();

        assert_eq!(plans["S1"], FormatPlan::default());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Ghost"));
    }

    #[test]
    fn test_unknown_sheet_contents_are_discarded_unvalidated() {
        // 破棄されるエントリの中身は検証されない（警告のみ）
        let spec = spec(json!({
            "sheets": {"Ghost": {"rowHeight": -5}}
        }));
        let result = resolve_plans(Some(&spec), &names(&["S1"]));

        assert!(result.is_ok());
        assert_eq!(result.unwrap().1.len(), 1);
    }

    #[test]
    fn test_negative_dimension_fails() {
        let spec = spec(json!({"defaults": {"columnWidths": {"A": -5}}}));
        let result = resolve_plans(Some(&spec), &names(&["S"]));

        match result {
            Err(XlsxJsonError::InvalidFormatValue(msg)) => {
                assert!(msg.contains("positive"));
            }
            _ => panic!("Expected InvalidFormatValue error"),
        }
    }

    #[test]
    fn test_zero_dimension_fails() {
        let spec = spec(json!({"defaults": {"rowHeight": 0}}));
        assert!(matches!(
            resolve_plans(Some(&spec), &names(&["S"])),
            Err(XlsxJsonError::InvalidFormatValue(_))
        ));
    }

    #[test]
    fn test_invalid_row_key_fails() {
        for key in ["0", "-1", "1.5", "abc"] {
            let spec = spec(json!({"defaults": {"rowHeights": {key: 20}}}));
            let result = resolve_plans(Some(&spec), &names(&["S"]));
            assert!(
                matches!(result, Err(XlsxJsonError::InvalidFormatValue(_))),
                "row key '{}' should be rejected",
                key
            );
        }
    }

    #[test]
    fn test_invalid_column_key_fails() {
        let spec = spec(json!({"defaults": {"columnWidths": {"A1": 20}}}));
        assert!(matches!(
            resolve_plans(Some(&spec), &names(&["S"])),
            Err(XlsxJsonError::InvalidColumnIdentifier(_))
        ));
    }

    #[test]
    fn test_plans_follow_sheet_order() {
        let spec = spec(json!({"defaults": {"rowHeight": 12}}));
        let (plans, _) = resolve_plans(Some(&spec), &names(&["Z", "A", "M"])).unwrap();

        let order: Vec<&String> = plans.keys().collect();
        assert_eq!(order, vec!["Z", "A", "M"]);
    }
}
