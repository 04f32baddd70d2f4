//! Column Addressing Module
//!
//! 1始まりの列番号とExcel列文字（"A", "B", ... "AA", ...）の相互変換を
//! 提供するモジュール。純粋関数のみで、状態を持ちません。

use crate::error::XlsxJsonError;

/// Excelの最大列数（列"XFD"に対応）
pub(crate) const MAX_COLUMNS: u32 = 16_384;

/// 1始まりの列番号をExcel列文字に変換する
///
/// 全単射26進法（bijective base-26）を使用します:
/// 1 -> "A", 26 -> "Z", 27 -> "AA", 28 -> "AB", 703 -> "AAA"
///
/// # 引数
///
/// * `index` - 1始まりの列番号（0は呼び出し側の契約違反）
///
/// # 戻り値
///
/// 大文字の列文字
pub(crate) fn index_to_letters(index: u32) -> String {
    debug_assert!(index >= 1, "column index is 1-based");

    let mut n = index;
    let mut result = String::new();
    while n > 0 {
        let remainder = (n - 1) % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        n = (n - 1) / 26;
    }
    result
}

/// Excel列文字を1始まりの列番号に変換する
///
/// 大文字・小文字を区別せずに解釈します。
///
/// # 引数
///
/// * `letters` - 列文字（"A", "ab", "XFD"など）
///
/// # 戻り値
///
/// * `Ok(u32)` - 1始まりの列番号
/// * `Err(XlsxJsonError::InvalidColumnIdentifier)` - 空文字列、英字以外の
///   文字を含む、またはオーバーフローする場合
pub(crate) fn letters_to_index(letters: &str) -> Result<u32, XlsxJsonError> {
    if letters.is_empty() {
        return Err(XlsxJsonError::InvalidColumnIdentifier(
            "empty column identifier".to_string(),
        ));
    }

    let mut index: u32 = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return Err(XlsxJsonError::InvalidColumnIdentifier(format!(
                "'{}' is not a column letter or 1-based column number",
                letters
            )));
        }
        let digit = (ch.to_ascii_uppercase() as u8 - b'A') as u32 + 1;
        index = index
            .checked_mul(26)
            .and_then(|v| v.checked_add(digit))
            .ok_or_else(|| {
                XlsxJsonError::InvalidColumnIdentifier(format!(
                    "column identifier '{}' is out of range",
                    letters
                ))
            })?;
    }

    Ok(index)
}

/// 列識別子を正規化された列文字に解決する
///
/// `columnWidths`マップのキーには列文字（"A"）と1始まりの10進数文字列
/// （"1"）が混在できるため、両形式を受理して正規の大文字列文字に統一
/// します。同じ列を指す2つの形式は同じキーに解決されます。
///
/// # 引数
///
/// * `key` - 列識別子（"A", "ab", "1", "28"など）
///
/// # 戻り値
///
/// * `Ok(String)` - 正規化された大文字の列文字（"1" -> "A", "ab" -> "AB"）
/// * `Err(XlsxJsonError::InvalidColumnIdentifier)` - どちらの形式でも
///   解釈できない場合（"A1", "0", "-3"など）
pub(crate) fn canonical_column_key(key: &str) -> Result<String, XlsxJsonError> {
    if !key.is_empty() && key.chars().all(|c| c.is_ascii_digit()) {
        let index: u32 = key.parse().map_err(|_| {
            XlsxJsonError::InvalidColumnIdentifier(format!(
                "column number '{}' is out of range",
                key
            ))
        })?;
        if index == 0 {
            return Err(XlsxJsonError::InvalidColumnIdentifier(
                "column numbers are 1-based; '0' is not a valid column".to_string(),
            ));
        }
        return Ok(index_to_letters(index));
    }

    let index = letters_to_index(key)?;
    Ok(index_to_letters(index))
}
