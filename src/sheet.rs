//! Sheet Model Module
//!
//! 両変換方向で共有する、表データのメモリ内表現を定義するモジュール。
//! 列順序は「最初に出現した順」で安定しており、アルファベット順への
//! 並べ替えは決して行いません。

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::XlsxJsonError;

/// 1行分のレコード（列名 -> 文字列値、挿入順を保持）
pub(crate) type Record = IndexMap<String, String>;

/// 1シート分の表データ
///
/// - `columns`: 全レコードのキーを最初に出現した順で並べた列シーケンス
/// - `rows`: 各行のレコード。レコードに存在しない列は空セルとして描画される
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Sheet {
    /// シート名
    pub name: String,

    /// 列名のシーケンス（重複なし、最初に出現した順）
    pub columns: Vec<String>,

    /// 行のシーケンス
    pub rows: Vec<Record>,
}

impl Sheet {
    /// 文字列化済みのセル行からシートを構築する（読み込み方向）
    ///
    /// 先頭行がヘッダー行となり、以降の行がレコードになります。
    ///
    /// # 決定事項
    ///
    /// - 空のヘッダーセルは `col_<i>`（iは0始まりの列インデックス）として
    ///   合成される
    /// - ヘッダー名が重複した場合、レコード上では後方の列の値が勝つ
    ///   （列シーケンスには最初の出現のみが残る）
    /// - 行末の欠損セルは空文字列として扱われる
    pub fn from_string_rows(name: &str, cell_rows: Vec<Vec<String>>) -> Self {
        let mut iter = cell_rows.into_iter();

        let header = match iter.next() {
            Some(header) => header,
            None => {
                return Self {
                    name: name.to_string(),
                    columns: Vec::new(),
                    rows: Vec::new(),
                }
            }
        };

        let header_names: Vec<String> = header
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                if cell.is_empty() {
                    format!("col_{}", i)
                } else {
                    cell.clone()
                }
            })
            .collect();

        let mut columns: Vec<String> = Vec::new();
        for header_name in &header_names {
            if !columns.contains(header_name) {
                columns.push(header_name.clone());
            }
        }

        let rows = iter
            .map(|cells| {
                let mut record = Record::new();
                for (i, header_name) in header_names.iter().enumerate() {
                    let value = cells.get(i).cloned().unwrap_or_default();
                    // IndexMap::insertは既存キーの位置を保持したまま値を置き換える
                    record.insert(header_name.clone(), value);
                }
                record
            })
            .collect();

        Self {
            name: name.to_string(),
            columns,
            rows,
        }
    }

    /// JSONレコード配列からシートを構築する（書き込み方向）
    ///
    /// 列シーケンスは全レコードを走査した際の「キーの最初の出現順」です。
    /// デコード済みJSONオブジェクトの走査順がソースの記述順であることを
    /// 前提としています（serde_jsonの`preserve_order`）。
    ///
    /// # 戻り値
    ///
    /// * `Err(XlsxJsonError::InvalidInputShape)` - レコードがオブジェクトで
    ///   ない場合、またはセル値がネストした配列・オブジェクトの場合
    pub fn from_records(name: &str, records: &[Value]) -> Result<Self, XlsxJsonError> {
        let mut columns: Vec<String> = Vec::new();
        let mut rows = Vec::with_capacity(records.len());

        for (row_idx, value) in records.iter().enumerate() {
            let object = value.as_object().ok_or_else(|| {
                XlsxJsonError::InvalidInputShape(format!(
                    "sheet '{}': row {} is not an object",
                    name,
                    row_idx + 1
                ))
            })?;

            let mut record = Record::new();
            for (key, cell) in object {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }

                let text = scalar_to_string(cell).ok_or_else(|| {
                    XlsxJsonError::InvalidInputShape(format!(
                        "sheet '{}': row {}, key '{}' holds a nested {}; records must be flat",
                        name,
                        row_idx + 1,
                        key,
                        if cell.is_array() { "array" } else { "object" }
                    ))
                })?;
                record.insert(key.clone(), text);
            }
            rows.push(record);
        }

        Ok(Self {
            name: name.to_string(),
            columns,
            rows,
        })
    }

    /// シートをJSONレコード配列として描画する（読み込み方向の出力）
    ///
    /// 各レコードは列シーケンス順のオブジェクトになり、レコードに存在
    /// しない列は空文字列で埋められます。
    pub fn to_json_rows(&self) -> Vec<Value> {
        self.rows
            .iter()
            .map(|record| {
                let mut object = serde_json::Map::new();
                for column in &self.columns {
                    let value = record.get(column).cloned().unwrap_or_default();
                    object.insert(column.clone(), Value::String(value));
                }
                Value::Object(object)
            })
            .collect()
    }
}

/// JSONスカラー値をセル文字列に変換する
///
/// ネストした配列・オブジェクトは`None`（呼び出し側で形状エラーにする）。
/// 論理値は読み込み方向のセル文字列化と揃えて`TRUE`/`FALSE`。
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(true) => Some("TRUE".to_string()),
        Value::Bool(false) => Some("FALSE".to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => None,
    }
}
