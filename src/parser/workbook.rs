//! Workbook Parser
//!
//! calamineのラッパーとして、ワークブックレベルの読み込み操作を提供します。

use calamine::{open_workbook_auto_from_rs, Reader, Sheets, Xlsx};
use std::io::{Cursor, Read, Seek};

use crate::builder::ConversionConfig;
use crate::error::XlsxJsonError;
use crate::formatter::CellFormatter;
use crate::security::SecurityConfig;
use crate::sheet::Sheet;

/// ワークブックパーサー
///
/// calamineのラッパーとして、ワークブックレベルの操作を提供します。
pub(crate) struct WorkbookParser {
    /// calamineのワークブック（XLSX形式のみサポート）
    workbook: Xlsx<Cursor<Vec<u8>>>,
}

impl WorkbookParser {
    /// ワークブックを開く
    ///
    /// 入力全体をメモリに読み込んでから解析します。バッファは呼び出し
    /// スコープに閉じており、失敗時を含むすべての経路で解放されます。
    ///
    /// # 引数
    ///
    /// * `reader` - Excelファイルを読み込むためのリーダー（Read + Seekトレイトを実装）
    /// * `security` - リソース制限の設定
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookParser)` - ワークブックの読み込みに成功した場合
    /// * `Err(XlsxJsonError::LimitExceeded)` - 入力サイズが上限を超えた場合
    /// * `Err(XlsxJsonError::Parse)` - 解析に失敗した場合
    /// * `Err(XlsxJsonError::Config)` - XLSX以外の形式だった場合
    pub fn open<R: Read + Seek>(
        mut reader: R,
        security: &SecurityConfig,
    ) -> Result<Self, XlsxJsonError> {
        let mut buffer = Vec::new();
        let bytes_read = reader.read_to_end(&mut buffer)?;

        if bytes_read as u64 > security.max_input_file_size {
            return Err(XlsxJsonError::LimitExceeded(format!(
                "input file size exceeds maximum: {} bytes (max: {} bytes)",
                bytes_read, security.max_input_file_size
            )));
        }

        let sheets = open_workbook_auto_from_rs(Cursor::new(buffer)).map_err(XlsxJsonError::Parse)?;
        let workbook = match sheets {
            Sheets::Xlsx(workbook) => workbook,
            _ => {
                return Err(XlsxJsonError::Config(
                    "Only XLSX format is supported".to_string(),
                ))
            }
        };

        Ok(WorkbookParser { workbook })
    }

    /// すべてのシート名を取得
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names().to_vec()
    }

    /// ワークブック全体をシートモデルの列に変換する
    ///
    /// シートはワークブック内の定義順に処理されます。
    ///
    /// # 戻り値
    ///
    /// * `Ok(Vec<Sheet>)` - 全シート（定義順）
    /// * `Err(XlsxJsonError::EmptyWorkbook)` - シートが1つも存在しない場合
    pub fn parse_workbook(
        &mut self,
        formatter: &CellFormatter,
        config: &ConversionConfig,
    ) -> Result<Vec<Sheet>, XlsxJsonError> {
        let sheet_names = self.sheet_names();
        if sheet_names.is_empty() {
            return Err(XlsxJsonError::EmptyWorkbook);
        }

        sheet_names
            .iter()
            .map(|name| self.parse_sheet(name, formatter, config))
            .collect()
    }

    /// 1シートをパースしてシートモデルに変換する
    ///
    /// すべてのセル値は元の型にかかわらず文字列化されます（空のシートは
    /// 列も行も持たないシートモデルになります）。
    pub fn parse_sheet(
        &mut self,
        sheet_name: &str,
        formatter: &CellFormatter,
        config: &ConversionConfig,
    ) -> Result<Sheet, XlsxJsonError> {
        let range = self
            .workbook
            .worksheet_range(sheet_name)
            .map_err(|e| XlsxJsonError::Parse(e.into()))?;

        let mut cell_rows = Vec::new();
        for row in range.rows() {
            let mut cells = Vec::with_capacity(row.len());
            for cell in row {
                cells.push(formatter.format_data(cell, config)?);
            }
            cell_rows.push(cells);
        }

        Ok(Sheet::from_string_rows(sheet_name, cell_rows))
    }
}

// テストは統合テスト（tests/）で実装します。
// 実際のXLSXファイルが必要なため、単体テストではなく統合テストとして実装します。
