//! Formatter Module
//!
//! セル値の文字列化処理を提供するモジュール。
//! 読み込み方向では、セルの元の型（数値、日付、論理値、数式結果）に
//! かかわらず、すべての値を文字列表現に統一してからJSONに出力します。

use calamine::Data;
use chrono::{Duration, NaiveDate, NaiveTime};

use crate::api::DateFormat;
use crate::builder::ConversionConfig;
use crate::error::XlsxJsonError;

/// 1日の秒数
const SECONDS_PER_DAY: f64 = 86_400.0;

/// セルフォーマッター
///
/// セル値の文字列化処理のファサードとして機能します。
#[derive(Debug)]
pub(crate) struct CellFormatter {
    /// 日付フォーマッター
    date_formatter: DateFormatter,

    /// 数値フォーマッター
    number_formatter: NumberFormatter,
}

impl CellFormatter {
    /// 新しいCellFormatterインスタンスを生成
    pub fn new() -> Self {
        Self {
            date_formatter: DateFormatter,
            number_formatter: NumberFormatter,
        }
    }

    /// calamineのセル値を文字列に変換する
    ///
    /// # 文字列化ポリシー（固定）
    ///
    /// - 整数値: `18` -> `"18"`
    /// - 浮動小数: 小数部のない値は整数表記（`18.0` -> `"18"`）、それ以外は
    ///   最短の10進表記
    /// - 論理値: `"TRUE"` / `"FALSE"`
    /// - 日付: `DateFormat`に従う（デフォルトはISO 8601の日付、時刻成分が
    ///   ある場合のみ ` HH:MM:SS` を付加）
    /// - エラー値: Excelの表示形式（`"#DIV/0!"`など）
    /// - 空セル: 空文字列
    pub fn format_data(
        &self,
        cell: &Data,
        config: &ConversionConfig,
    ) -> Result<String, XlsxJsonError> {
        let formatted = match cell {
            Data::Int(i) => i.to_string(),
            Data::Float(f) => self.number_formatter.format(*f),
            Data::String(s) => s.clone(),
            Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            Data::DateTime(dt) => self.date_formatter.format(dt.as_f64(), config)?,
            Data::DateTimeIso(s) => s.clone(),
            Data::DurationIso(s) => s.clone(),
            Data::Error(e) => e.to_string(),
            Data::Empty => String::new(),
            _ => String::new(),
        };

        Ok(formatted)
    }
}

impl Default for CellFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// 日付フォーマッター
///
/// Excelのシリアル日付値を文字列に変換します。
/// 1900年エポック（1899年12月30日起算）として処理します。
///
/// # エポックシステム
///
/// エポックを1899-12-30に置くことで、Excelの1900年うるう年バグ
/// （存在しない1900-02-29がシリアル値60を占有する）を1900-03-01以降の
/// すべての日付について吸収します。1904年エポック（Mac版Excel）の
/// ワークブックは対象外です。
#[derive(Debug)]
pub(crate) struct DateFormatter;

impl DateFormatter {
    /// シリアル日付値をフォーマット
    ///
    /// # 引数
    ///
    /// * `serial_value` - Excelのシリアル日付値（整数部=日、小数部=時刻）
    /// * `config` - 変換設定（日付形式）
    ///
    /// # 戻り値
    ///
    /// * `Ok(String)` - フォーマット済み日付文字列
    /// * `Err(XlsxJsonError::Config)` - 日付演算がオーバーフローした場合
    pub fn format(
        &self,
        serial_value: f64,
        config: &ConversionConfig,
    ) -> Result<String, XlsxJsonError> {
        let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)
            .ok_or_else(|| XlsxJsonError::Config("Invalid epoch date".to_string()))?;

        let days = serial_value.floor();
        let mut date = epoch
            .checked_add_signed(Duration::days(days as i64))
            .ok_or_else(|| {
                XlsxJsonError::Config(format!(
                    "Date calculation overflow: serial_value={}",
                    serial_value
                ))
            })?;

        // 時刻成分（秒単位に丸め、繰り上がりで日を跨ぐ場合がある）
        let mut seconds = ((serial_value - days) * SECONDS_PER_DAY).round() as i64;
        if seconds >= SECONDS_PER_DAY as i64 {
            seconds -= SECONDS_PER_DAY as i64;
            date = date
                .checked_add_signed(Duration::days(1))
                .ok_or_else(|| XlsxJsonError::Config("Date calculation overflow".to_string()))?;
        }

        let formatted = if seconds == 0 {
            match &config.date_format {
                DateFormat::Iso8601 => date.format("%Y-%m-%d").to_string(),
                DateFormat::Custom(format_str) => date.format(format_str).to_string(),
            }
        } else {
            let time = NaiveTime::from_num_seconds_from_midnight_opt(seconds as u32, 0)
                .ok_or_else(|| {
                    XlsxJsonError::Config(format!("Invalid time fraction: {}", serial_value))
                })?;
            let datetime = date.and_time(time);
            match &config.date_format {
                DateFormat::Iso8601 => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
                DateFormat::Custom(format_str) => datetime.format(format_str).to_string(),
            }
        };

        Ok(formatted)
    }
}

/// 数値フォーマッター
///
/// 数値を文字列に変換します。小数部を持たない値は整数表記に正規化され、
/// `18.0`が`"18.0"`ではなく`"18"`になります。
#[derive(Debug)]
pub(crate) struct NumberFormatter;

impl NumberFormatter {
    /// f64で正確に表現できる整数の上限
    const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0; // 2^53

    /// 数値をフォーマット
    pub fn format(&self, value: f64) -> String {
        if value.is_finite() && value.fract() == 0.0 && value.abs() < Self::MAX_EXACT_INT {
            (value as i64).to_string()
        } else {
            value.to_string()
        }
    }
}
