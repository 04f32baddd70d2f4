//! Security Module
//!
//! 入力サイズに関するリソース制限を定義するモジュール。
//! ホスト側プラットフォームは任意のファイル・文字列を渡してくるため、
//! 解析を始める前にサイズ上限を適用します。

/// リソース制限の設定
///
/// 変換1回あたりの入力サイズ上限を定義します。
#[derive(Debug, Clone)]
pub(crate) struct SecurityConfig {
    /// 入力ワークブックの最大サイズ（バイト）
    /// デフォルト: 2GB (2_147_483_648 bytes)
    pub max_input_file_size: u64,
    /// 入力JSONペイロードの最大サイズ（バイト）
    /// デフォルト: 1GB (1_073_741_824 bytes)
    pub max_json_payload_size: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_input_file_size: 2_147_483_648,  // 2GB
            max_json_payload_size: 1_073_741_824, // 1GB
        }
    }
}
