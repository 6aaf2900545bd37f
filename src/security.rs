//! Security Module
//!
//! XLSXパッケージを開く際の制限を実装するモジュール。
//! ZIP bomb、パストラバーサルなど、信頼できないワークブックへの対策を提供します。

use crate::error::SheetpostError;

/// パッケージ読み込み時の制限値
#[derive(Debug, Clone)]
pub(crate) struct PackageLimits {
    /// ZIPアーカイブ内の最大パーツ数
    /// デフォルト: 10000
    pub max_part_count: usize,
    /// 単一パーツの展開後の最大サイズ（バイト）
    /// デフォルト: 100MB
    pub max_part_size: u64,
    /// 全パーツの展開後サイズの合計上限（バイト）
    /// デフォルト: 1GB
    pub max_total_size: u64,
}

impl Default for PackageLimits {
    fn default() -> Self {
        Self {
            max_part_count: 10_000,
            max_part_size: 104_857_600,     // 100MB
            max_total_size: 1_073_741_824, // 1GB
        }
    }
}

impl PackageLimits {
    /// アーカイブ全体のパーツ数を検証する
    pub fn check_part_count(&self, count: usize) -> Result<(), SheetpostError> {
        if count > self.max_part_count {
            return Err(SheetpostError::SecurityViolation(format!(
                "ZIP archive contains too many parts: {} (max: {})",
                count, self.max_part_count
            )));
        }
        Ok(())
    }

    /// 単一パーツのサイズを検証し、累計サイズを更新する
    ///
    /// # 引数
    ///
    /// * `name` - パーツ名（エラーメッセージ用）
    /// * `size` - 展開後のサイズ
    /// * `total` - これまでの累計サイズ（更新される）
    pub fn check_part_size(
        &self,
        name: &str,
        size: u64,
        total: &mut u64,
    ) -> Result<(), SheetpostError> {
        if size > self.max_part_size {
            return Err(SheetpostError::SecurityViolation(format!(
                "Part '{}' exceeds maximum size: {} bytes (max: {} bytes)",
                name, size, self.max_part_size
            )));
        }

        *total = total.checked_add(size).ok_or_else(|| {
            SheetpostError::SecurityViolation(
                "Total decompressed size calculation overflow".to_string(),
            )
        })?;

        if *total > self.max_total_size {
            return Err(SheetpostError::SecurityViolation(format!(
                "Total decompressed size exceeds maximum: {} bytes (max: {} bytes)",
                total, self.max_total_size
            )));
        }
        Ok(())
    }
}

/// パーツ名の検証
///
/// 空の名前、絶対パス、`..`、バックスラッシュを含む名前を拒否します。
pub(crate) fn validate_part_name(name: &str) -> Result<(), SheetpostError> {
    let reason = if name.is_empty() {
        Some("empty part name".to_string())
    } else if name.starts_with('/') || name.get(1..3) == Some(":\\") {
        Some(format!("absolute part name: {}", name))
    } else if name.split('/').any(|segment| segment == "..") {
        Some(format!("path traversal detected: {}", name))
    } else if name.contains('\\') {
        Some(format!("backslash in part name: {}", name))
    } else {
        None
    };

    match reason {
        Some(reason) => Err(SheetpostError::SecurityViolation(format!(
            "Invalid ZIP path: {}",
            reason
        ))),
        None => Ok(()),
    }
}
