//! Error Kind - Classification of errors
//!
//! Defines the [`ErrorKind`] enum shared by every SDK component.

use serde::Serialize;

/// エラー種別の列挙体
///
/// SDK 全体で共通のエラー分類を定義します。
/// 呼び出し側はこの分類だけを見て、再試行・キャンセル表示・失敗表示を判断できます。
///
/// ## Notes
/// * `non_exhaustive` - 将来的に列挙子が追加される可能性があることを示す
///
/// ## Examples
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// let kind = ErrorKind::Transport;
/// assert!(kind.is_retryable());
/// assert_eq!(kind.as_str(), "Transport Error");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// 呼び出し側が渡した値が不正
    InvalidInput,
    /// 設定値（環境変数・構成）が不正
    InvalidConfiguration,
    /// 暗号処理（鍵の復号など）に失敗
    Crypto,
    /// 通信エラー、または不正なレスポンス
    Transport,
    /// ベンダー 3DS エンジンの失敗
    Engine,
    /// 現在の状態と競合（チャレンジが既に進行中など）
    Conflict,
    /// ユーザーによるキャンセル
    Cancelled,
    /// タイムアウト
    Timeout,
    /// 認証が拒否された、または完了しなかった
    AuthenticationFailed,
    /// 内部エラー
    Internal,
}

impl ErrorKind {
    /// ユーザー向けの文字列表現を取得
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::kind::ErrorKind;
    /// assert_eq!(ErrorKind::Cancelled.as_str(), "Cancelled");
    /// ```
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "Invalid Input",
            ErrorKind::InvalidConfiguration => "Invalid Configuration",
            ErrorKind::Crypto => "Crypto Error",
            ErrorKind::Transport => "Transport Error",
            ErrorKind::Engine => "Engine Error",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::Cancelled => "Cancelled",
            ErrorKind::Timeout => "Timeout",
            ErrorKind::AuthenticationFailed => "Authentication Failed",
            ErrorKind::Internal => "Internal Error",
        }
    }

    /// 再試行で回復し得るエラーかどうかを判定
    ///
    /// SDK 自身は再試行しません。判断は呼び出し側に委ねます。
    #[inline]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Transport | ErrorKind::Timeout)
    }

    /// ユーザー操作による中断かどうかを判定
    #[inline]
    pub const fn is_cancellation(&self) -> bool {
        matches!(self, ErrorKind::Cancelled)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
