//! Error Kind - Classification of errors
//!
//! Defines the [`ErrorKind`] enum for classifying client-side failures.

use serde::Serialize;

/// エラー種別の列挙体
///
/// クライアント側で発生するエラーの分類を定義します。
/// 各バリアントは仕様上のエラーコード族（`validation/*`, `auth/*`,
/// `http/*`, `special/*`, `network/*`）にマッピングされます。
///
/// ## Notes
/// * `non_exhaustive` - 将来的に列挙子が追加される可能性があることを示す
///
/// ## Examples
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// let kind = ErrorKind::Timeout;
/// assert_eq!(kind.code_prefix(), "network");
/// assert_eq!(kind.as_str(), "Timeout");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// 入力検証エラー: ネットワーク呼び出し前に検出される
    Validation,
    /// 401 - Unauthorized: 資格情報が不正
    Unauthorized,
    /// 403 - Forbidden: アカウントがロック/無効化されている
    Forbidden,
    /// 404 - Not Found: リソースが見つからない
    NotFound,
    /// 409 - Conflict: ユーザー名/メールの重複など
    Conflict,
    /// 410 - Gone: リソースが削除された/期限切れ
    Gone,
    /// 429 - Too Many Requests: レート制限超過
    TooManyRequests,
    /// 5xx - バックエンド側のサーバーエラー
    ServerError,
    /// IDプロバイダ (Firebase) 由来のエラー
    Provider,
    /// 特例フロー（special-case）由来のエラー
    SpecialCase,
    /// ネットワーク障害: 接続不可、DNS失敗など
    NetworkError,
    /// リクエストタイムアウト（中断タイマー発火）
    Timeout,
    /// クライアント内部エラー
    Internal,
}

impl ErrorKind {
    /// 仕様上のエラーコード族のプレフィックスを取得
    ///
    /// ## Returns
    /// `validation` / `auth` / `http` / `special` / `network` / `internal`
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::kind::ErrorKind;
    /// assert_eq!(ErrorKind::Validation.code_prefix(), "validation");
    /// assert_eq!(ErrorKind::Unauthorized.code_prefix(), "http");
    /// ```
    #[inline]
    pub const fn code_prefix(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Provider => "auth",
            ErrorKind::SpecialCase => "special",
            ErrorKind::NetworkError | ErrorKind::Timeout => "network",
            ErrorKind::Unauthorized
            | ErrorKind::Forbidden
            | ErrorKind::NotFound
            | ErrorKind::Conflict
            | ErrorKind::Gone
            | ErrorKind::TooManyRequests
            | ErrorKind::ServerError => "http",
            ErrorKind::Internal => "internal",
        }
    }

    /// 対応する HTTP ステータスコードを取得（存在する場合）
    ///
    /// トランスポート/検証/内部エラーには対応するステータスがないため
    /// `None` を返します。
    #[inline]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            ErrorKind::Unauthorized => Some(401),
            ErrorKind::Forbidden => Some(403),
            ErrorKind::NotFound => Some(404),
            ErrorKind::Conflict => Some(409),
            ErrorKind::Gone => Some(410),
            ErrorKind::TooManyRequests => Some(429),
            ErrorKind::ServerError => Some(500),
            _ => None,
        }
    }

    /// バックエンドの HTTP ステータスからエラー種別を分類
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::kind::ErrorKind;
    /// assert_eq!(ErrorKind::from_status(401), ErrorKind::Unauthorized);
    /// assert_eq!(ErrorKind::from_status(503), ErrorKind::ServerError);
    /// ```
    #[inline]
    pub const fn from_status(status: u16) -> Self {
        match status {
            401 => ErrorKind::Unauthorized,
            403 => ErrorKind::Forbidden,
            404 => ErrorKind::NotFound,
            409 => ErrorKind::Conflict,
            410 => ErrorKind::Gone,
            429 => ErrorKind::TooManyRequests,
            s if s >= 500 => ErrorKind::ServerError,
            _ => ErrorKind::Internal,
        }
    }

    /// ユーザー向けの文字列表現を取得
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "Validation",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::NotFound => "Not Found",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::Gone => "Gone",
            ErrorKind::TooManyRequests => "Too Many Requests",
            ErrorKind::ServerError => "Server Error",
            ErrorKind::Provider => "Provider",
            ErrorKind::SpecialCase => "Special Case",
            ErrorKind::NetworkError => "Network Error",
            ErrorKind::Timeout => "Timeout",
            ErrorKind::Internal => "Internal",
        }
    }

    /// フォールバックで回復可能なエラーかどうかを判定
    ///
    /// プロバイダ/トランスポート系のエラーはオーケストレータの
    /// フォールバック対象となるため `true` を返します。
    #[inline]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ErrorKind::Provider | ErrorKind::NetworkError | ErrorKind::Timeout
        )
    }

    /// トランスポート層のエラーかどうかを判定
    #[inline]
    pub const fn is_transport(&self) -> bool {
        matches!(self, ErrorKind::NetworkError | ErrorKind::Timeout)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_prefixes() {
        assert_eq!(ErrorKind::Validation.code_prefix(), "validation");
        assert_eq!(ErrorKind::Provider.code_prefix(), "auth");
        assert_eq!(ErrorKind::SpecialCase.code_prefix(), "special");
        assert_eq!(ErrorKind::NetworkError.code_prefix(), "network");
        assert_eq!(ErrorKind::Timeout.code_prefix(), "network");
        assert_eq!(ErrorKind::Unauthorized.code_prefix(), "http");
        assert_eq!(ErrorKind::TooManyRequests.code_prefix(), "http");
        assert_eq!(ErrorKind::Internal.code_prefix(), "internal");
    }

    #[test]
    fn test_from_status() {
        assert_eq!(ErrorKind::from_status(401), ErrorKind::Unauthorized);
        assert_eq!(ErrorKind::from_status(403), ErrorKind::Forbidden);
        assert_eq!(ErrorKind::from_status(404), ErrorKind::NotFound);
        assert_eq!(ErrorKind::from_status(409), ErrorKind::Conflict);
        assert_eq!(ErrorKind::from_status(410), ErrorKind::Gone);
        assert_eq!(ErrorKind::from_status(429), ErrorKind::TooManyRequests);
        assert_eq!(ErrorKind::from_status(500), ErrorKind::ServerError);
        assert_eq!(ErrorKind::from_status(503), ErrorKind::ServerError);
        assert_eq!(ErrorKind::from_status(418), ErrorKind::Internal);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ErrorKind::Unauthorized.status_code(), Some(401));
        assert_eq!(ErrorKind::ServerError.status_code(), Some(500));
        assert_eq!(ErrorKind::Validation.status_code(), None);
        assert_eq!(ErrorKind::Timeout.status_code(), None);
    }

    #[test]
    fn test_is_recoverable() {
        assert!(ErrorKind::Provider.is_recoverable());
        assert!(ErrorKind::NetworkError.is_recoverable());
        assert!(ErrorKind::Timeout.is_recoverable());
        assert!(!ErrorKind::Validation.is_recoverable());
        assert!(!ErrorKind::Unauthorized.is_recoverable());
    }

    #[test]
    fn test_is_transport() {
        assert!(ErrorKind::NetworkError.is_transport());
        assert!(ErrorKind::Timeout.is_transport());
        assert!(!ErrorKind::Provider.is_transport());
    }
}
