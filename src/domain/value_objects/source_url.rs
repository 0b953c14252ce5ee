use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use url::Url;

/// SourceURL関連のエラー
#[derive(Debug, Error, PartialEq)]
pub enum SourceUrlError {
    #[error("Empty URL")]
    Empty,

    #[error("Relative URL '{0}' requires a ztps_server to resolve against")]
    MissingServer(String),

    #[error("Invalid URL '{url}': {reason}")]
    InvalidFormat { url: String, reason: String },
}

/// テンプレート取得先の絶対URL
///
/// 相対参照はプロビジョニングサーバーのアドレスを基準に解決される。
/// 解決は純粋関数であり、同じ入力に対して常に同じ結果を返す。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SourceUrl {
    /// 解決済みのURL文字列（入力をそのまま保持）
    url: String,

    /// パース済みのURL
    parsed: Url,
}

impl SourceUrl {
    /// 絶対URLからSourceUrlを作成
    pub fn new(url: &str) -> Result<Self, SourceUrlError> {
        let trimmed = url.trim();
        if trimmed.is_empty() {
            return Err(SourceUrlError::Empty);
        }

        match Self::parse_absolute(trimmed) {
            Some(parsed) => Ok(Self {
                url: trimmed.to_string(),
                parsed,
            }),
            None => Err(SourceUrlError::InvalidFormat {
                url: trimmed.to_string(),
                reason: "not an absolute URL".to_string(),
            }),
        }
    }

    /// `url`を`server`を基準に解決する
    ///
    /// - スキームを持つ`url`はそのまま返す
    /// - 相対`url`は`server`とパスセグメントとして結合する（区切りのスラッシュは常に1つ）
    /// - 相対`url`で`server`が無い場合はエラー
    pub fn resolve(url: &str, server: Option<&str>) -> Result<Self, SourceUrlError> {
        let trimmed = url.trim();
        if trimmed.is_empty() {
            return Err(SourceUrlError::Empty);
        }

        if Self::is_absolute(trimmed) {
            return Self::new(trimmed);
        }

        let server = server
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| SourceUrlError::MissingServer(trimmed.to_string()))?;

        let base = Self::parse_server(server)?;
        let joined = format!(
            "{}/{}",
            base.as_str().trim_end_matches('/'),
            trimmed.trim_start_matches('/')
        );
        match Url::parse(&joined) {
            Ok(parsed) => Ok(Self {
                url: joined,
                parsed,
            }),
            Err(e) => Err(SourceUrlError::InvalidFormat {
                url: joined,
                reason: e.to_string(),
            }),
        }
    }

    /// スキームを持つ絶対URLかどうか
    ///
    /// `mailto:`や`urn:`のような階層を持たないスキームも絶対URLとして扱う。
    /// `host:8080/path`のようにスキーム区切りの直後がポート番号のものは相対参照。
    pub fn is_absolute(url: &str) -> bool {
        Self::parse_absolute(url).is_some()
    }

    fn parse_absolute(url: &str) -> Option<Url> {
        if Self::looks_like_host_port(url) {
            return None;
        }
        Url::parse(url).ok()
    }

    fn looks_like_host_port(url: &str) -> bool {
        let Some((_, rest)) = url.split_once(':') else {
            return false;
        };
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        digits > 0 && (digits == rest.len() || rest[digits..].starts_with('/'))
    }

    // クエリやフラグメントを持つサーバーアドレスにはパスを連結できない
    fn parse_server(server: &str) -> Result<Url, SourceUrlError> {
        let invalid = |reason: &str| SourceUrlError::InvalidFormat {
            url: server.to_string(),
            reason: reason.to_string(),
        };

        let base = Url::parse(server).map_err(|e| invalid(&e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(invalid("server address is not a base URL"));
        }
        if base.query().is_some() || base.fragment().is_some() {
            return Err(invalid("server address must not carry a query or fragment"));
        }
        Ok(base)
    }

    /// URL文字列を取得
    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// スキームを取得
    pub fn scheme(&self) -> &str {
        self.parsed.scheme()
    }

    /// パース済みURLを取得
    pub fn as_url(&self) -> &Url {
        &self.parsed
    }
}

impl fmt::Display for SourceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

impl TryFrom<String> for SourceUrl {
    type Error = SourceUrlError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<SourceUrl> for String {
    fn from(value: SourceUrl) -> Self {
        value.url
    }
}
