use crate::domain::entities::{ActionConfig, ActionError, ActionKind, ActionSpec, Definition, RawAttributes};
use crate::domain::value_objects::{SourceUrl, SourceUrlError};
use crate::infrastructure::fetch::{ContentFetcher, FetchError};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

/// 名前のない定義に使う既定名
pub const DEFAULT_DEFINITION_NAME: &str = "definition";

/// DefinitionService関連のエラー
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("Invalid YAML format: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Unable to read definition {path}: {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to resolve definition URL: {0}")]
    UrlError(#[from] SourceUrlError),

    #[error("Failed to fetch definition from {url}: {source}")]
    FetchFailed {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("Duplicate action name: {0}")]
    DuplicateAction(String),

    #[error("Action #{index} ('{name}') is invalid: {source}")]
    InvalidAction {
        index: usize,
        name: String,
        #[source]
        source: ActionError,
    },
}

/// YAML上の定義
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDefinition {
    #[serde(default)]
    name: Option<String>,

    /// 全アクション共通の属性
    #[serde(default)]
    attributes: RawAttributes,

    #[serde(default)]
    actions: Vec<RawAction>,
}

/// YAML上のアクション
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAction {
    name: String,

    action: String,

    #[serde(default)]
    attributes: RawAttributes,
}

/// 定義の読み込みと検証
///
/// 各アクションの属性は読み込み時に一度だけ型付きのレコードへ検証され、
/// 最初に不正だったアクションで読み込み全体が失敗する。
#[derive(Debug, Clone, Copy, Default)]
pub struct DefinitionService;

impl DefinitionService {
    pub fn new() -> Self {
        Self
    }

    /// 文字列から定義を解析
    pub fn parse_from_str(&self, content: &str) -> Result<Definition, DefinitionError> {
        let raw: RawDefinition = serde_yaml::from_str(content)?;
        self.build(raw)
    }

    /// ローカルファイルから定義を読み込み
    pub async fn parse_from_file(&self, path: &Path) -> Result<Definition, DefinitionError> {
        let content =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| DefinitionError::IoError {
                    path: path.display().to_string(),
                    source,
                })?;
        debug!(path = %path.display(), "definition read from file");
        self.parse_from_str(&content)
    }

    /// URLから定義を取得（相対URLはサーバー基準で解決）
    pub async fn parse_from_url(
        &self,
        url: &str,
        server: Option<&str>,
        fetcher: &dyn ContentFetcher,
    ) -> Result<Definition, DefinitionError> {
        let url = SourceUrl::resolve(url, server)?;
        let content = fetcher
            .fetch(&url)
            .await
            .map_err(|source| DefinitionError::FetchFailed {
                url: url.to_string(),
                source,
            })?;
        debug!(url = %url, "definition fetched");
        self.parse_from_str(&content)
    }

    /// ローカルに存在すればファイル、そうでなければURLとして読み込む
    pub async fn load(
        &self,
        source: &str,
        server: Option<&str>,
        fetcher: &dyn ContentFetcher,
    ) -> Result<Definition, DefinitionError> {
        let path = Path::new(source);
        if path.exists() || (!SourceUrl::is_absolute(source) && server.is_none()) {
            self.parse_from_file(path).await
        } else {
            self.parse_from_url(source, server, fetcher).await
        }
    }

    fn build(&self, raw: RawDefinition) -> Result<Definition, DefinitionError> {
        let name = raw
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DEFINITION_NAME.to_string());

        let mut seen = HashSet::new();
        let mut actions = Vec::with_capacity(raw.actions.len());

        for (index, action) in raw.actions.into_iter().enumerate() {
            if !seen.insert(action.name.clone()) {
                return Err(DefinitionError::DuplicateAction(action.name));
            }

            let invalid = |source| DefinitionError::InvalidAction {
                index,
                name: action.name.clone(),
                source,
            };

            let kind: ActionKind = action.action.parse().map_err(invalid)?;
            let attributes = merge_attributes(&raw.attributes, action.attributes.clone());
            let config = ActionConfig::from_attributes(kind, &attributes).map_err(invalid)?;

            actions.push(ActionSpec::new(action.name, config));
        }

        if actions.is_empty() {
            warn!(definition = %name, "definition has no actions");
        }
        info!(definition = %name, actions = actions.len(), "definition loaded");

        Ok(Definition::new(name, actions))
    }
}

/// 定義全体の属性の上にアクション固有の属性を重ねる（同じキーはアクション側が優先）
fn merge_attributes(shared: &RawAttributes, own: RawAttributes) -> RawAttributes {
    let mut merged = shared.clone();
    merged.extend(own);
    merged
}
