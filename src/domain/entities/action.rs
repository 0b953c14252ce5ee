use crate::domain::value_objects::{OutcomeCode, SourceUrl, SourceUrlError};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 定義ファイルから受け取る未検証の属性マップ
pub type RawAttributes = BTreeMap<String, Value>;

/// プレースホルダー名から置換値へのマップ
pub type VariableMap = HashMap<String, String>;

/// アクション実行時のエラー
///
/// 各バリアントはディスパッチループに返す結果コードに対応する。
#[derive(Debug, Error, PartialEq)]
pub enum ActionError {
    #[error("Missing attribute('{0}')")]
    MissingAttribute(String),

    #[error("Invalid attribute '{name}': {reason}")]
    InvalidAttribute { name: String, reason: String },

    #[error("Unknown action '{0}'")]
    UnknownAction(String),

    #[error("Unable to resolve source URL: {0}")]
    Url(#[from] SourceUrlError),

    #[error("Unable to retrieve config from {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Missing variable(s) in template: {}", .0.join(", "))]
    MissingVariables(Vec<String>),
}

impl ActionError {
    /// エラーに対応する結果コード
    pub fn outcome_code(&self) -> OutcomeCode {
        match self {
            Self::MissingAttribute(_)
            | Self::InvalidAttribute { .. }
            | Self::UnknownAction(_)
            | Self::Url(_) => OutcomeCode::MissingAttribute,
            Self::Fetch { .. } => OutcomeCode::FetchFailure,
            Self::MissingVariables(_) => OutcomeCode::MissingVariable,
        }
    }
}

/// アクションの種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// テンプレートを取得・置換してstartup-configに追記する
    AddConfig,
    /// 固定の行をstartup-configに追記する（ベース設定の生成）
    StartupConfig,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AddConfig => "add_config",
            Self::StartupConfig => "startup_config",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "add_config" => Ok(Self::AddConfig),
            "startup_config" => Ok(Self::StartupConfig),
            other => Err(ActionError::UnknownAction(other.to_string())),
        }
    }
}

/// add_configアクションの属性
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddConfigAttributes {
    /// テンプレートの取得元（絶対または相対）
    pub url: String,

    /// 相対URLを解決するためのサーバーアドレス
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ztps_server: Option<String>,

    /// テンプレート変数
    #[serde(default)]
    pub variables: VariableMap,
}

impl AddConfigAttributes {
    /// 新しいAddConfigAttributesを作成
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ztps_server: None,
            variables: VariableMap::new(),
        }
    }

    /// サーバーアドレスを設定
    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.ztps_server = Some(server.into());
        self
    }

    /// 変数を追加
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// 未検証の属性マップから作成
    pub fn from_attributes(attributes: &RawAttributes) -> Result<Self, ActionError> {
        let url = optional_string(attributes, "url")?
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ActionError::MissingAttribute("url".to_string()))?;

        let ztps_server = optional_string(attributes, "ztps_server")?;

        let variables = match attributes.get("variables") {
            None | Some(Value::Null) => VariableMap::new(),
            Some(Value::Mapping(mapping)) => {
                let mut variables = VariableMap::with_capacity(mapping.len());
                for (key, value) in mapping {
                    let name = scalar_to_string(key).ok_or_else(|| {
                        ActionError::InvalidAttribute {
                            name: "variables".to_string(),
                            reason: "variable names must be strings".to_string(),
                        }
                    })?;
                    let value = scalar_to_string(value).ok_or_else(|| {
                        ActionError::InvalidAttribute {
                            name: "variables".to_string(),
                            reason: format!("value of '{}' must be a scalar", name),
                        }
                    })?;
                    variables.insert(name, value);
                }
                variables
            }
            Some(_) => {
                return Err(ActionError::InvalidAttribute {
                    name: "variables".to_string(),
                    reason: "expected a mapping".to_string(),
                })
            }
        };

        Ok(Self {
            url,
            ztps_server,
            variables,
        })
    }

    /// 取得先URLを解決
    pub fn source_url(&self) -> Result<SourceUrl, ActionError> {
        Ok(SourceUrl::resolve(&self.url, self.ztps_server.as_deref())?)
    }
}

/// startup_configアクションの属性
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartupConfigAttributes {
    /// 追記する行
    pub lines: Vec<String>,
}

impl StartupConfigAttributes {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// 未検証の属性マップから作成
    pub fn from_attributes(attributes: &RawAttributes) -> Result<Self, ActionError> {
        match attributes.get("lines") {
            None | Some(Value::Null) => Err(ActionError::MissingAttribute("lines".to_string())),
            Some(Value::Sequence(items)) => items
                .iter()
                .map(|item| {
                    scalar_to_string(item).ok_or_else(|| ActionError::InvalidAttribute {
                        name: "lines".to_string(),
                        reason: "every line must be a scalar".to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::new),
            Some(Value::String(text)) => Ok(Self::new(text.lines().map(str::to_string).collect())),
            Some(_) => Err(ActionError::InvalidAttribute {
                name: "lines".to_string(),
                reason: "expected a list of lines".to_string(),
            }),
        }
    }
}

/// 種別ごとに検証済みのアクション設定
#[derive(Debug, Clone, PartialEq)]
pub enum ActionConfig {
    AddConfig(AddConfigAttributes),
    StartupConfig(StartupConfigAttributes),
}

impl ActionConfig {
    /// 種別と属性マップから検証済み設定を作成
    pub fn from_attributes(kind: ActionKind, attributes: &RawAttributes) -> Result<Self, ActionError> {
        match kind {
            ActionKind::AddConfig => AddConfigAttributes::from_attributes(attributes).map(Self::AddConfig),
            ActionKind::StartupConfig => {
                StartupConfigAttributes::from_attributes(attributes).map(Self::StartupConfig)
            }
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Self::AddConfig(_) => ActionKind::AddConfig,
            Self::StartupConfig(_) => ActionKind::StartupConfig,
        }
    }
}

/// 定義内の1アクション
#[derive(Debug, Clone, PartialEq)]
pub struct ActionSpec {
    /// アクション名（定義内で一意）
    pub name: String,

    /// 検証済みの設定
    pub config: ActionConfig,
}

impl ActionSpec {
    pub fn new(name: impl Into<String>, config: ActionConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }

    pub fn kind(&self) -> ActionKind {
        self.config.kind()
    }
}

fn optional_string(attributes: &RawAttributes, key: &str) -> Result<Option<String>, ActionError> {
    match attributes.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(ActionError::InvalidAttribute {
            name: key.to_string(),
            reason: "expected a string".to_string(),
        }),
    }
}

// YAMLのスカラー（数値・真偽値を含む）を文字列化する
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attributes(yaml: &str) -> RawAttributes {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_missing_url() {
        let result = AddConfigAttributes::from_attributes(&RawAttributes::new());
        assert_eq!(result, Err(ActionError::MissingAttribute("url".to_string())));
        assert_eq!(
            result.unwrap_err().outcome_code(),
            OutcomeCode::MissingAttribute
        );
    }

    #[test]
    fn test_empty_url_is_missing() {
        let result = AddConfigAttributes::from_attributes(&attributes("url: ''"));
        assert_eq!(result, Err(ActionError::MissingAttribute("url".to_string())));
    }

    #[test]
    fn test_full_attributes() {
        let attrs = AddConfigAttributes::from_attributes(&attributes(
            r#"
url: files/leaf.template
ztps_server: http://ztps:8080
variables:
  hostname: leaf1
  vlan: 10
  enabled: true
"#,
        ))
        .unwrap();

        assert_eq!(attrs.url, "files/leaf.template");
        assert_eq!(attrs.ztps_server.as_deref(), Some("http://ztps:8080"));
        assert_eq!(attrs.variables["hostname"], "leaf1");
        assert_eq!(attrs.variables["vlan"], "10");
        assert_eq!(attrs.variables["enabled"], "true");
        assert_eq!(
            attrs.source_url().unwrap().as_str(),
            "http://ztps:8080/files/leaf.template"
        );
    }

    #[test]
    fn test_invalid_variables() {
        let result = AddConfigAttributes::from_attributes(&attributes("url: x\nvariables: [a, b]"));
        assert!(matches!(result, Err(ActionError::InvalidAttribute { .. })));

        let result =
            AddConfigAttributes::from_attributes(&attributes("url: x\nvariables:\n  a: [1]"));
        assert!(matches!(result, Err(ActionError::InvalidAttribute { .. })));
    }

    #[test]
    fn test_relative_url_without_server_is_configuration_error() {
        let attrs = AddConfigAttributes::new("cfg1");
        let err = attrs.source_url().unwrap_err();
        assert_eq!(err.outcome_code(), OutcomeCode::MissingAttribute);
    }

    #[test]
    fn test_startup_config_lines() {
        let attrs =
            StartupConfigAttributes::from_attributes(&attributes("lines: [L1, L2]")).unwrap();
        assert_eq!(attrs.lines, vec!["L1", "L2"]);

        let missing = StartupConfigAttributes::from_attributes(&RawAttributes::new());
        assert_eq!(missing, Err(ActionError::MissingAttribute("lines".to_string())));
    }

    #[test]
    fn test_action_kind_parsing() {
        assert_eq!("add_config".parse::<ActionKind>(), Ok(ActionKind::AddConfig));
        assert_eq!(
            "startup_config".parse::<ActionKind>(),
            Ok(ActionKind::StartupConfig)
        );
        assert_eq!(
            "install_image".parse::<ActionKind>(),
            Err(ActionError::UnknownAction("install_image".to_string()))
        );
    }

    #[test]
    fn test_error_outcome_codes() {
        let fetch = ActionError::Fetch {
            url: "http://host/x".to_string(),
            reason: "HTTP 404".to_string(),
        };
        assert_eq!(fetch.outcome_code(), OutcomeCode::FetchFailure);

        let missing = ActionError::MissingVariables(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(missing.outcome_code(), OutcomeCode::MissingVariable);
        assert_eq!(missing.to_string(), "Missing variable(s) in template: a, b");
    }
}
