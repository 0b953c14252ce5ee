use super::action::{ActionConfig, ActionSpec};

/// 検証済みのプロビジョニング定義
///
/// アクションは宣言順に保持され、その順序でセッションが実行される。
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    /// 定義名
    pub name: String,

    /// 宣言順のアクション
    pub actions: Vec<ActionSpec>,
}

impl Definition {
    /// 新しいDefinitionを作成
    pub fn new(name: impl Into<String>, actions: Vec<ActionSpec>) -> Self {
        Self {
            name: name.into(),
            actions,
        }
    }

    /// 単一アクションの定義を作成
    pub fn single(name: impl Into<String>, config: ActionConfig) -> Self {
        let name = name.into();
        let action = ActionSpec::new(name.clone(), config);
        Self::new(name, vec![action])
    }

    /// 全てのadd_configアクションに既定のサーバーアドレスを補う
    ///
    /// アクション自身が`ztps_server`を持つ場合はそちらを優先する。
    pub fn with_default_server(mut self, server: Option<&str>) -> Self {
        let Some(server) = server else {
            return self;
        };
        for action in &mut self.actions {
            if let ActionConfig::AddConfig(attributes) = &mut action.config {
                if attributes.ztps_server.is_none() {
                    attributes.ztps_server = Some(server.to_string());
                }
            }
        }
        self
    }
}
