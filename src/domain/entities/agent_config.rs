use crate::domain::value_objects::FailurePolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

/// テンプレート取得の設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct FetchSettings {
    /// リクエストのタイムアウト（秒）
    #[validate(range(min = 1, max = 600))]
    pub timeout_seconds: u64,

    /// 一時的な失敗時の再試行回数
    #[validate(range(max = 10))]
    pub retries: u32,

    /// 再試行の間隔（ミリ秒）
    #[validate(range(max = 60000))]
    pub retry_delay_ms: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            retries: 0,
            retry_delay_ms: 500,
        }
    }
}

/// ztpboot.yaml設定ファイルの構造
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AgentConfig {
    /// 既定のプロビジョニングサーバー（相対URLの解決に使用）
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub server: Option<String>,

    /// startup-configの出力先
    pub startup_config: PathBuf,

    /// 取得設定
    #[validate(nested)]
    pub fetch: FetchSettings,

    /// アクション失敗時の扱い
    pub on_failure: FailurePolicy,

    /// テンプレートの並列先読み数（1は逐次）
    #[validate(range(min = 1, max = 32))]
    pub prefetch: usize,

    /// 保持するstartup-configのバックアップ数（0で無効）
    #[validate(range(max = 100))]
    pub backups: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            server: None,
            startup_config: PathBuf::from("startup-config"),
            fetch: FetchSettings::default(),
            on_failure: FailurePolicy::default(),
            prefetch: 1,
            backups: 3,
        }
    }
}

impl AgentConfig {
    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }

    pub fn with_startup_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.startup_config = path.into();
        self
    }

    pub fn with_on_failure(mut self, policy: FailurePolicy) -> Self {
        self.on_failure = policy;
        self
    }

    pub fn with_prefetch(mut self, prefetch: usize) -> Self {
        self.prefetch = prefetch;
        self
    }

    pub fn with_backups(mut self, backups: usize) -> Self {
        self.backups = backups;
        self
    }
}
