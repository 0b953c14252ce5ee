use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// セッション途中でアクションが失敗した場合の蓄積済み設定の扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// 何も永続化しない（既存のstartup-configはそのまま）
    #[default]
    Discard,
    /// 失敗前に成功したアクションの行を永続化する
    Commit,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discard => write!(f, "discard"),
            Self::Commit => write!(f, "commit"),
        }
    }
}
