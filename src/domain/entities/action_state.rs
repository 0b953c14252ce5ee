use crate::domain::value_objects::OutcomeCode;
use serde::Serialize;
use std::fmt;

/// 1アクションの実行状態
///
/// `Start → Resolving → Fetching → Substituting → Appending → Done`の順に進み、
/// どの状態からでも`Failed`に遷移できる。`Done`と`Failed`は終端状態。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "code", rename_all = "snake_case")]
pub enum ActionState {
    Start,
    Resolving,
    Fetching,
    Substituting,
    Appending,
    Done,
    Failed(OutcomeCode),
}

impl ActionState {
    /// 終端状態かどうか
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed(_))
    }

    fn rank(self) -> u8 {
        match self {
            Self::Start => 0,
            Self::Resolving => 1,
            Self::Fetching => 2,
            Self::Substituting => 3,
            Self::Appending => 4,
            Self::Done => 5,
            Self::Failed(_) => 6,
        }
    }

    /// `next`への遷移が許可されているか
    ///
    /// 段階はスキップ可能（startup_configは取得・置換を行わない）だが、後戻りはできない。
    pub fn can_transition_to(self, next: ActionState) -> bool {
        if self.is_terminal() {
            return false;
        }
        match next {
            Self::Failed(code) => !code.is_success(),
            Self::Start => false,
            _ => next.rank() > self.rank(),
        }
    }
}

impl fmt::Display for ActionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::Resolving => write!(f, "resolving"),
            Self::Fetching => write!(f, "fetching"),
            Self::Substituting => write!(f, "substituting"),
            Self::Appending => write!(f, "appending"),
            Self::Done => write!(f, "done"),
            Self::Failed(code) => write!(f, "failed ({})", code),
        }
    }
}

/// 状態遷移の履歴を持つライフサイクル
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionLifecycle {
    history: Vec<ActionState>,
}

impl ActionLifecycle {
    pub fn new() -> Self {
        Self {
            history: vec![ActionState::Start],
        }
    }

    /// 現在の状態
    pub fn state(&self) -> ActionState {
        self.history
            .last()
            .copied()
            .unwrap_or(ActionState::Start)
    }

    /// 次の状態に進む
    pub fn enter(&mut self, next: ActionState) {
        debug_assert!(
            self.state().can_transition_to(next),
            "illegal action transition {} -> {}",
            self.state(),
            next
        );
        tracing::trace!(from = %self.state(), to = %next, "action state transition");
        self.history.push(next);
    }

    /// 失敗状態に遷移する
    pub fn fail(&mut self, code: OutcomeCode) {
        self.enter(ActionState::Failed(code));
    }

    pub fn history(&self) -> &[ActionState] {
        &self.history
    }

    /// 結果コード（終端状態でない場合はNone）
    pub fn outcome(&self) -> Option<OutcomeCode> {
        match self.state() {
            ActionState::Done => Some(OutcomeCode::Success),
            ActionState::Failed(code) => Some(code),
            _ => None,
        }
    }
}

impl Default for ActionLifecycle {
    fn default() -> Self {
        Self::new()
    }
}
