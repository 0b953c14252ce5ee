use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

use crate::domain::entities::StartupConfig;
use crate::domain::value_objects::SessionId;

/// ConfigAccumulator関連のエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccumulatorError {
    #[error("Unknown session: {0}")]
    UnknownSession(SessionId),

    #[error("Session already started: {0}")]
    SessionExists(SessionId),
}

/// 行の追記先
///
/// アクションはこのトレイト越しにstartup-configへ書き込み、
/// 成果物全体を所有することはない。
pub trait ConfigSink {
    /// 行を末尾に追記し、追記した行数を返す
    fn append(&mut self, lines: Vec<String>) -> Result<usize, AccumulatorError>;
}

/// セッション単位のstartup-config蓄積サービス
///
/// セッション開始時に空の成果物を作り、各アクションの行を宣言順に追記する。
/// 追記のみで、並べ替え・切り詰め・重複排除は行わない。
#[derive(Debug, Default)]
pub struct ConfigAccumulator {
    sessions: HashMap<SessionId, StartupConfig>,
}

impl ConfigAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 空の成果物でセッションを開始
    pub fn begin_session(&mut self, session: SessionId) -> Result<(), AccumulatorError> {
        if self.sessions.contains_key(&session) {
            return Err(AccumulatorError::SessionExists(session));
        }
        self.sessions.insert(session, StartupConfig::new());
        debug!(%session, "accumulator session started");
        Ok(())
    }

    /// セッションの成果物に行を追記
    pub fn append(
        &mut self,
        session: SessionId,
        lines: Vec<String>,
    ) -> Result<usize, AccumulatorError> {
        let config = self
            .sessions
            .get_mut(&session)
            .ok_or(AccumulatorError::UnknownSession(session))?;
        let added = config.append(lines);
        debug!(%session, added, total = config.len(), "lines appended");
        Ok(added)
    }

    /// 現在の成果物を参照
    pub fn snapshot(&self, session: SessionId) -> Result<&StartupConfig, AccumulatorError> {
        self.sessions
            .get(&session)
            .ok_or(AccumulatorError::UnknownSession(session))
    }

    /// セッションを終了して成果物を取り出す
    pub fn finalize(&mut self, session: SessionId) -> Result<StartupConfig, AccumulatorError> {
        self.sessions
            .remove(&session)
            .ok_or(AccumulatorError::UnknownSession(session))
    }

    /// セッションを破棄（成果物は返さない）
    pub fn discard(&mut self, session: SessionId) -> Result<(), AccumulatorError> {
        self.finalize(session).map(|_| ())
    }

    /// 特定セッションへの書き込みハンドル
    pub fn sink(&mut self, session: SessionId) -> SessionSink<'_> {
        SessionSink {
            accumulator: self,
            session,
        }
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }
}

/// 1セッションに束縛された[`ConfigSink`]
#[derive(Debug)]
pub struct SessionSink<'a> {
    accumulator: &'a mut ConfigAccumulator,
    session: SessionId,
}

impl ConfigSink for SessionSink<'_> {
    fn append(&mut self, lines: Vec<String>) -> Result<usize, AccumulatorError> {
        self.accumulator.append(self.session, lines)
    }
}

impl ConfigSink for StartupConfig {
    fn append(&mut self, lines: Vec<String>) -> Result<usize, AccumulatorError> {
        Ok(StartupConfig::append(self, lines))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_appends_in_call_order() {
        let mut accumulator = ConfigAccumulator::new();
        let session = SessionId::new();
        accumulator.begin_session(session).unwrap();

        accumulator.append(session, lines(&["L1"])).unwrap();
        accumulator.append(session, lines(&["L2", "L3"])).unwrap();

        let config = accumulator.finalize(session).unwrap();
        assert_eq!(config.lines(), lines(&["L1", "L2", "L3"]).as_slice());
    }

    #[test]
    fn test_no_deduplication() {
        let mut accumulator = ConfigAccumulator::new();
        let session = SessionId::new();
        accumulator.begin_session(session).unwrap();

        accumulator.append(session, lines(&["!", "!"])).unwrap();
        accumulator.append(session, lines(&["!"])).unwrap();

        assert_eq!(accumulator.snapshot(session).unwrap().len(), 3);
    }

    #[test]
    fn test_sessions_are_isolated() {
        let mut accumulator = ConfigAccumulator::new();
        let first = SessionId::new();
        let second = SessionId::new();
        accumulator.begin_session(first).unwrap();
        accumulator.begin_session(second).unwrap();

        accumulator.sink(first).append(lines(&["a"])).unwrap();
        accumulator.sink(second).append(lines(&["b", "c"])).unwrap();

        assert_eq!(accumulator.snapshot(first).unwrap().len(), 1);
        assert_eq!(accumulator.snapshot(second).unwrap().len(), 2);
        assert_eq!(accumulator.active_sessions(), 2);
    }

    #[test]
    fn test_unknown_and_duplicate_sessions() {
        let mut accumulator = ConfigAccumulator::new();
        let session = SessionId::new();

        assert_eq!(
            accumulator.append(session, lines(&["x"])),
            Err(AccumulatorError::UnknownSession(session))
        );

        accumulator.begin_session(session).unwrap();
        assert_eq!(
            accumulator.begin_session(session),
            Err(AccumulatorError::SessionExists(session))
        );

        accumulator.discard(session).unwrap();
        assert!(accumulator.snapshot(session).is_err());
        assert_eq!(accumulator.active_sessions(), 0);
    }

    #[test]
    fn test_empty_append_keeps_artifact() {
        let mut accumulator = ConfigAccumulator::new();
        let session = SessionId::new();
        accumulator.begin_session(session).unwrap();

        assert_eq!(accumulator.append(session, Vec::new()).unwrap(), 0);
        assert!(accumulator.finalize(session).unwrap().is_empty());
    }
}
