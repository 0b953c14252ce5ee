use crate::application::services::config_accumulator::{AccumulatorError, ConfigAccumulator};
use crate::application::use_cases::add_config::AddConfigUseCase;
use crate::application::use_cases::startup_config::StartupConfigUseCase;
use crate::application::use_cases::ExecutionError;
use crate::domain::entities::{
    ActionConfig, ActionKind, ActionLifecycle, ActionSpec, ActionState, AgentConfig, Definition,
};
use crate::domain::value_objects::{FailurePolicy, OutcomeCode, SessionId};
use crate::infrastructure::fetch::{ContentFetcher, FetchError};
use crate::infrastructure::filesystem::{StartupConfigStore, StartupConfigStoreError};
use futures::future::join_all;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{error, info, instrument, warn};

/// RunSession関連のエラー
///
/// アクション単位の失敗はここには含まれず、[`SessionReport`]に記録される。
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Config accumulation failed: {0}")]
    Accumulator(#[from] AccumulatorError),

    #[error("Unable to persist startup-config: {0}")]
    Persist(#[from] StartupConfigStoreError),
}

/// セッション実行の設定
#[derive(Debug, Clone)]
pub struct RunSessionConfig {
    /// startup-configの出力先
    pub output: PathBuf,

    /// `ztps_server`を持たないadd_configに補うサーバー
    pub server: Option<String>,

    /// アクション失敗時の扱い
    pub on_failure: FailurePolicy,

    /// テンプレートの並列先読み数（1以下は逐次）
    pub prefetch: usize,

    /// 保持するバックアップ数
    pub backups: usize,
}

impl RunSessionConfig {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            server: None,
            on_failure: FailurePolicy::default(),
            prefetch: 1,
            backups: 0,
        }
    }

    /// エージェント設定から作成
    pub fn from_agent_config(config: &AgentConfig) -> Self {
        Self {
            output: config.startup_config.clone(),
            server: config.server.clone(),
            on_failure: config.on_failure,
            prefetch: config.prefetch,
            backups: config.backups,
        }
    }

    pub fn with_server(mut self, server: Option<String>) -> Self {
        self.server = server;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
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

/// 1アクションの実行結果
#[derive(Debug, Clone, Serialize)]
pub struct ActionReport {
    pub name: String,
    pub kind: ActionKind,
    pub state: ActionState,

    /// 終端状態の結果コード
    pub code: Option<OutcomeCode>,

    /// 追記した行数
    pub lines: usize,

    pub duration_ms: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionReport {
    fn new(
        action: &ActionSpec,
        lifecycle: &ActionLifecycle,
        lines: usize,
        elapsed: Duration,
        error: Option<String>,
    ) -> Self {
        Self {
            name: action.name.clone(),
            kind: action.kind(),
            state: lifecycle.state(),
            code: lifecycle.outcome(),
            lines,
            duration_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            error,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code.map(OutcomeCode::is_success).unwrap_or(false)
    }
}

/// セッションの実行結果
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub session_id: SessionId,
    pub definition: String,
    pub policy: FailurePolicy,

    /// 実行されたアクション（失敗で打ち切られた以降は含まない）
    pub actions: Vec<ActionReport>,

    /// 失敗により実行されなかったアクション
    pub skipped: Vec<String>,

    /// 永続化したstartup-config（破棄した場合はNone）
    pub persisted: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<PathBuf>,

    /// 成果物の総行数
    pub total_lines: usize,
}

impl SessionReport {
    /// 最初に失敗したアクション
    pub fn failed_action(&self) -> Option<&ActionReport> {
        self.actions.iter().find(|a| !a.is_success())
    }

    /// セッション全体の結果コード
    pub fn outcome_code(&self) -> OutcomeCode {
        self.failed_action()
            .and_then(|a| a.code)
            .unwrap_or(OutcomeCode::Success)
    }

    pub fn is_success(&self) -> bool {
        self.outcome_code().is_success()
    }
}

/// 定義の全アクションを宣言順に実行し、startup-configを組み立てるユースケース
///
/// テンプレートの取得は先読みで並列化できるが、追記は常に宣言順に行う。
/// 最初に失敗したアクションで打ち切り、それまでの成果物は失敗時ポリシーに従って
/// 破棄または永続化する。
pub struct RunSessionUseCase {
    config: RunSessionConfig,
    add_config: AddConfigUseCase,
    startup_config: StartupConfigUseCase,
}

impl RunSessionUseCase {
    pub fn new(config: RunSessionConfig, fetcher: Arc<dyn ContentFetcher>) -> Self {
        Self {
            config,
            add_config: AddConfigUseCase::new(fetcher),
            startup_config: StartupConfigUseCase::new(),
        }
    }

    /// セッションを実行
    pub async fn execute(&self, definition: Definition) -> Result<SessionReport, SessionError> {
        let session_id = SessionId::new();
        let definition = definition.with_default_server(self.config.server.as_deref());
        self.run(session_id, &definition).await
    }

    #[instrument(skip_all, fields(session = %session_id, definition = %definition.name))]
    async fn run(
        &self,
        session_id: SessionId,
        definition: &Definition,
    ) -> Result<SessionReport, SessionError> {
        info!(actions = definition.actions.len(), "session started");

        let mut accumulator = ConfigAccumulator::new();
        accumulator.begin_session(session_id)?;

        let mut prefetched = self.prefetch(definition).await;
        let mut reports = Vec::with_capacity(definition.actions.len());
        let mut failed_at = None;

        for (index, action) in definition.actions.iter().enumerate() {
            let started = Instant::now();
            let mut lifecycle = ActionLifecycle::new();
            let mut sink = accumulator.sink(session_id);

            let result = match &action.config {
                ActionConfig::AddConfig(attributes) => match prefetched[index].take() {
                    Some(fetched) => {
                        self.add_config
                            .execute_prefetched(
                                &action.name,
                                attributes,
                                fetched,
                                &mut sink,
                                &mut lifecycle,
                            )
                            .await
                    }
                    None => {
                        self.add_config
                            .execute(&action.name, attributes, &mut sink, &mut lifecycle)
                            .await
                    }
                },
                ActionConfig::StartupConfig(attributes) => {
                    self.startup_config
                        .execute(&action.name, attributes, &mut sink, &mut lifecycle)
                }
            };

            match result {
                Ok(lines) => {
                    reports.push(ActionReport::new(
                        action,
                        &lifecycle,
                        lines,
                        started.elapsed(),
                        None,
                    ));
                }
                Err(ExecutionError::Action(e)) => {
                    error!(action = %action.name, code = %e.outcome_code(), error = %e, "action failed");
                    reports.push(ActionReport::new(
                        action,
                        &lifecycle,
                        0,
                        started.elapsed(),
                        Some(e.to_string()),
                    ));
                    failed_at = Some(index);
                    break;
                }
                Err(ExecutionError::Sink(e)) => return Err(e.into()),
            }
        }

        let skipped: Vec<String> = match failed_at {
            Some(index) => definition.actions[index + 1..]
                .iter()
                .map(|a| a.name.clone())
                .collect(),
            None => Vec::new(),
        };

        let mut report = SessionReport {
            session_id,
            definition: definition.name.clone(),
            policy: self.config.on_failure,
            actions: reports,
            skipped,
            persisted: None,
            backup: None,
            total_lines: accumulator.snapshot(session_id)?.len(),
        };

        if failed_at.is_some() && self.config.on_failure == FailurePolicy::Discard {
            accumulator.discard(session_id)?;
            warn!(
                lines = report.total_lines,
                "session failed, startup-config discarded"
            );
            return Ok(report);
        }

        let config = accumulator.finalize(session_id)?;
        let store = StartupConfigStore::new(&self.config.output).with_backups(self.config.backups);
        let outcome = store.persist(&config).await?;

        info!(
            path = %outcome.path.display(),
            lines = outcome.lines,
            complete = failed_at.is_none(),
            "startup-config persisted"
        );

        report.persisted = Some(outcome.path);
        report.backup = outcome.backup;
        Ok(report)
    }

    /// add_configテンプレートを宣言順を保ったまま並列に取得する
    ///
    /// URLを解決できないアクションは先読みせず、実行時に通常どおり失敗させる。
    async fn prefetch(&self, definition: &Definition) -> Vec<Option<Result<String, FetchError>>> {
        if self.config.prefetch <= 1 {
            return definition.actions.iter().map(|_| None).collect();
        }

        let semaphore = Semaphore::new(self.config.prefetch);
        let tasks = definition.actions.iter().map(|action| {
            let semaphore = &semaphore;
            async move {
                let ActionConfig::AddConfig(attributes) = &action.config else {
                    return None;
                };
                let url = attributes.source_url().ok()?;
                let _permit = semaphore.acquire().await.ok()?;
                Some(self.add_config.fetch(&url).await)
            }
        });

        join_all(tasks).await
    }
}
