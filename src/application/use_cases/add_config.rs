use crate::application::services::config_accumulator::ConfigSink;
use crate::application::use_cases::ExecutionError;
use crate::common::templates::{TemplateError, TemplateProcessor};
use crate::domain::entities::startup_config::config_lines;
use crate::domain::entities::{ActionError, ActionLifecycle, ActionState, AddConfigAttributes};
use crate::domain::value_objects::SourceUrl;
use crate::infrastructure::fetch::{ContentFetcher, FetchError};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// add_configアクションの実行
///
/// URL解決 → 取得 → 変数置換 → 追記の順に進み、いずれかの段階で失敗すると
/// その段階に対応するエラーで中断する。置換に失敗した場合は何も追記しない。
#[derive(Clone)]
pub struct AddConfigUseCase {
    fetcher: Arc<dyn ContentFetcher>,
    processor: TemplateProcessor,
}

impl AddConfigUseCase {
    pub fn new(fetcher: Arc<dyn ContentFetcher>) -> Self {
        Self {
            fetcher,
            processor: TemplateProcessor::new(),
        }
    }

    /// テンプレートを取得して実行
    #[instrument(name = "add_config", skip_all, fields(action = %action))]
    pub async fn execute(
        &self,
        action: &str,
        attributes: &AddConfigAttributes,
        sink: &mut dyn ConfigSink,
        lifecycle: &mut ActionLifecycle,
    ) -> Result<usize, ExecutionError> {
        self.run(attributes, None, sink, lifecycle).await
    }

    /// 先読み済みの取得結果を使って実行
    ///
    /// 取得の失敗はこのアクションの順番が来た時点で初めて報告される。
    #[instrument(name = "add_config", skip_all, fields(action = %action))]
    pub async fn execute_prefetched(
        &self,
        action: &str,
        attributes: &AddConfigAttributes,
        prefetched: Result<String, FetchError>,
        sink: &mut dyn ConfigSink,
        lifecycle: &mut ActionLifecycle,
    ) -> Result<usize, ExecutionError> {
        self.run(attributes, Some(prefetched), sink, lifecycle).await
    }

    /// 取得のみを行う（先読み用）
    pub async fn fetch(&self, url: &SourceUrl) -> Result<String, FetchError> {
        self.fetcher.fetch(url).await
    }

    async fn run(
        &self,
        attributes: &AddConfigAttributes,
        prefetched: Option<Result<String, FetchError>>,
        sink: &mut dyn ConfigSink,
        lifecycle: &mut ActionLifecycle,
    ) -> Result<usize, ExecutionError> {
        let lines = match self.resolve_lines(attributes, prefetched, lifecycle).await {
            Ok(lines) => lines,
            Err(e) => {
                warn!(error = %e, code = %e.outcome_code(), "add_config failed");
                lifecycle.fail(e.outcome_code());
                return Err(e.into());
            }
        };

        lifecycle.enter(ActionState::Appending);
        let added = sink.append(lines)?;
        lifecycle.enter(ActionState::Done);

        info!(lines = added, "add_config appended");
        Ok(added)
    }

    async fn resolve_lines(
        &self,
        attributes: &AddConfigAttributes,
        prefetched: Option<Result<String, FetchError>>,
        lifecycle: &mut ActionLifecycle,
    ) -> Result<Vec<String>, ActionError> {
        lifecycle.enter(ActionState::Resolving);
        let url = attributes.source_url()?;
        debug!(url = %url, "source resolved");

        lifecycle.enter(ActionState::Fetching);
        let fetched = match prefetched {
            Some(result) => result,
            None => self.fetcher.fetch(&url).await,
        };
        let template = fetched.map_err(|e| ActionError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        debug!(bytes = template.len(), "template fetched");

        lifecycle.enter(ActionState::Substituting);
        let variable_names: Vec<&str> = attributes.variables.keys().map(String::as_str).collect();
        debug!(variables = ?variable_names, "substituting");
        let resolved = self
            .processor
            .process(&template, &attributes.variables)
            .map_err(|e| match e {
                TemplateError::MissingVariables(names) => ActionError::MissingVariables(names),
            })?;

        Ok(config_lines(&resolved))
    }
}
