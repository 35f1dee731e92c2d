use fightline_core::{AppConfig, AppConfigExt, Report, ReportInfo};
use std::sync::Arc;
use tokio::sync::RwLock;

/// A report dump opened for querying
pub struct LoadedReport {
    pub info: ReportInfo,
    pub report: Report,
}

/// Shared handle to the loaded report
pub type ReportHandle = Arc<LoadedReport>;

/// Holds all shared state for the CLI application.
#[derive(Clone)]
pub struct CliContext {
    pub config: Arc<RwLock<AppConfig>>,
    /// None until a dump is loaded; replaced wholesale on every load.
    report: Arc<RwLock<Option<ReportHandle>>>,
}

impl CliContext {
    pub fn new() -> Self {
        Self::with_config(AppConfig::load())
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            report: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn set_report(&self, loaded: LoadedReport) -> ReportHandle {
        let handle = Arc::new(loaded);
        *self.report.write().await = Some(Arc::clone(&handle));
        handle
    }

    pub async fn report(&self) -> Option<ReportHandle> {
        self.report.read().await.clone()
    }

    /// The loaded report, or an error message for the prompt
    pub async fn require_report(&self) -> Result<ReportHandle, String> {
        self.report()
            .await
            .ok_or_else(|| "No report loaded. Use `load --path <dump.json>` first.".to_string())
    }
}

impl Default for CliContext {
    fn default() -> Self {
        Self::new()
    }
}
