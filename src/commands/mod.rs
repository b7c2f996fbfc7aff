//! Command layer: the boundary the front end talks to.
//!
//! Commands return `Result<T, String>` or a [`Notice`]; library errors are
//! flattened to their display text here and nowhere else.

pub mod ai;
pub mod links;
pub mod settings;
pub mod tasks;

use std::sync::Arc;

use serde::Serialize;

use crate::ai::GeminiClient;
use crate::config::AppConfig;
use crate::error::{DashboardError, NoticeLevel, Result};
use crate::export::ExportAdapter;
use crate::store::StateStore;
use crate::workflow::panels::PanelRunner;
use crate::workflow::GenerativeBackend;

/// Transient user-visible message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub message: String,
    pub level: NoticeLevel,
}

impl Notice {
    pub fn new(message: impl Into<String>, level: NoticeLevel) -> Self {
        Self {
            message: message.into(),
            level,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NoticeLevel::Success)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, NoticeLevel::Info)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, NoticeLevel::Warning)
    }
}

impl From<DashboardError> for Notice {
    fn from(err: DashboardError) -> Self {
        Self::new(err.to_string(), err.level())
    }
}

/// Collapse an outcome into the notice the user sees
pub fn notify<T>(result: Result<T>, on_success: impl FnOnce(T) -> Notice) -> Notice {
    match result {
        Ok(value) => on_success(value),
        Err(e) => {
            tracing::debug!(error = %e, level = ?e.level(), "Command failed");
            Notice::from(e)
        }
    }
}

/// One in-flight guard per AI panel
pub struct PanelRunners {
    pub styler: PanelRunner,
    pub pdf: PanelRunner,
    pub quote: PanelRunner,
    pub needs: PanelRunner,
    pub property: PanelRunner,
    pub extraction: PanelRunner,
    pub assistant: PanelRunner,
}

impl PanelRunners {
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        let styler = PanelRunner::new(backend);
        Self {
            pdf: styler.sibling(),
            quote: styler.sibling(),
            needs: styler.sibling(),
            property: styler.sibling(),
            extraction: styler.sibling(),
            assistant: styler.sibling(),
            styler,
        }
    }
}

/// Everything a command needs, built once per session
pub struct DashboardState {
    pub config: AppConfig,
    pub store: StateStore,
    pub export: ExportAdapter,
    pub panels: PanelRunners,
}

impl DashboardState {
    /// Session wired to Gemini and the system clipboard/launchers
    pub fn open(config: AppConfig) -> Result<Self> {
        let backend: Arc<dyn GenerativeBackend> = Arc::new(GeminiClient::new(&config));
        let export = ExportAdapter::new(&config);
        Self::with_parts(config, backend, export)
    }

    pub fn with_parts(
        config: AppConfig,
        backend: Arc<dyn GenerativeBackend>,
        export: ExportAdapter,
    ) -> Result<Self> {
        let store = StateStore::open(&config)?;
        tracing::info!(
            model = %config.model,
            state_dir = %store.state_dir().display(),
            "Dashboard session opened"
        );
        Ok(Self {
            config,
            store,
            export,
            panels: PanelRunners::new(backend),
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::export::clipboard::fake::FakeClipboard;
    use crate::export::clipboard::{ClipboardStrategy, CopyFormat};
    use crate::export::launcher::fake::FakeLauncher;
    use crate::export::LaunchChain;
    use crate::workflow::fake::FakeBackend;
    use tempfile::TempDir;

    pub struct TestSession {
        pub dir: TempDir,
        pub state: DashboardState,
        pub backend: Arc<FakeBackend>,
        pub launcher: FakeLauncher,
        pub plain: FakeClipboard,
    }

    pub fn session(backend: FakeBackend) -> TestSession {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::with_dirs(dir.path().join("state"), dir.path().join("out"));
        let launcher = FakeLauncher::default();
        let plain = FakeClipboard::new(CopyFormat::PlainText, false);
        let clipboard: Vec<Box<dyn ClipboardStrategy>> = vec![
            Box::new(FakeClipboard::new(CopyFormat::RichHtml, false)),
            Box::new(plain.clone()),
        ];
        let export = ExportAdapter::with_platform(
            config.output_dir.clone(),
            dir.path().join("preview"),
            LaunchChain::new(vec![Box::new(launcher.clone())]),
            clipboard,
        );
        let backend = Arc::new(backend);
        let state = DashboardState::with_parts(config, backend.clone(), export).unwrap();
        TestSession {
            dir,
            state,
            backend,
            launcher,
            plain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_from_error_keeps_level() {
        let notice = Notice::from(DashboardError::NoInput);
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert_eq!(notice.message, "Please enter data or upload a PDF.");

        let notice = notify(Err::<(), _>(DashboardError::Clipboard), |_| Notice::success("ok"));
        assert_eq!(notice.level, NoticeLevel::Danger);
    }

    #[test]
    fn test_notify_success() {
        let notice = notify(Ok(3), |n| Notice::success(format!("{} imported", n)));
        assert_eq!(notice, Notice::success("3 imported"));
    }
}
