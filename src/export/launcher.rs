//! Opening URLs and files with the system handler.

use crate::error::{DashboardError, Result};

pub trait Launcher: Send + Sync {
    fn name(&self) -> &'static str;
    fn open(&self, target: &str) -> Result<()>;
}

/// The platform default handler
pub struct DefaultHandler;

impl Launcher for DefaultHandler {
    fn name(&self) -> &'static str {
        "default"
    }

    fn open(&self, target: &str) -> Result<()> {
        open::that_detached(target).map_err(|e| DashboardError::Launch(format!("{}: {}", target, e)))
    }
}

/// The program named by `$BROWSER`
pub struct EnvBrowser;

impl Launcher for EnvBrowser {
    fn name(&self) -> &'static str {
        "browser"
    }

    fn open(&self, target: &str) -> Result<()> {
        let browser = std::env::var("BROWSER")
            .ok()
            .filter(|b| !b.trim().is_empty())
            .ok_or_else(|| DashboardError::Launch("BROWSER is not set".to_string()))?;
        open::with_detached(target, browser)
            .map_err(|e| DashboardError::Launch(format!("{}: {}", target, e)))
    }
}

/// Ordered launchers; the first that succeeds wins
pub struct LaunchChain {
    launchers: Vec<Box<dyn Launcher>>,
}

impl LaunchChain {
    pub fn new(launchers: Vec<Box<dyn Launcher>>) -> Self {
        Self { launchers }
    }

    pub fn system() -> Self {
        Self::new(vec![Box::new(DefaultHandler), Box::new(EnvBrowser)])
    }

    pub fn open(&self, target: &str) -> Result<()> {
        let mut last_error = DashboardError::Launch(target.to_string());
        for launcher in &self.launchers {
            match launcher.open(target) {
                Ok(()) => {
                    tracing::debug!(launcher = launcher.name(), target, "Opened");
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(launcher = launcher.name(), error = %e, "Launcher failed");
                    last_error = e;
                }
            }
        }
        Err(last_error)
    }
}
