//! Clipboard writes as an ordered list of strategies.

use std::time::{Duration, Instant};

#[cfg(target_os = "linux")]
use arboard::SetExtLinux;
use arboard::{Clipboard, Set};
use serde::Serialize;

use super::html::to_plain_text;
use crate::error::{DashboardError, Result};

/// Linux clipboard contents vanish with the owning process. A set call waits
/// up to this long for a clipboard manager to take ownership.
const LINGER: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyFormat {
    RichHtml,
    PlainText,
}

/// What to copy. `html` is offered to rich strategies, `text` to plain ones.
#[derive(Debug, Clone)]
pub struct ClipboardPayload {
    pub html: Option<String>,
    pub text: String,
}

impl ClipboardPayload {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            html: None,
            text: text.into(),
        }
    }
}

pub trait ClipboardStrategy: Send + Sync {
    fn format(&self) -> CopyFormat;
    fn write(&self, payload: &ClipboardPayload) -> Result<()>;
}

fn open_clipboard() -> Result<Clipboard> {
    Clipboard::new().map_err(|e| {
        tracing::debug!(error = %e, "Clipboard unavailable");
        DashboardError::Clipboard
    })
}

/// Setter that returns as soon as ownership is handed over, or at the deadline.
/// Blocking: async callers run clipboard writes under `block_in_place`.
#[cfg(target_os = "linux")]
fn setter(clipboard: &mut Clipboard, deadline: Instant) -> Set<'_> {
    clipboard.set().wait_until(deadline)
}

#[cfg(not(target_os = "linux"))]
fn setter(clipboard: &mut Clipboard, _deadline: Instant) -> Set<'_> {
    clipboard.set()
}

/// `text/html` with a plain-text alternative
pub struct RichHtmlClipboard;

impl ClipboardStrategy for RichHtmlClipboard {
    fn format(&self) -> CopyFormat {
        CopyFormat::RichHtml
    }

    fn write(&self, payload: &ClipboardPayload) -> Result<()> {
        let html = payload.html.as_deref().ok_or(DashboardError::Clipboard)?;
        let alt = to_plain_text(html);

        let mut clipboard = open_clipboard()?;
        setter(&mut clipboard, Instant::now() + LINGER)
            .html(html, Some(alt.as_str()))
            .map_err(|e| {
                tracing::debug!(error = %e, "Rich clipboard write failed");
                DashboardError::Clipboard
            })
    }
}

pub struct PlainTextClipboard;

impl ClipboardStrategy for PlainTextClipboard {
    fn format(&self) -> CopyFormat {
        CopyFormat::PlainText
    }

    fn write(&self, payload: &ClipboardPayload) -> Result<()> {
        let mut clipboard = open_clipboard()?;
        setter(&mut clipboard, Instant::now() + LINGER)
            .text(payload.text.as_str())
            .map_err(|e| {
                tracing::debug!(error = %e, "Plain clipboard write failed");
                DashboardError::Clipboard
            })
    }
}

/// Rich HTML first, then plain text
pub fn system_strategies() -> Vec<Box<dyn ClipboardStrategy>> {
    vec![Box::new(RichHtmlClipboard), Box::new(PlainTextClipboard)]
}

/// Try each strategy in order; the first success wins
pub fn copy_with_fallback(
    strategies: &[Box<dyn ClipboardStrategy>],
    payload: &ClipboardPayload,
) -> Result<CopyFormat> {
    for strategy in strategies {
        if strategy.format() == CopyFormat::RichHtml && payload.html.is_none() {
            continue;
        }
        match strategy.write(payload) {
            Ok(()) => return Ok(strategy.format()),
            Err(e) => {
                tracing::warn!(format = ?strategy.format(), error = %e, "Clipboard strategy failed");
            }
        }
    }
    Err(DashboardError::Clipboard)
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Records writes; optionally fails
    #[derive(Clone)]
    pub struct FakeClipboard {
        pub format: CopyFormat,
        pub fail: bool,
        pub written: Arc<Mutex<Vec<String>>>,
    }

    impl FakeClipboard {
        pub fn new(format: CopyFormat, fail: bool) -> Self {
            Self {
                format,
                fail,
                written: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn writes(&self) -> Vec<String> {
            self.written.lock().unwrap().clone()
        }
    }

    impl ClipboardStrategy for FakeClipboard {
        fn format(&self) -> CopyFormat {
            self.format
        }

        fn write(&self, payload: &ClipboardPayload) -> Result<()> {
            let content = match self.format {
                CopyFormat::RichHtml => payload.html.clone().unwrap_or_default(),
                CopyFormat::PlainText => payload.text.clone(),
            };
            self.written.lock().unwrap().push(content);
            if self.fail {
                Err(DashboardError::Clipboard)
            } else {
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake::FakeClipboard;
    use super::*;

    fn payload() -> ClipboardPayload {
        ClipboardPayload {
            html: Some("<p>Hi</p>".to_string()),
            text: "<html><body><p>Hi</p></body></html>".to_string(),
        }
    }

    #[test]
    fn test_rich_success_skips_plain() {
        let rich = FakeClipboard::new(CopyFormat::RichHtml, false);
        let plain = FakeClipboard::new(CopyFormat::PlainText, false);
        let strategies: Vec<Box<dyn ClipboardStrategy>> =
            vec![Box::new(rich.clone()), Box::new(plain.clone())];

        assert_eq!(copy_with_fallback(&strategies, &payload()).unwrap(), CopyFormat::RichHtml);
        assert_eq!(rich.writes(), vec!["<p>Hi</p>"]);
        assert!(plain.writes().is_empty());
    }

    #[test]
    fn test_rich_failure_falls_back_to_plain() {
        let rich = FakeClipboard::new(CopyFormat::RichHtml, true);
        let plain = FakeClipboard::new(CopyFormat::PlainText, false);
        let strategies: Vec<Box<dyn ClipboardStrategy>> =
            vec![Box::new(rich.clone()), Box::new(plain.clone())];

        assert_eq!(copy_with_fallback(&strategies, &payload()).unwrap(), CopyFormat::PlainText);
        assert_eq!(rich.writes().len(), 1);
        assert_eq!(plain.writes(), vec!["<html><body><p>Hi</p></body></html>"]);
    }

    #[test]
    fn test_all_failing_is_clipboard_error() {
        let strategies: Vec<Box<dyn ClipboardStrategy>> = vec![
            Box::new(FakeClipboard::new(CopyFormat::RichHtml, true)),
            Box::new(FakeClipboard::new(CopyFormat::PlainText, true)),
        ];
        let err = copy_with_fallback(&strategies, &payload()).unwrap_err();
        assert!(matches!(err, DashboardError::Clipboard));
        assert_eq!(err.level(), crate::error::NoticeLevel::Danger);
    }

    #[test]
    fn test_plain_payload_skips_rich() {
        let rich = FakeClipboard::new(CopyFormat::RichHtml, false);
        let plain = FakeClipboard::new(CopyFormat::PlainText, false);
        let strategies: Vec<Box<dyn ClipboardStrategy>> =
            vec![Box::new(rich.clone()), Box::new(plain.clone())];

        let format = copy_with_fallback(&strategies, &ClipboardPayload::plain("notes")).unwrap();
        assert_eq!(format, CopyFormat::PlainText);
        assert!(rich.writes().is_empty());
    }

    /// Holds the clipboard for a while, noting how far a ticker got meanwhile
    struct SlowClipboard {
        hold: Duration,
        ticks: std::sync::Arc<std::sync::atomic::AtomicUsize>,
        seen: std::sync::Arc<std::sync::atomic::AtomicUsize>,
    }

    impl ClipboardStrategy for SlowClipboard {
        fn format(&self) -> CopyFormat {
            CopyFormat::PlainText
        }

        fn write(&self, _payload: &ClipboardPayload) -> Result<()> {
            std::thread::sleep(self.hold);
            let ticks = self.ticks.load(std::sync::atomic::Ordering::SeqCst);
            self.seen.store(ticks, std::sync::atomic::Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_held_clipboard_does_not_stall_runtime() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let ticks = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(AtomicUsize::new(0));

        let counter = ticks.clone();
        let ticker = tokio::spawn(async move {
            for _ in 0..5 {
                tokio::time::sleep(Duration::from_millis(10)).await;
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        let strategy = SlowClipboard {
            hold: Duration::from_millis(300),
            ticks: ticks.clone(),
            seen: seen.clone(),
        };
        let copy = tokio::spawn(async move {
            tokio::task::block_in_place(|| {
                let strategies: Vec<Box<dyn ClipboardStrategy>> = vec![Box::new(strategy)];
                copy_with_fallback(&strategies, &ClipboardPayload::plain("notes"))
            })
        });

        assert_eq!(copy.await.unwrap().unwrap(), CopyFormat::PlainText);
        ticker.await.unwrap();
        assert!(seen.load(Ordering::SeqCst) > 0);
    }
}
