//! Navigators for the terminal.

use async_trait::async_trait;
use okpay_core::director::{NavigationSignal, Navigator};
use std::process::Stdio;
use tokio::process::Command;

/// Opens targets with the platform's URL opener.
///
/// A zero exit status counts as handled. Openers exit non-zero when no
/// application is registered for the scheme, which sends the race to the
/// hosted signer straight away.
pub struct SystemNavigator {
    program: String,
}

impl SystemNavigator {
    pub fn new() -> Self {
        let program = if cfg!(target_os = "macos") {
            "open"
        } else if cfg!(target_os = "windows") {
            "explorer"
        } else {
            "xdg-open"
        };
        Self::with_program(program)
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for SystemNavigator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Navigator for SystemNavigator {
    async fn open(&self, target: &str) -> NavigationSignal {
        let status = Command::new(&self.program)
            .arg(target)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match status {
            Ok(status) if status.success() => NavigationSignal::Handled,
            Ok(status) => {
                tracing::debug!(program = %self.program, %status, "Opener did not handle target");
                NavigationSignal::Unhandled
            }
            Err(e) => {
                tracing::warn!(program = %self.program, error = %e, "Failed to run opener");
                NavigationSignal::Unhandled
            }
        }
    }
}

/// Prints targets instead of opening them.
pub struct PrintNavigator;

#[async_trait]
impl Navigator for PrintNavigator {
    async fn open(&self, target: &str) -> NavigationSignal {
        println!("open: {target}");
        NavigationSignal::Handled
    }
}
