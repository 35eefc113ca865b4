// src/exit.rs
//! Process exit codes for `comention`.
//!
//! Provides a stable contract for scripts and automation.

use std::process::Termination;

use colored::Colorize;

use crate::error::ComentionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ComentionExit {
    /// Operation completed successfully.
    Success = 0,
    /// Generic error (I/O, unreadable files).
    Error = 1,
    /// Caller-supplied values were rejected (bad range, negative K, bad config, malformed aggregate).
    InvalidInput = 2,
}

impl ComentionExit {
    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn exit(self) -> ! {
        std::process::exit(self.code())
    }
}

impl Termination for ComentionExit {
    fn report(self) -> std::process::ExitCode {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        std::process::ExitCode::from(self.code() as u8)
    }
}

impl From<anyhow::Result<()>> for ComentionExit {
    fn from(res: anyhow::Result<()>) -> Self {
        match res {
            Ok(()) => Self::Success,
            Err(e) => {
                eprintln!("{} {e:#}", "error:".red().bold());
                let invalid = e
                    .chain()
                    .filter_map(|cause| cause.downcast_ref::<ComentionError>())
                    .any(ComentionError::is_invalid_input);
                if invalid {
                    Self::InvalidInput
                } else {
                    Self::Error
                }
            }
        }
    }
}
