//! Human approval gate.
//!
//! The pipeline stops after opening a review request and only continues once
//! an [ApprovalProvider] returns. There is no timeout.

use std::io::{self, BufRead, Write};
use std::sync::Mutex;

use crate::error::Result;

/// What the operator is being asked to approve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalRequest {
    pub component: String,
    pub branch: String,
    pub title: String,
}

/// Blocks until the review request for a component has been merged.
pub trait ApprovalProvider {
    fn await_approval(&self, request: &ApprovalRequest) -> Result<()>;
}

/// Waits for the operator to press ENTER on the given input.
///
/// End of input before a line arrives is treated as a refusal.
pub struct ConsoleApproval<R> {
    input: Mutex<R>,
}

impl ConsoleApproval<io::StdinLock<'static>> {
    pub fn stdin() -> Self {
        ConsoleApproval::new(io::stdin().lock())
    }
}

impl<R: BufRead> ConsoleApproval<R> {
    pub fn new(input: R) -> Self {
        ConsoleApproval {
            input: Mutex::new(input),
        }
    }
}

impl<R: BufRead> ApprovalProvider for ConsoleApproval<R> {
    fn await_approval(&self, request: &ApprovalRequest) -> Result<()> {
        print!(
            "\nPlease get the pull request '{}' for {} approved and merged, then hit ENTER to continue",
            request.title, request.component
        );
        io::stdout().flush()?;

        let mut line = String::new();
        let read = self
            .input
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .read_line(&mut line)?;

        if read == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("input closed while waiting for approval of {}", request.component),
            )
            .into());
        }

        Ok(())
    }
}

/// Approves immediately, recording each request.
#[derive(Debug, Default)]
pub struct AutoApprove {
    requests: Mutex<Vec<ApprovalRequest>>,
}

impl AutoApprove {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<ApprovalRequest> {
        self.requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl ApprovalProvider for AutoApprove {
    fn await_approval(&self, request: &ApprovalRequest) -> Result<()> {
        self.requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(request.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReleaseError;
    use std::io::Cursor;

    fn request() -> ApprovalRequest {
        ApprovalRequest {
            component: "core".to_string(),
            branch: "bump".to_string(),
            title: "Version v1.0.0".to_string(),
        }
    }

    #[test]
    fn test_console_approval_on_enter() {
        let approval = ConsoleApproval::new(Cursor::new(b"\n".to_vec()));
        assert!(approval.await_approval(&request()).is_ok());
    }

    #[test]
    fn test_console_approval_closed_input() {
        let approval = ConsoleApproval::new(Cursor::new(Vec::new()));
        let err = approval.await_approval(&request()).unwrap_err();
        match err {
            ReleaseError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_auto_approve_records() {
        let approval = AutoApprove::new();
        approval.await_approval(&request()).unwrap();
        assert_eq!(approval.requests(), vec![request()]);
    }
}
