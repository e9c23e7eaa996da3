// src/exit.rs
//! Process exit codes for `pedigree`.
//!
//! Scripts can tell a bad file from a missing person without parsing stderr.

use crate::error::GedcomError;
use std::process::Termination;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum PedigreeExit {
    /// Operation completed successfully.
    Success = 0,
    /// I/O failure or any other unclassified error.
    Error = 1,
    /// The file is malformed, structurally invalid or cyclic.
    InvalidInput = 2,
    /// No individual matches the requested name.
    NotFound = 3,
    /// A caller-supplied argument is out of range.
    InvalidArgument = 4,
}

impl PedigreeExit {
    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn exit(self) -> ! {
        std::process::exit(self.code())
    }

    /// Exit code matching the library error at the root of `err`, if any.
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<GedcomError>() {
            Some(e) if e.is_parse_error() => Self::InvalidInput,
            Some(GedcomError::NotFound { .. }) => Self::NotFound,
            Some(GedcomError::InvalidArgument(_)) => Self::InvalidArgument,
            _ => Self::Error,
        }
    }
}

impl Termination for PedigreeExit {
    fn report(self) -> std::process::ExitCode {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        std::process::ExitCode::from(self.code() as u8)
    }
}

impl From<anyhow::Result<()>> for PedigreeExit {
    fn from(res: anyhow::Result<()>) -> Self {
        match res {
            Ok(()) => Self::Success,
            Err(e) => {
                eprintln!("Error: {e:#}");
                Self::for_error(&e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_codes_follow_error_kind() {
        let cases = [
            (GedcomError::format(3, "bad"), PedigreeExit::InvalidInput),
            (
                GedcomError::Cycle { id: "@I1@".into() },
                PedigreeExit::InvalidInput,
            ),
            (
                GedcomError::NotFound {
                    given: "A".into(),
                    surname: "B".into(),
                },
                PedigreeExit::NotFound,
            ),
            (
                GedcomError::InvalidArgument("n".into()),
                PedigreeExit::InvalidArgument,
            ),
            (
                GedcomError::io(std::io::ErrorKind::NotFound.into(), "x.ged"),
                PedigreeExit::Error,
            ),
        ];
        for (err, expected) in cases {
            let wrapped = Err::<(), _>(err).context("while running command");
            assert_eq!(PedigreeExit::from(wrapped), expected);
        }
    }

    #[test]
    fn test_success_code() {
        assert_eq!(PedigreeExit::from(Ok(())).code(), 0);
        assert_eq!(PedigreeExit::from(Err(anyhow::anyhow!("plain"))), PedigreeExit::Error);
    }
}
