use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SimResult<T> = Result<T, SimError>;
pub type ParserResult<T> = SimResult<T>;

/// Failure classes with stable process exit codes, so shell scripts driving
/// batch runs can distinguish a bad macro from a missing file from a failed
/// run without parsing stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimErrorCategory {
    InputValidationError,
    IoSystemError,
    RunError,
    InternalError,
}

impl SimErrorCategory {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::InputValidationError => 2,
            Self::IoSystemError => 3,
            Self::RunError => 4,
            Self::InternalError => 5,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::InputValidationError => "InputValidationError",
            Self::IoSystemError => "IoSystemError",
            Self::RunError => "RunError",
            Self::InternalError => "InternalError",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimError {
    category: SimErrorCategory,
    code: &'static str,
    message: String,
}

impl SimError {
    pub fn new(
        category: SimErrorCategory,
        code: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            code,
            message: message.into(),
        }
    }

    pub fn input_validation(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(SimErrorCategory::InputValidationError, code, message)
    }

    pub fn io_system(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(SimErrorCategory::IoSystemError, code, message)
    }

    pub fn run(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(SimErrorCategory::RunError, code, message)
    }

    pub fn internal(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(SimErrorCategory::InternalError, code, message)
    }

    pub const fn category(&self) -> SimErrorCategory {
        self.category
    }

    pub const fn code(&self) -> &'static str {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn exit_code(&self) -> i32 {
        self.category.exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.code, self.message)
    }
}

impl Display for SimError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}",
            self.category.label(),
            self.code,
            self.message
        )
    }
}

impl Error for SimError {}

#[cfg(test)]
mod tests {
    use super::{SimError, SimErrorCategory};

    #[test]
    fn category_exit_codes_are_stable() {
        let cases = [
            (SimErrorCategory::InputValidationError, 2),
            (SimErrorCategory::IoSystemError, 3),
            (SimErrorCategory::RunError, 4),
            (SimErrorCategory::InternalError, 5),
        ];

        for (category, exit_code) in cases {
            assert_eq!(category.exit_code(), exit_code);
        }
    }

    #[test]
    fn error_renders_diagnostic_line_with_code() {
        let error = SimError::input_validation(
            "INPUT.UNKNOWN_COMMAND",
            "unknown command '/bogus/doThing' at line 3",
        );

        assert_eq!(error.exit_code(), 2);
        assert_eq!(
            error.diagnostic_line(),
            "ERROR: [INPUT.UNKNOWN_COMMAND] unknown command '/bogus/doThing' at line 3"
        );
    }
}
