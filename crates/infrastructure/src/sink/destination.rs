use std::fmt;
use std::path::PathBuf;

/// Literal used on the command line for standard output
pub const STDOUT_MARKER: &str = "-";

/// Where dumps are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    /// Truncated and rewritten on every dump
    File(PathBuf),
}

impl Destination {
    /// `None`, empty and `-` all mean standard output
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg.map(str::trim) {
            None | Some("") | Some(STDOUT_MARKER) => Self::Stdout,
            Some(path) => Self::File(PathBuf::from(path)),
        }
    }

    pub fn is_stdout(&self) -> bool {
        matches!(self, Self::Stdout)
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => f.write_str("<stdout>"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}
