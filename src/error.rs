// Fatal error conditions.
//
// spec kind 1-4 (allocation/overflow, I/O, syntax, semantic) are fatal and
// represented here; kind 5 (benign: undefine of a missing name, dumpdef of
// a missing name, a lookup miss during expansion) is not an error at all -
// it is handled inline by the caller as specified.

use std::fmt;

#[derive(Debug)]
pub enum M4Error {
    Io(std::io::Error, &'static str),
    UnterminatedQuote,
    UnterminatedCall,
    TooManyArguments,
    BadChangequote,
    BadDivertNumber(String),
    NonNumericArgument {
        builtin: &'static str,
        arg: String,
    },
    ArithmeticOverflow {
        builtin: &'static str,
    },
    ArithmeticUnderflow {
        builtin: &'static str,
    },
    DivideByZero {
        builtin: &'static str,
    },
    ShellCommandFailed {
        cmd: String,
        status: i32,
    },
}

impl fmt::Display for M4Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            M4Error::Io(e, ctx) => write!(f, "I/O error ({ctx}): {e}"),
            M4Error::UnterminatedQuote => write!(f, "end of input while quote state was active"),
            M4Error::UnterminatedCall => write!(f, "end of input with an open macro call"),
            M4Error::TooManyArguments => write!(f, "too many arguments (more than 9)"),
            M4Error::BadChangequote => {
                write!(f, "changequote: delimiters must be distinct printable bytes other than '(', ')', ','")
            }
            M4Error::BadDivertNumber(n) => write!(f, "divert: invalid diversion number '{n}'"),
            M4Error::NonNumericArgument { builtin, arg } => {
                write!(f, "{builtin}: argument '{arg}' is not a non-negative integer")
            }
            M4Error::ArithmeticOverflow { builtin } => write!(f, "{builtin}: overflow"),
            M4Error::ArithmeticUnderflow { builtin } => write!(f, "{builtin}: underflow"),
            M4Error::DivideByZero { builtin } => write!(f, "{builtin}: division by zero"),
            M4Error::ShellCommandFailed { cmd, status } => {
                write!(f, "esyscmd: command '{cmd}' exited with status {status}")
            }
        }
    }
}

impl std::error::Error for M4Error {}

pub type M4Result<T> = Result<T, M4Error>;
