use std::{fmt, io};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Remote fetch failed or answered with a non-success status.
    Transport,
    /// Varint or message slice ran past the buffer, or the body did not parse.
    FrameDecode,
    /// A record does not have the shape the projection needs.
    Shape,
    Config,
    Usage,
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Transport => "transport error",
            ErrorKind::FrameDecode => "frame decode error",
            ErrorKind::Shape => "shape error",
            ErrorKind::Config => "config error",
            ErrorKind::Usage => "usage error",
            ErrorKind::Io => "io error",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Error {
            kind,
            message: message.into(),
        }
    }

    pub fn shape(message: impl Into<String>) -> Self {
        Error::new(ErrorKind::Shape, message)
    }

    pub fn frame_decode(message: impl Into<String>) -> Self {
        Error::new(ErrorKind::FrameDecode, message)
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Error::new(ErrorKind::Usage, message)
    }

    /// Prefixes the message with where the failure happened, keeping the kind.
    pub fn context(self, context: impl fmt::Display) -> Self {
        Error {
            kind: self.kind,
            message: format!("{}: {}", context, self.message),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(value: io::Error) -> Self {
        Error {
            kind: ErrorKind::Io,
            message: value.to_string()
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Error {
            kind: ErrorKind::Transport,
            message: value.to_string()
        }
    }
}

impl From<prost::DecodeError> for Error {
    fn from(value: prost::DecodeError) -> Self {
        Error {
            kind: ErrorKind::FrameDecode,
            message: value.to_string()
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        let kind = if value.is_io() { ErrorKind::Io } else { ErrorKind::Config };
        Error {
            kind,
            message: value.to_string()
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_keeps_kind() {
        let err = Error::frame_decode("invalid varint").context("geometry layer");
        assert_eq!(err.kind, ErrorKind::FrameDecode);
        assert_eq!(err.message, "geometry layer: invalid varint");
        assert_eq!(err.to_string(), "frame decode error: geometry layer: invalid varint");
    }

    #[test]
    fn decode_error_is_frame_decode() {
        let mut truncated: &[u8] = &[0x80];
        let err: Error = prost::encoding::decode_varint(&mut truncated).unwrap_err().into();
        assert_eq!(err.kind, ErrorKind::FrameDecode);
    }
}
