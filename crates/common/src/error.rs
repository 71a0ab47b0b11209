//! Common error types.

use thiserror::Error;

/// Errors raised while building or rendering a frame.
///
/// Every variant propagates to the caller of the top-level render; nothing is
/// retried internally.
#[derive(Error, Debug)]
pub enum DrawError {
    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Missing resource: {0}")]
    MissingResource(String),

    #[error("Shader compile error: {0}")]
    GpuCompile(String),

    #[error("GPU error: {0}")]
    Gpu(String),

    #[error("Sampling failed after {attempts} attempts")]
    SamplingFailed { attempts: usize },

    #[error("Invalid color h={h} s={s} v={v}")]
    InvalidColor { h: f64, s: f64, v: f64 },

    #[error("Surface error: {0}")]
    Surface(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type DrawResult<T> = Result<T, DrawError>;

impl DrawError {
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    pub fn degenerate(msg: impl Into<String>) -> Self {
        Self::DegenerateGeometry(msg.into())
    }

    pub fn missing(msg: impl Into<String>) -> Self {
        Self::MissingResource(msg.into())
    }

    pub fn gpu_compile(msg: impl Into<String>) -> Self {
        Self::GpuCompile(msg.into())
    }

    pub fn gpu(msg: impl Into<String>) -> Self {
        Self::Gpu(msg.into())
    }

    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DrawError::SamplingFailed { attempts: 10 };
        assert_eq!(err.to_string(), "Sampling failed after 10 attempts");
        assert_eq!(
            DrawError::missing("shader pass").to_string(),
            "Missing resource: shader pass"
        );
    }

    #[test]
    fn test_io_conversion() {
        fn open() -> DrawResult<()> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"))?;
            Ok(())
        }
        assert!(matches!(open(), Err(DrawError::Io(_))));
    }
}
