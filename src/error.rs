//! Error types for rendering, audio sources, and the session.

use thiserror::Error;

/// Failures of the graphics context or the spectrogram pipeline
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Graphics context unavailable: {0}")]
    ContextUnavailable(String),

    #[error("Shader compilation failed: {0}")]
    ShaderCompile(String),

    #[error("Pipeline link failed: {0}")]
    PipelineLink(String),

    #[error("Surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

/// Failures starting a frequency source
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("No audio {0} device available")]
    NoDevice(&'static str),

    #[error("Audio device error: {0}")]
    Device(String),

    #[error("Synthesis engine error: {0}")]
    Synthesis(String),
}

/// Failures surfaced by session transitions
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Resource unavailable: {0}")]
    ResourceUnavailable(String),

    #[error("Shader build failed: {0}")]
    ShaderBuild(String),
}

impl From<RenderError> for SessionError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::ShaderCompile(_) | RenderError::PipelineLink(_) => {
                Self::ShaderBuild(err.to_string())
            }
            RenderError::ContextUnavailable(_) | RenderError::Surface(_) => {
                Self::ResourceUnavailable(err.to_string())
            }
        }
    }
}

impl From<SourceError> for SessionError {
    fn from(err: SourceError) -> Self {
        Self::ResourceUnavailable(err.to_string())
    }
}
