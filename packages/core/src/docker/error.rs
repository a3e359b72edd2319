//! Docker-specific error types

use thiserror::Error;

/// Errors from image recipe, build, and run operations
///
/// Build-time failures (`Context`, `Pull`, `Build`, `Recipe`) abort the
/// build without producing an image. `Launch` means the entrypoint could not
/// be started inside the container.
#[derive(Debug, Error)]
pub enum DockerError {
    #[error("Docker connection failed: {0}")]
    Connection(String),

    #[error("Docker daemon is not running")]
    NotRunning,

    #[error("Docker socket not found")]
    SocketNotFound,

    #[error("Permission denied accessing Docker socket")]
    PermissionDenied,

    #[error("Invalid image recipe: {0}")]
    Recipe(#[from] super::recipe::RecipeError),

    #[error("Build context error: {0}")]
    Context(String),

    #[error("Failed to resolve base image: {0}")]
    Pull(String),

    #[error("Image build failed: {0}")]
    Build(String),

    #[error("Image error: {0}")]
    Image(String),

    #[error("Container error: {0}")]
    Container(String),

    #[error("Entrypoint failed to launch: {0}")]
    Launch(String),
}

impl From<bollard::errors::Error> for DockerError {
    fn from(err: bollard::errors::Error) -> Self {
        let msg = err.to_string();
        let lower = msg.to_lowercase();
        if lower.contains("permission denied") {
            DockerError::PermissionDenied
        } else if lower.contains("no such file or directory") && lower.contains("sock") {
            DockerError::SocketNotFound
        } else if lower.contains("connection refused") || lower.contains("cannot connect") {
            DockerError::NotRunning
        } else {
            DockerError::Connection(msg)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn daemon_error(message: &str) -> bollard::errors::Error {
        bollard::errors::Error::DockerResponseServerError {
            status_code: 500,
            message: message.to_string(),
        }
    }

    #[test]
    fn daemon_errors_are_classified_by_message() {
        assert!(matches!(
            DockerError::from(daemon_error("connect: permission denied")),
            DockerError::PermissionDenied
        ));
        assert!(matches!(
            DockerError::from(daemon_error("connection refused")),
            DockerError::NotRunning
        ));
        assert!(matches!(
            DockerError::from(daemon_error("internal server error")),
            DockerError::Connection(_)
        ));
    }
}
