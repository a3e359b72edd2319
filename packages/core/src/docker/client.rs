//! Docker client wrapper

use super::DockerError;
use bollard::Docker;
use tracing::debug;

/// Thin wrapper over the bollard client connected to the local daemon
pub struct DockerClient {
    inner: Docker,
}

impl DockerClient {
    /// Connect using the platform defaults (`DOCKER_HOST` or the local socket)
    pub fn new() -> Result<Self, DockerError> {
        let inner = Docker::connect_with_local_defaults().map_err(DockerError::from)?;
        Ok(Self { inner })
    }

    /// Connect and verify the daemon answers
    pub async fn connect() -> Result<Self, DockerError> {
        let client = Self::new()?;
        client.verify_connection().await?;
        Ok(client)
    }

    /// Ping the daemon
    pub async fn verify_connection(&self) -> Result<(), DockerError> {
        debug!("Pinging Docker daemon");
        self.inner.ping().await.map_err(DockerError::from)?;
        Ok(())
    }

    /// Access the underlying bollard client
    pub fn inner(&self) -> &Docker {
        &self.inner
    }
}
