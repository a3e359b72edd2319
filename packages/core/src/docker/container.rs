//! Container launch for the built image
//!
//! Starts one container from the application image using the image's own
//! default command, relays its output and reports the exit code.

use super::{DockerClient, DockerError};
use bollard::container::LogOutput;
use bollard::models::ContainerCreateBody;
use bollard::query_parameters::{
    CreateContainerOptions, LogsOptions, RemoveContainerOptions, StartContainerOptions,
    WaitContainerOptions,
};
use futures_util::StreamExt;
use std::io::Write;
use tracing::{debug, warn};

/// How a launched container ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub container_id: String,
    pub exit_code: i64,
    /// Whether the container was left behind after exit
    pub kept: bool,
}

/// Create a container from `image_ref` without overriding its command
pub async fn create_container(
    client: &DockerClient,
    image_ref: &str,
) -> Result<String, DockerError> {
    debug!("Creating container from image {}", image_ref);

    let config = ContainerCreateBody {
        image: Some(image_ref.to_string()),
        attach_stdout: Some(true),
        attach_stderr: Some(true),
        ..Default::default()
    };

    let response = client
        .inner()
        .create_container(None::<CreateContainerOptions>, config)
        .await
        .map_err(|e| match e {
            bollard::errors::Error::DockerResponseServerError {
                status_code: 404, ..
            } => DockerError::Image(format!(
                "Image {image_ref} not found. Build it first with 'assistant-bot image build'."
            )),
            e => DockerError::Container(format!("Failed to create container: {e}")),
        })?;

    for warning in &response.warnings {
        warn!("Docker: {}", warning);
    }
    debug!("Container created with ID: {}", response.id);
    Ok(response.id)
}

/// Start an existing container
///
/// A failure here means the image's command could not be executed.
pub async fn start_container(client: &DockerClient, id: &str) -> Result<(), DockerError> {
    debug!("Starting container: {}", id);

    client
        .inner()
        .start_container(id, None::<StartContainerOptions>)
        .await
        .map_err(|e| DockerError::Launch(e.to_string()))?;

    debug!("Container {} started", id);
    Ok(())
}

/// Relay container stdout/stderr into `out`/`err` until the container exits
///
/// Each chunk is flushed as it arrives so output stays unbuffered.
pub async fn stream_output<O: Write, E: Write>(
    client: &DockerClient,
    id: &str,
    out: &mut O,
    err: &mut E,
) -> Result<(), DockerError> {
    let options = LogsOptions {
        stdout: true,
        stderr: true,
        follow: true,
        ..Default::default()
    };

    let mut stream = client.inner().logs(id, Some(options));

    while let Some(result) = stream.next().await {
        let relayed = match result {
            Ok(LogOutput::StdErr { message }) => relay(err, &message),
            Ok(LogOutput::StdOut { message } | LogOutput::Console { message }) => {
                relay(out, &message)
            }
            Ok(LogOutput::StdIn { .. }) => Ok(()),
            Err(e) => {
                debug!("Log stream for {} ended: {}", id, e);
                break;
            }
        };
        // A closed pipe on our side must not stop the container from being reaped
        if let Err(e) = relayed {
            debug!("Dropping output of {}: {}", id, e);
        }
    }

    Ok(())
}

fn relay<W: Write>(sink: &mut W, chunk: &[u8]) -> std::io::Result<()> {
    sink.write_all(chunk)?;
    sink.flush()
}

/// Wait for the container to exit and return its status code
pub async fn wait_container(client: &DockerClient, id: &str) -> Result<i64, DockerError> {
    let mut stream = client
        .inner()
        .wait_container(id, None::<WaitContainerOptions>);

    let mut exit_code = 0;
    while let Some(result) = stream.next().await {
        match result {
            Ok(response) => exit_code = response.status_code,
            // bollard reports non-zero exits as an error carrying the code
            Err(bollard::errors::Error::DockerContainerWaitError { code, .. }) => {
                exit_code = code;
            }
            Err(e) => {
                return Err(DockerError::Container(format!(
                    "Failed waiting for container {id}: {e}"
                )));
            }
        }
    }

    debug!("Container {} exited with {}", id, exit_code);
    Ok(exit_code)
}

/// Remove a container
pub async fn remove_container(
    client: &DockerClient,
    id: &str,
    force: bool,
) -> Result<(), DockerError> {
    debug!("Removing container {} (force={})", id, force);

    let options = RemoveContainerOptions {
        force,
        v: false,
        link: false,
    };

    client
        .inner()
        .remove_container(id, Some(options))
        .await
        .map_err(|e| DockerError::Container(format!("Failed to remove container {id}: {e}")))?;

    debug!("Container {} removed", id);
    Ok(())
}

/// Launch the image's default command and wait for it to finish
///
/// Container output is relayed into `out` and `err`. The container is
/// removed afterwards unless `keep` is set. When the command cannot start,
/// or the container cannot be waited on, the created container is cleaned
/// up and the error is returned.
pub async fn run_container<O: Write, E: Write>(
    client: &DockerClient,
    image_ref: &str,
    keep: bool,
    out: &mut O,
    err: &mut E,
) -> Result<RunOutcome, DockerError> {
    let id = create_container(client, image_ref).await?;

    if let Err(e) = start_container(client, &id).await {
        discard_container(client, &id).await;
        return Err(e);
    }

    stream_output(client, &id, out, err).await?;
    let exit_code = match wait_container(client, &id).await {
        Ok(code) => code,
        Err(e) => {
            if !keep {
                discard_container(client, &id).await;
            }
            return Err(e);
        }
    };

    if !keep {
        remove_container(client, &id, true).await?;
    }

    Ok(RunOutcome {
        container_id: id,
        exit_code,
        kept: keep,
    })
}

/// Best-effort forced removal on an error path
async fn discard_container(client: &DockerClient, id: &str) {
    if let Err(cleanup) = remove_container(client, id, true).await {
        warn!("Failed to clean up container {}: {}", id, cleanup);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relay_writes_chunks_in_order() {
        let mut sink = Vec::new();
        relay(&mut sink, b"hel").unwrap();
        relay(&mut sink, b"lo\n").unwrap();
        assert_eq!(sink, b"hello\n");
    }
}
