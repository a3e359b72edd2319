//! Image build and base image resolution
//!
//! Builds the application image from an [`ImageRecipe`] and a collected
//! [`BuildContext`], streaming daemon output through a progress reporter.
//! A failed step aborts the whole build; no image is tagged.

use super::context::BuildContext;
use super::progress::ProgressReporter;
use super::recipe::{ImageRecipe, RECIPE_FILE_NAME};
use super::{DockerClient, DockerError};
use bollard::models::{BuildInfoAux, CreateImageInfo};
use bollard::query_parameters::{BuildImageOptions, BuilderVersion, CreateImageOptions};
use bytes::Bytes;
use futures_util::StreamExt;
use http_body_util::{Either, Full};
use std::collections::VecDeque;
use std::env;
use std::time::Duration;
use tracing::{debug, warn};

/// Build output lines kept for a failure report
const BUILD_TAIL_LINES: usize = 20;

/// Error-looking lines kept separately, since they often scroll out of the tail
const FLAGGED_LINES: usize = 10;

/// Delays between base image pull attempts; one more attempt than entries
const PULL_BACKOFF: [Duration; 2] = [Duration::from_secs(1), Duration::from_secs(2)];

/// Line count from `var`, clamped to 5..=500
fn tail_len_from_env(var: &str, fallback: usize) -> usize {
    env::var(var)
        .ok()
        .and_then(|raw| raw.trim().parse::<usize>().ok())
        .map_or(fallback, |n| n.clamp(5, 500))
}

/// Heuristic for daemon output worth surfacing after a failed build
fn looks_like_failure(line: &str) -> bool {
    const MARKERS: [&str; 7] = [
        "error",
        "failed",
        "cannot",
        "can't open",
        "unable to",
        "not found",
        "permission denied",
    ];
    let lower = line.to_lowercase();
    MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Split `name:tag`, defaulting the tag to `latest`
///
/// A colon inside a registry host (`localhost:5000/app`) is not a tag.
pub fn split_image_ref(reference: &str) -> (&str, &str) {
    match reference.rsplit_once(':') {
        Some((name, tag)) if !tag.contains('/') => (name, tag),
        _ => (reference, "latest"),
    }
}

/// Check if an image exists locally
pub async fn image_exists(
    client: &DockerClient,
    image: &str,
    tag: &str,
) -> Result<bool, DockerError> {
    let full_name = format!("{image}:{tag}");
    debug!("Checking if image exists: {}", full_name);

    match client.inner().inspect_image(&full_name).await {
        Ok(_) => Ok(true),
        Err(bollard::errors::Error::DockerResponseServerError {
            status_code: 404, ..
        }) => Ok(false),
        Err(e) => Err(DockerError::from(e)),
    }
}

/// Make sure the recipe's base image is available locally
///
/// Pulls it when missing. An unresolvable reference is a build failure.
pub async fn ensure_base_image(
    client: &DockerClient,
    recipe: &ImageRecipe,
    progress: &mut ProgressReporter,
) -> Result<(), DockerError> {
    if image_exists(client, recipe.base_image(), recipe.base_tag()).await? {
        debug!("Base image {} already present", recipe.base_ref());
        return Ok(());
    }
    pull_image(client, recipe.base_image(), recipe.base_tag(), progress).await
}

/// A failed pull attempt
struct PullFailure {
    error: DockerError,
    /// Retrying cannot help, e.g. the reference does not exist
    permanent: bool,
}

/// Whether a pull failure will repeat no matter how often it is retried
fn is_permanent_pull_failure(status_code: Option<u16>, reason: &str) -> bool {
    if status_code == Some(404) {
        return true;
    }
    let reason = reason.to_lowercase();
    ["manifest unknown", "pull access denied", "not found", "invalid reference format"]
        .iter()
        .any(|marker| reason.contains(marker))
}

/// Pull `image:tag`, retrying transient failures with a short backoff
///
/// Unknown images and denied access fail on the first attempt.
pub async fn pull_image(
    client: &DockerClient,
    image: &str,
    tag: &str,
    progress: &mut ProgressReporter,
) -> Result<(), DockerError> {
    let reference = format!("{image}:{tag}");
    let attempts = PULL_BACKOFF.len() + 1;
    let mut attempt = 1;

    loop {
        debug!("Pulling {} (attempt {}/{})", reference, attempt, attempts);
        let err = match pull_once(client, image, tag, progress).await {
            Ok(()) => return Ok(()),
            Err(PullFailure {
                error,
                permanent: true,
            }) => {
                warn!("Not retrying pull of {}: {}", reference, error);
                return Err(error);
            }
            Err(PullFailure { error, .. }) => error,
        };

        let Some(delay) = PULL_BACKOFF.get(attempt - 1) else {
            warn!("Giving up on {} after {} attempts", reference, attempts);
            return Err(err);
        };
        warn!("Pull of {} failed, retrying in {:?}: {}", reference, delay, err);
        tokio::time::sleep(*delay).await;
        attempt += 1;
    }
}

async fn pull_once(
    client: &DockerClient,
    image: &str,
    tag: &str,
    progress: &mut ProgressReporter,
) -> Result<(), PullFailure> {
    let reference = format!("{image}:{tag}");
    let options = CreateImageOptions {
        from_image: Some(image.to_string()),
        tag: Some(tag.to_string()),
        platform: String::new(),
        ..Default::default()
    };

    progress.add_spinner("pull", &format!("Pulling base image {reference}"));
    let mut events = client.inner().create_image(Some(options), None, None);

    while let Some(event) = events.next().await {
        let outcome = match event {
            Ok(info) => show_pull_event(&info, progress).map_err(|reason| (None, reason)),
            Err(bollard::errors::Error::DockerResponseServerError {
                status_code,
                message,
            }) => Err((Some(status_code), message)),
            Err(e) => Err((None, e.to_string())),
        };
        if let Err((status_code, reason)) = outcome {
            progress.abandon_all("Base image pull failed");
            return Err(PullFailure {
                permanent: is_permanent_pull_failure(status_code, &reason),
                error: DockerError::Pull(format!("{reference}: {reason}")),
            });
        }
    }

    progress.finish("pull", &format!("Base image ready: {reference}"));
    Ok(())
}

/// Reflect one pull event in the progress display; `Err` carries a daemon error
fn show_pull_event(info: &CreateImageInfo, progress: &mut ProgressReporter) -> Result<(), String> {
    if let Some(reason) = info.error_detail.as_ref().and_then(|d| d.message.clone()) {
        return Err(reason);
    }

    let status = info.status.as_deref().unwrap_or_default();
    let Some(layer) = info.id.as_deref() else {
        if !status.is_empty() {
            progress.update_spinner("pull", status);
        }
        return Ok(());
    };

    match (status, info.progress_detail.as_ref()) {
        ("Already exists" | "Pull complete", _) => progress.finish(layer, status),
        ("Downloading" | "Extracting", Some(detail)) => {
            let done = detail.current.unwrap_or(0).max(0) as u64;
            let size = detail.total.unwrap_or(0).max(0) as u64;
            if size > 0 {
                progress.update_layer(layer, done, size, status);
            }
        }
        ("Downloading" | "Extracting", None) => {}
        _ => progress.update_spinner(layer, status),
    }
    Ok(())
}

/// Options for [`build_image`]
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Build without the daemon's layer cache
    pub no_cache: bool,
    /// Skip resolving the base image before the build
    pub skip_pull: bool,
}

/// Build the application image
///
/// Runs the pipeline base-select → workdir → copy → env → cmd on the
/// daemon. Returns the image ID on success.
pub async fn build_image(
    client: &DockerClient,
    recipe: &ImageRecipe,
    context: &BuildContext,
    image_ref: &str,
    options: &BuildOptions,
    progress: &mut ProgressReporter,
) -> Result<String, DockerError> {
    debug!(
        "Building image {} from {} (no_cache: {})",
        image_ref,
        context.root().display(),
        options.no_cache
    );

    if !options.skip_pull {
        ensure_base_image(client, recipe, progress).await?;
    }

    let archive = context.to_archive(recipe)?;
    debug!("Build context archive is {} bytes", archive.len());

    let build_options = BuildImageOptions {
        t: Some(image_ref.to_string()),
        dockerfile: RECIPE_FILE_NAME.to_string(),
        version: BuilderVersion::BuilderV1,
        rm: true,
        forcerm: true,
        nocache: options.no_cache,
        platform: String::new(),
        target: String::new(),
        ..Default::default()
    };

    let body: Either<Full<Bytes>, _> = Either::Left(Full::new(Bytes::from(archive)));
    let mut stream = client.inner().build_image(build_options, None, Some(body));

    progress.add_spinner("build", "Sending build context");
    let mut transcript = BuildTranscript::from_env();
    let mut image_id = None;

    while let Some(event) = stream.next().await {
        let info = match event {
            Ok(info) => info,
            Err(e) => {
                progress.abandon_all("Build stream interrupted");
                return Err(DockerError::Build(transcript.failure_report(&e.to_string())));
            }
        };

        if let Some(text) = info.stream.as_deref() {
            echo_build_output(text, progress);
            transcript.push(text.trim());
        }

        if let Some(reason) = info.error_detail.as_ref().and_then(|d| d.message.as_deref()) {
            progress.abandon_all(reason);
            return Err(DockerError::Build(transcript.failure_report(reason)));
        }

        match info.aux {
            Some(BuildInfoAux::Default(aux)) => image_id = aux.id.or(image_id),
            Some(BuildInfoAux::BuildKit(_)) => debug!("Ignoring BuildKit status from classic builder"),
            None => {}
        }
    }

    let image_id = image_id.unwrap_or_else(|| "unknown".to_string());
    progress.finish("build", &format!("Image built: {image_id}"));
    Ok(image_id)
}

fn echo_build_output(text: &str, progress: &mut ProgressReporter) {
    let line = text.trim();
    if line.is_empty() {
        return;
    }
    if line.starts_with("Step ") {
        debug!("{}", line);
    }
    if progress.is_plain_output() {
        eprint!("{text}");
    } else {
        progress.update_spinner("build", line);
    }
}

/// Bounded record of daemon build output, turned into a report on failure
#[derive(Debug)]
struct BuildTranscript {
    tail: VecDeque<String>,
    flagged: VecDeque<String>,
    tail_len: usize,
    flagged_len: usize,
}

impl BuildTranscript {
    fn with_limits(tail_len: usize, flagged_len: usize) -> Self {
        Self {
            tail: VecDeque::with_capacity(tail_len),
            flagged: VecDeque::with_capacity(flagged_len),
            tail_len,
            flagged_len,
        }
    }

    fn from_env() -> Self {
        Self::with_limits(
            tail_len_from_env("ASSISTANT_BOT_BUILD_LOG_TAIL", BUILD_TAIL_LINES),
            tail_len_from_env("ASSISTANT_BOT_BUILD_ERROR_TAIL", FLAGGED_LINES),
        )
    }

    fn push(&mut self, line: &str) {
        if line.is_empty() {
            return;
        }
        push_bounded(&mut self.tail, self.tail_len, line);
        if looks_like_failure(line) {
            push_bounded(&mut self.flagged, self.flagged_len, line);
        }
    }

    /// `reason` followed by earlier suspicious lines, the output tail and a hint
    fn failure_report(&self, reason: &str) -> String {
        let mut report = reason.to_string();

        let earlier: Vec<&String> = self
            .flagged
            .iter()
            .filter(|line| !self.tail.contains(*line))
            .collect();
        if !earlier.is_empty() {
            report.push_str("\n\nEarlier output that looks like an error:");
            for line in earlier {
                report.push_str("\n  ");
                report.push_str(line);
            }
        }

        if self.tail.is_empty() {
            report.push_str("\n\nThe daemon sent no build output before failing.");
        } else {
            report.push_str("\n\nLast build output:");
            for line in &self.tail {
                report.push_str("\n  ");
                report.push_str(line);
            }
        }

        if let Some(hint) = failure_hint(reason) {
            report.push_str("\n\nHint: ");
            report.push_str(hint);
        }
        report
    }
}

fn push_bounded(lines: &mut VecDeque<String>, limit: usize, line: &str) {
    if lines.len() == limit {
        lines.pop_front();
    }
    lines.push_back(line.to_string());
}

fn failure_hint(reason: &str) -> Option<&'static str> {
    let reason = reason.to_lowercase();
    let mentions = |words: &[&str]| words.iter().any(|w| reason.contains(w));

    if mentions(&["pull access denied", "manifest unknown", "not found"]) {
        Some("check image.base_image and image.base_tag name an image the registry has.")
    } else if mentions(&["network", "connection", "timeout"]) {
        Some("the daemon could not reach the registry; check its network access.")
    } else if mentions(&["no space", "disk"]) {
        Some("the daemon is out of disk space; `docker system prune` frees unused layers.")
    } else if mentions(&["permission", "denied"]) {
        Some("the daemon refused access; make sure your user may talk to Docker.")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_image_ref_handles_tags_and_registries() {
        assert_eq!(split_image_ref("python:3.13-slim"), ("python", "3.13-slim"));
        assert_eq!(split_image_ref("python"), ("python", "latest"));
        assert_eq!(
            split_image_ref("localhost:5000/app"),
            ("localhost:5000/app", "latest")
        );
        assert_eq!(
            split_image_ref("localhost:5000/app:v1"),
            ("localhost:5000/app", "v1")
        );
    }

    #[test]
    fn failure_report_lists_last_output() {
        let mut transcript = BuildTranscript::with_limits(20, 10);
        transcript.push("Step 1/5 : FROM python:3.13-slim");
        transcript.push("Step 3/5 : COPY . /app");

        let report = transcript.failure_report("The command returned a non-zero code: 1");

        assert!(report.starts_with("The command returned a non-zero code: 1"));
        assert!(report.contains("Last build output:\n  Step 1/5"));
        assert!(!report.contains("Hint:"));
    }

    #[test]
    fn failure_report_without_output_says_so() {
        let report = BuildTranscript::with_limits(20, 10).failure_report("stream closed");
        assert!(report.contains("no build output"));
        assert!(!report.contains("Last build output:"));
    }

    #[test]
    fn failure_report_hints_at_base_image() {
        let report =
            BuildTranscript::with_limits(20, 10).failure_report("manifest unknown: python:9.99");
        assert!(report.contains("Hint: check image.base_image"));
    }

    #[test]
    fn failure_report_hints_at_disk_space() {
        let report = BuildTranscript::with_limits(20, 10).failure_report("no space left on device");
        assert!(report.contains("docker system prune"));
    }

    #[test]
    fn scrolled_out_errors_are_reported_once() {
        let mut transcript = BuildTranscript::with_limits(5, 10);
        transcript.push("error: failed to copy files");
        for step in 1..=5 {
            transcript.push(&format!("Step {step}/5"));
        }

        let report = transcript.failure_report("build failed");
        assert!(report.contains("Earlier output that looks like an error:\n  error: failed to copy files"));
        assert_eq!(report.matches("failed to copy files").count(), 1);
    }

    #[test]
    fn transcript_tail_is_bounded() {
        let mut transcript = BuildTranscript::with_limits(5, 5);
        for i in 0..8 {
            transcript.push(&format!("line {i}"));
        }
        transcript.push("");
        assert_eq!(transcript.tail.len(), 5);
        assert_eq!(transcript.tail.front().map(String::as_str), Some("line 3"));
        assert!(transcript.flagged.is_empty());
    }

    #[test]
    fn missing_images_are_not_retried() {
        assert!(is_permanent_pull_failure(Some(404), "anything"));
        assert!(is_permanent_pull_failure(
            None,
            "manifest for python:9.99 not found: manifest unknown"
        ));
        assert!(is_permanent_pull_failure(
            Some(500),
            "pull access denied for nosuchorg/app, repository does not exist"
        ));
        assert!(!is_permanent_pull_failure(Some(500), "net/http: TLS handshake timeout"));
        assert!(!is_permanent_pull_failure(None, "connection reset by peer"));
    }

    #[test]
    fn failure_lines_are_recognised() {
        assert!(looks_like_failure("ERROR: something broke"));
        assert!(looks_like_failure("Failed to install package"));
        assert!(looks_like_failure("python: can't open file '/app/main.py'"));
        assert!(!looks_like_failure("Step 2/5 : WORKDIR /app"));
    }
}
