//! CLI command handlers.

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use tracing::info;

use super::args::{RenderOptions, RenderTask};
use super::output::{print_bodies, print_help, print_version};
use super::{Args, Command};
use crate::cache::encode_base64;
use crate::config::OrreryConfig;
use crate::error::OrreryResult;
use crate::tasks::{
    AnimationRequest, OrbitRequest, Orrery, RelativeOrbitRequest, SpirographRequest,
};

/// Body plotted by `render angle` when none is given.
const DEFAULT_ANGLE_BODY: &str = "Pluto";

/// Main CLI entry point.
///
/// Dispatches to the appropriate command handler based on parsed arguments.
#[must_use]
pub fn run_cli(args: Args) -> ExitCode {
    let result = match args.command {
        Command::Serve { config_path } => serve(config_path.as_deref()),
        Command::Render(options) => render(&options),
        Command::Bodies { config_path } => list_bodies(config_path.as_deref()),
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::Version => {
            print_version();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Configuration from `path`, or defaults.
///
/// # Errors
///
/// Returns error if the file cannot be loaded or validated.
pub fn load_config(path: Option<&Path>) -> OrreryResult<OrreryConfig> {
    match path {
        Some(path) => OrreryConfig::load(path),
        None => Ok(OrreryConfig::default()),
    }
}

#[cfg(feature = "web")]
fn serve(config_path: Option<&Path>) -> OrreryResult<()> {
    let config = load_config(config_path)?;
    let address = config.bind_address();
    let orrery = std::sync::Arc::new(Orrery::from_config(config)?);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(crate::web::serve(orrery, &address))
}

#[cfg(not(feature = "web"))]
fn serve(_config_path: Option<&Path>) -> OrreryResult<()> {
    Err(crate::error::OrreryError::config(
        "this build has no web front end; rebuild with the `web` feature",
    ))
}

/// Rendered figure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    /// SVG document.
    Svg(String),
    /// GIF bytes.
    Gif(Vec<u8>),
}

impl Artifact {
    /// Bytes to write to a file.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Svg(svg) => svg.as_bytes(),
            Self::Gif(bytes) => bytes,
        }
    }
}

/// Run one render task.
///
/// # Errors
///
/// Propagates task errors.
pub fn execute_render(orrery: &Orrery, options: &RenderOptions) -> OrreryResult<Artifact> {
    let bodies = options.bodies.clone();
    let three_d = options.three_d;

    let artifact = match options.task {
        RenderTask::Kepler => Artifact::Svg(orrery.kepler_law()),
        RenderTask::Orbits => Artifact::Svg(orrery.orbits(&OrbitRequest { bodies, three_d })?),
        RenderTask::Animate => {
            Artifact::Gif(orrery.animation_bytes(&AnimationRequest { bodies, three_d })?)
        }
        RenderTask::Angle => {
            let body = bodies.first().map_or(DEFAULT_ANGLE_BODY, String::as_str);
            Artifact::Svg(orrery.angle_vs_time(body)?)
        }
        RenderTask::Spirograph => {
            Artifact::Svg(orrery.spirograph(&SpirographRequest { bodies })?)
        }
        RenderTask::Relative => {
            let mut request = RelativeOrbitRequest {
                bodies,
                three_d,
                ..RelativeOrbitRequest::default()
            };
            if let Some(center) = &options.center {
                request.center.clone_from(center);
            }
            Artifact::Svg(orrery.relative_orbits(&request)?)
        }
    };

    Ok(artifact)
}

fn render(options: &RenderOptions) -> OrreryResult<()> {
    let config = load_config(options.config_path.as_deref())?;
    let orrery = Orrery::from_config(config)?;
    let artifact = execute_render(&orrery, options)?;

    match &options.output {
        Some(path) => {
            std::fs::write(path, artifact.as_bytes())?;
            info!(path = %path.display(), bytes = artifact.as_bytes().len(), "Wrote figure");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            match &artifact {
                Artifact::Svg(svg) => stdout.write_all(svg.as_bytes())?,
                Artifact::Gif(bytes) => writeln!(stdout, "{}", encode_base64(bytes))?,
            }
            stdout.flush()?;
        }
    }
    Ok(())
}

fn list_bodies(config_path: Option<&Path>) -> OrreryResult<()> {
    let config = load_config(config_path)?;
    let registry = config.registry()?;
    print_bodies(&registry);
    Ok(())
}
