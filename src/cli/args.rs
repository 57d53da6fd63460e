//! CLI argument parsing.
//!
//! Hand-rolled parser for the orrery CLI. Accepts any iterator of strings so
//! parsing can be tested without touching the process environment.

use std::path::PathBuf;

use crate::tasks::parse_names;

/// CLI arguments container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    /// The command to execute.
    pub command: Command,
}

/// Figure a `render` invocation produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderTask {
    /// Kepler's third law.
    Kepler,
    /// Static orbit paths.
    Orbits,
    /// Orbit animation (GIF).
    Animate,
    /// Angle against time.
    Angle,
    /// Two-body spirograph.
    Spirograph,
    /// Orbits relative to a center body.
    Relative,
}

impl RenderTask {
    /// Parse a task name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "kepler" => Some(Self::Kepler),
            "orbits" => Some(Self::Orbits),
            "animate" => Some(Self::Animate),
            "angle" => Some(Self::Angle),
            "spirograph" => Some(Self::Spirograph),
            "relative" => Some(Self::Relative),
            _ => None,
        }
    }

    /// Whether the task produces an animation rather than an SVG.
    #[must_use]
    pub const fn is_animation(self) -> bool {
        matches!(self, Self::Animate)
    }
}

/// Options for a `render` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub task: RenderTask,
    pub bodies: Vec<String>,
    pub center: Option<String>,
    pub three_d: bool,
    pub output: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
}

/// Available CLI commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the web front end
    Serve {
        /// Optional YAML configuration.
        config_path: Option<PathBuf>,
    },
    /// Render one figure to a file or stdout
    Render(RenderOptions),
    /// List the body registry
    Bodies {
        /// Optional YAML configuration.
        config_path: Option<PathBuf>,
    },
    /// Show help
    Help,
    /// Show version
    Version,
}

impl Args {
    /// Parse command-line arguments from an iterator.
    #[must_use]
    pub fn parse_from<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::parse_from_vec(&args)
    }

    /// Parse command-line arguments from the environment.
    #[must_use]
    pub fn parse() -> Self {
        Self::parse_from(std::env::args())
    }

    fn parse_from_vec(args: &[String]) -> Self {
        if args.len() < 2 {
            return Self {
                command: Command::Help,
            };
        }

        let command = match args[1].as_str() {
            "serve" => Command::Serve {
                config_path: Self::config_flag(&args[2..]),
            },
            "render" => Self::parse_render_command(args),
            "bodies" => Command::Bodies {
                config_path: Self::config_flag(&args[2..]),
            },
            "-h" | "--help" | "help" => Command::Help,
            "-V" | "--version" | "version" => Command::Version,
            unknown => {
                eprintln!("Unknown command: {unknown}");
                Command::Help
            }
        };

        Self { command }
    }

    /// Value of `--config <path>` among `rest`, if present.
    fn config_flag(rest: &[String]) -> Option<PathBuf> {
        rest.windows(2)
            .find(|w| w[0] == "--config" || w[0] == "-c")
            .map(|w| PathBuf::from(&w[1]))
    }

    fn parse_render_command(args: &[String]) -> Command {
        let Some(name) = args.get(2) else {
            eprintln!("Error: 'render' command requires a task name");
            return Command::Help;
        };
        let Some(task) = RenderTask::from_name(name) else {
            eprintln!("Error: unknown render task '{name}'");
            return Command::Help;
        };

        let mut options = RenderOptions {
            task,
            bodies: Vec::new(),
            center: None,
            three_d: false,
            output: None,
            config_path: None,
        };

        let mut i = 3;
        while i < args.len() {
            let value = args.get(i + 1);
            match (args[i].as_str(), value) {
                ("--bodies" | "-b", Some(v)) => {
                    options.bodies.extend(parse_names(v));
                    i += 2;
                }
                ("--center", Some(v)) => {
                    options.center = Some(v.clone());
                    i += 2;
                }
                ("-o" | "--out", Some(v)) => {
                    options.output = Some(PathBuf::from(v));
                    i += 2;
                }
                ("-c" | "--config", Some(v)) => {
                    options.config_path = Some(PathBuf::from(v));
                    i += 2;
                }
                ("--3d", _) => {
                    options.three_d = true;
                    i += 1;
                }
                (other, _) => {
                    eprintln!("Warning: ignoring argument '{other}'");
                    i += 1;
                }
            }
        }

        Command::Render(options)
    }
}
