//! CLI output formatting.

use std::fmt::Write as FmtWrite;

use crate::orbit::body::{BodyRegistry, Zone};

/// Version line, with the commit when the build captured one.
#[must_use]
pub fn version_string() -> String {
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => {
            let short = hash.get(..8).unwrap_or(hash);
            format!("orrery {} ({short})", env!("CARGO_PKG_VERSION"))
        }
        _ => format!("orrery {}", env!("CARGO_PKG_VERSION")),
    }
}

/// Print version information.
pub fn print_version() {
    println!("{}", version_string());
}

/// Print help message.
pub fn print_help() {
    println!(
        r"orrery - Planetary orbit visualizations

USAGE:
    orrery <COMMAND> [OPTIONS]

COMMANDS:
    serve                       Run the web front end
        -c, --config <file>     YAML configuration

    render <task>               Render one figure
        -b, --bodies <a,b,..>   Bodies to plot
        --center <name>         Center body (relative; default Earth)
        --3d                    Use inclined 3D orbits
        -o, --out <file>        Output file (default: stdout)
        -c, --config <file>     YAML configuration

    bodies                      List the body registry
        -c, --config <file>     YAML configuration

    help                        Show this help message
    version                     Show version information

TASKS:
    kepler      Kepler's third law for every body
    orbits      Static orbit paths
    animate     Orbit animation (GIF)
    angle       Polar angle against time (first body; default Pluto)
    spirograph  Lines joining exactly two bodies
    relative    Orbits as seen from the center body

EXAMPLES:
    orrery serve --config orrery.yaml
    orrery render orbits --bodies mercury,venus,earth,mars --3d -o inner.svg
    orrery render animate --bodies earth,mars -o earth_mars.gif
    orrery render spirograph --bodies venus,earth > spiro.svg
"
    );
}

/// Registry as an aligned text table.
#[must_use]
pub fn format_bodies(registry: &BodyRegistry) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10} {:>8} {:>6} {:>9} {:>10} {:>7}  zone",
        "name", "a/AU", "ecc", "p/yr", "modified_p", "beta/°"
    );
    for body in registry.all() {
        let zone = match body.zone() {
            Zone::Inner => "inner",
            Zone::Outer => "outer",
        };
        let _ = writeln!(
            out,
            "{:<10} {:>8.3} {:>6.2} {:>9.3} {:>10.3} {:>7.2}  {zone}",
            body.name, body.a, body.ecc, body.p, body.modified_p, body.beta
        );
    }
    out
}

/// Print the registry.
pub fn print_bodies(registry: &BodyRegistry) {
    print!("{}", format_bodies(registry));
}
