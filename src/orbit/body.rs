//! Planet registry: static orbital elements per named body.
//!
//! Bodies are loaded once (built-in table or a YAML data file) and are
//! read-only afterwards. Lookups are case-insensitive.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{OrreryError, OrreryResult};

/// Bodies orbiting inside this radius (AU) are grouped as inner planets.
pub const ASTEROID_BELT_AU: f64 = 3.0;

/// Orbital elements of one body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct Body {
    /// Display name, unique within a registry.
    #[validate(length(min = 1))]
    pub name: String,
    /// Semi-major axis (AU).
    #[validate(range(exclusive_min = 0.0))]
    pub a: f64,
    /// Eccentricity.
    #[validate(range(min = 0.0, exclusive_max = 1.0))]
    pub ecc: f64,
    /// Orbital period (years).
    #[validate(range(exclusive_min = 0.0))]
    pub p: f64,
    /// Period relative to a reference body, used for animation pacing.
    #[validate(range(exclusive_min = 0.0))]
    pub modified_p: f64,
    /// Orbital inclination (degrees).
    pub beta: f64,
}

impl Body {
    /// Create a body from its orbital elements.
    #[must_use]
    pub fn new(name: impl Into<String>, a: f64, ecc: f64, p: f64, modified_p: f64, beta: f64) -> Self {
        Self {
            name: name.into(),
            a,
            ecc,
            p,
            modified_p,
            beta,
        }
    }

    /// Inclination in radians.
    #[must_use]
    pub fn beta_radians(&self) -> f64 {
        self.beta.to_radians()
    }

    /// Which side of the asteroid belt the body orbits on.
    #[must_use]
    pub fn zone(&self) -> Zone {
        if self.a < ASTEROID_BELT_AU {
            Zone::Inner
        } else {
            Zone::Outer
        }
    }

    /// Lowercase name, used for duplicate detection.
    #[must_use]
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }

    /// Name as it appears in cache filenames. See [`file_key`].
    #[must_use]
    pub fn file_key(&self) -> String {
        file_key(&self.name)
    }

    fn check(&self) -> OrreryResult<()> {
        if !(0.0..1.0).contains(&self.ecc) {
            return Err(OrreryError::InvalidEccentricity { ecc: self.ecc });
        }
        self.validate()?;
        Ok(())
    }
}

/// Filesystem-safe form of a body name: trimmed, lowercase, and with every
/// character outside `[a-z0-9-]` replaced by `-`. Never contains `_`, which
/// separates names in animation filenames.
#[must_use]
pub fn file_key(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '-' })
        .collect()
}

/// Inner/outer grouping of the planets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Inner,
    Outer,
}

/// Ordered, immutable set of bodies.
#[derive(Debug, Clone, Serialize)]
pub struct BodyRegistry {
    bodies: Vec<Body>,
}

impl Default for BodyRegistry {
    fn default() -> Self {
        Self::solar_system()
    }
}

impl BodyRegistry {
    /// The nine classical planets, Mercury to Pluto.
    ///
    /// `modified_p` is the period relative to Earth for the inner planets
    /// and relative to Jupiter for the outer ones.
    #[must_use]
    pub fn solar_system() -> Self {
        Self {
            bodies: vec![
                Body::new("Mercury", 0.387, 0.21, 0.241, 0.241, 7.00),
                Body::new("Venus", 0.723, 0.01, 0.615, 0.615, 3.39),
                Body::new("Earth", 1.000, 0.02, 1.000, 1.000, 0.00),
                Body::new("Mars", 1.523, 0.09, 1.881, 1.881, 1.85),
                Body::new("Jupiter", 5.202, 0.05, 11.861, 1.000, 1.31),
                Body::new("Saturn", 9.576, 0.06, 29.628, 2.498, 2.49),
                Body::new("Uranus", 19.293, 0.05, 84.747, 7.145, 0.77),
                Body::new("Neptune", 30.246, 0.01, 166.344, 14.025, 1.77),
                Body::new("Pluto", 39.509, 0.25, 248.348, 20.938, 17.50),
            ],
        }
    }

    /// Build a registry from explicit bodies.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty, a body fails validation, two
    /// bodies share a name (case-insensitively), or two names map to the
    /// same [`file_key`].
    pub fn from_bodies(bodies: Vec<Body>) -> OrreryResult<Self> {
        if bodies.is_empty() {
            return Err(OrreryError::config("body registry must not be empty"));
        }

        let mut seen = HashSet::new();
        let mut file_keys = HashSet::new();
        for body in &bodies {
            body.check()?;
            if !seen.insert(body.key()) {
                return Err(OrreryError::config(format!(
                    "duplicate body name '{}'",
                    body.name
                )));
            }
            if !file_keys.insert(body.file_key()) {
                return Err(OrreryError::config(format!(
                    "body name '{}' collides with another as cache key '{}'",
                    body.name,
                    body.file_key()
                )));
            }
        }

        Ok(Self { bodies })
    }

    /// Load a registry from a YAML list of bodies.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, parsed, or validated.
    pub fn load<P: AsRef<Path>>(path: P) -> OrreryResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a registry from a YAML list of bodies.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> OrreryResult<Self> {
        let bodies: Vec<Body> = serde_yaml::from_str(yaml)?;
        Self::from_bodies(bodies)
    }

    /// Look up a body by name, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`OrreryError::UnknownBody`] if no body matches.
    pub fn get(&self, name: &str) -> OrreryResult<&Body> {
        let wanted = name.trim();
        self.bodies
            .iter()
            .find(|b| b.name.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| OrreryError::UnknownBody(wanted.to_string()))
    }

    /// Resolve a list of names, preserving order.
    ///
    /// # Errors
    ///
    /// Fails on the first unknown name.
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> OrreryResult<Vec<&Body>> {
        names.iter().map(|n| self.get(n.as_ref())).collect()
    }

    /// All bodies in registry order.
    #[must_use]
    pub fn all(&self) -> &[Body] {
        &self.bodies
    }

    /// Body names in registry order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bodies.iter().map(|b| b.name.as_str())
    }

    /// Number of bodies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Whether the registry is empty (never true for a constructed registry).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}
