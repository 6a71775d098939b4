#![forbid(unsafe_code)]

//! Reduced-motion preference.
//!
//! The preference is sampled from the environment the first time it is
//! asked for and then frozen for the rest of the process. Changing
//! `PIXELGRID_REDUCED_MOTION` after that point has no effect.

use std::env;
use std::sync::OnceLock;

/// Environment variable carrying the host's reduced-motion preference.
pub const REDUCED_MOTION_ENV: &str = "PIXELGRID_REDUCED_MOTION";

static REDUCED_MOTION: OnceLock<bool> = OnceLock::new();

#[derive(Debug, Clone, Default)]
struct MotionInputs {
    reduced_motion: Option<String>,
}

impl MotionInputs {
    fn from_env() -> Self {
        Self {
            reduced_motion: env::var(REDUCED_MOTION_ENV).ok(),
        }
    }

    fn prefers_reduced(&self) -> bool {
        self.reduced_motion.as_deref().is_some_and(parse_flag)
    }
}

/// Interpret a boolean-ish environment value.
#[must_use]
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on" | "reduce"
    )
}

/// Whether the host asked for reduced motion. Sampled once per process.
#[must_use]
pub fn prefers_reduced_motion() -> bool {
    *REDUCED_MOTION.get_or_init(|| {
        let reduced = MotionInputs::from_env().prefers_reduced();
        crate::debug!(reduced, "sampled reduced-motion preference");
        reduced
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_parsing() {
        for yes in ["1", "true", "TRUE", " yes ", "on", "reduce"] {
            assert!(parse_flag(yes), "{yes:?}");
        }
        for no in ["", "0", "false", "no-preference", "off"] {
            assert!(!parse_flag(no), "{no:?}");
        }
    }

    #[test]
    fn missing_variable_means_full_motion() {
        assert!(!MotionInputs::default().prefers_reduced());
        let inputs = MotionInputs {
            reduced_motion: Some("1".into()),
        };
        assert!(inputs.prefers_reduced());
    }

    #[test]
    fn preference_is_stable_across_calls() {
        assert_eq!(prefers_reduced_motion(), prefers_reduced_motion());
    }
}
