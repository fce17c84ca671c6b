//! Synthesizer configuration.

use serde::Deserialize;
use std::path::PathBuf;

/// Configuration for the service synthesizer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SynthConfig {
    /// Root directory under which generated modules are placed.
    pub src_dir: PathBuf,

    /// Module defining the password hashing collaborator.
    pub password_service_module: PathBuf,

    /// Module defining `transformStringFieldInUpdate`.
    pub transform_helper_module: PathBuf,

    /// Directory holding `service.template.ts` and `service.base.template.ts`.
    /// The embedded templates are used when unset.
    pub template_dir: Option<PathBuf>,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            src_dir: PathBuf::from("src"),
            password_service_module: PathBuf::from("src/auth/password.service.ts"),
            transform_helper_module: PathBuf::from("src/prisma.util.ts"),
            template_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config: SynthConfig = serde_json::from_str(r#"{ "srcDir": "server/src" }"#).unwrap();
        assert_eq!(config.src_dir, PathBuf::from("server/src"));
        assert_eq!(
            config.password_service_module,
            PathBuf::from("src/auth/password.service.ts")
        );
        assert!(config.template_dir.is_none());
    }
}
