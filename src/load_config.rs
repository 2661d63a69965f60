use crate::config::EncodeConfig;
use crate::process::ProcessConfig;
use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{error, info};

#[derive(Deserialize)]
struct StaticConfig {
    #[serde(default)]
    encode: EncodeSection,
}

#[derive(Deserialize)]
struct EncodeSection {
    #[serde(default = "default_scale")]
    scale: u32,
}

impl Default for EncodeSection {
    fn default() -> Self {
        EncodeSection {
            scale: default_scale(),
        }
    }
}

fn default_scale() -> u32 {
    EncodeConfig::default().scale
}

/// Loads the static YAML config file and validates it into a [`ProcessConfig`].
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ProcessConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let static_conf: StaticConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    if static_conf.encode.scale == 0 {
        error!("encode.scale must be a positive integer");
        anyhow::bail!("encode.scale must be a positive integer");
    }

    let encode = EncodeConfig {
        scale: static_conf.encode.scale,
    };
    encode.trace_loaded();

    Ok(ProcessConfig { encode })
}
