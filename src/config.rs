use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Settings for the optical-code renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodeConfig {
    /// Pixels per symbol module.
    pub scale: u32,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        EncodeConfig { scale: 3 }
    }
}

impl EncodeConfig {
    pub fn trace_loaded(&self) {
        info!(scale = self.scale, "Loaded EncodeConfig");
        debug!(?self, "EncodeConfig loaded (full debug)");
    }
}
