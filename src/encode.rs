use async_trait::async_trait;
use datamatrix::{DataMatrix, SymbolList};
use tracing::debug;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::config::EncodeConfig;

/// Abstraction over the optical-code rendering collaborator.
///
/// The contract is deliberately small: text in, image pixel data or a
/// human-readable error out. Each call is independent, so callers may fan
/// out over many protocol lines concurrently. The trait is implemented by
/// the real Data Matrix renderer and by test mocks.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait BarcodeEncoder: Send + Sync {
    /// Encode one protocol line into an optical-code image.
    async fn encode(&self, data: &str) -> Result<EncodedImage, EncodeError>;
}

pub type EncodeError = Box<dyn std::error::Error + Send + Sync>;

/// Rasterized optical-code symbol.
#[derive(Clone)]
pub struct EncodedImage {
    pub width: u32,
    pub height: u32,
    /// Row-major grayscale pixels, 0 = module, 255 = background.
    pub pixels: Vec<u8>,
    /// Unicode block rendering of the symbol for terminal display.
    pub unicode: String,
}

impl std::fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pixels", &self.pixels.len())
            .finish()
    }
}

/// Data Matrix implementation of [`BarcodeEncoder`].
///
/// Renders ECC 200 symbols with square modules scaled by the configured
/// factor. Encoding is pure computation; no I/O is involved.
pub struct DataMatrixEncoder {
    config: EncodeConfig,
}

impl DataMatrixEncoder {
    pub fn new(config: EncodeConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl BarcodeEncoder for DataMatrixEncoder {
    async fn encode(&self, data: &str) -> Result<EncodedImage, EncodeError> {
        let code = DataMatrix::encode(data.as_bytes(), SymbolList::default())
            .map_err(|e| format!("Data Matrix generation failed: {e:?}"))?;
        let bitmap = code.bitmap();

        let scale = self.config.scale as usize;
        let width = bitmap.width() * scale;
        let height = bitmap.height() * scale;
        let mut pixels = vec![255u8; width * height];
        for (x, y) in bitmap.pixels() {
            for dy in 0..scale {
                let row = (y * scale + dy) * width;
                for dx in 0..scale {
                    pixels[row + x * scale + dx] = 0;
                }
            }
        }

        debug!(
            len = data.len(),
            width,
            height,
            "Rendered Data Matrix symbol"
        );

        Ok(EncodedImage {
            width: width as u32,
            height: height as u32,
            pixels,
            unicode: bitmap.unicode(),
        })
    }
}
