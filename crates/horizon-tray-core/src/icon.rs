//! Tray icon images.
//!
//! An [`Icon`] is validated and converted into the platform pixel layout once,
//! at construction. Icons are immutable afterwards; replacing a tray's image
//! means building a new `Icon` and calling
//! [`TrayIcon::set_icon`](crate::TrayIcon::set_icon).

use std::sync::Arc;

use crate::error::{Result, ValidationError};

/// Bytes per RGBA pixel.
const BYTES_PER_PIXEL: usize = 4;

/// Pixel layout of an icon's encoded form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// `R, G, B, A` bytes (NSImage bitmap reps).
    Rgba8,
    /// `B, G, R, A` bytes (Win32 DIB sections behind `HICON`).
    Bgra8,
    /// Big-endian `A, R, G, B` (StatusNotifierItem `IconPixmap`).
    Argb32,
}

impl PixelFormat {
    /// The layout expected by the current platform's tray subsystem.
    pub const fn native() -> Self {
        #[cfg(target_os = "windows")]
        {
            Self::Bgra8
        }
        #[cfg(all(unix, not(any(target_os = "macos", target_os = "ios"))))]
        {
            Self::Argb32
        }
        #[cfg(not(any(
            target_os = "windows",
            all(unix, not(any(target_os = "macos", target_os = "ios")))
        )))]
        {
            Self::Rgba8
        }
    }

    fn encode(self, rgba: &[u8]) -> Option<Box<[u8]>> {
        let order: [usize; 4] = match self {
            Self::Rgba8 => return None,
            Self::Bgra8 => [2, 1, 0, 3],
            Self::Argb32 => [3, 0, 1, 2],
        };
        let mut out = Vec::with_capacity(rgba.len());
        for px in rgba.chunks_exact(BYTES_PER_PIXEL) {
            out.extend(order.iter().map(|&i| px[i]));
        }
        Some(out.into_boxed_slice())
    }
}

struct IconData {
    width: u32,
    height: u32,
    rgba: Box<[u8]>,
    // `None` when the encoded form is the RGBA buffer itself.
    encoded: Option<Box<[u8]>>,
    format: PixelFormat,
}

/// An image for use with system tray icons and icon menu items.
///
/// Cloning is cheap; clones share the pixel data.
#[derive(Clone)]
pub struct Icon {
    inner: Arc<IconData>,
}

impl Icon {
    /// Create an icon from RGBA pixel data, encoded for the current platform.
    ///
    /// # Arguments
    ///
    /// * `rgba` - Raw RGBA pixel data (4 bytes per pixel, row-major)
    /// * `width` - Width of the image in pixels
    /// * `height` - Height of the image in pixels
    ///
    /// # Errors
    ///
    /// - [`ValidationError::InvalidDimensions`] if either dimension is zero
    /// - [`ValidationError::InvalidBufferSize`] if the data size doesn't match
    ///   `width * height * 4`
    ///
    /// # Example
    ///
    /// ```
    /// use horizon_tray_core::Icon;
    ///
    /// let icon = Icon::from_rgba(vec![255, 0, 0, 255], 1, 1).unwrap();
    /// assert_eq!((icon.width(), icon.height()), (1, 1));
    /// assert!(Icon::from_rgba(vec![255, 0, 0], 1, 1).is_err());
    /// ```
    pub fn from_rgba(rgba: Vec<u8>, width: u32, height: u32) -> Result<Self> {
        Self::from_rgba_with_format(rgba, width, height, PixelFormat::native())
    }

    /// Create an icon from RGBA pixel data with an explicit encoded layout.
    pub fn from_rgba_with_format(
        rgba: Vec<u8>,
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> Result<Self> {
        let expected = expected_len(width, height)?;
        if rgba.len() != expected {
            return Err(ValidationError::InvalidBufferSize {
                expected,
                actual: rgba.len(),
            }
            .into());
        }

        let encoded = format.encode(&rgba);
        Ok(Self {
            inner: Arc::new(IconData {
                width,
                height,
                rgba: rgba.into_boxed_slice(),
                encoded,
                format,
            }),
        })
    }

    /// Decode an image file (PNG, ICO, ...) into an icon.
    #[cfg(feature = "image")]
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|e| ValidationError::ImageDecode(format!("{}: {e}", path.display())))?
            .into_rgba8();
        let (width, height) = image.dimensions();
        Self::from_rgba(image.into_raw(), width, height)
    }

    /// Decode an in-memory encoded image (PNG, ICO, ...) into an icon.
    #[cfg(feature = "image")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| ValidationError::ImageDecode(e.to_string()))?
            .into_rgba8();
        let (width, height) = image.dimensions();
        Self::from_rgba(image.into_raw(), width, height)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// The original RGBA pixels.
    pub fn rgba(&self) -> &[u8] {
        &self.inner.rgba
    }

    /// The pixels in [`format`](Self::format) layout.
    pub fn encoded(&self) -> &[u8] {
        self.inner.encoded.as_deref().unwrap_or(&self.inner.rgba)
    }

    /// Layout of [`encoded`](Self::encoded).
    pub fn format(&self) -> PixelFormat {
        self.inner.format
    }
}

impl std::fmt::Debug for Icon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Icon")
            .field("width", &self.inner.width)
            .field("height", &self.inner.height)
            .field("format", &self.inner.format)
            .finish_non_exhaustive()
    }
}

fn expected_len(width: u32, height: u32) -> Result<usize> {
    let invalid = || ValidationError::InvalidDimensions { width, height };
    if width == 0 || height == 0 {
        return Err(invalid().into());
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(BYTES_PER_PIXEL))
        .ok_or_else(|| invalid().into())
}
