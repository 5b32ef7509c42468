//! Error types for Horizon Tray.

use crate::menu::MenuId;

/// The main error type for Horizon Tray operations.
///
/// Errors fall into three families: validation failures of caller-supplied
/// input, state errors that the caller can recover from, and failures
/// reported by the platform tray subsystem.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Caller-supplied input was rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The operation is not valid in the current state.
    #[error(transparent)]
    State(#[from] StateError),
    /// The platform tray subsystem rejected the operation.
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

impl Error {
    /// Returns `true` if this is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns `true` if this is a state error.
    pub fn is_state(&self) -> bool {
        matches!(self, Self::State(_))
    }

    /// Returns `true` if this is a platform error.
    pub fn is_platform(&self) -> bool {
        matches!(self, Self::Platform(_))
    }
}

/// Input validation errors, always reported synchronously.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The pixel buffer length does not match `width * height * 4`.
    #[error("Invalid icon buffer size: expected {expected} bytes, got {actual}")]
    InvalidBufferSize { expected: usize, actual: usize },

    /// Width or height is zero, or the pixel count overflows.
    #[error("Invalid icon dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// A required builder field was never set.
    #[error("Missing required field '{0}'")]
    MissingField(&'static str),

    /// A tray icon cannot be built without an icon.
    #[error("Tray icon requires an icon")]
    MissingIcon,

    /// Two nodes in the same menu tree share an identifier.
    #[error("Duplicate menu identifier '{0}'")]
    DuplicateIdentifier(MenuId),

    /// The submenu already belongs to a menu; a submenu has one parent.
    #[error("Submenu '{0}' is already attached to a menu")]
    AlreadyAttached(MenuId),

    /// An encoded image could not be decoded into pixels.
    #[error("Failed to decode image: {0}")]
    ImageDecode(String),
}

/// Errors caused by calling an operation in the wrong state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// No registered menu node has this identifier.
    #[error("No menu item with identifier '{0}'")]
    NotFound(MenuId),

    /// The menu node exists but has no checked state.
    #[error("Menu item '{0}' is not checkable")]
    NotCheckable(MenuId),

    /// The menu tree has been realized and its shape is frozen.
    #[error("Menu tree has already been realized")]
    TreeAlreadyRealized,

    /// The tray context has already been initialized.
    #[error("Tray context has already been initialized")]
    AlreadyInitialized,

    /// The tray context has not been initialized yet.
    #[error("Tray context has not been initialized. Call initialize() first")]
    NotInitialized,

    /// The tray icon has been destroyed.
    #[error("Tray icon has been destroyed")]
    Destroyed,
}

/// The platform tray subsystem rejected an operation.
///
/// This is fatal to the operation that produced it but not to the process.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Platform error during {operation}: {message}")]
pub struct PlatformError {
    /// The operation that failed (e.g. `"create tray"`).
    pub operation: &'static str,
    /// Backend-supplied detail.
    pub message: String,
}

impl PlatformError {
    /// Create a platform error for an operation.
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }

    /// Failure while initializing the platform subsystem.
    pub fn initialize(message: impl Into<String>) -> Self {
        Self::new("initialize", message)
    }

    /// Failure while creating the native tray entry.
    pub fn create_tray(message: impl Into<String>) -> Self {
        Self::new("create tray", message)
    }

    /// Failure while updating an existing native tray entry.
    pub fn update_tray(message: impl Into<String>) -> Self {
        Self::new("update tray", message)
    }
}

/// A specialized Result type for Horizon Tray operations.
pub type Result<T> = std::result::Result<T, Error>;
