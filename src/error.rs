// Every variant states *where* things went wrong. The optics themselves never
// fail; these come from the window, the camera, files and frame plumbing.

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Creating the window failed.
    #[error("window init error: {0}")]
    WindowInit(String),

    /// Updating the window buffer failed.
    #[error("window update error: {0}")]
    WindowUpdate(String),

    /// Opening/starting the camera failed.
    #[error("camera init error: {0}")]
    CameraInit(String),

    /// Grabbing/decoding a camera frame failed.
    #[error("camera frame error: {0}")]
    CameraFrame(String),

    /// Reading or decoding the background picture failed.
    #[error("image load error: {0}")]
    ImageLoad(String),

    /// Two buffers that must line up do not.
    #[error("size mismatch: {0}")]
    SizeMismatch(String),

    /// Failed to read the config file from disk.
    #[error("failed to read config: {0}")]
    ConfigRead(#[source] std::io::Error),

    /// Failed to write the config file to disk.
    #[error("failed to write config: {0}")]
    ConfigWrite(#[source] std::io::Error),

    /// Failed to parse RON content.
    #[error("failed to parse config: {0}")]
    ConfigParse(#[source] ron::error::SpannedError),

    /// Failed to serialize config to RON.
    #[error("failed to serialize config: {0}")]
    ConfigSerialize(#[source] ron::Error),
}
