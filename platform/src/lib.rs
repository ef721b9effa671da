#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(not(target_os = "windows"))]
pub mod unsupported;

#[cfg(target_os = "windows")]
pub use windows::NtfsStreamManager as PlatformStreamManager;

#[cfg(not(target_os = "windows"))]
pub use unsupported::UnsupportedStreamManager as PlatformStreamManager;
