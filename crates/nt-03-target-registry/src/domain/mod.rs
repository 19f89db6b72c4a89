//! Domain layer: device records and the platform-guess state machine.

pub mod device;
pub mod platform;

pub use device::{Device, DeviceAttribute, DeviceEvent, DeviceState};
pub use platform::PlatformGuess;
