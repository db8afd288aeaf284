use std::convert::Infallible;

use log::error;
use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Hardware error: {source}.
    HardwareError { source: HardwareError },
    /// Sensor error: {info}.
    SensorError { info: String },
    /// Display error: {source}.
    DisplayError { source: DisplayError },
    /// Configuration error: {info}.
    ConfigError { info: String },
    /// Unknown error: {info}.
    Unknown { info: String },
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        error!("std::io error {:?}", error);
        let info = match error.kind() {
            std::io::ErrorKind::NotFound => String::from("Output location not found"),
            std::io::ErrorKind::PermissionDenied => String::from("Output location not writable"),
            _ => error.to_string(),
        };
        Self::DisplayError {
            source: DisplayError::IoException { info },
        }
    }
}

impl From<png::EncodingError> for Error {
    fn from(error: png::EncodingError) -> Self {
        Self::DisplayError {
            source: DisplayError::Encoding {
                info: error.to_string(),
            },
        }
    }
}

impl From<HardwareError> for Error {
    fn from(value: HardwareError) -> Self {
        Self::HardwareError { source: value }
    }
}

impl From<DisplayError> for Error {
    fn from(value: DisplayError) -> Self {
        Self::DisplayError { source: value }
    }
}

/// Drawing on an in-memory canvas cannot fail.
impl From<Infallible> for Error {
    fn from(value: Infallible) -> Self {
        match value {}
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum HardwareError {
    /// Unknown channel {channel} - {context}
    UnknownChannel { channel: u8, context: &'static str },
    /// Frequency {frequency}Hz must be between {min} and {max} Hz
    InvalidFrequency { frequency: u16, min: u16, max: u16 },
    /// I2C transfer to 0x{address:02X} failed: {info}
    I2cTransfer { address: u8, info: String },
    /// USB control transfer failed: {info}
    UsbTransfer { info: String },
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum DisplayError {
    /// {info}
    IoException { info: String },
    /// PNG encoding failed: {info}
    Encoding { info: String },
    /// Display surface is already closed
    Closed,
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn test_error_display() {
        let hardware_error = Error::from(HardwareError::UnknownChannel {
            channel: 16,
            context: "write pulse",
        });
        assert_eq!(
            format!("{}", hardware_error),
            "Hardware error: Unknown channel 16 - write pulse."
        );

        let sensor_error = Error::SensorError {
            info: "echo timeout".to_string(),
        };
        assert_eq!(format!("{}", sensor_error), "Sensor error: echo timeout.");

        let display_error = Error::from(DisplayError::Closed);
        assert_eq!(
            format!("{}", display_error),
            "Display error: Display surface is already closed."
        );

        let config_error = Error::ConfigError {
            info: "threshold must be positive".to_string(),
        };
        assert_eq!(
            format!("{}", config_error),
            "Configuration error: threshold must be positive."
        );

        let unknown_error = Error::Unknown {
            info: "Some unknown error".to_string(),
        };
        assert_eq!(
            format!("{}", unknown_error),
            "Unknown error: Some unknown error."
        );
    }

    #[test]
    fn test_hardware_error_display() {
        let error = Error::from(HardwareError::I2cTransfer {
            address: 0x40,
            info: "nack".to_string(),
        });
        assert_eq!(
            format!("{}", error),
            "Hardware error: I2C transfer to 0x40 failed: nack."
        );

        let error = Error::from(HardwareError::InvalidFrequency {
            frequency: 2000,
            min: 24,
            max: 1526,
        });
        assert_eq!(
            format!("{}", error),
            "Hardware error: Frequency 2000Hz must be between 24 and 1526 Hz."
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: Error = io_error.into();
        assert_eq!(
            format!("{}", error),
            "Display error: Output location not found."
        );

        let io_error = io::Error::new(io::ErrorKind::Other, "disk full");
        let error: Error = io_error.into();
        assert_eq!(format!("{}", error), "Display error: disk full.");
    }
}
