// ***********
// All information are relative to PCA9685 datasheets:
// https://www.digikey.jp/htmldatasheets/production/2459480/0/0/1/pca9685.html

use std::fmt::{Display, Formatter};

use log::trace;

use crate::errors::{Error, HardwareError};
use crate::io::{I2cBus, PwmOutput};

/// A PCA9685 16-channel, 12-bit PWM driver (the chip behind most pan-tilt HATs).
///
/// Duty cycles are expressed on 16 bits like most PWM APIs: the driver keeps the upper 12 bits.
#[derive(Debug, Clone)]
pub struct PCA9685 {
    /// Address (default 0x40).
    address: u8,
    /// Frequency in Hz (default 50Hz, the servo frequency).
    frequency: u16,
    connected: bool,

    // ########################################
    // # Volatile utility data.
    bus: Box<dyn I2cBus>,
}

impl PCA9685 {
    // Registers.
    const MODE1: u8 = 0x00;
    const PRESCALE: u8 = 0xFE;
    const LED0_ON_L: u8 = 0x06;
    // Magic bits.
    const SLEEP: u8 = 0x10;
    const RESET: u8 = 0x00;
    const RESTART: u8 = 0x80;
    const AUTO_INCREMENT: u8 = 0x20;
    const FULL: u16 = 0x1000;
    // PCA9685 physical constraints.
    const CHANNELS: u8 = 16;
    const MIN_FREQUENCY: u16 = 24; // Minimum frequency in Hz
    const MAX_FREQUENCY: u16 = 1526; // Maximum frequency in Hz
    const OSC_CLOCK: f32 = 25_000_000.0; // PCA9685 clock frequency

    /// Creates a driver on the default 0x40 address, running at 50Hz.
    pub fn default<B: I2cBus + 'static>(bus: B) -> Result<Self, Error> {
        Self::new(bus, 0x40)
    }

    /// Creates a driver on the given `address`, running at 50Hz.
    ///
    /// # Errors
    /// * `I2cTransfer`: the chip could not be configured.
    pub fn new<B: I2cBus + 'static>(bus: B, address: u8) -> Result<Self, Error> {
        let mut controller = Self {
            address,
            frequency: 50,
            connected: false,
            bus: Box::new(bus),
        };
        controller.set_frequency(50)?;
        controller.connected = true;
        Ok(controller)
    }

    /// Sets the PWM frequency (in Hz) for the entire PCA9685: from 24 to 1526 Hz.
    pub fn set_frequency(&mut self, frequency: u16) -> Result<&Self, Error> {
        if !(Self::MIN_FREQUENCY..=Self::MAX_FREQUENCY).contains(&frequency) {
            return Err(HardwareError::InvalidFrequency {
                frequency,
                min: Self::MIN_FREQUENCY,
                max: Self::MAX_FREQUENCY,
            }
            .into());
        };

        self.frequency = frequency;

        // 7.3.1 Mode register 1, MODE1 - Reset / Sleep
        // The prescaler can only be written while the oscillator sleeps.
        self.write_to_reg(PCA9685::MODE1, PCA9685::RESET)?;
        self.write_to_reg(PCA9685::MODE1, PCA9685::SLEEP)?;

        // 7.3.5 PWM frequency PRE_SCALE
        // prescale = round((osc_clock / (4096 x rate)) - 1) - with PCA9685 clock at 25Mhz
        self.write_to_reg(PCA9685::PRESCALE, Self::prescale(frequency))?;

        // Wake up and restart in auto-increment mode
        self.write_to_reg(PCA9685::MODE1, PCA9685::RESET)?;
        self.write_to_reg(PCA9685::MODE1, PCA9685::RESTART | PCA9685::AUTO_INCREMENT)?;
        Ok(self)
    }

    /// Sets the 16-bit `duty` cycle of a `channel` (0xFFFF is fully on, 0 fully off).
    pub fn set_duty_cycle(&mut self, channel: u8, duty: u16) -> Result<(), Error> {
        let (on, off) = match duty {
            0xFFFF => (PCA9685::FULL, 0),
            0 => (0, PCA9685::FULL),
            _ => (0, ((duty as u32 + 1) >> 4) as u16),
        };
        self.write_channel(channel, on, off)
    }

    /// Converts a pulse width (in µs) into a 16-bit duty cycle at the current frequency.
    ///
    /// At 50Hz the period is 20000µs, hence 1500µs gives `1500 * 65535 / 20000 = 4915`.
    pub fn pulse_to_duty(&self, pulse_us: u16) -> u16 {
        let period_us = 1_000_000 / self.frequency as u32;
        (pulse_us as u32 * 0xFFFF / period_us).min(0xFFFF) as u16
    }

    /// Writes a single `register`.
    pub fn write_to_reg(&mut self, register: u8, value: u8) -> Result<(), Error> {
        trace!("PCA9685@0x{:02X}: reg 0x{:02X} <- 0x{:02X}", self.address, register, value);
        self.bus.i2c_write(self.address, &[register, value])
    }

    /// Reads a single `register`.
    pub fn read_from_reg(&mut self, register: u8) -> Result<u8, Error> {
        let mut buffer = [0u8; 1];
        self.bus.i2c_read(self.address, register, &mut buffer)?;
        Ok(buffer[0])
    }

    // ########################################
    // Setters and Getters.

    /// Returns the I2C address of the chip.
    pub fn get_address(&self) -> u8 {
        self.address
    }

    /// Returns the PWM frequency (in Hz).
    pub fn get_frequency(&self) -> u16 {
        self.frequency
    }

    /// Checks if the chip has been configured and not closed since.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    // ########################################
    // Inner helpers.

    fn prescale(frequency: u16) -> u8 {
        ((PCA9685::OSC_CLOCK / (4096.0 * frequency as f32)) + 0.5 - 1.0).clamp(3.0, 255.0) as u8
    }

    /// Writes the four LEDn_ON_L / ON_H / OFF_L / OFF_H registers in one auto-incremented transfer.
    fn write_channel(&mut self, channel: u8, on: u16, off: u16) -> Result<(), Error> {
        if channel >= PCA9685::CHANNELS {
            return Err(HardwareError::UnknownChannel {
                channel,
                context: "PCA9685 only has 16 channels",
            }
            .into());
        }
        let register = PCA9685::LED0_ON_L + 4 * channel;
        let [on_l, on_h] = on.to_le_bytes();
        let [off_l, off_h] = off.to_le_bytes();
        trace!("PCA9685@0x{:02X}: channel {} on={} off={}", self.address, channel, on, off);
        self.bus
            .i2c_write(self.address, &[register, on_l, on_h, off_l, off_h])
    }
}

impl Display for PCA9685 {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PCA9685 (address=0x{:02X}) [frequency={}Hz, connected={}]",
            self.address, self.frequency, self.connected
        )
    }
}

impl PwmOutput for PCA9685 {
    fn write_pulse(&mut self, channel: u8, pulse_us: u16) -> Result<(), Error> {
        let duty = self.pulse_to_duty(pulse_us);
        self.set_duty_cycle(channel, duty)
    }

    fn release(&mut self, channel: u8) -> Result<(), Error> {
        self.set_duty_cycle(channel, 0)
    }

    fn close(&mut self) -> Result<(), Error> {
        self.write_to_reg(PCA9685::MODE1, PCA9685::SLEEP)?;
        self.connected = false;
        Ok(())
    }
}
