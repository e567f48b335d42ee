//! Initialization profile written to the control registers at construction.

use crate::register::{Filter, Oversampling, PowerMode, StandbyTime};

/// Settings applied once when the driver is constructed.
///
/// The default profile matches a slow weather-logging setup: ×1
/// oversampling on all three channels, normal power mode with 1000 ms
/// standby, IIR filter off and 3-wire SPI disabled.
pub struct Configuration {
    pub(crate) humidity_oversampling: Oversampling,
    pub(crate) temperature_oversampling: Oversampling,
    pub(crate) pressure_oversampling: Oversampling,
    pub(crate) mode: PowerMode,
    pub(crate) standby_time: StandbyTime,
    pub(crate) filter: Filter,
    pub(crate) spi3w_enable: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            humidity_oversampling: Oversampling::X1,
            temperature_oversampling: Oversampling::X1,
            pressure_oversampling: Oversampling::X1,
            mode: PowerMode::Normal,
            standby_time: StandbyTime::Ms1000,
            filter: Filter::Off,
            spi3w_enable: false,
        }
    }
}

impl Configuration {
    pub fn humidity_oversampling(mut self, oversampling: Oversampling) -> Self {
        self.humidity_oversampling = oversampling;

        self
    }

    pub fn temperature_oversampling(mut self, oversampling: Oversampling) -> Self {
        self.temperature_oversampling = oversampling;

        self
    }

    pub fn pressure_oversampling(mut self, oversampling: Oversampling) -> Self {
        self.pressure_oversampling = oversampling;

        self
    }

    pub fn power_mode(mut self, mode: PowerMode) -> Self {
        self.mode = mode;

        self
    }

    pub fn standby_time(mut self, standby_time: StandbyTime) -> Self {
        self.standby_time = standby_time;

        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = filter;

        self
    }

    pub fn spi3w_enable(mut self, enable: bool) -> Self {
        self.spi3w_enable = enable;

        self
    }
}
