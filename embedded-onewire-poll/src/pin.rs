use crate::BusControl;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

/// [`BusControl`] over an embedded-hal pin.
///
/// The pin must already be configured as an open-drain output with its input buffer
/// enabled (most MCUs read back the pad level of an open-drain output). Setting the pin
/// high releases the line.
pub struct OpenDrainPin<P> {
    pin: P,
}

impl<P> OpenDrainPin<P> {
    /// Wrap an open-drain pin.
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Give back the wrapped pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: InputPin + OutputPin> BusControl for OpenDrainPin<P> {
    type Error = <P as ErrorType>::Error;

    fn drive_low(&mut self) -> Result<(), Self::Error> {
        self.pin.set_low()
    }

    fn release(&mut self) -> Result<(), Self::Error> {
        self.pin.set_high()
    }

    fn sample(&mut self) -> Result<bool, Self::Error> {
        self.pin.is_high()
    }
}
