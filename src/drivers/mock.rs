//! Recording `embedded-hal` pins for driver unit tests.
//!
//! Every write lands in a shared journal so tests can assert on ordering
//! across pins, not just final levels.

use core::cell::{Cell, RefCell};
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::digital::{self, OutputPin};
use embedded_hal::pwm::{self, SetDutyCycle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Write {
    Level(&'static str, bool),
    Duty(&'static str, u16),
}

#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<Write>>>);

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<Write> {
        core::mem::take(&mut *self.0.borrow_mut())
    }

    fn record(&self, w: Write) {
        self.0.borrow_mut().push(w);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

impl digital::Error for MockError {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

impl pwm::Error for MockError {
    fn kind(&self) -> pwm::ErrorKind {
        pwm::ErrorKind::Other
    }
}

pub struct MockPin {
    name: &'static str,
    journal: Journal,
    pub fail: Rc<Cell<bool>>,
}

impl MockPin {
    pub fn new(name: &'static str, journal: &Journal) -> Self {
        Self { name, journal: journal.clone(), fail: Rc::new(Cell::new(false)) }
    }
}

impl digital::ErrorType for MockPin {
    type Error = MockError;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), MockError> {
        if self.fail.get() {
            return Err(MockError);
        }
        self.journal.record(Write::Level(self.name, false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), MockError> {
        if self.fail.get() {
            return Err(MockError);
        }
        self.journal.record(Write::Level(self.name, true));
        Ok(())
    }
}

pub struct MockPwm {
    name: &'static str,
    journal: Journal,
    max: u16,
    pub fail: Rc<Cell<bool>>,
}

impl MockPwm {
    pub fn new(name: &'static str, max: u16, journal: &Journal) -> Self {
        Self { name, journal: journal.clone(), max, fail: Rc::new(Cell::new(false)) }
    }
}

impl pwm::ErrorType for MockPwm {
    type Error = MockError;
}

impl SetDutyCycle for MockPwm {
    fn max_duty_cycle(&self) -> u16 {
        self.max
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), MockError> {
        if self.fail.get() {
            return Err(MockError);
        }
        self.journal.record(Write::Duty(self.name, duty));
        Ok(())
    }
}
