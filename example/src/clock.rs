use core::cell::RefCell;
use critical_section::Mutex;
use embedded_time::clock::Error;
use embedded_time::duration::{Duration, Fraction};
use embedded_time::fixed_point::FixedPoint;
use embedded_time::timer::param::{Armed, OneShot};
use embedded_time::{Clock, Instant, Timer};
use rp2040_hal::Timer as PicoTimer;

/// Microsecond clock backed by the RP2040 timer peripheral
pub struct SystemClock {
    timer: Mutex<RefCell<Option<PicoTimer>>>,
}

impl SystemClock {
    pub const fn new() -> Self {
        Self {
            timer: Mutex::new(RefCell::new(None)),
        }
    }

    pub fn initialize(&self, timer: PicoTimer) {
        critical_section::with(|cs| self.timer.borrow(cs).replace(Some(timer)));
    }
}

impl Clock for SystemClock {
    type T = u64;
    const SCALING_FACTOR: Fraction = Fraction::new(1, 1_000_000);

    /// Fails if the clock was not initialized yet
    fn try_now(&self) -> Result<Instant<Self>, Error> {
        critical_section::with(|cs| {
            self.timer
                .borrow(cs)
                .borrow()
                .as_ref()
                .map(|timer| Instant::new(timer.get_counter().ticks()))
                .ok_or(Error::Unspecified)
        })
    }

    fn new_timer<Dur>(&self, duration: Dur) -> Timer<OneShot, Armed, Self, Dur>
    where
        Dur: Duration + FixedPoint,
    {
        Timer::new(self, duration)
    }
}
