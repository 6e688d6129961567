//! Status LED fault codes
//!
//! After a fatal boot fault the firmware has no display and maybe no
//! terminal, so the fault class is signalled as a burst of short pulses
//! on the status LED followed by a long pause.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

/// LED on time per pulse
pub const PULSE_MS: u32 = 200;
/// LED off time between pulses
pub const GAP_MS: u32 = 200;
/// Pause after a burst, before the next one
pub const PAUSE_MS: u32 = 1500;

/// Blink one burst of `count` pulses
///
/// The LED is left off. Call in a loop to repeat the code.
pub fn blink_code<P, D>(led: &mut P, delay: &mut D, count: u8) -> Result<(), P::Error>
where
    P: OutputPin,
    D: DelayNs,
{
    for _ in 0..count {
        led.set_high()?;
        delay.delay_ms(PULSE_MS);
        led.set_low()?;
        delay.delay_ms(GAP_MS);
    }
    delay.delay_ms(PAUSE_MS);
    Ok(())
}
