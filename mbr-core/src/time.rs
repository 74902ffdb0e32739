use std::{
    ops::{Add, Div, Mul},
    time::Duration,
};

use uom::si::{
    f64::Time,
    time::{day, second},
};

/// The time derivative of a quantity `T`.
///
/// `T` is usually a quantity from the [`uom`] crate, in which case the alias
/// resolves to the matching rate quantity.
///
/// # Examples
///
/// - `TimeDerivativeOf<Length>` = `Velocity`
/// - `TimeDerivativeOf<Volume>` = `VolumeRate`
pub type TimeDerivativeOf<T> = <T as Div<Time>>::Output;

/// Trait for types that can be stepped through time using their derivative.
///
/// # Methods
///
/// - [`step_by_time`] (required): steps the value using a `uom::Time`.
/// - [`step_by_duration`] (provided): steps the value using a `std::time::Duration`.
///
/// [`step_by_time`]: TimeIntegrable::step_by_time
/// [`step_by_duration`]: TimeIntegrable::step_by_duration
pub trait TimeIntegrable: Sized + Div<Time> {
    /// Steps the value by a time increment `dt`.
    #[must_use]
    fn step_by_time(self, derivative: TimeDerivativeOf<Self>, dt: Time) -> Self;

    /// Steps the value by a standard `Duration`.
    #[must_use]
    fn step_by_duration(self, derivative: TimeDerivativeOf<Self>, dt: Duration) -> Self {
        self.step_by_time(derivative, dt.as_time())
    }
}

/// Blanket implementation of [`TimeIntegrable`] using the explicit Euler method:
///
/// ```text
/// next = self + derivative * dt
/// ```
impl<T> TimeIntegrable for T
where
    T: Div<Time>,
    TimeDerivativeOf<T>: Mul<Time>,
    T: Add<<TimeDerivativeOf<T> as Mul<Time>>::Output, Output = T>,
{
    fn step_by_time(self, derivative: TimeDerivativeOf<Self>, dt: Time) -> Self {
        self + derivative * dt
    }
}

/// Conversions from `std::time::Duration` into simulation time.
pub trait DurationExt {
    /// Returns the duration as a unit-typed `uom` time.
    fn as_time(&self) -> Time;

    /// Returns the duration in days, the time base of biokinetic rate constants.
    fn as_days(&self) -> f64;
}

impl DurationExt for Duration {
    fn as_time(&self) -> Time {
        Time::new::<second>(self.as_secs_f64())
    }

    fn as_days(&self) -> f64 {
        self.as_time().get::<day>()
    }
}
