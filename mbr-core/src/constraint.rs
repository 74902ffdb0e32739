//! Construction-time numeric constraints.
//!
//! Configuration values such as yields, half-saturation constants, and
//! membrane properties only make sense within a physical range.
//! Wrapping them in [`Constrained<T, C>`] checks that range once, when the
//! value is built, so downstream code can rely on it without re-checking.
//!
//! # Provided Constraints
//!
//! - [`NonNegative`]: Zero or greater
//! - [`StrictlyPositive`]: Greater than zero
//!
//! Both work with primitive floats and with `uom` quantities.

mod non_negative;
mod strictly_positive;

use std::marker::PhantomData;

use thiserror::Error;

pub use non_negative::NonNegative;
pub use strictly_positive::StrictlyPositive;

/// A trait for enforcing numeric invariants at construction time.
pub trait Constraint<T> {
    /// Checks that the given value satisfies this constraint.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstraintError`] if the value does not satisfy the constraint.
    fn check(value: &T) -> Result<(), ConstraintError>;
}

/// An error returned when a [`Constraint`] is violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConstraintError {
    #[error("value must not be negative")]
    Negative,
    #[error("value must not be zero")]
    Zero,
    #[error("value is not a number")]
    NotANumber,
    #[error("value is not finite")]
    NotFinite,
}

/// A wrapper enforcing a numeric constraint at construction time.
///
/// # Example
///
/// ```
/// use mbr_core::constraint::{Constrained, StrictlyPositive};
///
/// let yield_coefficient = Constrained::<f64, StrictlyPositive>::new(0.67).unwrap();
/// assert_eq!(yield_coefficient.into_inner(), 0.67);
///
/// assert!(Constrained::<f64, StrictlyPositive>::new(0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Constrained<T, C: Constraint<T>> {
    value: T,
    _marker: PhantomData<C>,
}

impl<T, C: Constraint<T>> Constrained<T, C> {
    /// Constructs a new constrained value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not satisfy the constraint.
    pub fn new(value: T) -> Result<Self, ConstraintError> {
        C::check(&value)?;
        Ok(Self {
            value,
            _marker: PhantomData,
        })
    }

    /// Consumes the wrapper and returns the inner value.
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T, C: Constraint<T>> AsRef<T> for Constrained<T, C> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}

/// Access to the raw `f64` behind a primitive float or a `uom` quantity.
///
/// Lets a single constraint implementation cover both.
pub trait RawValue {
    fn raw_value(&self) -> f64;
}

impl RawValue for f64 {
    fn raw_value(&self) -> f64 {
        *self
    }
}

impl<D, U> RawValue for uom::si::Quantity<D, U, f64>
where
    D: uom::si::Dimension + ?Sized,
    U: uom::si::Units<f64> + ?Sized,
{
    fn raw_value(&self) -> f64 {
        self.value
    }
}

/// Rejects NaN and infinities before any sign check runs.
fn check_finite(value: f64) -> Result<(), ConstraintError> {
    if value.is_nan() {
        Err(ConstraintError::NotANumber)
    } else if value.is_infinite() {
        Err(ConstraintError::NotFinite)
    } else {
        Ok(())
    }
}
