use super::{Constraint, ConstraintError, RawValue, check_finite};

/// Marker type enforcing that a value is finite and zero or greater.
///
/// # Examples
///
/// ```
/// use mbr_core::constraint::NonNegative;
///
/// assert!(NonNegative::new(0.0).is_ok());
/// assert!(NonNegative::new(-1e-9).is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct NonNegative;

impl NonNegative {
    /// Constructs a [`Constrained<T, NonNegative>`](super::Constrained) if the value is valid.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstraintError`] if the value is negative or not finite.
    pub fn new<T: RawValue>(value: T) -> Result<super::Constrained<T, NonNegative>, ConstraintError> {
        super::Constrained::new(value)
    }
}

impl<T: RawValue> Constraint<T> for NonNegative {
    fn check(value: &T) -> Result<(), ConstraintError> {
        let raw = value.raw_value();
        check_finite(raw)?;
        if raw < 0.0 {
            Err(ConstraintError::Negative)
        } else {
            Ok(())
        }
    }
}
