use super::{Constraint, ConstraintError, RawValue, check_finite};

/// Marker type enforcing that a value is finite and greater than zero.
///
/// # Examples
///
/// ```
/// use mbr_core::constraint::StrictlyPositive;
///
/// assert!(StrictlyPositive::new(1500.0).is_ok());
/// assert!(StrictlyPositive::new(0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct StrictlyPositive;

impl StrictlyPositive {
    /// Constructs a [`Constrained<T, StrictlyPositive>`](super::Constrained) if the value is valid.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstraintError`] if the value is zero, negative, or not finite.
    pub fn new<T: RawValue>(
        value: T,
    ) -> Result<super::Constrained<T, StrictlyPositive>, ConstraintError> {
        super::Constrained::new(value)
    }
}

impl<T: RawValue> Constraint<T> for StrictlyPositive {
    fn check(value: &T) -> Result<(), ConstraintError> {
        let raw = value.raw_value();
        check_finite(raw)?;
        if raw < 0.0 {
            Err(ConstraintError::Negative)
        } else if raw == 0.0 {
            Err(ConstraintError::Zero)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use uom::si::{f64::Volume, volume::cubic_meter};

    #[test]
    fn floats() {
        assert!(StrictlyPositive::new(1e-12).is_ok());
        assert_eq!(StrictlyPositive::new(0.0), Err(ConstraintError::Zero));
        assert_eq!(StrictlyPositive::new(-0.0), Err(ConstraintError::Zero));
        assert_eq!(StrictlyPositive::new(-3.0), Err(ConstraintError::Negative));
        assert_eq!(
            StrictlyPositive::new(f64::NAN),
            Err(ConstraintError::NotANumber)
        );
    }

    #[test]
    fn quantities() {
        assert!(StrictlyPositive::new(Volume::new::<cubic_meter>(1500.0)).is_ok());
        assert_eq!(
            StrictlyPositive::new(Volume::new::<cubic_meter>(0.0)),
            Err(ConstraintError::Zero)
        );
    }
}
