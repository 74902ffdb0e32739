use std::{iter::FusedIterator, time::Duration};

/// Trait for advancing a system through time one snapshot at a time.
///
/// A `Simulation` owns nothing that changes between steps.
/// Each call to [`step`] takes the current snapshot by reference and returns
/// a new one, so a run is fully described by its initial state, its time
/// steps, and the simulation's configuration.
/// Identical inputs must always produce identical trajectories.
///
/// # Stepping Methods
///
/// After implementing [`step`], the following methods are available:
///
/// - [`Simulation::step_iter`]: Returns a lazy iterator over successive states.
/// - [`Simulation::step_many`]: Takes multiple steps and collects all states.
///
/// [`step`]: Simulation::step
pub trait Simulation {
    /// The full system snapshot passed between steps.
    type State: Clone;

    /// The error type returned if a step fails.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Advances `state` by the time step `dt`.
    ///
    /// # Errors
    ///
    /// Returns an error if a precondition of the step is violated or the
    /// resulting state would be physically undefined.
    fn step(&self, state: &Self::State, dt: Duration) -> Result<Self::State, Self::Error>;

    /// Creates an iterator that advances the simulation repeatedly.
    ///
    /// The first item is the initial state itself.
    /// Every following item is the result of one [`step`] with a constant `dt`.
    /// If a step fails, the error is yielded and iteration stops.
    ///
    /// [`step`]: Simulation::step
    fn step_iter(
        &self,
        initial: Self::State,
        dt: Duration,
    ) -> impl Iterator<Item = Result<Self::State, Self::Error>>
    where
        Self: Sized,
    {
        StepIter {
            dt,
            known: Some(Known::Initial(initial)),
            sim: self,
        }
    }

    /// Runs the simulation for a fixed number of steps and collects the results.
    ///
    /// # Returns
    ///
    /// A `Vec` of length `steps + 1` containing every state of the run,
    /// including the initial one.
    ///
    /// # Errors
    ///
    /// Returns the first step error encountered.
    /// No further steps are taken after an error.
    fn step_many(
        &self,
        initial: Self::State,
        steps: usize,
        dt: Duration,
    ) -> Result<Vec<Self::State>, Self::Error>
    where
        Self: Sized,
    {
        self.step_iter(initial, dt).take(steps + 1).collect()
    }
}

/// An iterator that repeatedly steps a simulation with a fixed time step.
struct StepIter<'a, S: Simulation> {
    dt: Duration,
    known: Option<Known<S::State>>,
    sim: &'a S,
}

/// Internal state held by the [`StepIter`] iterator.
enum Known<T> {
    /// The initial state has not been yielded yet.
    Initial(T),
    /// The most recently yielded state.
    Stepped(T),
}

impl<S: Simulation> Iterator for StepIter<'_, S> {
    type Item = Result<S::State, S::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.known.take()? {
            Known::Initial(state) => {
                self.known = Some(Known::Stepped(state.clone()));
                Some(Ok(state))
            }
            Known::Stepped(state) => match self.sim.step(&state, self.dt) {
                Ok(next) => {
                    self.known = Some(Known::Stepped(next.clone()));
                    Some(Ok(next))
                }
                Err(error) => Some(Err(error)),
            },
        }
    }
}

/// Marks that iteration always ends after the first `None`.
impl<S: Simulation> FusedIterator for StepIter<'_, S> {}

#[cfg(test)]
mod tests {
    use super::*;

    use std::convert::Infallible;

    use approx::assert_relative_eq;
    use thiserror::Error;

    /// A well-mixed tank draining through a fixed orifice coefficient.
    #[derive(Debug)]
    struct DrainingTank {
        outflow_per_day: f64,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Tank {
        days: f64,
        volume: f64,
    }

    impl Simulation for DrainingTank {
        type State = Tank;
        type Error = Infallible;

        fn step(&self, state: &Tank, dt: Duration) -> Result<Tank, Infallible> {
            let days = dt.as_secs_f64() / 86_400.0;
            Ok(Tank {
                days: state.days + days,
                volume: state.volume - self.outflow_per_day * days,
            })
        }
    }

    #[test]
    fn step_many_includes_initial_state() {
        let sim = DrainingTank {
            outflow_per_day: 24.0,
        };
        let initial = Tank {
            days: 0.0,
            volume: 100.0,
        };

        let states = sim
            .step_many(initial.clone(), 4, Duration::from_secs(3600))
            .unwrap();

        assert_eq!(states.len(), 5);
        assert_eq!(states[0], initial);
        assert_relative_eq!(states[4].volume, 96.0);
        assert_relative_eq!(states[4].days, 4.0 / 24.0);
    }

    #[derive(Debug, Error, PartialEq)]
    #[error("tank ran dry")]
    struct RanDry;

    /// Fails once the volume would go negative.
    struct StrictTank;

    impl Simulation for StrictTank {
        type State = f64;
        type Error = RanDry;

        fn step(&self, volume: &f64, dt: Duration) -> Result<f64, RanDry> {
            let next = volume - dt.as_secs_f64();
            if next < 0.0 { Err(RanDry) } else { Ok(next) }
        }
    }

    #[test]
    fn iteration_stops_after_first_error() {
        let results: Vec<_> = StrictTank
            .step_iter(2.5, Duration::from_secs(1))
            .take(10)
            .collect();

        assert_eq!(
            results,
            vec![Ok(2.5), Ok(1.5), Ok(0.5), Err(RanDry)],
            "iterator should yield the error once and then end"
        );
    }

    #[test]
    fn step_many_propagates_error() {
        let error = StrictTank
            .step_many(1.0, 3, Duration::from_secs(1))
            .unwrap_err();
        assert_eq!(error, RanDry);
    }
}
