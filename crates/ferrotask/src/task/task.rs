use crate::{Scalar, TaskError};
use core::fmt;

/// The closed set of operations a [`Task`] can perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskKind {
    Sin,
    Sqrt,
    Pow,
}

impl TaskKind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 3] = [Self::Sin, Self::Sqrt, Self::Pow];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Sqrt => "sqrt",
            Self::Pow => "pow",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable description of one computation.
///
/// Tasks carry their operands by value and hold no shared state, so any
/// worker can evaluate any task without coordinating with other workers.
///
/// # Example
/// ```
/// use ferrotask::{Task, TaskError, TaskKind};
///
/// assert_eq!(Task::Pow(2.0_f64, 10.0).evaluate(), Ok(1024.0));
/// assert_eq!(
///     Task::Sqrt(-1.0_f64).evaluate(),
///     Err(TaskError::Domain { op: TaskKind::Sqrt })
/// );
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Task<T: Scalar> {
    /// `sin(x)`, with `x` in radians.
    Sin(T),
    /// `sqrt(x)`.
    Sqrt(T),
    /// `base.powf(exponent)`.
    Pow(T, T),
}

impl<T: Scalar> Task<T> {
    pub const fn kind(&self) -> TaskKind {
        match self {
            Self::Sin(_) => TaskKind::Sin,
            Self::Sqrt(_) => TaskKind::Sqrt,
            Self::Pow(_, _) => TaskKind::Pow,
        }
    }

    /// Runs the computation on the calling thread.
    ///
    /// # Errors
    /// - [`TaskError::NotANumber`] if any operand is NaN.
    /// - [`TaskError::Domain`] if non-NaN operands produce NaN (negative
    ///   square root, sine of infinity, negative base with a fractional
    ///   exponent).
    /// - [`TaskError::Overflow`] if finite operands produce an infinite
    ///   result.
    pub fn evaluate(&self) -> Result<T, TaskError> {
        let op = self.kind();
        let (a, b) = self.operands();

        if a.is_nan() || b.is_some_and(Scalar::is_nan) {
            return Err(TaskError::NotANumber { op });
        }

        let value = match *self {
            Self::Sin(x) => x.sin(),
            Self::Sqrt(x) => x.sqrt(),
            Self::Pow(base, exponent) => base.powf(exponent),
        };

        if value.is_nan() {
            return Err(TaskError::Domain { op });
        }
        if !value.is_finite() && a.is_finite() && b.is_none_or(Scalar::is_finite) {
            return Err(TaskError::Overflow { op });
        }

        Ok(value)
    }

    fn operands(&self) -> (T, Option<T>) {
        match *self {
            Self::Sin(x) | Self::Sqrt(x) => (x, None),
            Self::Pow(base, exponent) => (base, Some(exponent)),
        }
    }
}

impl<T: Scalar> fmt::Display for Task<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sin(x) => write!(f, "sin({x})"),
            Self::Sqrt(x) => write!(f, "sqrt({x})"),
            Self::Pow(base, exponent) => write!(f, "pow({base}, {exponent})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_results() {
        assert_eq!(Task::Pow(2.0_f64, 10.0).evaluate(), Ok(1024.0));
        assert_eq!(Task::Sqrt(16.0_f64).evaluate(), Ok(4.0));
        assert_eq!(Task::Sin(0.0_f64).evaluate(), Ok(0.0));
        assert_eq!(Task::Pow(5.0_f32, 2.0).evaluate(), Ok(25.0));
        assert_eq!(Task::Sqrt(25.0_f32).evaluate(), Ok(5.0));
    }

    #[test]
    fn sin_of_sixth_pi_is_half() {
        let value = Task::Sin(core::f64::consts::FRAC_PI_6).evaluate().unwrap();
        assert!((value - 0.5).abs() < 1e-12);
    }

    #[test]
    fn negative_sqrt_is_domain_error() {
        assert_eq!(
            Task::Sqrt(-1.0_f64).evaluate(),
            Err(TaskError::Domain { op: TaskKind::Sqrt })
        );
        // Signed zero is still in the domain.
        assert!(Task::Sqrt(-0.0_f64).evaluate().is_ok());
    }

    #[test]
    fn fractional_power_of_negative_base_is_domain_error() {
        assert_eq!(
            Task::Pow(-8.0_f64, 0.5).evaluate(),
            Err(TaskError::Domain { op: TaskKind::Pow })
        );
        assert_eq!(Task::Pow(-2.0_f64, 3.0).evaluate(), Ok(-8.0));
    }

    #[test]
    fn sin_of_infinity_is_domain_error() {
        assert_eq!(
            Task::Sin(f32::INFINITY).evaluate(),
            Err(TaskError::Domain { op: TaskKind::Sin })
        );
    }

    #[test]
    fn overflow_only_from_finite_operands() {
        assert_eq!(
            Task::Pow(10.0_f32, 1000.0).evaluate(),
            Err(TaskError::Overflow { op: TaskKind::Pow })
        );
        assert_eq!(Task::Sqrt(f64::INFINITY).evaluate(), Ok(f64::INFINITY));
    }

    #[test]
    fn nan_operand_is_reported() {
        assert_eq!(
            Task::Pow(2.0_f64, f64::NAN).evaluate(),
            Err(TaskError::NotANumber { op: TaskKind::Pow })
        );
        assert_eq!(
            Task::Sin(f32::NAN).evaluate().unwrap_err().op(),
            TaskKind::Sin
        );
    }

    #[test]
    fn display() {
        assert_eq!(Task::Pow(2.0_f64, 10.0).to_string(), "pow(2, 10)");
        assert_eq!(TaskKind::Sqrt.to_string(), "sqrt");
        assert_eq!(
            TaskError::Domain { op: TaskKind::Sqrt }.to_string(),
            "sqrt: argument outside the domain of the operation"
        );
    }
}
