//! Status classification against reference bounds.

use labrec_model::Status;

/// Classify a measurement against its reference range.
///
/// Bounds are inclusive of the normal range: equality with either bound is
/// normal. Missing value or missing bounds yield
/// [`Status::Indeterminate`] — never an error.
pub fn classify(
    value_numeric: Option<f64>,
    reference_min: Option<f64>,
    reference_max: Option<f64>,
) -> Status {
    let Some(value) = value_numeric else {
        return Status::Indeterminate;
    };

    match (reference_min, reference_max) {
        (None, None) => Status::Indeterminate,
        (None, Some(max)) => {
            if value > max {
                Status::High
            } else {
                Status::Normal
            }
        }
        (Some(min), None) => {
            if value < min {
                Status::Low
            } else {
                Status::Normal
            }
        }
        (Some(min), Some(max)) => {
            if value < min {
                Status::Low
            } else if value > max {
                Status::High
            } else {
                Status::Normal
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_bounds() {
        assert_eq!(classify(Some(15.0), Some(10.0), Some(20.0)), Status::Normal);
        assert_eq!(classify(Some(5.0), Some(10.0), Some(20.0)), Status::Low);
        assert_eq!(classify(Some(25.0), Some(10.0), Some(20.0)), Status::High);
    }

    #[test]
    fn bounds_are_inclusive() {
        assert_eq!(classify(Some(10.0), Some(10.0), Some(20.0)), Status::Normal);
        assert_eq!(classify(Some(20.0), Some(10.0), Some(20.0)), Status::Normal);
    }

    #[test]
    fn single_bound() {
        assert_eq!(classify(Some(7.0), None, Some(8.0)), Status::Normal);
        assert_eq!(classify(Some(9.0), None, Some(8.0)), Status::High);
        assert_eq!(classify(Some(50.0), Some(40.0), None), Status::Normal);
        assert_eq!(classify(Some(30.0), Some(40.0), None), Status::Low);
    }

    #[test]
    fn missing_value_or_bounds_is_indeterminate() {
        assert_eq!(classify(None, Some(10.0), Some(20.0)), Status::Indeterminate);
        assert_eq!(classify(Some(15.0), None, None), Status::Indeterminate);
        assert_eq!(classify(None, None, None), Status::Indeterminate);
    }
}
