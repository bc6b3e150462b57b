//! Input validation for batching instances.
//!
//! Checks structural integrity of an instance before column generation.
//! Detects:
//! - Instances without jobs
//! - Zero batch capacity
//! - Jobs longer than the batch capacity (no feasible batch exists for them)

use crate::models::Instance;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// The instance has no jobs.
    EmptyInstance,
    /// The batch capacity `T` is zero.
    ZeroCapacity,
    /// A job's processing time exceeds `T`.
    OversizedJob,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validates a batching instance.
///
/// Checks:
/// 1. At least one job
/// 2. Positive batch capacity
/// 3. Every processing time fits in one batch
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
///
/// # Example
/// ```
/// use u_batching::models::Instance;
/// use u_batching::validation::{validate_instance, ValidationErrorKind};
///
/// assert!(validate_instance(&Instance::new(vec![2, 3], 5, 1)).is_ok());
///
/// let errors = validate_instance(&Instance::new(vec![2, 9], 5, 1)).unwrap_err();
/// assert_eq!(errors[0].kind, ValidationErrorKind::OversizedJob);
/// ```
pub fn validate_instance(instance: &Instance) -> ValidationResult {
    let mut errors = Vec::new();

    if instance.n_jobs() == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyInstance,
            "Instance has no jobs",
        ));
    }

    if instance.capacity == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::ZeroCapacity,
            "Batch capacity is zero",
        ));
    }

    for (job, &p) in instance.processing_times.iter().enumerate() {
        if p > instance.capacity {
            errors.push(ValidationError::new(
                ValidationErrorKind::OversizedJob,
                format!(
                    "Job {job} takes {p}, longer than batch capacity {}",
                    instance.capacity
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_instance() {
        let inst = Instance::new(vec![3, 3, 3, 3], 6, 1);
        assert!(validate_instance(&inst).is_ok());
    }

    #[test]
    fn test_job_equal_to_capacity_is_valid() {
        let inst = Instance::new(vec![6, 1], 6, 0);
        assert!(validate_instance(&inst).is_ok());
    }

    #[test]
    fn test_empty_instance() {
        let inst = Instance::new(Vec::new(), 6, 1);
        let errors = validate_instance(&inst).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::EmptyInstance);
    }

    #[test]
    fn test_oversized_jobs_each_reported() {
        let inst = Instance::new(vec![7, 2, 9], 6, 1);
        let errors = validate_instance(&inst).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| e.kind == ValidationErrorKind::OversizedJob));
        assert!(errors[1].message.contains("Job 2"));
    }

    #[test]
    fn test_multiple_errors() {
        // zero capacity makes every positive job oversized too
        let inst = Instance::new(vec![1], 0, 0);
        let errors = validate_instance(&inst).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::ZeroCapacity));
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::OversizedJob));
    }
}
