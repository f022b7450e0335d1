use scholaris_core::AppError;
use scholaris_scheduling::ScheduleError;

/// Calendar rule violations are client errors.
pub fn map_schedule_error(err: ScheduleError) -> AppError {
    AppError::unprocessable(anyhow::anyhow!(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_errors_are_unprocessable() {
        let err = map_schedule_error(ScheduleError::EmptySlot);
        assert_eq!(err.status.as_u16(), 422);
        assert_eq!(err.message(), "End time must be after start time");
    }
}
