//! Pearson correlation over the numeric columns, feeding the heatmap.

use crate::storage::entities::{ActivityRecord, Column};

/// Axis order of [correlation_matrix], also used for the heatmap labels.
pub const COLUMNS: [Column; 2] = [Column::DurationMinutes, Column::CaloriesBurned];

/// Pairwise correlation of the numeric columns, rows and columns in
/// [COLUMNS] order. A None cell means the coefficient is undefined there.
pub fn correlation_matrix(records: &[ActivityRecord]) -> [[Option<f64>; 2]; 2] {
    let durations: Vec<f64> = records
        .iter()
        .map(|record| f64::from(record.duration_minutes))
        .collect();
    let calories: Vec<f64> = records
        .iter()
        .map(|record| f64::from(record.calories_burned))
        .collect();
    let series = [durations, calories];

    let mut matrix = [[None; 2]; 2];
    for (row, a) in series.iter().enumerate() {
        for (column, b) in series.iter().enumerate() {
            matrix[row][column] = correlation(a, b);
        }
    }
    matrix
}

/// Pearson correlation coefficient of two equally long series. None when
/// the coefficient is undefined: fewer than two samples, or a series with
/// zero variance. That includes the diagonal of a constant column.
pub fn correlation(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut variance_x = 0.0;
    let mut variance_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        covariance += (x - mean_x) * (y - mean_y);
        variance_x += (x - mean_x) * (x - mean_x);
        variance_y += (y - mean_y) * (y - mean_y);
    }
    if variance_x == 0.0 || variance_y == 0.0 {
        return None;
    }
    Some(covariance / (variance_x.sqrt() * variance_y.sqrt()))
}

#[cfg(test)]
mod tests {
    use crate::storage::entities::ActivityRecord;

    use super::{correlation, correlation_matrix};

    fn record(duration: u32, calories: u32) -> ActivityRecord {
        ActivityRecord {
            date: "2025-03-15".into(),
            activity_type: "Running".into(),
            duration_minutes: duration,
            calories_burned: calories,
        }
    }

    #[test]
    fn test_proportional_series_correlate_fully() {
        let xs = [10.0, 20.0, 30.0];
        let ys = [100.0, 200.0, 300.0];
        let r = correlation(&xs, &ys).unwrap();
        assert!((r - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_inverse_series_correlate_negatively() {
        let xs = [10.0, 20.0, 30.0];
        let ys = [300.0, 200.0, 100.0];
        let r = correlation(&xs, &ys).unwrap();
        assert!((r + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_constant_series_have_no_coefficient() {
        let xs = [10.0, 10.0, 10.0];
        let ys = [100.0, 200.0, 300.0];
        assert_eq!(correlation(&xs, &ys), None);
        assert_eq!(correlation(&ys, &xs), None);
    }

    #[test]
    fn test_single_sample_has_no_coefficient() {
        assert_eq!(correlation(&[10.0], &[100.0]), None);
    }

    #[test]
    fn test_matrix_of_perfectly_related_columns() {
        let records = vec![record(10, 100), record(20, 200), record(30, 300)];

        let matrix = correlation_matrix(&records);

        for row in matrix {
            for cell in row {
                let r = cell.unwrap();
                assert!((r - 1.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_matrix_of_single_record_is_undefined() {
        let matrix = correlation_matrix(&[record(10, 100)]);
        assert_eq!(matrix, [[None; 2]; 2]);
    }
}
