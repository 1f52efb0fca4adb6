//! Linear trend fitting for chart overlays

use chrono::NaiveDate;
use serde::Serialize;

/// Days since 1970-01-01, so x spacing follows elapsed time between months
pub fn day_ordinal(date: NaiveDate) -> f64 {
    (date - NaiveDate::default()).num_days() as f64
}

/// Least-squares line `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
}

impl TrendLine {
    /// Fit a degree-1 polynomial to `(x, y)` points.
    ///
    /// Returns `None` with fewer than two points or when every x is the same,
    /// in which case there is no trend to draw.
    pub fn fit(points: &[(f64, f64)]) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }

        let n = points.len() as f64;
        let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
        let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

        // Centered sums keep precision with large day ordinals
        let (sxy, sxx) = points.iter().fold((0.0, 0.0), |(sxy, sxx), (x, y)| {
            let dx = x - mean_x;
            (sxy + dx * (y - mean_y), sxx + dx * dx)
        });

        if sxx == 0.0 {
            return None;
        }

        let slope = sxy / sxx;
        Some(Self {
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }

    /// Fit over a dated series using [`day_ordinal`] for x
    pub fn fit_dated(series: &[(NaiveDate, f64)]) -> Option<Self> {
        let points: Vec<(f64, f64)> = series
            .iter()
            .map(|(date, y)| (day_ordinal(*date), *y))
            .collect();
        Self::fit(&points)
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    pub fn predict_date(&self, date: NaiveDate) -> f64 {
        self.predict(day_ordinal(date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9 * (1.0 + a.abs().max(b.abs()))
    }

    #[test]
    fn test_day_ordinal() {
        assert_eq!(day_ordinal(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()), 0.0);
        assert_eq!(day_ordinal(NaiveDate::from_ymd_opt(1970, 2, 1).unwrap()), 31.0);
        let jan = day_ordinal(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let mar = day_ordinal(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(mar - jan, 60.0);
    }

    #[test]
    fn test_two_points_exact() {
        let points = [(19723.0, 200.0), (19754.0, 262.0)];
        let line = TrendLine::fit(&points).unwrap();
        for (x, y) in points {
            assert!(close(line.predict(x), y), "residual at x={}", x);
        }
        assert!(close(line.slope, 2.0));
    }

    #[test]
    fn test_least_squares() {
        // y = 2x + 1 with symmetric noise
        let points = [(0.0, 1.5), (1.0, 2.5), (2.0, 5.5), (3.0, 6.5)];
        let line = TrendLine::fit(&points).unwrap();
        assert!(close(line.slope, 1.8));
        assert!(close(line.intercept, 1.3));
    }

    #[test]
    fn test_too_few_points() {
        assert!(TrendLine::fit(&[]).is_none());
        assert!(TrendLine::fit(&[(1.0, 2.0)]).is_none());
        assert!(TrendLine::fit(&[(1.0, 2.0), (1.0, 3.0)]).is_none());
    }

    #[test]
    fn test_fit_dated_uses_elapsed_days() {
        let jan = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let feb = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let apr = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        // Linear in days, not in index: Jan->Feb is 31 days, Feb->Apr is 60
        let series = [(jan, 0.0), (feb, 31.0), (apr, 91.0)];
        let line = TrendLine::fit_dated(&series).unwrap();
        assert!(close(line.slope, 1.0));
        assert!(close(line.predict_date(apr), 91.0));
    }
}
