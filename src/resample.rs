use crate::model::Sample;
use crate::planner::TimeWindow;
use std::collections::HashMap;

/// One chart point: the bucket's lower edge and the rounded mean of the
/// samples that fell into it. Output order is unspecified; grouping is by
/// bucket-key equality, not range membership.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayPoint {
    pub x: i64,
    pub y: f64,
}

/// Bucket raw samples into fixed-width intervals sized so that at most
/// `resolution` buckets cover the window, then average each bucket to two
/// decimal places. Empty buckets are omitted. A zero-length window collapses
/// every sample into a single bucket at `window.start`.
pub fn resample(samples: &[Sample], window: TimeWindow, resolution: u32) -> Vec<DisplayPoint> {
    if samples.is_empty() {
        return Vec::new();
    }

    let width = window.len_secs() as f64 / resolution.max(1) as f64;

    let mut buckets: HashMap<i64, (f64, u64)> = HashMap::new();
    for sample in samples {
        let key = if width > 0.0 {
            bucket_key(sample.timestamp, width, window.end)
        } else {
            window.start
        };
        let slot = buckets.entry(key).or_insert((0.0, 0));
        slot.0 += sample.value;
        slot.1 += 1;
    }

    buckets
        .into_iter()
        .map(|(x, (sum, count))| DisplayPoint {
            x,
            y: (sum / count as f64 * 100.0).round() / 100.0,
        })
        .collect()
}

/// Largest multiple of `width` not exceeding the timestamp, double-floored
/// so non-integer widths cannot drift the key. A sample on the window's
/// closing edge would otherwise open a bucket at `end`; it joins the final
/// in-window bucket instead.
fn bucket_key(timestamp: i64, width: f64, end: i64) -> i64 {
    let key = ((timestamp as f64 / width).floor() * width).floor() as i64;
    if key >= end {
        (((end as f64 / width).ceil() - 1.0) * width).floor() as i64
    } else {
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut points: Vec<DisplayPoint>) -> Vec<DisplayPoint> {
        points.sort_by_key(|p| p.x);
        points
    }

    fn sample(timestamp: i64, value: f64) -> Sample {
        Sample { timestamp, value }
    }

    #[test]
    fn buckets_and_averages_the_worked_scenario() {
        let samples = [sample(0, 20.0), sample(300, 22.0), sample(600, 24.0)];
        let window = TimeWindow::new(0, 600);
        let points = sorted(resample(&samples, window, 2));
        assert_eq!(
            points,
            [
                DisplayPoint { x: 0, y: 20.0 },
                DisplayPoint { x: 300, y: 23.0 }
            ]
        );
    }

    #[test]
    fn mean_is_rounded_to_two_decimals() {
        let samples = [sample(10, 20.0), sample(20, 20.005)];
        let points = resample(&samples, TimeWindow::new(0, 600), 1);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].y, 20.0);

        let samples = [sample(10, 1.0), sample(20, 2.0), sample(30, 2.0)];
        let points = resample(&samples, TimeWindow::new(0, 600), 1);
        assert_eq!(points[0].y, 1.67);
    }

    #[test]
    fn single_sample_bucket_keeps_its_value() {
        let points = resample(&[sample(450, 21.37)], TimeWindow::new(0, 900), 3);
        assert_eq!(points, [DisplayPoint { x: 300, y: 21.37 }]);
    }

    #[test]
    fn output_is_independent_of_input_order() {
        let mut samples = vec![
            sample(10, 20.0),
            sample(250, 21.0),
            sample(320, 22.0),
            sample(580, 23.0),
            sample(599, 24.0),
        ];
        let window = TimeWindow::new(0, 600);
        let forward = sorted(resample(&samples, window, 4));
        samples.reverse();
        let reversed = sorted(resample(&samples, window, 4));
        assert_eq!(forward, reversed);
    }

    #[test]
    fn resampling_its_own_output_is_stable() {
        let samples: Vec<Sample> = (0..100)
            .map(|i| sample(i * 60, 20.0 + (i % 7) as f64))
            .collect();
        let window = TimeWindow::new(0, 6000);
        let first = sorted(resample(&samples, window, 10));

        let as_samples: Vec<Sample> = first
            .iter()
            .map(|p| sample(p.x, p.y))
            .collect();
        let second = sorted(resample(&as_samples, window, 10));

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.x, b.x);
            assert!((a.y - b.y).abs() < 0.01);
        }
    }

    #[test]
    fn all_samples_collapse_into_one_bucket_when_resolution_exceeds_span() {
        let samples = [sample(5, 20.0), sample(6, 22.0)];
        let points = resample(&samples, TimeWindow::new(0, 600), 1);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].y, 21.0);
    }

    #[test]
    fn zero_length_window_yields_a_single_bucket_at_start() {
        let samples = [sample(500, 20.0), sample(500, 22.0)];
        let points = resample(&samples, TimeWindow::new(500, 500), 10);
        assert_eq!(points, [DisplayPoint { x: 500, y: 21.0 }]);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(resample(&[], TimeWindow::new(0, 600), 2).is_empty());
    }

    #[test]
    fn non_integer_widths_key_by_double_floor() {
        // width = 700 / 3 = 233.33..; sample at 470 -> floor(470/233.33)=2,
        // 2 * 233.33 = 466.66 -> bucket 466
        let points = resample(&[sample(470, 20.0)], TimeWindow::new(0, 700), 3);
        assert_eq!(points[0].x, 466);
    }
}
