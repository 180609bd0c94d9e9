//! Descriptive statistics over numeric series and genre frequency statistics.
//!
//! Numeric routines reject empty input with [`AnalysisError::EmptySeries`] and
//! NaN or infinite values with [`AnalysisError::InvalidSeries`]. Statistics
//! that need more points than the series has (sample variance needs two,
//! skewness three, kurtosis four) come back as `None` rather than zero.

use std::collections::HashMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::analysis::AnalysisError;

/// The standard bundle of statistics for one numeric series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatBlock {
    pub mean: f64,
    pub median: f64,
    pub mode: Vec<f64>,
    pub std: Option<f64>,
    pub variance: Option<f64>,
    pub max: f64,
    pub min: f64,
    pub iqr: f64,
    #[serde(flatten)]
    pub shape: Option<Shape>,
}

/// Distribution shape, only computed for series where it is reported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Shape {
    pub skewness: Option<f64>,
    pub kurtosis: Option<f64>,
}

impl StatBlock {
    pub fn from_series(values: &[f64]) -> Result<Self, AnalysisError> {
        let sorted = sorted_series(values)?;
        let min = sorted[0];
        let max = sorted[sorted.len() - 1];
        let variance = variance(values)?;
        Ok(StatBlock {
            mean: mean(values)?,
            median: median_of_sorted(&sorted),
            mode: mode_of_sorted(&sorted),
            std: variance.map(f64::sqrt),
            variance,
            max,
            min,
            iqr: quantile_of_sorted(&sorted, 0.75) - quantile_of_sorted(&sorted, 0.25),
            shape: None,
        })
    }

    /// Same as [`StatBlock::from_series`] plus skewness and kurtosis.
    pub fn with_shape(values: &[f64]) -> Result<Self, AnalysisError> {
        let mut block = Self::from_series(values)?;
        block.shape = Some(Shape {
            skewness: skewness(values)?,
            kurtosis: kurtosis(values)?,
        });
        Ok(block)
    }

    pub fn skewness(&self) -> Option<f64> {
        self.shape.and_then(|shape| shape.skewness)
    }

    pub fn kurtosis(&self) -> Option<f64> {
        self.shape.and_then(|shape| shape.kurtosis)
    }
}

fn checked_series(values: &[f64]) -> Result<&[f64], AnalysisError> {
    if values.is_empty() {
        return Err(AnalysisError::EmptySeries);
    }
    if let Some((index, value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(AnalysisError::InvalidSeries(format!(
            "value {value} at position {index} is not a finite number"
        )));
    }
    Ok(values)
}

fn sorted_series(values: &[f64]) -> Result<Vec<f64>, AnalysisError> {
    let mut sorted = checked_series(values)?.to_vec();
    sorted.sort_by(f64::total_cmp);
    Ok(sorted)
}

pub fn mean(values: &[f64]) -> Result<f64, AnalysisError> {
    let values = checked_series(values)?;
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    // Summation rounding can land a hair outside the observed range.
    Ok(mean.clamp(min, max))
}

pub fn median(values: &[f64]) -> Result<f64, AnalysisError> {
    Ok(median_of_sorted(&sorted_series(values)?))
}

fn median_of_sorted(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Every value sharing the highest occurrence count, ascending.
pub fn mode(values: &[f64]) -> Result<Vec<f64>, AnalysisError> {
    Ok(mode_of_sorted(&sorted_series(values)?))
}

fn mode_of_sorted(sorted: &[f64]) -> Vec<f64> {
    let mut runs: Vec<(f64, usize)> = Vec::new();
    for &value in sorted {
        match runs.last_mut() {
            Some((last, count)) if *last == value => *count += 1,
            _ => runs.push((value, 1)),
        }
    }
    let top = runs.iter().map(|(_, count)| *count).max().unwrap_or(0);
    runs.into_iter()
        .filter(|(_, count)| *count == top)
        .map(|(value, _)| value)
        .collect()
}

/// Sample variance with an `n - 1` denominator; `None` for a single value.
pub fn variance(values: &[f64]) -> Result<Option<f64>, AnalysisError> {
    let values = checked_series(values)?;
    let n = values.len();
    if n < 2 {
        return Ok(None);
    }
    let sum_sq = central_moment_sum(values, 2);
    Ok(Some(sum_sq / (n - 1) as f64))
}

pub fn std_dev(values: &[f64]) -> Result<Option<f64>, AnalysisError> {
    Ok(variance(values)?.map(f64::sqrt))
}

/// Quantile `q` in `[0, 1]` using linear interpolation between order statistics.
pub fn quantile(values: &[f64], q: f64) -> Result<f64, AnalysisError> {
    if !(0.0..=1.0).contains(&q) {
        return Err(AnalysisError::InvalidInput(format!(
            "quantile {q} is outside [0, 1]"
        )));
    }
    Ok(quantile_of_sorted(&sorted_series(values)?, q))
}

fn quantile_of_sorted(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (position - lower as f64)
}

pub fn iqr(values: &[f64]) -> Result<f64, AnalysisError> {
    let sorted = sorted_series(values)?;
    Ok(quantile_of_sorted(&sorted, 0.75) - quantile_of_sorted(&sorted, 0.25))
}

/// Adjusted Fisher-Pearson skewness; `None` below three values, zero for a
/// constant series.
pub fn skewness(values: &[f64]) -> Result<Option<f64>, AnalysisError> {
    let values = checked_series(values)?;
    let n = values.len() as f64;
    if values.len() < 3 {
        return Ok(None);
    }
    let m2 = central_moment_sum(values, 2);
    if m2 == 0.0 {
        return Ok(Some(0.0));
    }
    let m3 = central_moment_sum(values, 3);
    Ok(Some(n * (n - 1.0).sqrt() / (n - 2.0) * (m3 / m2.powf(1.5))))
}

/// Bias-adjusted excess kurtosis; `None` below four values, zero for a
/// constant series.
pub fn kurtosis(values: &[f64]) -> Result<Option<f64>, AnalysisError> {
    let values = checked_series(values)?;
    let n = values.len() as f64;
    if values.len() < 4 {
        return Ok(None);
    }
    let m2 = central_moment_sum(values, 2);
    if m2 == 0.0 {
        return Ok(Some(0.0));
    }
    let m4 = central_moment_sum(values, 4);
    let numerator = n * (n + 1.0) * (n - 1.0) * m4;
    let denominator = (n - 2.0) * (n - 3.0) * m2 * m2;
    let adjustment = 3.0 * (n - 1.0).powi(2) / ((n - 2.0) * (n - 3.0));
    Ok(Some(numerator / denominator - adjustment))
}

fn central_moment_sum(values: &[f64], power: i32) -> f64 {
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|v| (v - mean).powi(power)).sum()
}

/// Shannon entropy in nats of an unnormalized count vector.
pub fn entropy(counts: &[usize]) -> f64 {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    let entropy: f64 = counts
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.ln()
        })
        .sum();
    entropy.max(0.0)
}

/// Genre occurrence counts in first-encountered order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreFrequency {
    counts: Vec<(String, usize)>,
}

impl GenreFrequency {
    pub fn get(&self, genre: &str) -> Option<usize> {
        self.counts
            .iter()
            .find(|(name, _)| name == genre)
            .map(|(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(name, count)| (name.as_str(), *count))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn counts(&self) -> Vec<usize> {
        self.counts.iter().map(|(_, count)| *count).collect()
    }
}

impl<'a> FromIterator<&'a str> for GenreFrequency {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut counts: Vec<(String, usize)> = Vec::new();
        for genre in iter {
            match positions.get(genre) {
                Some(&index) => counts[index].1 += 1,
                None => {
                    positions.insert(genre, counts.len());
                    counts.push((genre.to_string(), 1));
                }
            }
        }
        GenreFrequency { counts }
    }
}

impl Serialize for GenreFrequency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.counts.len()))?;
        for (genre, count) in &self.counts {
            map.serialize_entry(genre, count)?;
        }
        map.end()
    }
}

/// Categorical statistics over the resolved genre lists of a set of songs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreStatBlock {
    /// Most frequent genre; ties go to the genre seen first. `None` when no
    /// song has any genre.
    pub mode: Option<String>,
    pub frequency: GenreFrequency,
    pub entropy: f64,
}

pub fn genre_statistics<'a, I>(genre_lists: I) -> GenreStatBlock
where
    I: IntoIterator<Item = &'a [String]>,
{
    let frequency: GenreFrequency = genre_lists
        .into_iter()
        .flat_map(|genres| genres.iter().map(String::as_str))
        .collect();

    let mut mode: Option<(&str, usize)> = None;
    for (genre, count) in frequency.iter() {
        if mode.map_or(true, |(_, best)| count > best) {
            mode = Some((genre, count));
        }
    }

    GenreStatBlock {
        mode: mode.map(|(genre, _)| genre.to_string()),
        entropy: entropy(&frequency.counts()),
        frequency,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn empty_series_is_rejected() {
        assert_eq!(StatBlock::from_series(&[]), Err(AnalysisError::EmptySeries));
        assert_eq!(mean(&[]), Err(AnalysisError::EmptySeries));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let err = StatBlock::from_series(&[1.0, f64::NAN]).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidSeries(_)));
        assert!(variance(&[f64::INFINITY, 1.0]).is_err());
    }

    #[test]
    fn single_value_has_undefined_dispersion() {
        let block = StatBlock::with_shape(&[42.0]).unwrap();
        assert_eq!(block.mean, 42.0);
        assert_eq!(block.median, 42.0);
        assert_eq!(block.min, 42.0);
        assert_eq!(block.max, 42.0);
        assert_eq!(block.mode, vec![42.0]);
        assert_eq!(block.std, None);
        assert_eq!(block.variance, None);
        assert_eq!(block.iqr, 0.0);
        assert_eq!(block.skewness(), None);
        assert_eq!(block.kurtosis(), None);
    }

    #[test]
    fn basic_block() {
        let block = StatBlock::from_series(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert!(close(block.mean, 2.5, EPS));
        assert!(close(block.median, 2.5, EPS));
        assert_eq!(block.min, 1.0);
        assert_eq!(block.max, 4.0);
        assert!(close(block.variance.unwrap(), 5.0 / 3.0, EPS));
        assert!(close(block.std.unwrap(), (5.0f64 / 3.0).sqrt(), EPS));
        // q25 = 1.75, q75 = 3.25
        assert!(close(block.iqr, 1.5, EPS));
        assert!(block.shape.is_none());
    }

    #[test]
    fn odd_length_median() {
        assert_eq!(median(&[9.0, 1.0, 5.0]).unwrap(), 5.0);
    }

    #[test]
    fn mode_reports_all_ties_ascending() {
        assert_eq!(mode(&[3.0, 1.0, 3.0, 1.0, 2.0]).unwrap(), vec![1.0, 3.0]);
        assert_eq!(mode(&[5.0, 5.0, 1.0]).unwrap(), vec![5.0]);
        assert_eq!(mode(&[2.0, 1.0]).unwrap(), vec![1.0, 2.0]);
    }

    #[test]
    fn quantile_interpolates() {
        let values = [10.0, 20.0, 30.0, 40.0, 50.0];
        assert!(close(quantile(&values, 0.1).unwrap(), 14.0, EPS));
        assert_eq!(quantile(&values, 0.0).unwrap(), 10.0);
        assert_eq!(quantile(&values, 1.0).unwrap(), 50.0);
        assert!(quantile(&values, 1.5).is_err());
    }

    #[test]
    fn shape_of_skewed_series() {
        let block = StatBlock::with_shape(&[1.0, 2.0, 3.0, 10.0]).unwrap();
        assert!(close(block.skewness().unwrap(), 1.763_632_6, 1e-6));
        assert!(close(block.kurtosis().unwrap(), 3.228, 1e-9));
    }

    #[test]
    fn shape_needs_enough_points() {
        assert_eq!(skewness(&[1.0, 2.0]).unwrap(), None);
        assert!(skewness(&[1.0, 2.0, 4.0]).unwrap().is_some());
        assert_eq!(kurtosis(&[1.0, 2.0, 4.0]).unwrap(), None);
    }

    #[test]
    fn constant_series_has_zero_shape() {
        let block = StatBlock::with_shape(&[7.0; 5]).unwrap();
        assert_eq!(block.variance, Some(0.0));
        assert_eq!(block.skewness(), Some(0.0));
        assert_eq!(block.kurtosis(), Some(0.0));
    }

    #[test]
    fn ordering_properties_hold() {
        let series: [&[f64]; 4] = [
            &[0.1, 0.1, 0.1],
            &[3.0, -2.0, 8.5, 8.5, 0.0],
            &[1e9, 1.0, 250_000.0],
            &[215.4, 187.0, 301.2, 199.9, 240.0, 187.0],
        ];
        for values in series {
            let block = StatBlock::from_series(values).unwrap();
            assert!(block.min <= block.median && block.median <= block.max);
            assert!(block.min <= block.mean && block.mean <= block.max);
            assert!(block.iqr >= 0.0);
        }
    }

    #[test]
    fn entropy_of_single_genre_is_zero() {
        assert_eq!(entropy(&[7]), 0.0);
        assert_eq!(entropy(&[]), 0.0);
    }

    #[test]
    fn entropy_of_uniform_counts_is_ln_k() {
        assert!(close(entropy(&[3, 3, 3, 3]), 4f64.ln(), EPS));
        assert!(close(entropy(&[1, 1]), 2f64.ln(), EPS));
    }

    #[test]
    fn entropy_normalizes_counts() {
        // p = [0.5, 0.25, 0.25]
        let expected = -(0.5f64 * 0.5f64.ln() + 2.0 * 0.25 * 0.25f64.ln());
        assert!(close(entropy(&[2, 1, 1]), expected, EPS));
        assert!(close(entropy(&[20, 10, 10]), expected, EPS));
    }

    #[test]
    fn genre_statistics_count_in_first_seen_order() {
        let lists: Vec<Vec<String>> = vec![
            vec!["rock".into(), "indie".into()],
            vec![],
            vec!["pop".into(), "indie".into()],
            vec!["pop".into()],
        ];
        let stats = genre_statistics(lists.iter().map(Vec::as_slice));
        let order: Vec<(&str, usize)> = stats.frequency.iter().collect();
        assert_eq!(order, vec![("rock", 1), ("indie", 2), ("pop", 2)]);
        // indie and pop tie; indie was seen first
        assert_eq!(stats.mode.as_deref(), Some("indie"));
        assert_eq!(stats.frequency.get("pop"), Some(2));
        assert_eq!(stats.frequency.get("jazz"), None);
    }

    #[test]
    fn genre_statistics_without_genres() {
        let lists: Vec<Vec<String>> = vec![vec![], vec![]];
        let stats = genre_statistics(lists.iter().map(Vec::as_slice));
        assert_eq!(stats.mode, None);
        assert!(stats.frequency.is_empty());
        assert_eq!(stats.entropy, 0.0);
    }

    #[test]
    fn frequency_serializes_as_ordered_map() {
        let frequency: GenreFrequency = ["b", "a", "b"].into_iter().collect();
        assert_eq!(serde_json::to_string(&frequency).unwrap(), r#"{"b":2,"a":1}"#);
    }
}
