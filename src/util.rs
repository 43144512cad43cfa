/// Arithmetic mean; `None` for an empty slice
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(data.iter().sum::<f64>() / data.len() as f64)
}

/// Population standard deviation; `None` for an empty slice
pub fn std_dev(data: &[f64]) -> Option<f64> {
    let m = mean(data)?;
    let variance = data.iter().map(|v| (v - m).powi(2)).sum::<f64>() / data.len() as f64;
    Some(variance.sqrt())
}

/// Render a score delta with an explicit sign, e.g. "+120" or "-25"
pub fn fmt_signed(delta: i32) -> String {
    if delta >= 0 {
        format!("+{delta}")
    } else {
        delta.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[10., 20., 30., 15., 22.]), Some(19.4));
        assert_eq!(mean(&[120., -25., 110.]), Some(68.33333333333333));
    }

    #[test]
    fn test_mean_empty_slice() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_mean_single_value() {
        assert_eq!(mean(&[-25.0]), Some(-25.0));
    }

    #[test]
    fn test_std_dev_identical_values() {
        assert_eq!(std_dev(&[120.0, 120.0, 120.0]), Some(0.0));
    }

    #[test]
    fn test_std_dev_empty_slice() {
        assert_eq!(std_dev(&[]), None);
    }

    #[test]
    fn test_std_dev_known_value() {
        let result = std_dev(&[100., 120., 90., 102., 94.]).unwrap();
        assert!((result - 10.322790320451151).abs() < 1e-12);
    }

    #[test]
    fn test_fmt_signed() {
        assert_eq!(fmt_signed(120), "+120");
        assert_eq!(fmt_signed(0), "+0");
        assert_eq!(fmt_signed(-25), "-25");
    }
}
