//! Math functions: MAX, MIN, SUM, ABS

use crate::error::{FormulaError, FormulaResult};

/// MAX(value1, ...)
pub fn fn_max(args: &[i64]) -> FormulaResult<i64> {
    args.iter().copied().max().ok_or_else(|| FormulaError::ArgumentCount {
        function: "MAX".into(),
        expected: "at least 1".into(),
        actual: 0,
    })
}

/// MIN(value1, ...)
pub fn fn_min(args: &[i64]) -> FormulaResult<i64> {
    args.iter().copied().min().ok_or_else(|| FormulaError::ArgumentCount {
        function: "MIN".into(),
        expected: "at least 1".into(),
        actual: 0,
    })
}

/// SUM(value1, ...)
pub fn fn_sum(args: &[i64]) -> FormulaResult<i64> {
    args.iter()
        .try_fold(0i64, |acc, &n| acc.checked_add(n))
        .ok_or(FormulaError::Overflow)
}

/// ABS(value)
pub fn fn_abs(args: &[i64]) -> FormulaResult<i64> {
    match args {
        [n] => n.checked_abs().ok_or(FormulaError::Overflow),
        _ => Err(FormulaError::ArgumentCount {
            function: "ABS".into(),
            expected: "exactly 1".into(),
            actual: args.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_min() {
        assert_eq!(fn_max(&[3, 5]).unwrap(), 5);
        assert_eq!(fn_max(&[-3, -5, -1]).unwrap(), -1);
        assert_eq!(fn_min(&[3, 5, 1]).unwrap(), 1);
        assert!(fn_max(&[]).is_err());
    }

    #[test]
    fn test_sum() {
        assert_eq!(fn_sum(&[]).unwrap(), 0);
        assert_eq!(fn_sum(&[1, 2, 3]).unwrap(), 6);
        assert_eq!(fn_sum(&[i64::MAX, 1]), Err(FormulaError::Overflow));
    }

    #[test]
    fn test_abs() {
        assert_eq!(fn_abs(&[-7]).unwrap(), 7);
        assert_eq!(fn_abs(&[i64::MIN]), Err(FormulaError::Overflow));
    }
}
