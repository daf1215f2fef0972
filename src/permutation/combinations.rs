//! Lazy Cartesian product over ranged parameters
//!
//! Order is an odometer: the first key varies slowest, the last fastest.
//! The product size is computed analytically, never by enumeration.

/// One point of the cross product: `(parameter id, value)` in key order
pub type Combination = Vec<(String, f64)>;

/// Cartesian product of per-parameter value lists
#[derive(Debug, Clone)]
pub struct CombinationGenerator {
    keys: Vec<String>,
    values: Vec<Vec<f64>>,
    /// Odometer position of the next combination; `None` once exhausted
    cursor: Option<Vec<usize>>,
    /// Zero-based index of the next combination
    position: u64,
}

impl CombinationGenerator {
    pub fn new(ranges: Vec<(String, Vec<f64>)>) -> Self {
        let (keys, values): (Vec<_>, Vec<_>) = ranges.into_iter().unzip();
        let cursor = if values.iter().any(Vec::is_empty) {
            None
        } else {
            Some(vec![0; keys.len()])
        };
        Self {
            keys,
            values,
            cursor,
            position: 0,
        }
    }

    /// Product of the value-list lengths; `None` on u64 overflow
    ///
    /// An empty key set has exactly one (empty) combination.
    pub fn total(&self) -> Option<u64> {
        self.values
            .iter()
            .try_fold(1u64, |acc, v| acc.checked_mul(v.len() as u64))
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Zero-based index of the next combination the iterator yields
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Combination at a zero-based position in iteration order
    pub fn combination_at(&self, mut index: u64) -> Option<Combination> {
        if index >= self.total()? {
            return None;
        }
        let mut digits = vec![0usize; self.keys.len()];
        for (slot, values) in digits.iter_mut().zip(&self.values).rev() {
            let radix = values.len() as u64;
            *slot = (index % radix) as usize;
            index /= radix;
        }
        Some(self.materialise(&digits))
    }

    fn materialise(&self, digits: &[usize]) -> Combination {
        self.keys
            .iter()
            .zip(&self.values)
            .zip(digits)
            .map(|((key, values), &d)| (key.clone(), values[d]))
            .collect()
    }
}

impl Iterator for CombinationGenerator {
    type Item = Combination;

    fn next(&mut self) -> Option<Combination> {
        let digits = self.cursor.take()?;
        let combination = self.materialise(&digits);
        self.position += 1;

        // Advance the odometer from the last key
        let mut next = digits;
        let mut carried = true;
        for (slot, values) in next.iter_mut().zip(&self.values).rev() {
            *slot += 1;
            if *slot < values.len() {
                carried = false;
                break;
            }
            *slot = 0;
        }
        if !carried {
            self.cursor = Some(next);
        }

        Some(combination)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.cursor.is_none() {
            return (0, Some(0));
        }
        match self.total().map(|t| t - self.position) {
            Some(remaining) => match usize::try_from(remaining) {
                Ok(n) => (n, Some(n)),
                Err(_) => (usize::MAX, None),
            },
            None => (usize::MAX, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CombinationGenerator {
        CombinationGenerator::new(vec![
            ("A".to_string(), vec![1.0, 2.0]),
            ("B".to_string(), vec![10.0, 20.0, 30.0]),
        ])
    }

    fn values(combination: &Combination) -> Vec<f64> {
        combination.iter().map(|(_, v)| *v).collect()
    }

    #[test]
    fn test_odometer_order() {
        let generator = sample();
        assert_eq!(generator.total(), Some(6));

        let all: Vec<Vec<f64>> = generator.map(|c| values(&c)).collect();
        assert_eq!(
            all,
            vec![
                vec![1.0, 10.0],
                vec![1.0, 20.0],
                vec![1.0, 30.0],
                vec![2.0, 10.0],
                vec![2.0, 20.0],
                vec![2.0, 30.0],
            ]
        );
    }

    #[test]
    fn test_random_access_matches_iteration() {
        let generator = CombinationGenerator::new(vec![
            ("A".to_string(), vec![1.0, 2.0, 3.0]),
            ("B".to_string(), vec![5.0]),
            ("C".to_string(), vec![7.0, 8.0]),
            ("D".to_string(), vec![0.1, 0.2, 0.3, 0.4]),
        ]);
        let total = generator.total().unwrap();
        assert_eq!(total, 24);

        for (i, combination) in generator.clone().enumerate() {
            assert_eq!(generator.combination_at(i as u64), Some(combination));
        }
        assert_eq!(generator.combination_at(total), None);
    }

    #[test]
    fn test_empty_key_set_has_one_combination() {
        let generator = CombinationGenerator::new(vec![]);
        assert_eq!(generator.total(), Some(1));
        let all: Vec<Combination> = generator.collect();
        assert_eq!(all, vec![Vec::new()]);
    }

    #[test]
    fn test_empty_value_list_has_none() {
        let generator = CombinationGenerator::new(vec![
            ("A".to_string(), vec![1.0]),
            ("B".to_string(), vec![]),
        ]);
        assert_eq!(generator.total(), Some(0));
        assert_eq!(generator.count(), 0);
    }

    #[test]
    fn test_overflow_reported() {
        let big: Vec<f64> = (0..100_000).map(|i| i as f64).collect();
        let ranges = (0..4).map(|i| (format!("K{}", i), big.clone())).collect();
        let generator = CombinationGenerator::new(ranges);
        assert_eq!(generator.total(), None);
        // Still iterable lazily
        assert_eq!(generator.take(3).count(), 3);
    }

    #[test]
    fn test_early_termination_and_size_hint() {
        let mut generator = sample();
        assert_eq!(generator.size_hint(), (6, Some(6)));
        generator.next();
        generator.next();
        assert_eq!(generator.position(), 2);
        assert_eq!(generator.size_hint(), (4, Some(4)));
    }
}
