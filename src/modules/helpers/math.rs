pub struct Math {}

impl Math {
    pub fn round_float_to_n_decimals(number: f64, decimals: i32) -> f64 {
        let multiplier = 10.0_f64.powi(decimals);
        (number * multiplier).round() / multiplier
    }

    /// # mean of a total over a count
    /// returns 0 when there is nothing to divide by
    pub fn average(total: u32, count: u32) -> f64 {
        if count == 0 {
            return 0.0;
        }

        total as f64 / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_two_decimals() {
        assert_eq!(Math::round_float_to_n_decimals(85.0 / 3.0, 2), 28.33);
        assert_eq!(Math::round_float_to_n_decimals(12.345, 1), 12.3);
        assert_eq!(Math::round_float_to_n_decimals(20.0, 2), 20.0);
    }

    #[test]
    fn average_of_nothing_is_zero() {
        assert_eq!(Math::average(0, 0), 0.0);
        assert_eq!(Math::average(43, 2), 21.5);
    }
}
