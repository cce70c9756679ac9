/// Octas per APT. On-chain amounts are integer octas; APT is the display
/// unit.
pub const OCTAS_PER_APT: u64 = 100_000_000;

pub fn octas_to_apt(octas: u64) -> f64 {
    octas as f64 / OCTAS_PER_APT as f64
}

/// Convert a display amount to octas, rounding to the nearest octa.
/// Negative inputs clamp to zero.
pub fn apt_to_octas(apt: f64) -> u64 {
    (apt * OCTAS_PER_APT as f64).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_apt_is_a_hundred_million_octas() {
        assert_eq!(octas_to_apt(100_000_000), 1.0);
        assert_eq!(apt_to_octas(1.0), 100_000_000);
    }

    #[test]
    fn test_fractional_amounts() {
        assert_eq!(octas_to_apt(150_000_000), 1.5);
        assert_eq!(apt_to_octas(0.5), 50_000_000);
        // one octa
        assert_eq!(apt_to_octas(0.000_000_01), 1);
    }

    #[test]
    fn test_zero_and_negative() {
        assert_eq!(octas_to_apt(0), 0.0);
        assert_eq!(apt_to_octas(0.0), 0);
        assert_eq!(apt_to_octas(-2.0), 0);
    }
}
