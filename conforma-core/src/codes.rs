//! Sequential human-readable record codes ("NC-0007").
//!
//! Convenience formatting over a per-tenant row count. Not a
//! distributed-safe sequence.

/// Format the next code for a collection that currently holds
/// `existing` rows. Zero-padded to four digits, growing naturally
/// past 9999.
pub fn sequential_code(prefix: &str, existing: u64) -> String {
    format!("{}-{:04}", prefix, existing + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_to_four_digits() {
        assert_eq!(sequential_code("NC", 0), "NC-0001");
        assert_eq!(sequential_code("NC", 6), "NC-0007");
        assert_eq!(sequential_code("RSK", 41), "RSK-0042");
    }

    #[test]
    fn grows_past_the_pad_width() {
        assert_eq!(sequential_code("NC", 9999), "NC-10000");
    }
}
