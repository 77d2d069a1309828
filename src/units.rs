use crate::error::ConfigError;

pub const KIB: u64 = 1024;
pub const MIB: u64 = 1024 * KIB;
pub const GIB: u64 = 1024 * MIB;
pub const TIB: u64 = 1024 * GIB;
pub const PIB: u64 = 1024 * TIB;
pub const EIB: u64 = 1024 * PIB;

const UNITS: [(u64, &str); 6] = [
    (EIB, "E"),
    (PIB, "P"),
    (TIB, "T"),
    (GIB, "G"),
    (MIB, "M"),
    (KIB, "K"),
];

/// Parse a human-readable byte quantity such as `256M`, `1.5GiB` or `4096`.
///
/// Units are binary multiples and case-insensitive; `K`, `KB`, `KiB` all mean 1024.
/// A bare number is a byte count.
pub fn parse_size(input: &str) -> Result<u64, ConfigError> {
    let invalid = |reason| ConfigError::InvalidSize {
        input: input.to_string(),
        reason,
    };

    let upper = input.trim().to_ascii_uppercase();
    let split = upper
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(upper.len());
    let (number, unit) = upper.split_at(split);
    let number = number.trim();
    if number.is_empty() {
        return Err(invalid("missing number"));
    }

    let multiplier = match unit {
        "" | "B" => 1,
        "K" | "KB" | "KIB" => KIB,
        "M" | "MB" | "MIB" => MIB,
        "G" | "GB" | "GIB" => GIB,
        "T" | "TB" | "TIB" => TIB,
        "P" | "PB" | "PIB" => PIB,
        "E" | "EB" | "EIB" => EIB,
        _ => return Err(invalid("unknown unit, expected B, K, M, G, T, P or E")),
    };

    if let Ok(whole) = number.parse::<u64>() {
        return whole
            .checked_mul(multiplier)
            .ok_or_else(|| invalid("too large"));
    }

    let value: f64 = number
        .parse()
        .map_err(|_| invalid("not a number"))?;
    if !value.is_finite() || value < 0.0 {
        return Err(invalid("must be a non-negative number"));
    }
    let bytes = value * multiplier as f64;
    if bytes >= u64::MAX as f64 {
        return Err(invalid("too large"));
    }
    Ok(bytes as u64)
}

/// Render a byte count with one decimal in the largest fitting binary unit,
/// e.g. `1048576` as `1.0M`. Counts under 1 KiB keep an exact `B` form.
pub fn format_size(bytes: u64) -> String {
    for (unit, suffix) in UNITS {
        if bytes >= unit {
            return format!("{:.1}{}", bytes as f64 / unit as f64, suffix);
        }
    }
    format!("{bytes}B")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_units() {
        assert_eq!(parse_size("1M").unwrap(), MIB);
        assert_eq!(parse_size("256M").unwrap(), 256 * MIB);
        assert_eq!(parse_size("2mb").unwrap(), 2 * MIB);
        assert_eq!(parse_size("1GiB").unwrap(), GIB);
        assert_eq!(parse_size("4k").unwrap(), 4 * KIB);
        assert_eq!(parse_size("1E").unwrap(), EIB);
        assert_eq!(parse_size(" 10B ").unwrap(), 10);
        assert_eq!(parse_size("4096").unwrap(), 4096);
        assert_eq!(parse_size("0").unwrap(), 0);
    }

    #[test]
    fn test_parse_fraction() {
        assert_eq!(parse_size("1.5K").unwrap(), 1536);
        assert_eq!(parse_size("0.5M").unwrap(), 512 * KIB);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "M", "abc", "12Q", "-1M", "1.2.3G", "16E", "NaNK"] {
            assert!(
                matches!(parse_size(bad), Err(ConfigError::InvalidSize { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_format() {
        assert_eq!(format_size(0), "0B");
        assert_eq!(format_size(512), "512B");
        assert_eq!(format_size(KIB), "1.0K");
        assert_eq!(format_size(MIB), "1.0M");
        assert_eq!(format_size(3 * MIB / 2), "1.5M");
        assert_eq!(format_size(256 * MIB), "256.0M");
        assert_eq!(format_size(u64::MAX), "16.0E");
    }
}
