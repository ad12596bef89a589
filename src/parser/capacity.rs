use regex::Regex;
use std::sync::OnceLock;

fn leading_quantity(value: &str) -> Option<(f64, String)> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^\s*(\d+(?:\.\d+)?)\s*([A-Za-z]*)").expect("Invalid regex")
    });

    let caps = re.captures(value)?;
    let number: f64 = caps.get(1)?.as_str().parse().ok()?;
    let unit = caps
        .get(2)
        .map(|m| m.as_str().to_uppercase())
        .unwrap_or_default();
    Some((number, unit))
}

/// Parse a CPU field such as "16 cores" or "8" into a core count.
///
/// Anything without a leading integer counts as zero.
#[must_use]
pub fn parse_cpu_cores(value: Option<&str>) -> u64 {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^\s*(\d+)").expect("Invalid regex"));

    value
        .and_then(|v| re.captures(v))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Parse a memory/storage field such as "64 GB", "2 TB" or "512" into GB.
///
/// A bare number is taken as GB. Binary and decimal spellings of a unit are
/// treated alike (1 TB = 1024 GB). Unparseable values count as zero.
#[must_use]
pub fn parse_capacity_gb(value: Option<&str>) -> f64 {
    let Some((number, unit)) = value.and_then(leading_quantity) else {
        return 0.0;
    };

    match unit.as_str() {
        "" | "G" | "GB" | "GIB" => number,
        "T" | "TB" | "TIB" => number * 1024.0,
        "M" | "MB" | "MIB" => number / 1024.0,
        "P" | "PB" | "PIB" => number * 1024.0 * 1024.0,
        _ => 0.0,
    }
}

/// GB → TB, rounded to two decimals.
#[must_use]
pub fn gb_to_tb(gb: f64) -> f64 {
    (gb / 1024.0 * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cpu_cores() {
        assert_eq!(parse_cpu_cores(Some("16 cores")), 16);
        assert_eq!(parse_cpu_cores(Some("8")), 8);
        assert_eq!(parse_cpu_cores(Some("  4 vCPU")), 4);
        assert_eq!(parse_cpu_cores(Some("many")), 0);
        assert_eq!(parse_cpu_cores(Some("")), 0);
        assert_eq!(parse_cpu_cores(None), 0);
    }

    #[test]
    fn test_parse_capacity_gb() {
        assert_eq!(parse_capacity_gb(Some("64 GB")), 64.0);
        assert_eq!(parse_capacity_gb(Some("64")), 64.0);
        assert_eq!(parse_capacity_gb(Some("2 TB")), 2048.0);
        assert_eq!(parse_capacity_gb(Some("1.5TiB")), 1536.0);
        assert_eq!(parse_capacity_gb(Some("512 MB")), 0.5);
        assert_eq!(parse_capacity_gb(Some("lots")), 0.0);
        assert_eq!(parse_capacity_gb(Some("12 bananas")), 0.0);
        assert_eq!(parse_capacity_gb(None), 0.0);
    }

    #[test]
    fn test_gb_to_tb() {
        assert_eq!(gb_to_tb(1024.0), 1.0);
        assert_eq!(gb_to_tb(1536.0), 1.5);
        assert_eq!(gb_to_tb(100.0), 0.1);
        assert_eq!(gb_to_tb(0.0), 0.0);
    }
}
