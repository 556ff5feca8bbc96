use chrono::NaiveDateTime;

/// Header line expected by the ERP import job
pub const DUMP_HEADER: &str = "Peso\tFechaHora\n";

/// Minute resolution, e.g. `202610181530`
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M";

/// A weight paired with the moment it is dumped
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DumpRecord {
    pub weight: f64,
    pub captured_at: NaiveDateTime,
}

impl DumpRecord {
    pub fn new(weight: f64, captured_at: NaiveDateTime) -> Self {
        Self {
            weight,
            captured_at,
        }
    }

    pub fn timestamp(&self) -> String {
        self.captured_at.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Header plus data line. The data line has no trailing newline.
    pub fn render(&self) -> String {
        format!(
            "{}{}\t{}",
            DUMP_HEADER,
            format_weight(self.weight),
            self.timestamp()
        )
    }
}

/// Shortest round-trip form, integral weights keep one decimal (`120.0`).
///
/// Magnitudes of at least 1e16 or below 1e-4 switch to exponent form with a
/// signed, two-digit exponent (`1e+16`, `1.5e-05`).
pub fn format_weight(weight: f64) -> String {
    let magnitude = weight.abs();
    if weight.is_finite() && magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        return format_exponent(weight);
    }

    let s = weight.to_string();
    if weight.is_finite() && !s.contains('.') {
        format!("{s}.0")
    } else {
        s
    }
}

fn format_exponent(weight: f64) -> String {
    let s = format!("{weight:e}");
    match s.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => s,
    }
}

/// Parse a `YYYYMMDDHHmm` timestamp
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 18)
            .unwrap()
            .and_hms_opt(h, m, 42)
            .unwrap()
    }

    #[test]
    fn test_render_header_and_record() {
        let record = DumpRecord::new(543.21, at(9, 5));
        assert_eq!(record.render(), "Peso\tFechaHora\n543.21\t202610180905");
    }

    #[test]
    fn test_format_weight() {
        assert_eq!(format_weight(543.21), "543.21");
        assert_eq!(format_weight(120.0), "120.0");
        assert_eq!(format_weight(-0.5), "-0.5");
        assert_eq!(format_weight(0.0), "0.0");
    }

    #[test]
    fn test_format_weight_exponent_thresholds() {
        assert_eq!(format_weight(1e16), "1e+16");
        assert_eq!(format_weight(-2.5e20), "-2.5e+20");
        assert_eq!(format_weight(1e-5), "1e-05");
        assert_eq!(format_weight(1.5e-7), "1.5e-07");
        assert_eq!(format_weight(1.5e-300), "1.5e-300");
        assert_eq!(format_weight(9999999999999998.0), "9999999999999998.0");
        assert_eq!(format_weight(0.0001), "0.0001");
    }

    #[test]
    fn test_parse_timestamp_minute_resolution() {
        let ts = parse_timestamp("202610181530").unwrap();
        assert_eq!(ts.format(TIMESTAMP_FORMAT).to_string(), "202610181530");
        assert!(parse_timestamp("2026-10-18").is_err());
    }
}
