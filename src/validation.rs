/// Required length of a reportable mint address, in characters.
pub const REPORT_ADDRESS_LEN: usize = 44;

/// Suffix shared by pump.fun mint addresses.
pub const REPORT_ADDRESS_SUFFIX: &str = "pump";

/// Checks whether `address` may be submitted as a report.
///
/// The address must be exactly [`REPORT_ADDRESS_LEN`] characters long and end
/// with [`REPORT_ADDRESS_SUFFIX`]. Surrounding whitespace is not trimmed here;
/// callers trim user input before validating.
pub fn is_valid_report_address(address: &str) -> bool {
    address.chars().count() == REPORT_ADDRESS_LEN && address.ends_with(REPORT_ADDRESS_SUFFIX)
}

/// User-facing explanation for a rejected address.
pub fn rejection_message() -> String {
    format!(
        "Invalid mint address. Ensure it is {} characters long and ends with '{}'.",
        REPORT_ADDRESS_LEN, REPORT_ADDRESS_SUFFIX
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "4cRkQ2dntpusYag6Zmvco8T78WxK9Jqh1eEZJox8pump";

    #[test]
    fn accepts_pump_address() {
        assert_eq!(VALID.len(), 44);
        assert!(is_valid_report_address(VALID));
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(!is_valid_report_address(&VALID[1..]));
        assert!(!is_valid_report_address(&format!("x{}", VALID)));
        assert!(!is_valid_report_address("pump"));
        assert!(!is_valid_report_address(""));
    }

    #[test]
    fn rejects_wrong_suffix() {
        let no_suffix = format!("{}abcd", &VALID[..40]);
        assert_eq!(no_suffix.len(), 44);
        assert!(!is_valid_report_address(&no_suffix));
        assert!(!is_valid_report_address(&VALID.replace("pump", "PUMP")));
    }

    #[test]
    fn does_not_trim() {
        assert!(!is_valid_report_address(&format!(" {}", VALID)));
        assert!(!is_valid_report_address(&format!("{} ", &VALID[1..])));
    }
}
