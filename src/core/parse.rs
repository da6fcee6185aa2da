/// Best-effort conversion of free-form user text into a number.
///
/// Keeps digits, commas, periods, and minus signs; everything else is
/// stripped. The last comma or period is the decimal separator and all
/// earlier ones are thousands separators. Anything unparseable yields `0.0`.
pub fn parse_amount(text: &str) -> f64 {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();
    if cleaned.is_empty() {
        return 0.0;
    }

    let parsed = match cleaned.rfind([',', '.']) {
        Some(separator) => {
            let integer: String = cleaned[..separator]
                .chars()
                .filter(|c| !matches!(c, ',' | '.'))
                .collect();
            let fraction = &cleaned[separator + 1..];
            format!("{integer}.{fraction}").parse::<f64>()
        }
        None => cleaned.parse::<f64>(),
    };

    match parsed {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}
