use super::error::FormulaValue;

/// Significant digits shown for a cell value.
pub const DISPLAY_PRECISION: usize = 6;

/// Format a number for display.
///
/// Uses general notation with [`DISPLAY_PRECISION`] significant digits:
/// fixed notation for moderate magnitudes, scientific (`1.5e+07`) otherwise,
/// with trailing zeros dropped. Formula text is printed separately in
/// round-trip form.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return n.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    // Rounding to the display precision can carry into the next power of ten,
    // so take the exponent from the rounded scientific form.
    let sci = format!("{:.*e}", DISPLAY_PRECISION - 1, n);
    let Some((mantissa, exponent)) = sci.split_once('e') else {
        return sci;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= DISPLAY_PRECISION as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{sign}{:02}",
            trim_fraction(mantissa),
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (DISPLAY_PRECISION as i32 - 1 - exponent) as usize;
        trim_fraction(&format!("{n:.decimals$}")).to_string()
    }
}

fn trim_fraction(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}

/// Format an evaluation result for display: the number, or the error tag.
pub fn format_value(value: &FormulaValue) -> String {
    match value {
        Ok(n) => format_number(*n),
        Err(e) => e.to_string(),
    }
}
