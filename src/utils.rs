use chrono::format::{Item, StrftimeItems};
use chrono::Local;

/// Significant digits used by `format_g`.
const G_PRECISION: usize = 6;

/// Renders non-finite values the way the reports show them.
fn non_finite(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some("NaN")
    } else if value == f64::INFINITY {
        Some("Infinity")
    } else if value == f64::NEG_INFINITY {
        Some("-Infinity")
    } else {
        None
    }
}

/// Decimal digits of a finite, non-negative value with the exponent of the first digit.
///
/// Starts from the shortest representation that round-trips, e.g. `100000.5` gives
/// `[1, 0, 0, 0, 0, 0, 5]` and `5`.
fn shortest_digits(value: f64) -> (Vec<u8>, i32) {
    let text = format!("{:e}", value);
    let (mantissa, exponent) = text.split_once('e').unwrap_or((text.as_str(), "0"));
    let digits = mantissa.bytes().filter(u8::is_ascii_digit).map(|b| b - b'0').collect();
    (digits, exponent.parse().unwrap_or(0))
}

/// Keeps `keep` significant digits, rounding half up. Pads with zeros when short.
fn round_half_up(digits: &mut Vec<u8>, exponent: &mut i32, keep: i32) {
    if keep < 0 {
        digits.clear();
        return;
    }
    let keep = keep as usize;
    if digits.len() > keep {
        let round_up = digits[keep] >= 5;
        digits.truncate(keep);
        if round_up {
            let mut carry = true;
            for digit in digits.iter_mut().rev() {
                if *digit == 9 {
                    *digit = 0;
                } else {
                    *digit += 1;
                    carry = false;
                    break;
                }
            }
            if carry {
                digits.insert(0, 1);
                digits.truncate(keep.max(1));
                *exponent += 1;
            }
        }
    }
    digits.resize(keep.max(digits.len()), 0);
}

/// Renders the digits positionally down to `decimals` places after the point.
fn positional(digits: &[u8], exponent: i32, decimals: i32) -> String {
    let mut text = String::new();
    for power in (-decimals..=exponent.max(0)).rev() {
        let digit = usize::try_from(exponent - power)
            .ok()
            .and_then(|i| digits.get(i))
            .copied()
            .unwrap_or(0);
        text.push(char::from(b'0' + digit));
        if power == 0 && decimals > 0 {
            text.push('.');
        }
    }
    text
}

fn sign(value: f64) -> &'static str {
    if value.is_sign_negative() {
        "-"
    } else {
        ""
    }
}

/// `%.Nf` style formatting, ties rounded half up.
pub fn format_fixed(value: f64, decimals: usize) -> String {
    if let Some(text) = non_finite(value) {
        return text.to_string();
    }

    let decimals = decimals as i32;
    let (mut digits, mut exponent) = shortest_digits(value.abs());
    let keep = exponent + 1 + decimals;
    round_half_up(&mut digits, &mut exponent, keep);
    format!("{}{}", sign(value), positional(&digits, exponent, decimals))
}

/// `%g` style formatting with 6 significant digits.
///
/// Ties round half up on the shortest decimal representation. Trailing zeros are kept.
/// Magnitudes that round into `[1e-4, 1e6)` are printed in decimal notation, everything
/// else as `d.ddddde±XX`.
pub fn format_g(value: f64) -> String {
    if let Some(text) = non_finite(value) {
        return text.to_string();
    }

    let precision = G_PRECISION as i32;
    let (mut digits, mut exponent) = shortest_digits(value.abs());
    round_half_up(&mut digits, &mut exponent, precision);

    if value == 0.0 || (-4..precision).contains(&exponent) {
        let decimals = precision - 1 - exponent;
        format!("{}{}", sign(value), positional(&digits, exponent, decimals))
    } else {
        let mantissa = positional(&digits, 0, precision - 1);
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        format!("{}{}e{}{:02}", sign(value), mantissa, exp_sign, exponent.abs())
    }
}

/// Checks that a strftime pattern only contains known specifiers.
pub fn is_valid_stamp_format(format: &str) -> bool {
    !format.is_empty() && StrftimeItems::new(format).all(|item| !matches!(item, Item::Error))
}

/// File name stem for an export, e.g. `2024_05_01_13_45_10_123`.
pub fn export_file_stem(format: &str) -> String {
    Local::now().format(format).to_string()
}
