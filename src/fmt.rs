/// Insert thousands separators into a run of ASCII digits.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Dollar amount with separators: $1,234.56
pub fn money(val: f64) -> String {
    let fixed = format!("{:.2}", val.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if val < 0.0 { "-" } else { "" };
    format!("{sign}${}.{cents}", group_thousands(whole))
}

/// Whole count with separators: 3,900
pub fn number(n: usize) -> String {
    group_thousands(&n.to_string())
}

/// Format a chart measure: counts as integers, currency as money.
pub fn measure(val: f64, currency: bool) -> String {
    if currency {
        money(val)
    } else {
        number(val.round().max(0.0) as usize)
    }
}

/// Compact axis label: $950, $2.5k, $12k, $1.2M.
pub fn compact(val: f64) -> String {
    let (scaled, suffix) = if val >= 1_000_000.0 {
        (val / 1_000_000.0, "M")
    } else if val >= 1000.0 {
        (val / 1000.0, "k")
    } else {
        return format!("${}", val.round() as u64);
    };
    if scaled.fract() == 0.0 {
        format!("${}{suffix}", scaled as u64)
    } else {
        format!("${scaled:.1}{suffix}")
    }
}
