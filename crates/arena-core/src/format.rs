/// Whole-dollar amount with thousands separators, e.g. `$1,234,567`.
pub fn format_money(x: f64) -> String {
    if !x.is_finite() {
        return format!("${x}");
    }
    let rounded = format!("{:.0}", x);
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rounded.as_str()),
    };
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("${sign}{grouped}")
}

/// Fraction as a percentage with one decimal place; `–` when not finite.
pub fn format_pct(x: f64) -> String {
    if !x.is_finite() {
        return "–".to_string();
    }
    format!("{:.1}%", x * 100.0)
}
