//! Number formatting for labels and metrics.

/// Group the integer part with commas: `1500000.4` -> `1,500,000`.
pub fn thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    if rounded < 0.0 {
        format!("-{out}")
    } else {
        out
    }
}

/// Rupiah amount as shown on the dashboard: `Rp 1,500,000`.
pub fn rupiah(value: f64) -> String {
    format!("Rp {}", thousands(value))
}

/// Liters with grouping: `12,500 L`.
pub fn liters(value: f64) -> String {
    format!("{} L", thousands(value))
}
