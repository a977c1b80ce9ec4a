//! Text rendering of conversion results
//!
//! Numbers use fixed decimals with `,` thousands separators. The comparison
//! chart is a pair of horizontal bars scaled to the larger absolute value.

use unitconv_core::ConvertError;

const POSITIVE_FILL: char = '█';
const NEGATIVE_FILL: char = '▒';

/// Fixed-decimal rendering with thousands separators: 1234567.891 -> "1,234,567.8910"
pub fn format_grouped(value: f64, decimals: usize) -> String {
    let plain = format!("{:.*}", decimals, value);
    let (sign, digits) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain.as_str()),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

/// "1.0000 Kilometers = 1,000.0000 Meters"
pub fn result_line(value: f64, from_unit: &str, result: f64, to_unit: &str, decimals: usize) -> String {
    format!(
        "{} {} = {} {}",
        format_grouped(value, decimals),
        from_unit,
        format_grouped(result, decimals),
        to_unit
    )
}

/// Horizontal bar chart, one row per (label, value)
pub fn bar_chart(rows: &[(&str, f64)], width: usize, decimals: usize) -> String {
    let label_width = rows.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    let max_abs = rows.iter().map(|(_, v)| v.abs()).fold(0.0_f64, f64::max);

    let mut output = String::new();
    for (label, value) in rows {
        let cells = bar_cells(*value, max_abs, width);
        let fill = if *value < 0.0 { NEGATIVE_FILL } else { POSITIVE_FILL };
        let bar: String = std::iter::repeat(fill).take(cells).collect();
        let padding = " ".repeat(width - cells);
        let label_pad = " ".repeat(label_width - label.chars().count());

        output.push_str(&format!(
            "{}{} │{}{} {}\n",
            label, label_pad, bar, padding,
            format_grouped(*value, decimals)
        ));
    }
    output
}

/// "error [NOT_FOUND]: Unknown category: Imaginary (hint: ...)"
pub fn error_line(err: &ConvertError) -> String {
    match err.suggestion() {
        Some(hint) => format!("error [{}]: {} (hint: {})", err.code(), err, hint),
        None => format!("error [{}]: {}", err.code(), err),
    }
}

/// Cells for one bar; non-zero values always get at least one cell
fn bar_cells(value: f64, max_abs: f64, width: usize) -> usize {
    if value == 0.0 || max_abs == 0.0 {
        return 0;
    }
    let scaled = (value.abs() / max_abs * width as f64).round() as usize;
    scaled.clamp(1, width)
}
