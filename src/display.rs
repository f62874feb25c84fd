//! Display formatting for results, the constant table and trace dumps

use crate::lexer::Operator;
use crate::table::{Constant, Function};

const HEX_BYTES_PER_LINE: usize = 16;
/// Width of the hex column: two digits and a separator per byte, plus the
/// mid-line gap and some padding before the ASCII column
const HEX_COLUMN_WIDTH: usize = 3 * HEX_BYTES_PER_LINE + 1 + 4;

/// Format an evaluation result for the terminal.
///
/// Integral values are shown in base 10 and base 16 (the hex digits are the
/// two's-complement bits of the truncated `i64`); anything else, including
/// `inf` and `NaN`, with ten fractional digits.
pub fn format_result(value: f64) -> String {
    if value.is_finite() && value == value.floor() {
        let whole = value as i64;
        format!("Base 10: {}\nBase 16: {:X}", whole, whole)
    } else {
        format!("{:.10}", value)
    }
}

/// The `-c` listing of built-in constants and functions
pub fn format_constants() -> String {
    let mut out = String::new();
    for c in Constant::ALL {
        out.push_str(&format!(
            "\t{:<6}\t{:<15.10}\t{}\n",
            c.name(),
            c.value(),
            c.description()
        ));
    }
    out.push('\n');
    for f in Function::ALL {
        let call = format!("{}()", f.name());
        out.push_str(&format!("\t{:<7}\t{}\n", call, f.description()));
    }
    out.push('\n');
    out
}

/// The operator section of the usage text
pub fn format_operators() -> String {
    let mut out = String::from("Supported operators:\n\n");
    for op in Operator::ALL {
        out.push_str(&format!("\t{} - {}\n", op.symbol(), op.description()));
    }
    out
}

/// Hex dump of `bytes`, 16 per line with an ASCII column.
///
/// Only graphic ASCII is shown in the ASCII column; everything else,
/// including space, is shown as `.`.
pub fn hex_dump(bytes: &[u8]) -> String {
    let mut out = String::new();
    for line in bytes.chunks(HEX_BYTES_PER_LINE) {
        let mut hex_col = String::with_capacity(HEX_COLUMN_WIDTH);
        for (i, byte) in line.iter().enumerate() {
            if i > 0 {
                hex_col.push(' ');
            }
            if i == HEX_BYTES_PER_LINE / 2 {
                hex_col.push(' ');
            }
            hex_col.push_str(&hex::encode_upper([*byte]));
        }

        let ascii_col: String = line
            .iter()
            .map(|&b| if b.is_ascii_graphic() { b as char } else { '.' })
            .collect();

        out.push_str(&format!(
            "{:<hw$}|{:<aw$}|\n",
            hex_col,
            ascii_col,
            hw = HEX_COLUMN_WIDTH,
            aw = HEX_BYTES_PER_LINE
        ));
    }
    out
}
