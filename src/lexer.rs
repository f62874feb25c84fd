//! Lexical layer for ecalc
//!
//! Expressions reach the evaluator with whitespace already removed, so the
//! lexer never tokenizes a whole string up front. Instead the evaluator asks
//! it, at each cursor position, what kind of lexeme starts there and how far
//! that lexeme extends.
//!
//! All lexeme boundaries fall on ASCII characters, so byte offsets returned
//! here are always valid `str` slice positions.

use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{anychar, char, digit0, digit1, hex_digit0, one_of},
    combinator::{map_opt, opt, recognize},
    error::{Error, ErrorKind},
    sequence::{pair, preceded, tuple},
    IResult,
};

/// Binary operators, in the order they appear in usage text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Pow, // ^
    Mul, // *
    Div, // /
    Rem, // %
    Add, // +
    Sub, // -
}

impl Operator {
    pub const ALL: [Operator; 6] = [
        Operator::Pow,
        Operator::Mul,
        Operator::Div,
        Operator::Rem,
        Operator::Add,
        Operator::Sub,
    ];

    pub fn from_char(c: char) -> Option<Operator> {
        match c {
            '^' => Some(Operator::Pow),
            '*' => Some(Operator::Mul),
            '/' => Some(Operator::Div),
            '%' => Some(Operator::Rem),
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Sub),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Operator::Pow => '^',
            Operator::Mul => '*',
            Operator::Div => '/',
            Operator::Rem => '%',
            Operator::Add => '+',
            Operator::Sub => '-',
        }
    }

    /// Apply the operator with IEEE semantics (no divide-by-zero check)
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Operator::Pow => lhs.powf(rhs),
            Operator::Mul => lhs * rhs,
            Operator::Div => lhs / rhs,
            // `%` on f64 is fmod: the result takes the sign of the dividend
            Operator::Rem => lhs % rhs,
            Operator::Add => lhs + rhs,
            Operator::Sub => lhs - rhs,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Operator::Pow => "Exponent",
            Operator::Mul => "Multiply",
            Operator::Div => "Divide",
            Operator::Rem => "Modulus",
            Operator::Add => "Addition",
            Operator::Sub => "Subtraction",
        }
    }
}

/// What kind of lexeme starts at a cursor position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lexeme {
    /// Lower-case letters: a constant, or a function when `(` follows
    Identifier,
    /// `(`: a parenthesized subexpression
    Group,
    /// Digits, `.`, `x`/`X` or `-`: a numeric literal
    Number,
    /// Anything else
    Unknown,
}

/// A numeric literal converted at a cursor position.
///
/// `len` is the number of bytes consumed. A zero `len` means no literal
/// converted at the cursor; `value` is then 0.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Literal {
    pub value: f64,
    pub len: usize,
}

impl Literal {
    const EMPTY: Literal = Literal { value: 0.0, len: 0 };
}

pub fn is_identifier_char(c: char) -> bool {
    c.is_ascii_lowercase()
}

pub fn is_numeric_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | 'x' | 'X' | '-')
}

pub fn is_operator_char(c: char) -> bool {
    Operator::from_char(c).is_some()
}

/// Decide the lexeme class at the start of `input`.
///
/// Letters win over the numeric charset, so a lower-case `x` always starts
/// an identifier while `X` starts a number.
pub fn classify(input: &str) -> Lexeme {
    match input.chars().next() {
        Some(c) if is_identifier_char(c) => Lexeme::Identifier,
        Some('(') => Lexeme::Group,
        Some(c) if is_numeric_char(c) => Lexeme::Number,
        _ => Lexeme::Unknown,
    }
}

/// Parse an identifier: a run of lower-case ASCII letters
pub fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(is_identifier_char)(input)
}

/// Parse a binary operator
pub fn operator(input: &str) -> IResult<&str, Operator> {
    map_opt(anychar, Operator::from_char)(input)
}

/// Parse the contiguous run of numeric-charset characters
fn numeric_run(input: &str) -> IResult<&str, &str> {
    take_while1(is_numeric_char)(input)
}

/// Find the byte offset of the `)` matching the `(` at `open`.
///
/// Returns `None` when the nesting level never returns to zero.
pub fn matching_paren(expr: &str, open: usize) -> Option<usize> {
    let mut level = 0usize;
    for (offset, byte) in expr.bytes().enumerate().skip(open) {
        match byte {
            b'(' => level += 1,
            b')' => {
                level = level.saturating_sub(1);
                if level == 0 {
                    return Some(offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Convert the numeric literal at the start of `input`.
///
/// The numeric run decides the literal's flavor: a run containing `.` is a
/// floating-point literal, anything else an integer with automatic base
/// detection. A trailing `-` on the run is not part of the literal; it is
/// left in place so the evaluator binds it as the next operator.
///
/// Conversion itself takes the longest valid prefix of `input`, which may
/// stop inside the run (`5-3` converts `5`) or extend past it (`0xff`
/// converts all four characters although `f` is outside the charset).
pub fn scan_number(input: &str) -> Literal {
    let run = numeric_run(input).map(|(_, run)| run).unwrap_or("");
    let run = run.strip_suffix('-').unwrap_or(run);

    if run.contains('.') {
        parse_float(input)
    } else {
        parse_integer(input)
    }
}

/// Integer conversion with automatic base detection.
///
/// `0x`/`0X` followed by a hex digit selects base 16, a leading `0` selects
/// base 8, anything else base 10. Values saturate at the i64 range.
fn parse_integer(input: &str) -> Literal {
    let bytes = input.as_bytes();
    let (negative, sign_len) = match bytes.first() {
        Some(b'-') => (true, 1),
        Some(b'+') => (false, 1),
        _ => (false, 0),
    };

    let digits = &bytes[sign_len..];
    let (radix, prefix_len) = if has_hex_prefix(digits) {
        (16, 2)
    } else if digits.first() == Some(&b'0') {
        (8, 0)
    } else {
        (10, 0)
    };

    let digits = &digits[prefix_len..];
    let count = digits
        .iter()
        .take_while(|b| char::from(**b).is_digit(radix))
        .count();
    if count == 0 {
        return Literal::EMPTY;
    }

    // Capped one bit past i64 so the accumulator can't overflow
    const CAP: u128 = 1 << 64;
    let magnitude = digits[..count].iter().fold(0u128, |acc, b| {
        let digit = char::from(*b).to_digit(radix).unwrap_or(0);
        (acc * u128::from(radix) + u128::from(digit)).min(CAP)
    });

    let signed = if negative {
        -(magnitude as i128)
    } else {
        magnitude as i128
    };
    let value = signed.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64;

    Literal {
        value: value as f64,
        len: sign_len + prefix_len + count,
    }
}

fn has_hex_prefix(bytes: &[u8]) -> bool {
    matches!(bytes, [b'0', b'x' | b'X', d, ..] if d.is_ascii_hexdigit())
}

/// Floating-point conversion: decimal or hexadecimal form, optional sign
fn parse_float(input: &str) -> Literal {
    let (body, negative) = match input.as_bytes().first() {
        Some(b'-') => (&input[1..], true),
        Some(b'+') => (&input[1..], false),
        _ => (input, false),
    };

    let converted = hex_float(body).ok().or_else(|| {
        decimal_float(body)
            .ok()
            .and_then(|(rest, text)| text.parse::<f64>().ok().map(|v| (rest, v)))
    });

    match converted {
        Some((rest, value)) => Literal {
            value: if negative { -value } else { value },
            len: input.len() - rest.len(),
        },
        None => Literal::EMPTY,
    }
}

/// Parse a decimal float: `digits[.digits]` or `.digits`, optional exponent
fn decimal_float(input: &str) -> IResult<&str, &str> {
    let mantissa = alt((
        recognize(pair(digit1, opt(pair(char('.'), digit0)))),
        recognize(pair(char('.'), digit1)),
    ));
    let exponent = recognize(tuple((one_of("eE"), opt(one_of("+-")), digit1)));
    recognize(pair(mantissa, opt(exponent)))(input)
}

/// Parse a hexadecimal float: `0x` mantissa with optional binary exponent
fn hex_float(input: &str) -> IResult<&str, f64> {
    let (rest, _) = pair(char('0'), one_of("xX"))(input)?;
    let (rest, whole) = hex_digit0(rest)?;
    let (rest, fraction) = opt(preceded(char('.'), hex_digit0))(rest)?;
    let fraction = fraction.unwrap_or("");
    if whole.is_empty() && fraction.is_empty() {
        return Err(nom::Err::Error(Error::new(input, ErrorKind::HexDigit)));
    }
    let (rest, exponent) = opt(preceded(
        one_of("pP"),
        recognize(pair(opt(one_of("+-")), digit1)),
    ))(rest)?;

    // At most 64 significant bits; dropped digits only shift the exponent
    // and feed the sticky bit, leaving a single rounding in the cast.
    let mut mantissa = 0u64;
    let mut scale = 0i32;
    let mut sticky = false;
    let digits = whole
        .chars()
        .map(|c| (c, false))
        .chain(fraction.chars().map(|c| (c, true)));
    for (c, fractional) in digits {
        let digit = u64::from(c.to_digit(16).unwrap_or(0));
        if mantissa >> 60 == 0 {
            mantissa = mantissa * 16 + digit;
            if fractional {
                scale = scale.saturating_sub(4);
            }
        } else {
            sticky |= digit != 0;
            if !fractional {
                scale = scale.saturating_add(4);
            }
        }
    }
    if sticky {
        mantissa |= 1;
    }

    let exponent = exponent.map_or(0, |e| {
        e.parse::<i32>()
            .unwrap_or(if e.starts_with('-') { i32::MIN } else { i32::MAX })
    });
    // Past this range the result is already zero or infinite
    let scale = scale.saturating_add(exponent).clamp(-2200, 2200);

    Ok((rest, scale_by_pow2(mantissa as f64, scale)))
}

/// `value * 2^exp` without the intermediate power overflowing
fn scale_by_pow2(mut value: f64, mut exp: i32) -> f64 {
    while exp > 1000 {
        value *= 2f64.powi(1000);
        exp -= 1000;
    }
    while exp < -1000 {
        value *= 2f64.powi(-1000);
        exp += 1000;
    }
    value * 2f64.powi(exp)
}
