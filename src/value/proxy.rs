//! Language-native result of decoding a value, and its display form.

use crate::encoding::{RawValue, RegexpOptions};

/// The structured result of recursively interpreting a decoded value.
///
/// This is what callers wanting data instead of text receive; the display string
/// is a secondary rendering of the same traversal, produced by the `Display`
/// implementation below. Exact punctuation of that rendering is part of the
/// crate's contract (`{'a' => 1}`, `:sym`, `<VALUE at remote 0x...>`).
#[derive(Debug, Clone, PartialEq)]
pub enum ProxyValue {
    /// `nil`
    Nil,
    /// `true` or `false`
    Bool(bool),
    /// Fixnum payload
    Int(i64),
    /// Float payload (immediate or boxed)
    Float(f64),
    /// String payload
    Str(String),
    /// Resolved symbol name, without the leading `:`
    Symbol(String),
    /// Regular expression source and option bits
    Regexp {
        /// The pattern source text
        source: String,
        /// Decoded option flags
        options: RegexpOptions,
    },
    /// Array elements, in order
    Seq(Vec<ProxyValue>),
    /// Hash entries, in table order
    Map(Vec<(ProxyValue, ProxyValue)>),
    /// Exact fraction: numerator and denominator
    Rational(Box<ProxyValue>, Box<ProxyValue>),
    /// Complex number: real and imaginary parts
    Complex(Box<ProxyValue>, Box<ProxyValue>),
    /// Placeholder substituted where the traversal re-entered a visited value
    Cycle(&'static str),
    /// A value with no structural decoding; carries its target address
    Opaque {
        /// Target address of the value word
        address: u64,
    },
}

impl ProxyValue {
    /// Opaque placeholder for a raw value.
    #[must_use]
    pub fn opaque(raw: RawValue) -> ProxyValue {
        ProxyValue::Opaque {
            address: raw.address(),
        }
    }
}

impl std::fmt::Display for ProxyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProxyValue::Nil => write!(f, "nil"),
            ProxyValue::Bool(true) => write!(f, "true"),
            ProxyValue::Bool(false) => write!(f, "false"),
            ProxyValue::Int(n) => write!(f, "{n}"),
            ProxyValue::Float(d) => write!(f, "{}", format_float(*d)),
            ProxyValue::Str(s) => write!(f, "{}", quote_single(s)),
            ProxyValue::Symbol(name) => write!(f, ":{name}"),
            ProxyValue::Regexp { source, options } => {
                // A pattern containing the usual delimiter switches to the
                // bracketed literal form.
                let (open, close) = if source.contains('/') {
                    ("%r{", "}")
                } else {
                    ("/", "/")
                };
                write!(f, "{open}{source}{close}")?;
                if options.contains(RegexpOptions::IGNORECASE) {
                    write!(f, "i")?;
                }
                if options.contains(RegexpOptions::EXTEND) {
                    write!(f, "x")?;
                }
                if options.contains(RegexpOptions::MULTILINE) {
                    write!(f, "m")?;
                }
                Ok(())
            }
            ProxyValue::Seq(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            ProxyValue::Map(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key} => {value}")?;
                }
                write!(f, "}}")
            }
            ProxyValue::Rational(num, den) => write!(f, "({num}/{den})"),
            ProxyValue::Complex(real, imag) => {
                let imag = imag.to_string();
                if imag.starts_with('-') {
                    write!(f, "({real}{imag}i)")
                } else {
                    write!(f, "({real}+{imag}i)")
                }
            }
            ProxyValue::Cycle(placeholder) => write!(f, "{placeholder}"),
            ProxyValue::Opaque { address } => {
                write!(f, "<VALUE at remote {address:#x}>")
            }
        }
    }
}

/// Format a float so integral values keep a trailing `.0` while everything else
/// uses the shortest round-trip form (`0.0`, `1.1`, `1e300`).
fn format_float(d: f64) -> String {
    if d.is_finite() && d == d.trunc() && d.abs() < 1e16 {
        format!("{d:.1}")
    } else {
        format!("{d}")
    }
}

/// Single-quoted string literal with escapes for the quote, backslash and
/// non-printable bytes.
fn quote_single(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}
