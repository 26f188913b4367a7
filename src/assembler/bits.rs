//! Bit-level layout of Baby machine words.
//!
//! Every value the assembler emits is written least significant
//! bit first. Signed values are *not* two's complement: the magnitude
//! is written out, zero padded, and a single sign flag is appended
//! as the last bit of the field.

use std::fmt;

/// Number of bits in a machine word.
pub const WORD_BITS: usize = 32;

/// Width of the address/operand field, bits [0, 5).
pub const ADDRESS_BITS: usize = 5;

/// Width of the opcode field.
pub const OPCODE_BITS: usize = 5;

/// First bit of the opcode field, bits [13, 18).
pub const OPCODE_SHIFT: usize = 13;

/// Format `value` as an LSB-first bit sequence for a field `width` bits wide.
///
/// The magnitude is emitted until exhausted and zero padded to `width - 1`
/// bits. A final sign bit is appended only when the sequence is then exactly
/// `width - 1` long: `true` for negative values, `false` otherwise.
///
/// A magnitude that needs `width` bits or more gets no sign bit at all, and
/// the returned sequence may be longer than `width`. Callers that place the
/// result in a fixed field only take its first `width` bits.
pub fn to_bits(value: i64, width: usize) -> Vec<bool> {
    let mut magnitude = value.unsigned_abs();
    let mut bits = Vec::with_capacity(width.max(1));

    while magnitude != 0 {
        bits.push(magnitude & 1 == 1);
        magnitude >>= 1;
    }

    let body = width.saturating_sub(1);
    while bits.len() < body {
        bits.push(false);
    }

    if bits.len() == body {
        bits.push(value < 0);
    }

    bits
}

/// A single 32-bit machine word. Bit `n` of the inner value is bit
/// index `n` of the word, so bit 0 is printed first.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct Word(u32);

impl Word {
    /// A word holding the literal encoding of `value` at full word width.
    pub fn literal(value: i32) -> Self {
        Word::from_bits(&to_bits(value as i64, WORD_BITS))
    }

    /// Pack the first 32 bits of an LSB-first sequence.
    pub fn from_bits(bits: &[bool]) -> Self {
        let raw = bits
            .iter()
            .take(WORD_BITS)
            .enumerate()
            .fold(0u32, |acc, (i, &bit)| acc | ((bit as u32) << i));
        Word(raw)
    }

    /// Place the first `width` bits of `bits` at `offset`, replacing
    /// whatever was there.
    pub fn with_field(self, offset: usize, width: usize, bits: &[bool]) -> Self {
        let mut raw = self.0;
        for i in 0..width {
            let mask = 1u32 << (offset + i);
            if bits.get(i).copied().unwrap_or(false) {
                raw |= mask;
            } else {
                raw &= !mask;
            }
        }
        Word(raw)
    }

    /// Read `width` bits starting at `offset` as an unsigned value.
    pub fn field(&self, offset: usize, width: usize) -> u32 {
        (self.0 >> offset) & ((1u32 << width) - 1)
    }

    pub fn bit(&self, index: usize) -> bool {
        (self.0 >> index) & 1 == 1
    }

    pub fn to_u32(&self) -> u32 {
        self.0
    }
}

impl From<u32> for Word {
    fn from(raw: u32) -> Self {
        Word(raw)
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for i in 0..WORD_BITS {
            f.write_str(if self.bit(i) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Decode a field written by `to_bits`: the last bit is the sign,
    /// everything before it is the LSB-first magnitude.
    fn decode(bits: &[bool]) -> i64 {
        match bits.split_last() {
            None => 0,
            Some((&sign, body)) => {
                let magnitude = body
                    .iter()
                    .rev()
                    .fold(0i64, |acc, &bit| (acc << 1) | bit as i64);
                if sign { -magnitude } else { magnitude }
            }
        }
    }

    fn render(bits: &[bool]) -> String {
        bits.iter().map(|&b| if b { '1' } else { '0' }).collect()
    }

    #[test]
    fn test_to_bits_positive() {
        assert_eq!(render(&to_bits(0, 5)), "00000");
        assert_eq!(render(&to_bits(1, 5)), "10000");
        assert_eq!(render(&to_bits(2, 5)), "01000");
        assert_eq!(render(&to_bits(6, 5)), "01100");
        assert_eq!(render(&to_bits(15, 5)), "11110");
    }

    #[test]
    fn test_to_bits_negative() {
        assert_eq!(render(&to_bits(-1, 5)), "10001");
        assert_eq!(render(&to_bits(-6, 5)), "01101");
        assert_eq!(render(&to_bits(-15, 5)), "11111");
    }

    #[test]
    fn test_to_bits_word_width() {
        let bits = to_bits(10, WORD_BITS);
        assert_eq!(bits.len(), WORD_BITS);
        assert_eq!(render(&bits), format!("0101{}", "0".repeat(28)));

        let bits = to_bits(-10, WORD_BITS);
        assert_eq!(bits.len(), WORD_BITS);
        assert_eq!(render(&bits), format!("0101{}1", "0".repeat(27)));
    }

    #[test]
    fn test_round_trip() {
        for w in &[5usize, 8, 32] {
            let limit = 1i64 << (w - 1);
            for value in &[0, 1, 3, limit / 2, limit - 1] {
                assert_eq!(decode(&to_bits(*value, *w)), *value);
                if *value != 0 {
                    let bits = to_bits(-*value, *w);
                    assert_eq!(bits.len(), *w);
                    assert!(bits[w - 1]);
                    assert_eq!(decode(&bits), -*value);
                }
            }
        }
    }

    #[test]
    fn test_to_bits_overflow_is_not_detected() {
        // A magnitude filling the whole field gets no sign bit, so +16 and
        // -16 format identically at width 5.
        assert_eq!(render(&to_bits(16, 5)), "00001");
        assert_eq!(render(&to_bits(-16, 5)), "00001");
        assert_eq!(render(&to_bits(31, 5)), "11111");

        // Past the field width the sequence simply grows.
        assert_eq!(render(&to_bits(40, 5)), "000101");
        assert_eq!(to_bits(-40, 5).len(), 6);
        assert_eq!(to_bits(i32::MIN as i64, WORD_BITS).len(), WORD_BITS);
    }

    #[test]
    fn test_word_literal() {
        assert_eq!(Word::literal(10).to_u32(), 10);
        assert_eq!(Word::literal(-10).to_u32(), 0x8000_000A);
        assert_eq!(Word::literal(0).to_u32(), 0);
        assert_eq!(Word::literal(i32::MAX).to_u32(), 0x7FFF_FFFF);
        assert_eq!(Word::literal(i32::MIN).to_u32(), 0x8000_0000);
    }

    #[test]
    fn test_word_fields() {
        let w = Word::default()
            .with_field(OPCODE_SHIFT, OPCODE_BITS, &to_bits(14, OPCODE_BITS))
            .with_field(0, ADDRESS_BITS, &to_bits(2, ADDRESS_BITS));
        assert_eq!(w.field(OPCODE_SHIFT, OPCODE_BITS), 14);
        assert_eq!(w.field(0, ADDRESS_BITS), 2);
        assert_eq!(w.to_u32(), (14 << 13) | 2);

        // Only the first `width` bits of an over-long sequence are used.
        let w = Word::default().with_field(0, ADDRESS_BITS, &to_bits(40, ADDRESS_BITS));
        assert_eq!(w.field(0, ADDRESS_BITS), 8);
    }

    #[test]
    fn test_word_display() {
        assert_eq!(Word::from(1).to_string(), format!("1{}", "0".repeat(31)));
        assert_eq!(Word::literal(-1).to_string(), format!("1{}1", "0".repeat(30)));
        assert_eq!(Word::default().to_string().len(), WORD_BITS);
    }
}
