use std::fmt;

const BYTE_MOD_MASK: usize = 7;
const BYTE_SHIFT: usize = 3;

/// Growable bit array stored LSB-first within each byte. This is the on-disk
/// layout of a heap page header.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BitSet {
    bytes: Vec<u8>,
}

impl BitSet {
    /// A zeroed set able to hold `num_bits` bits.
    pub fn new(num_bits: usize) -> Self {
        Self {
            bytes: vec![0; Self::bytes_for(num_bits)],
        }
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn bytes_for(num_bits: usize) -> usize {
        (num_bits + BYTE_MOD_MASK) >> BYTE_SHIFT
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len() * 8
    }

    /// Bits past the end read as unset.
    pub fn get(&self, i: usize) -> bool {
        self.bytes
            .get(i >> BYTE_SHIFT)
            .is_some_and(|byte| byte & (1 << (i & BYTE_MOD_MASK)) != 0)
    }

    /// Panics if `i` is past the capacity.
    pub fn set(&mut self, i: usize) {
        self.bytes[i >> BYTE_SHIFT] |= 1 << (i & BYTE_MOD_MASK);
    }

    /// Panics if `i` is past the capacity.
    pub fn unset(&mut self, i: usize) {
        self.bytes[i >> BYTE_SHIFT] &= !(1 << (i & BYTE_MOD_MASK));
    }

    pub fn set_bool(&mut self, i: usize, value: bool) {
        if value {
            self.set(i);
        } else {
            self.unset(i);
        }
    }

    /// Makes room for at least `num_bits` bits. Never shrinks.
    pub fn grow(&mut self, num_bits: usize) {
        let target = Self::bytes_for(num_bits);
        if target > self.bytes.len() {
            self.bytes.resize(target, 0);
        }
    }

    pub fn count_ones(&self) -> usize {
        self.bytes.iter().map(|b| b.count_ones() as usize).sum()
    }
}

impl fmt::Display for BitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut bits = String::with_capacity(self.capacity() + self.bytes.len());
        for i in 0..self.capacity() {
            if i > 0 && i % 8 == 0 {
                bits.push(' ');
            }
            bits.push(if self.get(i) { '1' } else { '0' });
        }
        let raw: Vec<String> = self.bytes.iter().map(|b| b.to_string()).collect();
        write!(f, "[{}] bit({})", raw.join(" "), bits)
    }
}
