use std::iter::once;

use crate::{
    data_stack::OpcodeData,
    opcodes::{codes::*, OP_1_NEGATE_VAL, OP_DATA_MAX_VAL, OP_DATA_MIN_VAL, OP_SMALL_INT_MAX_VAL},
    MAX_SCRIPTS_SIZE, MAX_SCRIPT_ELEMENT_SIZE,
};
use thiserror::Error;

/// Initial allocation of the backing vector, sized to fit the vast majority
/// of scripts without regrowing.
const DEFAULT_SCRIPT_ALLOC: usize = 512;

#[derive(Error, PartialEq, Eq, Debug, Clone, Copy)]
pub enum ScriptBuilderError {
    #[error("adding opcode {0} would exceed the maximum allowed canonical script length of {MAX_SCRIPTS_SIZE}")]
    OpCodeRejected(u8),

    #[error("adding {0} opcodes would exceed the maximum allowed canonical script length of {MAX_SCRIPTS_SIZE}")]
    OpCodesRejected(usize),

    #[error("adding {0} bytes of data would exceed the maximum allowed canonical script length of {MAX_SCRIPTS_SIZE}")]
    DataRejected(usize),

    #[error("adding a data element of {0} bytes exceed the maximum allowed script element size of {MAX_SCRIPT_ELEMENT_SIZE}")]
    ElementExceedsMaxSize(usize),

    #[error("adding integer {0} would exceed the maximum allowed canonical script length of {MAX_SCRIPTS_SIZE}")]
    IntegerRejected(i64),
}
pub type ScriptBuilderResult<T> = std::result::Result<T, ScriptBuilderError>;

/// A builder of custom scripts with canonical push encoding.
///
/// Data pushes pick the shortest encoding for their payload (small-int
/// opcodes, `OpData1..75`, then the `OpPushData` family), and any push that
/// would exceed the script engine limits is rejected without modifying the
/// script, since the result could never execute.
pub struct ScriptBuilder {
    script: Vec<u8>,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self { script: Vec::with_capacity(DEFAULT_SCRIPT_ALLOC) }
    }

    pub fn script(&self) -> &[u8] {
        &self.script
    }

    /// Takes the built script. The builder is not meant to be reused afterwards.
    pub fn drain(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.script)
    }

    /// Appends a single opcode, unless it would push the script over the
    /// maximum canonical script length.
    pub fn add_op(&mut self, opcode: u8) -> ScriptBuilderResult<&mut Self> {
        if self.script.len() >= MAX_SCRIPTS_SIZE {
            return Err(ScriptBuilderError::OpCodeRejected(opcode));
        }

        self.script.push(opcode);
        Ok(self)
    }

    /// Appends a sequence of opcodes, unless they would push the script over
    /// the maximum canonical script length.
    pub fn add_ops(&mut self, opcodes: &[u8]) -> ScriptBuilderResult<&mut Self> {
        if self.script.len() + opcodes.len() > MAX_SCRIPTS_SIZE {
            return Err(ScriptBuilderError::OpCodesRejected(opcodes.len()));
        }

        self.script.extend_from_slice(opcodes);
        Ok(self)
    }

    /// Returns the number of bytes the canonical encoding of the data will take.
    pub fn canonical_data_size(data: &[u8]) -> usize {
        match data {
            // A single opcode stands for the empty push, small integers and minus one
            [] => 1,
            [b] if *b <= OP_SMALL_INT_MAX_VAL || *b == OP_1_NEGATE_VAL => 1,
            _ => {
                data.len()
                    + match data.len() {
                        len if len <= OP_DATA_MAX_VAL as usize => 1, // OpData#
                        len if len <= u8::MAX as usize => 2,         // OpPushData1 + length byte
                        len if len <= u16::MAX as usize => 3,        // OpPushData2 + u16 length
                        _ => 5,                                      // OpPushData4 + u32 length
                    }
            }
        }
    }

    /// Appends the canonical push of `data` without enforcing any size limits.
    fn add_raw_data(&mut self, data: &[u8]) -> &mut Self {
        match data {
            [] | [0] => self.script.push(Op0),
            [b] if *b <= OP_SMALL_INT_MAX_VAL => self.script.push(Op1 - 1 + *b),
            [OP_1_NEGATE_VAL] => self.script.push(Op1Negate),
            _ => {
                match data.len() {
                    len if len <= OP_DATA_MAX_VAL as usize => self.script.push(OP_DATA_MIN_VAL - 1 + len as u8),
                    len if len <= u8::MAX as usize => self.script.extend(once(OpPushData1).chain(once(len as u8))),
                    len if len <= u16::MAX as usize => self.script.extend(once(OpPushData2).chain((len as u16).to_le_bytes())),
                    len => self.script.extend(once(OpPushData4).chain((len as u32).to_le_bytes())),
                }
                self.script.extend_from_slice(data);
            }
        }
        self
    }

    /// Appends the canonical push of `data` without the limit checks of
    /// [`add_data`](Self::add_data), so that tests can build scripts which are
    /// intentionally larger than the engine accepts.
    #[cfg(test)]
    pub fn add_data_unchecked(&mut self, data: &[u8]) -> &mut Self {
        self.add_raw_data(data)
    }

    /// Appends the canonical push of `data`. An empty buffer pushes `Op0`
    /// (empty stack data). The script is left untouched when the data exceeds
    /// [`MAX_SCRIPT_ELEMENT_SIZE`] or the push would grow the script beyond
    /// [`MAX_SCRIPTS_SIZE`].
    pub fn add_data(&mut self, data: &[u8]) -> ScriptBuilderResult<&mut Self> {
        let data_size = Self::canonical_data_size(data);
        if self.script.len() + data_size > MAX_SCRIPTS_SIZE {
            return Err(ScriptBuilderError::DataRejected(data_size));
        }
        if data.len() > MAX_SCRIPT_ELEMENT_SIZE {
            return Err(ScriptBuilderError::ElementExceedsMaxSize(data.len()));
        }

        Ok(self.add_raw_data(data))
    }

    /// Appends the canonical push of a signed integer, preferring the
    /// small-integer opcodes over script-number encoding.
    pub fn add_i64(&mut self, val: i64) -> ScriptBuilderResult<&mut Self> {
        if self.script.len() + 1 > MAX_SCRIPTS_SIZE {
            return Err(ScriptBuilderError::IntegerRejected(val));
        }

        match val {
            0 => {
                self.script.push(Op0);
                Ok(self)
            }
            -1 | 1..=16 => {
                self.script.push((Op1 as i64 - 1 + val) as u8);
                Ok(self)
            }
            _ => {
                let bytes: Vec<_> = OpcodeData::serialize(&val);
                self.add_data(&bytes)
            }
        }
    }

    /// Appends a lock time as trimmed little-endian data.
    pub fn add_lock_time(&mut self, lock_time: u64) -> ScriptBuilderResult<&mut Self> {
        self.add_u64(lock_time)
    }

    /// Appends a sequence as trimmed little-endian data.
    pub fn add_sequence(&mut self, sequence: u64) -> ScriptBuilderResult<&mut Self> {
        self.add_u64(sequence)
    }

    // Lock times and sequences are unsigned, so they bypass the script-number
    // encoding and are pushed as raw little-endian bytes with the zero tail
    // trimmed off.
    fn add_u64(&mut self, val: u64) -> ScriptBuilderResult<&mut Self> {
        let bytes = val.to_le_bytes();
        let trimmed_size = 8 - bytes.iter().rev().take_while(|b| **b == 0).count();
        self.add_data(&bytes[..trimmed_size])
    }
}

impl Default for ScriptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::iter::repeat;

    fn built(build: impl FnOnce(&mut ScriptBuilder) -> ScriptBuilderResult<&mut ScriptBuilder>) -> ScriptBuilderResult<Vec<u8>> {
        let mut builder = ScriptBuilder::new();
        build(&mut builder)?;
        Ok(builder.drain())
    }

    #[test]
    fn test_add_op() {
        assert_eq!(built(|b| b.add_op(OpTrue).and_then(|b| b.add_op(OpCheckSig))), Ok(vec![OpTrue, OpCheckSig]));
        assert_eq!(built(|b| b.add_ops(&[OpBlake2b, OpData32, OpEqual])), Ok(vec![OpBlake2b, OpData32, OpEqual]));
    }

    #[test]
    fn test_add_i64() {
        struct Test {
            val: i64,
            expected: Vec<u8>,
        }

        // Small values use the dedicated opcodes, everything else the
        // sign-magnitude script number encoding
        let tests = vec![
            Test { val: 0, expected: vec![Op0] },
            Test { val: -1, expected: vec![Op1Negate] },
            Test { val: 1, expected: vec![Op1] },
            Test { val: 16, expected: vec![Op16] },
            Test { val: 17, expected: vec![OpData1, 0x11] },
            Test { val: 127, expected: vec![OpData1, 0x7f] },
            Test { val: 128, expected: vec![OpData2, 0x80, 0] },
            Test { val: 256, expected: vec![OpData2, 0, 0x01] },
            Test { val: 32767, expected: vec![OpData2, 0xff, 0x7f] },
            Test { val: 32768, expected: vec![OpData3, 0, 0x80, 0] },
            Test { val: -2, expected: vec![OpData1, 0x82] },
            Test { val: -127, expected: vec![OpData1, 0xff] },
            Test { val: -128, expected: vec![OpData2, 0x80, 0x80] },
            Test { val: -256, expected: vec![OpData2, 0x00, 0x81] },
            Test { val: -32768, expected: vec![OpData3, 0x00, 0x80, 0x80] },
        ];

        for test in tests {
            assert_eq!(built(|b| b.add_i64(test.val)), Ok(test.expected), "wrong encoding of {}", test.val);
        }
    }

    #[test]
    fn test_add_data() {
        struct Test {
            name: &'static str,
            data: Vec<u8>,
            expected: ScriptBuilderResult<Vec<u8>>,
        }

        let tests = vec![
            // BIP0062: empty and one-byte small values must use the dedicated opcodes
            Test { name: "empty", data: vec![], expected: Ok(vec![Op0]) },
            Test { name: "byte 0x00", data: vec![0x00], expected: Ok(vec![Op0]) },
            Test { name: "byte 0x01", data: vec![0x01], expected: Ok(vec![Op1]) },
            Test { name: "byte 0x10", data: vec![0x10], expected: Ok(vec![Op16]) },
            Test { name: "byte 0x81", data: vec![0x81], expected: Ok(vec![Op1Negate]) },
            // any other byte is an ordinary one-byte data push
            Test { name: "byte 0x11", data: vec![0x11], expected: Ok(vec![OpData1, 0x11]) },
            Test { name: "byte 0x80", data: vec![0x80], expected: Ok(vec![OpData1, 0x80]) },
            // up to 75 bytes the push opcode itself carries the length
            Test {
                name: "75 bytes",
                data: vec![0x49; 75],
                expected: Ok(once(OpData75).chain(repeat(0x49).take(75)).collect()),
            },
            // 76 to 255 bytes require OpPushData1
            Test {
                name: "76 bytes",
                data: vec![0x49; 76],
                expected: Ok(once(OpPushData1).chain(once(76)).chain(repeat(0x49).take(76)).collect()),
            },
            // 256 to 520 bytes require OpPushData2
            Test {
                name: "520 bytes",
                data: vec![0x49; 520],
                expected: Ok(once(OpPushData2).chain([8, 2]).chain(repeat(0x49).take(520)).collect()),
            },
            // past the max element size nothing is pushed
            Test { name: "521 bytes", data: vec![0x49; 521], expected: Err(ScriptBuilderError::ElementExceedsMaxSize(521)) },
            Test { name: "32767 bytes", data: vec![0x49; 32767], expected: Err(ScriptBuilderError::DataRejected(32770)) },
            Test { name: "65536 bytes", data: vec![0x49; 65536], expected: Err(ScriptBuilderError::DataRejected(65541)) },
        ];

        for test in tests {
            assert_eq!(built(|b| b.add_data(&test.data)), test.expected, "{} wrong result", test.name);
            if let Ok(expected) = &test.expected {
                assert_eq!(ScriptBuilder::canonical_data_size(&test.data), expected.len(), "{} wrong canonical size", test.name);
            }
        }

        // The unchecked variant lets oversized pushes through, using OpPushData4 when needed
        let mut builder = ScriptBuilder::new();
        builder.add_data_unchecked(&[0x49; 65536]);
        let expected: Vec<u8> = once(OpPushData4).chain([0, 0, 1, 0]).chain(repeat(0x49).take(65536)).collect();
        assert_eq!(builder.drain(), expected);
    }

    #[test]
    fn test_add_lock_time_and_sequence() {
        struct Test {
            value: u64,
            expected: Vec<u8>,
        }

        let tests = vec![
            Test { value: 0x00, expected: vec![Op0] },
            Test { value: 0x01, expected: vec![Op1] },
            Test { value: 0xff, expected: vec![OpData1, 0xff] },
            Test { value: 0xffee, expected: vec![OpData2, 0xee, 0xff] },
            Test { value: 0xffeeddcc, expected: vec![OpData4, 0xcc, 0xdd, 0xee, 0xff] },
            Test { value: u64::MAX, expected: once(OpData8).chain(repeat(0xff).take(8)).collect() },
        ];

        for test in tests {
            assert_eq!(built(|b| b.add_lock_time(test.value)), Ok(test.expected.clone()), "{:x} wrong lock time", test.value);
            assert_eq!(built(|b| b.add_sequence(test.value)), Ok(test.expected), "{:x} wrong sequence", test.value);
        }
    }

    /// None of the rejected pushes may modify a script sitting at the size ceiling.
    #[test]
    fn test_exceed_max_script_size() {
        let mut builder = ScriptBuilder::new();
        builder.add_data_unchecked(&[0u8; MAX_SCRIPTS_SIZE - 3]);
        let original = builder.script().to_vec();

        assert_eq!(builder.add_data(&[0u8]).map(|_| ()), Err(ScriptBuilderError::DataRejected(1)));
        assert_eq!(builder.add_op(Op0).map(|_| ()), Err(ScriptBuilderError::OpCodeRejected(Op0)));
        assert_eq!(builder.add_ops(&[OpCheckSig]).map(|_| ()), Err(ScriptBuilderError::OpCodesRejected(1)));
        assert_eq!(builder.add_i64(0).map(|_| ()), Err(ScriptBuilderError::IntegerRejected(0)));
        assert_eq!(builder.add_lock_time(0).map(|_| ()), Err(ScriptBuilderError::DataRejected(1)));
        assert_eq!(builder.add_sequence(0).map(|_| ()), Err(ScriptBuilderError::DataRejected(1)));
        assert_eq!(builder.script(), &original, "a rejected push must not modify the script");
    }
}
