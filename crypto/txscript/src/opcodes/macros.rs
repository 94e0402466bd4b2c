macro_rules! opcode_serde {
    ($type:ty) => {
        fn deserialize<'i, I: Iterator<Item = &'i u8>, T: VerifiableTransaction, Reused: SigHashReusedValues>(
            it: &mut I,
        ) -> Result<Box<dyn OpCodeImplementation<T, Reused>>, TxScriptError> {
            let size_bytes: Vec<u8> = it.take(size_of::<$type>()).copied().collect();
            if size_bytes.len() != size_of::<$type>() {
                return Err(TxScriptError::MalformedPushSize(size_bytes));
            }
            let length = <$type>::from_le_bytes(size_bytes.try_into().expect("the vector size was validated")) as usize;
            let data: Vec<u8> = it.take(length).copied().collect();
            if data.len() != length {
                return Err(TxScriptError::MalformedPush(length, data.len()));
            }
            Ok(Box::new(Self { data }))
        }
    };
    ($length:literal) => {
        fn deserialize<'i, I: Iterator<Item = &'i u8>, T: VerifiableTransaction, Reused: SigHashReusedValues>(
            it: &mut I,
        ) -> Result<Box<dyn OpCodeImplementation<T, Reused>>, TxScriptError> {
            // Static length includes the opcode itself
            let data: Vec<u8> = it.take($length - 1).copied().collect();
            if data.len() != $length - 1 {
                return Err(TxScriptError::MalformedPush($length - 1, data.len()));
            }
            Ok(Box::new(Self { data }))
        }
    };
}

macro_rules! opcode {
    ($name:ident, $num:literal, $length:tt, $code:expr, $self:ident, $vm:ident) => {
        pub(crate) type $name = OpCode<$num>;

        impl $name {
            opcode_serde!($length);
        }

        impl<T: VerifiableTransaction, Reused: SigHashReusedValues> OpCodeExecution<T, Reused> for $name {
            fn empty() -> Box<dyn OpCodeImplementation<T, Reused>> {
                Box::new(Self { data: vec![] })
            }

            fn new(data: Vec<u8>) -> Box<dyn OpCodeImplementation<T, Reused>> {
                Box::new(Self { data })
            }

            #[allow(unused_variables)]
            fn execute(&$self, $vm: &mut TxScriptEngine<T, Reused>) -> OpCodeResult {
                $code
            }
        }
    };
}

macro_rules! opcode_list {
    ( $( opcode $name:ident<$num:literal, $length:tt>($self:ident, $vm:ident) $code:expr )* ) => {
        $(
            opcode!($name, $num, $length, $code, $self, $vm);
        )*

        /// Maps an opcode byte onto its implementation, consuming the opcode's
        /// serialized data bytes from the iterator as needed.
        pub fn deserialize_next_opcode<'i, I: Iterator<Item = &'i u8>, T: VerifiableTransaction, Reused: SigHashReusedValues>(
            opcode_num: u8,
            it: &mut I,
        ) -> Result<Box<dyn OpCodeImplementation<T, Reused>>, TxScriptError> {
            match opcode_num {
                $(
                    $num => $name::deserialize(it),
                )*
            }
        }

        pub mod codes {
            $(
                #[allow(non_upper_case_globals)]
                pub const $name: u8 = $num;
            )*

            /// An alias of OpFalse
            #[allow(non_upper_case_globals)]
            pub const Op0: u8 = OpFalse;
            /// An alias of OpTrue
            #[allow(non_upper_case_globals)]
            pub const Op1: u8 = OpTrue;
        }
    };
}
