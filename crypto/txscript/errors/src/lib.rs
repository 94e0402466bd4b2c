use thiserror::Error;

#[derive(Error, PartialEq, Eq, Debug, Clone)]
pub enum TxScriptError {
    // Script decoding
    #[error("the size bytes of a variable push are truncated: {0:02x?}")]
    MalformedPushSize(Vec<u8>),
    #[error("a push of {0} bytes found only {1} remaining in the script")]
    MalformedPush(usize, usize),
    #[error("push encoding is not minimal: {0}")]
    NotMinimalData(String),
    #[error("script of size {0} exceeded the maximum allowed size of {1}")]
    ScriptSize(usize, usize),

    // Opcode classification
    #[error("attempt to execute invalid opcode {0}")]
    InvalidOpcode(String),
    #[error("attempt to execute reserved opcode {0}")]
    OpcodeReserved(String),
    #[error("attempt to execute disabled opcode {0}")]
    OpcodeDisabled(String),

    // Execution and stack handling
    #[error("attempt to read from an empty stack")]
    EmptyStack,
    #[error("an opcode requires at least {0} stack items but only {1} are present")]
    InvalidStackOperation(usize, usize),
    #[error("combined stack size {0} > max allowed {1}")]
    StackSizeExceeded(usize, usize),
    #[error("element size {0} exceeds the max allowed size {1}")]
    ElementTooBig(usize, usize),
    #[error("exceeded the max operation limit of {0}")]
    TooManyOperations(i32),
    #[error("number outside the numeric opcode domain: {0}")]
    NumberTooBig(String),
    #[error("invalid engine state: {0}")]
    InvalidState(String),
    #[error("the script ended inside a conditional block")]
    ErrUnbalancedConditional,
    #[error("{0} cannot be used as an array index")]
    InvalidIndex(i32),

    // Script results
    #[error("the script completed but the stack carries {0} extra items")]
    CleanStack(usize),
    #[error("the script completed with a false top stack entry")]
    EvalFalse,
    #[error("the script returned early")]
    EarlyReturn,
    #[error("the script completed but verification failed")]
    VerifyError,
    #[error("no scripts to run")]
    NoScripts,

    // Transaction context
    #[error("the engine is not running on a transaction input")]
    NotATransactionInput,
    #[error("transaction input index {0} >= {1}")]
    InvalidInputIndex(i32, usize),
    #[error("transaction output index {0} >= {1}")]
    InvalidOutputIndex(i32, usize),
    #[error("an opcode is not supported on the running source: {0}")]
    InvalidSource(String),
    #[error("the signature script must hold only data pushes")]
    SignatureScriptNotPushOnly,
    #[error("unsatisfied lock time: {0}")]
    UnsatisfiedLockTime(String),

    // Signatures and keys
    #[error("invalid signature: {0}")]
    InvalidSignature(secp256k1::Error),
    #[error("invalid signature length {0}")]
    SigLength(usize),
    #[error("invalid sighash type {0:#04x}")]
    InvalidSigHashType(u8),
    #[error("unsupported public key format")]
    PubKeyFormat,
    #[error("invalid signature count: {0}")]
    InvalidSignatureCount(String),
    #[error("invalid pubkey count: {0}")]
    InvalidPubKeyCount(String),
    #[error("not all signature slots were empty on a failed checkmultisig")]
    NullFail,
}
