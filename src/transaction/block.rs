//! Unsent programmable transaction blocks
//!
//! A block is a list of inputs plus a list of commands that refer to
//! those inputs by index. Gas, sender and shared object versions may be
//! left empty: the wallet fills them in before signing.
//!
//! The JSON produced by [`TransactionBlock::serialize`] follows the
//! version 2 transaction format that Sui wallets accept for
//! `signAndExecuteTransaction`.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Serialize, Serializer};

use crate::error::{Error, Result};
use crate::sui::address::SuiAddress;
use crate::sui::pure::PureValue;

/// Serialized transaction format version
pub const TRANSACTION_FORMAT_VERSION: u8 = 2;

/// Reference to a value available to a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Argument {
    Input(u16),
    Result(u16),
}

/// Shared object reference with a known initial version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedObjectRef {
    pub object_id: SuiAddress,
    #[serde(serialize_with = "serialize_u64_string")]
    pub initial_shared_version: u64,
    pub mutable: bool,
}

/// Object argument passed to a call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectArg {
    /// Fully specified shared object
    Shared(SharedObjectRef),
    /// Object id only; the wallet resolves ownership and version
    Unresolved(SuiAddress),
}

impl ObjectArg {
    pub fn object_id(&self) -> SuiAddress {
        match self {
            ObjectArg::Shared(shared) => shared.object_id,
            ObjectArg::Unresolved(id) => *id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
enum ObjectInput {
    SharedObject(SharedObjectRef),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
struct UnresolvedObject {
    object_id: SuiAddress,
}

/// Transaction input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CallArg {
    Pure {
        #[serde(serialize_with = "serialize_base64")]
        bytes: Vec<u8>,
    },
    #[serde(rename = "Object")]
    Object(#[serde(serialize_with = "serialize_shared")] SharedObjectRef),
    #[serde(rename = "UnresolvedObject")]
    Unresolved(#[serde(serialize_with = "serialize_unresolved")] SuiAddress),
}

impl CallArg {
    /// Pure bytes, if this is a pure input
    pub fn pure_bytes(&self) -> Option<&[u8]> {
        match self {
            CallArg::Pure { bytes } => Some(bytes),
            _ => None,
        }
    }

    /// Object id, if this is an object input
    pub fn object_id(&self) -> Option<SuiAddress> {
        match self {
            CallArg::Object(shared) => Some(shared.object_id),
            CallArg::Unresolved(id) => Some(*id),
            CallArg::Pure { .. } => None,
        }
    }
}

/// A Move function call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveCall {
    pub package: SuiAddress,
    pub module: String,
    pub function: String,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<Argument>,
}

impl MoveCall {
    /// `<package>::<module>::<function>`
    pub fn target(&self) -> String {
        format!("{}::{}::{}", self.package, self.module, self.function)
    }
}

/// A single command in the block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Command {
    MoveCall(MoveCall),
}

/// Gas settings left for the wallet when unset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GasData {
    #[serde(serialize_with = "serialize_opt_u64_string")]
    pub budget: Option<u64>,
    #[serde(serialize_with = "serialize_opt_u64_string")]
    pub price: Option<u64>,
    pub owner: Option<SuiAddress>,
    pub payment: Option<Vec<SuiAddress>>,
}

/// An unsent transaction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionBlock {
    sender: Option<SuiAddress>,
    gas: GasData,
    inputs: Vec<CallArg>,
    commands: Vec<Command>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SerializedTransaction<'a> {
    version: u8,
    sender: Option<&'a SuiAddress>,
    expiration: Option<()>,
    gas_data: &'a GasData,
    inputs: &'a [CallArg],
    commands: &'a [Command],
}

impl TransactionBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_sender(&mut self, sender: SuiAddress) {
        self.sender = Some(sender);
    }

    pub fn sender(&self) -> Option<SuiAddress> {
        self.sender
    }

    pub fn set_gas_budget(&mut self, budget: u64) {
        self.gas.budget = Some(budget);
    }

    pub fn gas(&self) -> &GasData {
        &self.gas
    }

    pub fn inputs(&self) -> &[CallArg] {
        &self.inputs
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Add a BCS-encoded pure input
    pub fn pure<T: PureValue + ?Sized>(&mut self, value: &T) -> Result<Argument> {
        self.add_input(CallArg::Pure {
            bytes: value.to_pure_bytes()?,
        })
    }

    /// Add an object input
    ///
    /// The same object may only appear once, so a repeated id returns the
    /// existing input.
    pub fn object(&mut self, arg: ObjectArg) -> Result<Argument> {
        let id = arg.object_id();
        if let Some(idx) = self
            .inputs
            .iter()
            .position(|input| input.object_id() == Some(id))
        {
            return Ok(Argument::Input(idx as u16));
        }

        let input = match arg {
            ObjectArg::Shared(shared) => CallArg::Object(shared),
            ObjectArg::Unresolved(id) => CallArg::Unresolved(id),
        };
        self.add_input(input)
    }

    /// Append a Move call, returning a reference to its result
    pub fn move_call(&mut self, call: MoveCall) -> Result<Argument> {
        for arg in &call.arguments {
            if let Argument::Input(idx) = arg {
                if *idx as usize >= self.inputs.len() {
                    return Err(Error::TransactionBuild(format!(
                        "{} refers to missing input {}",
                        call.target(),
                        idx
                    )));
                }
            }
        }

        let idx = u16::try_from(self.commands.len())
            .map_err(|_| Error::TransactionBuild("Too many commands".to_string()))?;
        self.commands.push(Command::MoveCall(call));
        Ok(Argument::Result(idx))
    }

    /// Move calls in command order
    pub fn move_calls(&self) -> impl Iterator<Item = &MoveCall> {
        self.commands.iter().map(|command| match command {
            Command::MoveCall(call) => call,
        })
    }

    /// Resolve an argument to its input, if it refers to one
    pub fn input_for(&self, arg: &Argument) -> Option<&CallArg> {
        match arg {
            Argument::Input(idx) => self.inputs.get(*idx as usize),
            _ => None,
        }
    }

    /// JSON value in the wallet transaction format
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self.as_serialized())?)
    }

    /// JSON string in the wallet transaction format
    pub fn serialize(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.as_serialized())?)
    }

    fn as_serialized(&self) -> SerializedTransaction<'_> {
        SerializedTransaction {
            version: TRANSACTION_FORMAT_VERSION,
            sender: self.sender.as_ref(),
            expiration: None,
            gas_data: &self.gas,
            inputs: &self.inputs,
            commands: &self.commands,
        }
    }

    fn add_input(&mut self, input: CallArg) -> Result<Argument> {
        let idx = u16::try_from(self.inputs.len())
            .map_err(|_| Error::TransactionBuild("Too many inputs".to_string()))?;
        self.inputs.push(input);
        Ok(Argument::Input(idx))
    }
}

fn serialize_base64<S: Serializer>(bytes: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&BASE64.encode(bytes))
}

fn serialize_u64_string<S: Serializer>(value: &u64, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string())
}

fn serialize_opt_u64_string<S: Serializer>(
    value: &Option<u64>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match value {
        Some(v) => serializer.serialize_str(&v.to_string()),
        None => serializer.serialize_none(),
    }
}

fn serialize_shared<S: Serializer>(
    shared: &SharedObjectRef,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    ObjectInput::SharedObject(*shared).serialize(serializer)
}

fn serialize_unresolved<S: Serializer>(
    id: &SuiAddress,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    UnresolvedObject { object_id: *id }.serialize(serializer)
}
