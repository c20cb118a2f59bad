//! # Transaction Plans
//!
//! A signer-agnostic description of a programmable transaction. Subsystems
//! build plans; the ledger write collaborator signs, submits and executes them.

use serde::{Deserialize, Serialize};

/// Argument to a transaction command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxArgument {
    /// The sender's fee-paying coin.
    GasCoin,
    /// An object input, by id.
    Object(String),
    /// A pure `u64`.
    PureU64(u64),
    /// A pure `u8`.
    PureU8(u8),
    /// The nth result of an earlier command.
    Result(u16),
}

/// One command of a programmable transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxCommand {
    /// Split new coins off an existing coin.
    SplitCoins {
        /// Source coin.
        coin: TxArgument,
        /// Amounts to split off.
        amounts: Vec<TxArgument>,
    },
    /// Call an entry function `package::module::function`.
    MoveCall {
        /// Fully qualified call target.
        target: String,
        /// Call arguments.
        arguments: Vec<TxArgument>,
    },
}

/// An ordered list of commands, ready for signing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPlan {
    /// Commands in execution order.
    pub commands: Vec<TxCommand>,
}

impl TransactionPlan {
    /// Start an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Split `amount` off the gas coin; returns the new coin's argument.
    pub fn split_gas(&mut self, amount: u64) -> TxArgument {
        let index = self.push(TxCommand::SplitCoins {
            coin: TxArgument::GasCoin,
            amounts: vec![TxArgument::PureU64(amount)],
        });
        TxArgument::Result(index)
    }

    /// Append a move call.
    pub fn move_call(&mut self, target: impl Into<String>, arguments: Vec<TxArgument>) -> TxArgument {
        let index = self.push(TxCommand::MoveCall {
            target: target.into(),
            arguments,
        });
        TxArgument::Result(index)
    }

    fn push(&mut self, command: TxCommand) -> u16 {
        self.commands.push(command);
        u16::try_from(self.commands.len() - 1).unwrap_or(u16::MAX)
    }
}

/// Execution status reported in transaction effects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionStatus {
    /// Executed successfully.
    Success,
    /// Aborted; carries the ledger's error text.
    Failure(String),
}

/// Effects of an executed transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionEffects {
    /// Execution status.
    pub status: ExecutionStatus,
}

/// Result of signing and submitting a plan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    /// Unique transaction digest.
    pub digest: String,
    /// Effects, when the collaborator waited for execution.
    pub effects: Option<TransactionEffects>,
}
