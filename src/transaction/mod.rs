//! Transaction building for the profile contract

pub mod block;
pub mod builder;

pub use block::{Argument, CallArg, MoveCall, ObjectArg, SharedObjectRef, TransactionBlock};
pub use builder::{
    shared_ref, CertificateArgs, CreateProfileArgs, DeleteProfileArgs, ProfileTransactions,
    ProjectArgs, UpdateProfileArgs, VerifyArgs,
};
