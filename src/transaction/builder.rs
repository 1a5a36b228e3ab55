//! Transaction builders for the profile contract
//!
//! Each builder returns a fresh [`TransactionBlock`] holding exactly one
//! Move call. Optional arguments are always passed, as an explicit
//! `None` when absent, because entry functions take them positionally.

use tracing::debug;

use crate::error::Result;
use crate::sui::address::SuiAddress;
use crate::sui::program::{EntryPoint, Targets, MODULE};

use super::block::{Argument, MoveCall, ObjectArg, SharedObjectRef, TransactionBlock};

/// Arguments for `create_profile`
#[derive(Debug, Clone, Default)]
pub struct CreateProfileArgs {
    pub registry_id: String,
    pub events_id: String,
    pub handle: String,
    pub display_name: String,
    pub avatar: Option<String>,
    pub registry_version: Option<u64>,
    pub events_version: Option<u64>,
}

/// Arguments for `update_profile`
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileArgs {
    pub events_id: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub events_version: Option<u64>,
}

/// Arguments for `delete_profile`
#[derive(Debug, Clone, Default)]
pub struct DeleteProfileArgs {
    pub registry_id: String,
    pub events_id: String,
    pub registry_version: Option<u64>,
    pub events_version: Option<u64>,
}

/// Arguments for `verify_profile`
#[derive(Debug, Clone, Default)]
pub struct VerifyArgs {
    pub events_id: String,
    /// Owner of the profile being verified, in any address form
    pub profile_owner: String,
    pub events_version: Option<u64>,
}

/// Arguments for `add_project`
#[derive(Debug, Clone, Default)]
pub struct ProjectArgs {
    pub title: String,
    pub description: Option<String>,
    pub demo: Option<String>,
    pub thumbnails: Vec<String>,
}

/// Arguments for `add_certificate`
#[derive(Debug, Clone, Default)]
pub struct CertificateArgs {
    pub title: String,
    pub scan: Option<String>,
    pub issuer: Option<String>,
}

/// Reference a shared object, pinning its version when known
pub fn shared_ref(id: &str, initial_shared_version: Option<u64>) -> Result<ObjectArg> {
    let object_id = SuiAddress::parse(id)?;
    Ok(match initial_shared_version {
        Some(version) => ObjectArg::Shared(SharedObjectRef {
            object_id,
            initial_shared_version: version,
            mutable: true,
        }),
        None => ObjectArg::Unresolved(object_id),
    })
}

/// Builds profile contract transactions for one package
#[derive(Debug, Clone, Copy)]
pub struct ProfileTransactions {
    targets: Targets,
}

impl ProfileTransactions {
    pub fn new(package_id: SuiAddress) -> Self {
        Self {
            targets: Targets::new(package_id),
        }
    }

    pub fn targets(&self) -> &Targets {
        &self.targets
    }

    /// `create_profile(registry, events, handle, display_name, avatar)`
    pub fn build_create_profile(&self, args: &CreateProfileArgs) -> Result<TransactionBlock> {
        let mut tx = TransactionBlock::new();
        let arguments = vec![
            tx.object(shared_ref(&args.registry_id, args.registry_version)?)?,
            tx.object(shared_ref(&args.events_id, args.events_version)?)?,
            tx.pure(&args.handle)?,
            tx.pure(&args.display_name)?,
            tx.pure(&args.avatar)?,
        ];
        self.call(tx, EntryPoint::CreateProfile, arguments)
    }

    /// `update_profile(events, display_name, bio, avatar)`
    pub fn build_update_profile(&self, args: &UpdateProfileArgs) -> Result<TransactionBlock> {
        let mut tx = TransactionBlock::new();
        let arguments = vec![
            tx.object(shared_ref(&args.events_id, args.events_version)?)?,
            tx.pure(&args.display_name)?,
            tx.pure(&args.bio)?,
            tx.pure(&args.avatar)?,
        ];
        self.call(tx, EntryPoint::UpdateProfile, arguments)
    }

    /// `delete_profile(registry, events)`
    pub fn build_delete_profile(&self, args: &DeleteProfileArgs) -> Result<TransactionBlock> {
        let mut tx = TransactionBlock::new();
        let arguments = vec![
            tx.object(shared_ref(&args.registry_id, args.registry_version)?)?,
            tx.object(shared_ref(&args.events_id, args.events_version)?)?,
        ];
        self.call(tx, EntryPoint::DeleteProfile, arguments)
    }

    /// `verify_profile(events, profile_owner)`
    pub fn build_verify(&self, args: &VerifyArgs) -> Result<TransactionBlock> {
        let owner = SuiAddress::parse(&args.profile_owner)?;

        let mut tx = TransactionBlock::new();
        let arguments = vec![
            tx.object(shared_ref(&args.events_id, args.events_version)?)?,
            tx.pure(&owner)?,
        ];
        self.call(tx, EntryPoint::VerifyProfile, arguments)
    }

    /// `add_project(title, description, demo, thumbnails)`
    pub fn build_add_project(&self, args: &ProjectArgs) -> Result<TransactionBlock> {
        let mut tx = TransactionBlock::new();
        let arguments = vec![
            tx.pure(&args.title)?,
            tx.pure(&args.description)?,
            tx.pure(&args.demo)?,
            tx.pure(&args.thumbnails)?,
        ];
        self.call(tx, EntryPoint::AddProject, arguments)
    }

    /// `add_certificate(title, scan, issuer)`
    pub fn build_add_certificate(&self, args: &CertificateArgs) -> Result<TransactionBlock> {
        let mut tx = TransactionBlock::new();
        let arguments = vec![
            tx.pure(&args.title)?,
            tx.pure(&args.scan)?,
            tx.pure(&args.issuer)?,
        ];
        self.call(tx, EntryPoint::AddCertificate, arguments)
    }

    fn call(
        &self,
        mut tx: TransactionBlock,
        entry: EntryPoint,
        arguments: Vec<Argument>,
    ) -> Result<TransactionBlock> {
        let call = MoveCall {
            package: self.targets.package(),
            module: MODULE.to_string(),
            function: entry.function_name().to_string(),
            type_arguments: Vec::new(),
            arguments,
        };

        debug!(
            "Built {} with {} inputs",
            call.target(),
            tx.inputs().len()
        );

        tx.move_call(call)?;
        Ok(tx)
    }
}
