//! Profile contract surface
//!
//! The Move package is deployed per environment, so only the module and
//! entry function names are fixed here. The package id comes from config.
//!
//! # WARNING
//! Argument order of each entry point must match the deployed module.
//! If a call starts aborting with a type mismatch, the module was
//! probably upgraded and these builders need updating.

use std::fmt;

use super::address::SuiAddress;

/// Move module holding every profile entry point
pub const MODULE: &str = "profiles";

/// Struct name of the owned profile object
pub const PROFILE_STRUCT: &str = "Profile";

/// Entry functions of the profile module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryPoint {
    CreateProfile,
    UpdateProfile,
    DeleteProfile,
    VerifyProfile,
    AddProject,
    AddCertificate,
}

impl EntryPoint {
    /// All entry points, in declaration order
    pub const ALL: [EntryPoint; 6] = [
        EntryPoint::CreateProfile,
        EntryPoint::UpdateProfile,
        EntryPoint::DeleteProfile,
        EntryPoint::VerifyProfile,
        EntryPoint::AddProject,
        EntryPoint::AddCertificate,
    ];

    /// Move function name
    pub fn function_name(&self) -> &'static str {
        match self {
            EntryPoint::CreateProfile => "create_profile",
            EntryPoint::UpdateProfile => "update_profile",
            EntryPoint::DeleteProfile => "delete_profile",
            EntryPoint::VerifyProfile => "verify_profile",
            EntryPoint::AddProject => "add_project",
            EntryPoint::AddCertificate => "add_certificate",
        }
    }
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.function_name())
    }
}

/// Call targets for one deployed package
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Targets {
    package: SuiAddress,
}

impl Targets {
    pub fn new(package: SuiAddress) -> Self {
        Self { package }
    }

    pub fn package(&self) -> SuiAddress {
        self.package
    }

    /// `<package>::profiles::<entry>`
    pub fn target(&self, entry: EntryPoint) -> String {
        format!("{}::{}::{}", self.package, MODULE, entry.function_name())
    }

    /// Struct type tag of profile objects owned by users
    pub fn profile_struct_type(&self) -> String {
        format!("{}::{}::{}", self.package, MODULE, PROFILE_STRUCT)
    }
}
