// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(warnings)]                    // All warnings are treated as errors
#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # rad
//!
//! A command-line client that deploys application templates to the control
//! plane.
//!
//! ## Overview
//!
//! `rad deploy` takes a Bicep or compiled JSON template and:
//!
//! - Resolves the target environment, which may live in the
//!   `Applications.Core` or the `Radius.Core` provider namespace
//! - Derives the cloud provider scopes the deployment may touch
//! - Injects the environment and application IDs into the template parameters
//! - Reports every missing parameter at once before anything is sent
//! - Creates the application if needed and runs the deployment to completion
//!
//! ## Modules
//!
//! - [`config`]: Workspace configuration and per-command selection
//! - [`management`]: Management API client and resource shapes
//! - [`resources`]: Resource IDs and provider namespaces
//! - [`template`]: Template loading and parameters
//! - [`deploy`]: Environment resolution, provider settings and deployment
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```yaml
//! # ~/.rad/config.yaml
//! workspaces:
//!   default: local
//!   items:
//!     local:
//!       connection:
//!         kind: kubernetes
//!         context: kind-kind
//!         overrides:
//!           ucp: http://localhost:9000/apis/api.ucp.dev/v1alpha3
//!       scope: /planes/radius/local/resourceGroups/default
//!       environment: /planes/radius/local/resourceGroups/default/providers/Applications.Core/environments/default
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod cli;
pub mod config;
pub mod deploy;
pub mod error;
pub mod management;
pub mod resources;
pub mod template;

// ============================================================================
// Re-exports
// ============================================================================

pub use cli::{Cli, Commands, OutputFormatter};
pub use config::{CliConfig, ConfigParser, ConfigValidator, Workspace};
pub use deploy::{
    DeployRequest, DeployRunner, DeploymentClient, EnvironmentCheckResult, EnvironmentResolver,
    Providers, UcpDeploymentClient,
};
pub use error::{RadError, Result};
pub use management::{ManagementClient, UcpClient};
pub use resources::{ProviderNamespace, ResourceId};
pub use template::{ParameterParser, ParameterSet, TemplateLoader};
