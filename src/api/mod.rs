//! Resource clients for the CDP control plane API surfaces.
//!
//! One client per API surface (IAM, Environments, Datalake, ML, DE,
//! Consumption), each a thin typed wrapper over the shared [`Client`]: they
//! assemble request bodies (camelCase field renaming, optional fields
//! omitted when unset), delegate to the REST layer, and shape the JSON
//! response. No reconciliation logic lives here.
//!
//! All clients share one [`Client`] instance; its credential and connection
//! state outlives any single resource client.
//!
//! ## API Hierarchy
//!
//! ```rust,ignore
//! let client = Client::builder().base_url(endpoint).build()?;
//!
//! let account = client.iam().get_account().await?;
//! let groups = client.iam().list_groups(Default::default()).await?;
//! let envs = client.environments().list_environments().await?;
//! let datalake = client.datalake().find_datalake("my-env").await?;
//! let workspaces = client.ml().list_workspaces(None).await?;
//! let services = client.de().list_services(true).await?;
//! let records = client.consumption().list_compute_usage_records(req).await?;
//! ```
//!
//! [`Client`]: crate::Client

mod consumption;
mod datalake;
mod de;
mod environments;
mod iam;
mod ml;
mod types;

pub use consumption::{ConsumptionClient, ListComputeUsageRecordsRequest};
pub use datalake::{Datalake, DatalakeClient};
pub use de::{DeClient, DeService, EnableServiceRequest, VirtualCluster};
pub use environments::{Environment, EnvironmentsClient};
pub use iam::{
    Account, CreateGroupRequest, Group, GroupState, IamClient, ListGroupsRequest,
    ListMachineUsersRequest, MachineUser, MachineUserState, UpdateGroupRequest,
};
pub use ml::{CreateWorkspaceRequest, MlClient, Workspace, WorkspaceState};
