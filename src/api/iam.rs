//! IAM API: account, groups, group membership, machine users.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client::{Client, PageSpec};
use crate::error::Error;
use crate::reconcile::ResourceHandler;

use super::types::{field, items, none_on_not_found};

/// Client for IAM operations.
///
/// Access via [`Client::iam`](crate::Client::iam).
///
/// ## Example
///
/// ```rust,no_run
/// # async fn run(client: cdp_control::Client) -> Result<(), cdp_control::Error> {
/// let iam = client.iam();
///
/// let account = iam.get_account().await?;
///
/// // All groups — the groupNames filter is omitted entirely
/// let all = iam.list_groups(Default::default()).await?;
///
/// // A specific group, or None if it doesn't exist
/// let group = iam.describe_group("data-scientists").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct IamClient {
    client: Client,
}

impl IamClient {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Retrieves the account the credentials belong to.
    pub async fn get_account(&self) -> Result<Account, Error> {
        let response = self.client.inner().post("/iam/getAccount", &json!({})).await?;
        field(&response, "account")
    }

    /// Lists groups, draining all pages.
    ///
    /// With no `group_names` filter, all groups in the account are returned.
    /// An empty filter list is a valid filter matching nothing — distinct
    /// from an omitted one.
    pub async fn list_groups(&self, request: ListGroupsRequest) -> Result<Vec<Group>, Error> {
        let body = serde_json::to_value(&request)?;
        let response = self
            .client
            .inner()
            .post_paginated("/iam/listGroups", body, &PageSpec::iam("groups"))
            .await?;
        items(&response, "groups")
    }

    /// Looks up a single group by name.
    ///
    /// Returns `None` when the group does not exist (the control plane's 404
    /// is absorbed here, so absent-state reconciliation needs no special
    /// case). More than one match is a fatal ambiguity.
    pub async fn describe_group(&self, group_name: &str) -> Result<Option<Group>, Error> {
        let request = ListGroupsRequest::default().with_group_names([group_name]);
        let groups = match none_on_not_found(self.list_groups(request).await)? {
            Some(groups) => groups,
            None => return Ok(None),
        };
        match groups.len() {
            0 => Ok(None),
            1 => Ok(groups.into_iter().next()),
            n => Err(Error::ambiguous(format!(
                "{} groups matched name '{}'",
                n, group_name
            ))),
        }
    }

    /// Creates a group.
    pub async fn create_group(&self, request: CreateGroupRequest) -> Result<Group, Error> {
        let body = serde_json::to_value(&request)?;
        let response = self.client.inner().post("/iam/createGroup", &body).await?;
        field(&response, "group")
    }

    /// Updates a group's mutable fields.
    pub async fn update_group(&self, request: UpdateGroupRequest) -> Result<Group, Error> {
        let body = serde_json::to_value(&request)?;
        let response = self.client.inner().post("/iam/updateGroup", &body).await?;
        field(&response, "group")
    }

    /// Deletes a group by name.
    pub async fn delete_group(&self, group_name: &str) -> Result<(), Error> {
        self.client
            .inner()
            .post("/iam/deleteGroup", &json!({ "groupName": group_name }))
            .await?;
        Ok(())
    }

    /// Lists the member CRNs of a group, draining all pages.
    pub async fn list_group_members(&self, group_name: &str) -> Result<Vec<String>, Error> {
        let body = json!({ "groupName": group_name });
        let response = self
            .client
            .inner()
            .post_paginated("/iam/listGroupMembers", body, &PageSpec::iam("memberCrns"))
            .await?;
        items(&response, "memberCrns")
    }

    /// Adds a member (user or machine user CRN) to a group.
    pub async fn add_group_member(&self, group_name: &str, member_crn: &str) -> Result<(), Error> {
        self.client
            .inner()
            .post(
                "/iam/addMemberToGroup",
                &json!({ "groupName": group_name, "memberCrn": member_crn }),
            )
            .await?;
        Ok(())
    }

    /// Removes a member from a group.
    pub async fn remove_group_member(
        &self,
        group_name: &str,
        member_crn: &str,
    ) -> Result<(), Error> {
        self.client
            .inner()
            .post(
                "/iam/removeMemberFromGroup",
                &json!({ "groupName": group_name, "memberCrn": member_crn }),
            )
            .await?;
        Ok(())
    }

    /// Lists machine users, draining all pages.
    pub async fn list_machine_users(
        &self,
        request: ListMachineUsersRequest,
    ) -> Result<Vec<MachineUser>, Error> {
        let body = serde_json::to_value(&request)?;
        let response = self
            .client
            .inner()
            .post_paginated("/iam/listMachineUsers", body, &PageSpec::iam("machineUsers"))
            .await?;
        items(&response, "machineUsers")
    }

    /// Looks up a single machine user by name, `None` when absent.
    pub async fn describe_machine_user(&self, name: &str) -> Result<Option<MachineUser>, Error> {
        let request = ListMachineUsersRequest::default().with_machine_user_names([name]);
        let users = match none_on_not_found(self.list_machine_users(request).await)? {
            Some(users) => users,
            None => return Ok(None),
        };
        match users.len() {
            0 => Ok(None),
            1 => Ok(users.into_iter().next()),
            n => Err(Error::ambiguous(format!(
                "{} machine users matched name '{}'",
                n, name
            ))),
        }
    }

    /// Creates a machine user.
    pub async fn create_machine_user(&self, name: &str) -> Result<MachineUser, Error> {
        let response = self
            .client
            .inner()
            .post("/iam/createMachineUser", &json!({ "machineUserName": name }))
            .await?;
        field(&response, "machineUser")
    }

    /// Deletes a machine user by name.
    pub async fn delete_machine_user(&self, name: &str) -> Result<(), Error> {
        self.client
            .inner()
            .post("/iam/deleteMachineUser", &json!({ "machineUserName": name }))
            .await?;
        Ok(())
    }

    /// Lists the rights assignments on a resource CRN, draining all pages.
    pub async fn list_resource_assignments(
        &self,
        resource_crn: &str,
    ) -> Result<Vec<serde_json::Value>, Error> {
        let body = json!({ "resourceCrn": resource_crn });
        let response = self
            .client
            .inner()
            .post_paginated(
                "/iam/listResourceAssignments",
                body,
                &PageSpec::iam("resourceAssignments"),
            )
            .await?;
        items(&response, "resourceAssignments")
    }
}

/// The CDP account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// The account ID.
    pub account_id: String,
    /// Identity provider type, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_provider_type: Option<String>,
    /// When the account was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
}

/// An IAM group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// The group name, unique within the account.
    pub group_name: String,
    /// The group CRN.
    pub crn: String,
    /// When the group was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<DateTime<Utc>>,
    /// Whether group membership is synced on user login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_membership_on_user_login: Option<bool>,
}

/// An IAM machine user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineUser {
    /// The machine user name, unique within the account.
    pub machine_user_name: String,
    /// The machine user CRN.
    pub crn: String,
    /// When the machine user was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<DateTime<Utc>>,
    /// Workload status, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Request to list groups.
///
/// `group_names` is omitted from the wire request when `None`; an empty
/// `Vec` is sent as an empty filter and matches zero groups.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListGroupsRequest {
    /// Names to filter by. Omitted entirely when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_names: Option<Vec<String>>,
    /// Page size hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    /// Caller-driven continuation token. Setting this disables automatic
    /// page draining.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starting_token: Option<String>,
}

impl ListGroupsRequest {
    /// Filters by group names.
    #[must_use]
    pub fn with_group_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the page size hint.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Sets a caller-driven continuation token.
    #[must_use]
    pub fn with_starting_token(mut self, token: impl Into<String>) -> Self {
        self.starting_token = Some(token.into());
        self
    }
}

/// Request to list machine users.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMachineUsersRequest {
    /// Names to filter by. Omitted entirely when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub machine_user_names: Option<Vec<String>>,
    /// Page size hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl ListMachineUsersRequest {
    /// Filters by machine user names.
    #[must_use]
    pub fn with_machine_user_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.machine_user_names = Some(names.into_iter().map(Into::into).collect());
        self
    }
}

/// Request to create a group.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    /// The group name.
    pub group_name: String,
    /// Whether to sync membership on user login.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_membership_on_user_login: Option<bool>,
}

impl CreateGroupRequest {
    /// Creates a request with the given name.
    pub fn new(group_name: impl Into<String>) -> Self {
        Self {
            group_name: group_name.into(),
            sync_membership_on_user_login: None,
        }
    }

    /// Sets membership sync on user login.
    #[must_use]
    pub fn with_sync_membership_on_user_login(mut self, sync: bool) -> Self {
        self.sync_membership_on_user_login = Some(sync);
        self
    }
}

/// Request to update a group's mutable fields.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGroupRequest {
    /// The group name.
    pub group_name: String,
    /// Whether to sync membership on user login.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_membership_on_user_login: Option<bool>,
}

/// Declarative state for one IAM group.
///
/// Plugs into [`reconcile`](crate::reconcile::reconcile): the group name is
/// the stable identifier, `sync_membership_on_user_login` the only mutable
/// field.
#[derive(Debug, Clone)]
pub struct GroupState {
    iam: IamClient,
    group_name: String,
    sync_membership_on_user_login: Option<bool>,
}

impl GroupState {
    /// Declares a group by name.
    pub fn new(iam: IamClient, group_name: impl Into<String>) -> Self {
        Self {
            iam,
            group_name: group_name.into(),
            sync_membership_on_user_login: None,
        }
    }

    /// Declares the membership sync setting.
    #[must_use]
    pub fn with_sync_membership_on_user_login(mut self, sync: bool) -> Self {
        self.sync_membership_on_user_login = Some(sync);
        self
    }
}

#[async_trait]
impl ResourceHandler for GroupState {
    type Resource = Group;

    async fn find(&self) -> Result<Option<Group>, Error> {
        self.iam.describe_group(&self.group_name).await
    }

    fn needs_update(&self, current: &Group) -> bool {
        match self.sync_membership_on_user_login {
            Some(declared) => current.sync_membership_on_user_login != Some(declared),
            None => false,
        }
    }

    async fn create(&self) -> Result<Group, Error> {
        let mut request = CreateGroupRequest::new(&self.group_name);
        request.sync_membership_on_user_login = self.sync_membership_on_user_login;
        self.iam.create_group(request).await
    }

    async fn update(&self, _current: &Group) -> Result<Group, Error> {
        self.iam
            .update_group(UpdateGroupRequest {
                group_name: self.group_name.clone(),
                sync_membership_on_user_login: self.sync_membership_on_user_login,
            })
            .await
    }

    async fn delete(&self, _current: &Group) -> Result<(), Error> {
        self.iam.delete_group(&self.group_name).await
    }
}

/// Declarative state for one IAM machine user.
///
/// Machine users have no mutable fields; reconciliation only ever creates
/// or deletes.
#[derive(Debug, Clone)]
pub struct MachineUserState {
    iam: IamClient,
    machine_user_name: String,
}

impl MachineUserState {
    /// Declares a machine user by name.
    pub fn new(iam: IamClient, machine_user_name: impl Into<String>) -> Self {
        Self {
            iam,
            machine_user_name: machine_user_name.into(),
        }
    }
}

#[async_trait]
impl ResourceHandler for MachineUserState {
    type Resource = MachineUser;

    async fn find(&self) -> Result<Option<MachineUser>, Error> {
        self.iam.describe_machine_user(&self.machine_user_name).await
    }

    fn needs_update(&self, _current: &MachineUser) -> bool {
        false
    }

    async fn create(&self) -> Result<MachineUser, Error> {
        self.iam.create_machine_user(&self.machine_user_name).await
    }

    async fn update(&self, _current: &MachineUser) -> Result<MachineUser, Error> {
        Err(Error::invalid_argument("machine users have no mutable fields"))
    }

    async fn delete(&self, _current: &MachineUser) -> Result<(), Error> {
        self.iam.delete_machine_user(&self.machine_user_name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_groups_request_omits_unset_filter() {
        // Omitted filter: every group. Empty filter: no groups.
        let omitted = serde_json::to_value(ListGroupsRequest::default()).unwrap();
        assert_eq!(omitted, json!({}));

        let empty = serde_json::to_value(
            ListGroupsRequest::default().with_group_names(Vec::<String>::new()),
        )
        .unwrap();
        assert_eq!(empty, json!({"groupNames": []}));
    }

    #[test]
    fn test_list_groups_request_camel_case() {
        let request = ListGroupsRequest::default()
            .with_group_names(["ops"])
            .with_page_size(50)
            .with_starting_token("tok");
        let value = serde_json::to_value(request).unwrap();
        assert_eq!(
            value,
            json!({"groupNames": ["ops"], "pageSize": 50, "startingToken": "tok"})
        );
    }

    #[test]
    fn test_create_group_request() {
        let request = CreateGroupRequest::new("ops").with_sync_membership_on_user_login(true);
        let value = serde_json::to_value(request).unwrap();
        assert_eq!(
            value,
            json!({"groupName": "ops", "syncMembershipOnUserLogin": true})
        );
    }

    #[test]
    fn test_group_deserializes_from_camel_case() {
        let group: Group = serde_json::from_value(json!({
            "groupName": "ops",
            "crn": "crn:altus:iam:us-west-1:abc:group:ops",
            "creationDate": "2024-01-01T00:00:00Z",
            "syncMembershipOnUserLogin": false
        }))
        .unwrap();
        assert_eq!(group.group_name, "ops");
        assert_eq!(group.sync_membership_on_user_login, Some(false));
    }

    #[test]
    fn test_group_state_drift_detection() {
        let group = Group {
            group_name: "ops".to_string(),
            crn: "crn".to_string(),
            creation_date: None,
            sync_membership_on_user_login: Some(false),
        };

        // No declared value: never drifts
        let client = IamClient {
            client: test_client(),
        };
        let state = GroupState::new(client.clone(), "ops");
        assert!(!state.needs_update(&group));

        // Declared value differs from current
        let state = state.with_sync_membership_on_user_login(true);
        assert!(state.needs_update(&group));

        // Declared value matches current
        let state = GroupState::new(client, "ops").with_sync_membership_on_user_login(false);
        assert!(!state.needs_update(&group));
    }

    fn test_client() -> crate::Client {
        use base64::Engine as _;
        crate::Client::builder()
            .base_url("https://api.example.com")
            .credentials(crate::Credentials::new(
                "test",
                base64::engine::general_purpose::STANDARD.encode([1u8; 32]),
            ))
            .build()
            .unwrap()
    }
}
