//! The closed set of directory operations exposed as tools.
//!
//! A call goes from its wire name to [`ToolName`], then to a typed
//! [`Operation`] holding the parsed arguments. Every step is an exhaustive
//! `match`, so adding a tool without wiring it is a compile error.

pub mod directory;
pub mod sharepoint;

use crate::errors::ToolError;
use crate::services::graph_client::GraphMethod;
use crate::utils::text::pretty_json;
use directory::{
    AssignLicenseArgs, CreateUserArgs, GroupMembershipArgs, ListGroupMembersArgs, ListUsersArgs,
    RemoveLicenseArgs, SearchUserArgs, UpdateUserArgs, UserIdArgs,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use sharepoint::{
    GrantSitePermissionArgs, ListSitesArgs, RemoveSitePermissionArgs, SiteByPathArgs, SiteIdArgs,
};
use std::fmt;

/// Method, relative path and optional JSON body for one Graph call.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphRequest {
    pub method: GraphMethod,
    pub path: String,
    pub body: Option<Value>,
}

impl GraphRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: GraphMethod::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: GraphMethod::Post,
            path: path.into(),
            body: Some(body),
        }
    }

    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: GraphMethod::Patch,
            path: path.into(),
            body: Some(body),
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: GraphMethod::Delete,
            path: path.into(),
            body: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    CreateUser,
    UpdateUser,
    GetUser,
    ListUsers,
    SearchUser,
    AssignLicense,
    RemoveLicense,
    ListAvailableLicenses,
    ListGroups,
    ListGroupMembers,
    AddUserToGroup,
    RemoveUserFromGroup,
    ListSites,
    GetSite,
    GetSiteByPath,
    GetRootSite,
    ListSitePermissions,
    GrantSitePermission,
    RemoveSitePermission,
    ListSiteDrives,
    ListSiteLists,
}

impl ToolName {
    pub const ALL: &'static [ToolName] = &[
        ToolName::CreateUser,
        ToolName::UpdateUser,
        ToolName::GetUser,
        ToolName::ListUsers,
        ToolName::SearchUser,
        ToolName::AssignLicense,
        ToolName::RemoveLicense,
        ToolName::ListAvailableLicenses,
        ToolName::ListGroups,
        ToolName::ListGroupMembers,
        ToolName::AddUserToGroup,
        ToolName::RemoveUserFromGroup,
        ToolName::ListSites,
        ToolName::GetSite,
        ToolName::GetSiteByPath,
        ToolName::GetRootSite,
        ToolName::ListSitePermissions,
        ToolName::GrantSitePermission,
        ToolName::RemoveSitePermission,
        ToolName::ListSiteDrives,
        ToolName::ListSiteLists,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ToolName::CreateUser => "create_user",
            ToolName::UpdateUser => "update_user",
            ToolName::GetUser => "get_user",
            ToolName::ListUsers => "list_users",
            ToolName::SearchUser => "search_user",
            ToolName::AssignLicense => "assign_license",
            ToolName::RemoveLicense => "remove_license",
            ToolName::ListAvailableLicenses => "list_available_licenses",
            ToolName::ListGroups => "list_groups",
            ToolName::ListGroupMembers => "list_group_members",
            ToolName::AddUserToGroup => "add_user_to_group",
            ToolName::RemoveUserFromGroup => "remove_user_from_group",
            ToolName::ListSites => "list_sites",
            ToolName::GetSite => "get_site",
            ToolName::GetSiteByPath => "get_site_by_path",
            ToolName::GetRootSite => "get_root_site",
            ToolName::ListSitePermissions => "list_site_permissions",
            ToolName::GrantSitePermission => "grant_site_permission",
            ToolName::RemoveSitePermission => "remove_site_permission",
            ToolName::ListSiteDrives => "list_site_drives",
            ToolName::ListSiteLists => "list_site_lists",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|tool| tool.as_str() == name)
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub enum Operation {
    CreateUser(CreateUserArgs),
    UpdateUser(UpdateUserArgs),
    GetUser(UserIdArgs),
    ListUsers(ListUsersArgs),
    SearchUser(SearchUserArgs),
    AssignLicense(AssignLicenseArgs),
    RemoveLicense(RemoveLicenseArgs),
    ListAvailableLicenses,
    ListGroups,
    ListGroupMembers(ListGroupMembersArgs),
    AddUserToGroup(GroupMembershipArgs),
    RemoveUserFromGroup(GroupMembershipArgs),
    ListSites(ListSitesArgs),
    GetSite(SiteIdArgs),
    GetSiteByPath(SiteByPathArgs),
    GetRootSite,
    ListSitePermissions(SiteIdArgs),
    GrantSitePermission(GrantSitePermissionArgs),
    RemoveSitePermission(RemoveSitePermissionArgs),
    ListSiteDrives(SiteIdArgs),
    ListSiteLists(SiteIdArgs),
}

fn parse_args<T: DeserializeOwned>(tool: ToolName, args: Value) -> Result<T, ToolError> {
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args
    };
    serde_json::from_value(args).map_err(|err| {
        ToolError::invalid_params(format!("Invalid arguments for {}: {}", tool, err))
    })
}

impl Operation {
    /// Binds raw call arguments to the typed argument set of `tool`.
    pub fn from_call(tool: ToolName, args: Value) -> Result<Self, ToolError> {
        let operation = match tool {
            ToolName::CreateUser => Operation::CreateUser(parse_args(tool, args)?),
            ToolName::UpdateUser => Operation::UpdateUser(parse_args(tool, args)?),
            ToolName::GetUser => Operation::GetUser(parse_args(tool, args)?),
            ToolName::ListUsers => Operation::ListUsers(parse_args(tool, args)?),
            ToolName::SearchUser => Operation::SearchUser(parse_args(tool, args)?),
            ToolName::AssignLicense => Operation::AssignLicense(parse_args(tool, args)?),
            ToolName::RemoveLicense => Operation::RemoveLicense(parse_args(tool, args)?),
            ToolName::ListAvailableLicenses => Operation::ListAvailableLicenses,
            ToolName::ListGroups => Operation::ListGroups,
            ToolName::ListGroupMembers => Operation::ListGroupMembers(parse_args(tool, args)?),
            ToolName::AddUserToGroup => Operation::AddUserToGroup(parse_args(tool, args)?),
            ToolName::RemoveUserFromGroup => {
                Operation::RemoveUserFromGroup(parse_args(tool, args)?)
            }
            ToolName::ListSites => Operation::ListSites(parse_args(tool, args)?),
            ToolName::GetSite => Operation::GetSite(parse_args(tool, args)?),
            ToolName::GetSiteByPath => Operation::GetSiteByPath(parse_args(tool, args)?),
            ToolName::GetRootSite => Operation::GetRootSite,
            ToolName::ListSitePermissions => {
                Operation::ListSitePermissions(parse_args(tool, args)?)
            }
            ToolName::GrantSitePermission => {
                Operation::GrantSitePermission(parse_args(tool, args)?)
            }
            ToolName::RemoveSitePermission => {
                Operation::RemoveSitePermission(parse_args(tool, args)?)
            }
            ToolName::ListSiteDrives => Operation::ListSiteDrives(parse_args(tool, args)?),
            ToolName::ListSiteLists => Operation::ListSiteLists(parse_args(tool, args)?),
        };
        Ok(operation)
    }

    pub fn tool(&self) -> ToolName {
        match self {
            Operation::CreateUser(_) => ToolName::CreateUser,
            Operation::UpdateUser(_) => ToolName::UpdateUser,
            Operation::GetUser(_) => ToolName::GetUser,
            Operation::ListUsers(_) => ToolName::ListUsers,
            Operation::SearchUser(_) => ToolName::SearchUser,
            Operation::AssignLicense(_) => ToolName::AssignLicense,
            Operation::RemoveLicense(_) => ToolName::RemoveLicense,
            Operation::ListAvailableLicenses => ToolName::ListAvailableLicenses,
            Operation::ListGroups => ToolName::ListGroups,
            Operation::ListGroupMembers(_) => ToolName::ListGroupMembers,
            Operation::AddUserToGroup(_) => ToolName::AddUserToGroup,
            Operation::RemoveUserFromGroup(_) => ToolName::RemoveUserFromGroup,
            Operation::ListSites(_) => ToolName::ListSites,
            Operation::GetSite(_) => ToolName::GetSite,
            Operation::GetSiteByPath(_) => ToolName::GetSiteByPath,
            Operation::GetRootSite => ToolName::GetRootSite,
            Operation::ListSitePermissions(_) => ToolName::ListSitePermissions,
            Operation::GrantSitePermission(_) => ToolName::GrantSitePermission,
            Operation::RemoveSitePermission(_) => ToolName::RemoveSitePermission,
            Operation::ListSiteDrives(_) => ToolName::ListSiteDrives,
            Operation::ListSiteLists(_) => ToolName::ListSiteLists,
        }
    }

    /// `graph_base` is only needed for `@odata.id` references.
    pub fn request(&self, graph_base: &str) -> GraphRequest {
        match self {
            Operation::CreateUser(args) => args.request(),
            Operation::UpdateUser(args) => args.request(),
            Operation::GetUser(args) => args.request(),
            Operation::ListUsers(args) => args.request(),
            Operation::SearchUser(args) => args.request(),
            Operation::AssignLicense(args) => args.request(),
            Operation::RemoveLicense(args) => args.request(),
            Operation::ListAvailableLicenses => GraphRequest::get("subscribedSkus"),
            Operation::ListGroups => GraphRequest::get("groups"),
            Operation::ListGroupMembers(args) => args.request(),
            Operation::AddUserToGroup(args) => args.add_request(graph_base),
            Operation::RemoveUserFromGroup(args) => args.remove_request(),
            Operation::ListSites(args) => args.request(),
            Operation::GetSite(args) => args.site_request(),
            Operation::GetSiteByPath(args) => args.request(),
            Operation::GetRootSite => sharepoint::root_site_request(),
            Operation::ListSitePermissions(args) => args.child_request("permissions"),
            Operation::GrantSitePermission(args) => args.request(),
            Operation::RemoveSitePermission(args) => args.request(),
            Operation::ListSiteDrives(args) => args.child_request("drives"),
            Operation::ListSiteLists(args) => args.child_request("lists"),
        }
    }

    /// Text returned to the caller once the call succeeded.
    pub fn render(&self, result: &Value) -> String {
        let headline = match self {
            Operation::UpdateUser(_) => return "User updated successfully".to_string(),
            Operation::AddUserToGroup(_) => return "User added to group successfully".to_string(),
            Operation::RemoveUserFromGroup(_) => {
                return "User removed from group successfully".to_string()
            }
            Operation::RemoveSitePermission(_) => {
                return "Permission removed successfully".to_string()
            }
            Operation::CreateUser(_) => "User created successfully",
            Operation::GetUser(_) => "User details",
            Operation::ListUsers(_) => "Users",
            Operation::SearchUser(_) => "Search results",
            Operation::AssignLicense(_) => "License assigned successfully",
            Operation::RemoveLicense(_) => "License removed successfully",
            Operation::ListAvailableLicenses => "Available licenses",
            Operation::ListGroups => "Groups",
            Operation::ListGroupMembers(_) => "Group members",
            Operation::ListSites(_) => "SharePoint sites",
            Operation::GetSite(_) | Operation::GetSiteByPath(_) => "Site details",
            Operation::GetRootSite => "Root site",
            Operation::ListSitePermissions(_) => "Site permissions",
            Operation::GrantSitePermission(_) => "Permission granted successfully",
            Operation::ListSiteDrives(_) => "Site drives",
            Operation::ListSiteLists(_) => "Site lists",
        };
        format!("{}:\n{}", headline, pretty_json(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    const BASE: &str = "https://graph.microsoft.com/v1.0";

    fn minimal_args(tool: ToolName) -> Value {
        match tool {
            ToolName::CreateUser => json!({
                "display_name": "Jane Doe",
                "user_principal_name": "jane@contoso.com",
                "mail_nickname": "jane",
                "password": "P@ss1234"
            }),
            ToolName::UpdateUser | ToolName::GetUser => json!({"user_id": "u1"}),
            ToolName::SearchUser => json!({"search_term": "jan"}),
            ToolName::AssignLicense | ToolName::RemoveLicense => {
                json!({"user_id": "u1", "sku_id": "sku-1"})
            }
            ToolName::ListGroupMembers => json!({"group_id": "g1"}),
            ToolName::AddUserToGroup | ToolName::RemoveUserFromGroup => {
                json!({"user_id": "u1", "group_id": "g1"})
            }
            ToolName::GetSite
            | ToolName::ListSitePermissions
            | ToolName::ListSiteDrives
            | ToolName::ListSiteLists => json!({"site_id": "s1"}),
            ToolName::GetSiteByPath => {
                json!({"hostname": "contoso.sharepoint.com", "site_path": "sites/hr"})
            }
            ToolName::GrantSitePermission => {
                json!({"site_id": "s1", "app_id": "a1", "app_display_name": "App"})
            }
            ToolName::RemoveSitePermission => json!({"site_id": "s1", "permission_id": "p1"}),
            ToolName::ListUsers
            | ToolName::ListAvailableLicenses
            | ToolName::ListGroups
            | ToolName::ListSites
            | ToolName::GetRootSite => json!({}),
        }
    }

    #[test]
    fn names_round_trip_and_are_unique() {
        let mut seen = HashSet::new();
        for tool in ToolName::ALL {
            assert_eq!(ToolName::parse(tool.as_str()), Some(*tool));
            assert!(seen.insert(tool.as_str()), "duplicate name {}", tool);
        }
        assert_eq!(ToolName::parse("drop_tenant"), None);
    }

    #[test]
    fn every_tool_binds_its_minimal_arguments() {
        for tool in ToolName::ALL {
            let operation = Operation::from_call(*tool, minimal_args(*tool))
                .unwrap_or_else(|err| panic!("{} failed: {}", tool, err));
            assert_eq!(operation.tool(), *tool);
            let request = operation.request(BASE);
            assert!(!request.path.starts_with('/'), "{} path is absolute", tool);
            assert_eq!(
                request.body.is_some(),
                request.method.carries_body(),
                "{} body/method mismatch",
                tool
            );
        }
    }

    #[test]
    fn null_arguments_behave_like_empty_object() {
        let operation = Operation::from_call(ToolName::ListUsers, Value::Null).expect("bind");
        assert!(operation.request(BASE).path.contains("$top=100"));

        let err = Operation::from_call(ToolName::GetUser, Value::Null).expect_err("must fail");
        assert_eq!(err.kind, crate::errors::ToolErrorKind::InvalidParams);
        assert!(err.message.starts_with("Invalid arguments for get_user:"));
        assert!(err.message.contains("user_id"));
    }

    #[test]
    fn wrong_argument_type_is_invalid_params() {
        let err = Operation::from_call(ToolName::ListUsers, json!({"top": "lots"}))
            .expect_err("must fail");
        assert_eq!(err.kind, crate::errors::ToolErrorKind::InvalidParams);
    }

    #[test]
    fn render_prefixes_pretty_json() {
        let operation =
            Operation::from_call(ToolName::CreateUser, minimal_args(ToolName::CreateUser))
                .expect("bind");
        let text = operation.render(&json!({"id": "u1"}));
        assert_eq!(text, "User created successfully:\n{\n  \"id\": \"u1\"\n}");
    }

    #[test]
    fn render_uses_fixed_text_for_reference_changes() {
        let operation = Operation::from_call(
            ToolName::RemoveSitePermission,
            minimal_args(ToolName::RemoveSitePermission),
        )
        .expect("bind");
        assert_eq!(
            operation.render(&json!({"success": true})),
            "Permission removed successfully"
        );
    }
}
