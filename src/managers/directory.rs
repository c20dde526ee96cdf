//! Users, licenses and groups.

use crate::constants::pagination::DEFAULT_TOP;
use crate::managers::GraphRequest;
use crate::utils::odata::startswith;
use serde::Deserialize;
use serde_json::{Map, Value};

const USER_SELECT: &str = "id,displayName,userPrincipalName,mail,accountEnabled";
const MEMBER_SELECT: &str = "id,displayName,userPrincipalName,mail";

fn default_true() -> bool {
    true
}

fn default_top() -> u32 {
    DEFAULT_TOP
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserArgs {
    pub display_name: String,
    pub user_principal_name: String,
    pub mail_nickname: String,
    pub password: String,
    #[serde(default = "default_true")]
    pub account_enabled: bool,
    #[serde(default = "default_true")]
    pub force_change_password: bool,
}

impl CreateUserArgs {
    pub fn request(&self) -> GraphRequest {
        GraphRequest::post(
            "users",
            serde_json::json!({
                "accountEnabled": self.account_enabled,
                "displayName": self.display_name,
                "mailNickname": self.mail_nickname,
                "userPrincipalName": self.user_principal_name,
                "passwordProfile": {
                    "forceChangePasswordNextSignIn": self.force_change_password,
                    "password": self.password,
                }
            }),
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserArgs {
    pub user_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub office_location: Option<String>,
    #[serde(default)]
    pub mobile_phone: Option<String>,
    #[serde(default)]
    pub usage_location: Option<String>,
    #[serde(default)]
    pub account_enabled: Option<bool>,
}

impl UpdateUserArgs {
    pub fn request(&self) -> GraphRequest {
        let mut body = Map::new();
        let strings = [
            ("displayName", &self.display_name),
            ("jobTitle", &self.job_title),
            ("department", &self.department),
            ("officeLocation", &self.office_location),
            ("mobilePhone", &self.mobile_phone),
            ("usageLocation", &self.usage_location),
        ];
        for (key, value) in strings {
            if let Some(value) = value {
                body.insert(key.to_string(), Value::String(value.clone()));
            }
        }
        if let Some(enabled) = self.account_enabled {
            body.insert("accountEnabled".to_string(), Value::Bool(enabled));
        }
        GraphRequest::patch(format!("users/{}", self.user_id), Value::Object(body))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserIdArgs {
    pub user_id: String,
}

impl UserIdArgs {
    pub fn request(&self) -> GraphRequest {
        GraphRequest::get(format!("users/{}", self.user_id))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListUsersArgs {
    #[serde(default = "default_top")]
    pub top: u32,
}

impl ListUsersArgs {
    pub fn request(&self) -> GraphRequest {
        GraphRequest::get(format!("users?$top={}&$select={}", self.top, USER_SELECT))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchUserArgs {
    pub search_term: String,
}

impl SearchUserArgs {
    pub fn request(&self) -> GraphRequest {
        GraphRequest::get(format!(
            "users?$filter={} or {}",
            startswith("displayName", &self.search_term),
            startswith("userPrincipalName", &self.search_term)
        ))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssignLicenseArgs {
    pub user_id: String,
    pub sku_id: String,
    #[serde(default)]
    pub disabled_plans: Vec<String>,
}

impl AssignLicenseArgs {
    pub fn request(&self) -> GraphRequest {
        GraphRequest::post(
            format!("users/{}/assignLicense", self.user_id),
            serde_json::json!({
                "addLicenses": [
                    { "skuId": self.sku_id, "disabledPlans": self.disabled_plans }
                ],
                "removeLicenses": []
            }),
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoveLicenseArgs {
    pub user_id: String,
    pub sku_id: String,
}

impl RemoveLicenseArgs {
    pub fn request(&self) -> GraphRequest {
        GraphRequest::post(
            format!("users/{}/assignLicense", self.user_id),
            serde_json::json!({
                "addLicenses": [],
                "removeLicenses": [self.sku_id]
            }),
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupMembershipArgs {
    pub user_id: String,
    pub group_id: String,
}

impl GroupMembershipArgs {
    /// `$ref` links the existing directory object instead of creating one.
    pub fn add_request(&self, graph_base: &str) -> GraphRequest {
        GraphRequest::post(
            format!("groups/{}/members/$ref", self.group_id),
            serde_json::json!({
                "@odata.id": format!(
                    "{}/directoryObjects/{}",
                    graph_base.trim_end_matches('/'),
                    self.user_id
                )
            }),
        )
    }

    pub fn remove_request(&self) -> GraphRequest {
        GraphRequest::delete(format!(
            "groups/{}/members/{}/$ref",
            self.group_id, self.user_id
        ))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListGroupMembersArgs {
    pub group_id: String,
    #[serde(default = "default_top")]
    pub top: u32,
}

impl ListGroupMembersArgs {
    pub fn request(&self) -> GraphRequest {
        GraphRequest::get(format!(
            "groups/{}/members?$top={}&$select={}",
            self.group_id, self.top, MEMBER_SELECT
        ))
    }
}
