//! SharePoint sites, site permissions, drives and lists.

use crate::managers::GraphRequest;
use crate::utils::odata::encode_query_value;
use serde::{Deserialize, Serialize};

const SITE_SELECT: &str = "id,name,displayName,webUrl";

fn default_search() -> String {
    "*".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListSitesArgs {
    #[serde(default = "default_search")]
    pub search_term: String,
}

impl ListSitesArgs {
    pub fn request(&self) -> GraphRequest {
        GraphRequest::get(format!(
            "sites?search={}&$select={}",
            encode_query_value(&self.search_term),
            SITE_SELECT
        ))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteIdArgs {
    pub site_id: String,
}

impl SiteIdArgs {
    pub fn site_request(&self) -> GraphRequest {
        GraphRequest::get(format!("sites/{}", self.site_id))
    }

    pub fn child_request(&self, segment: &str) -> GraphRequest {
        GraphRequest::get(format!("sites/{}/{}", self.site_id, segment))
    }
}

/// Sites addressed by server-relative path use `{hostname}:/{path}` as the id.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteByPathArgs {
    pub hostname: String,
    pub site_path: String,
}

impl SiteByPathArgs {
    pub fn request(&self) -> GraphRequest {
        GraphRequest::get(format!(
            "sites/{}:/{}",
            self.hostname.trim_end_matches('/'),
            self.site_path.trim_start_matches('/')
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SitePermissionRole {
    #[default]
    Read,
    Write,
    Manage,
    FullControl,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GrantSitePermissionArgs {
    pub site_id: String,
    pub app_id: String,
    pub app_display_name: String,
    #[serde(default)]
    pub role: SitePermissionRole,
}

impl GrantSitePermissionArgs {
    pub fn request(&self) -> GraphRequest {
        GraphRequest::post(
            format!("sites/{}/permissions", self.site_id),
            serde_json::json!({
                "roles": [self.role],
                "grantedToIdentities": [
                    {
                        "application": {
                            "id": self.app_id,
                            "displayName": self.app_display_name,
                        }
                    }
                ]
            }),
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoveSitePermissionArgs {
    pub site_id: String,
    pub permission_id: String,
}

impl RemoveSitePermissionArgs {
    pub fn request(&self) -> GraphRequest {
        GraphRequest::delete(format!(
            "sites/{}/permissions/{}",
            self.site_id, self.permission_id
        ))
    }
}

pub fn root_site_request() -> GraphRequest {
    GraphRequest::get("sites/root")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::graph_client::GraphMethod;
    use serde_json::json;

    #[test]
    fn list_sites_passes_search_and_select() {
        let args: ListSitesArgs =
            serde_json::from_value(json!({"search_term": "market"})).expect("args");
        let request = args.request();
        assert_eq!(request.method, GraphMethod::Get);
        assert_eq!(
            request.path,
            "sites?search=market&$select=id,name,displayName,webUrl"
        );
    }

    #[test]
    fn list_sites_defaults_to_wildcard() {
        let args: ListSitesArgs = serde_json::from_value(json!({})).expect("args");
        assert!(args.request().path.starts_with("sites?search=*&"));
    }

    #[test]
    fn list_sites_encodes_search_term() {
        let args = ListSitesArgs {
            search_term: "R&D #1".to_string(),
        };
        assert_eq!(
            args.request().path,
            "sites?search=R%26D%20%231&$select=id,name,displayName,webUrl"
        );
    }

    #[test]
    fn site_by_path_uses_colon_addressing() {
        let args = SiteByPathArgs {
            hostname: "contoso.sharepoint.com".to_string(),
            site_path: "/sites/marketing".to_string(),
        };
        assert_eq!(
            args.request().path,
            "sites/contoso.sharepoint.com:/sites/marketing"
        );
    }

    #[test]
    fn site_children_hang_off_site_id() {
        let args = SiteIdArgs {
            site_id: "s1".to_string(),
        };
        assert_eq!(args.site_request().path, "sites/s1");
        assert_eq!(args.child_request("drives").path, "sites/s1/drives");
        assert_eq!(root_site_request().path, "sites/root");
    }

    #[test]
    fn grant_permission_defaults_to_read() {
        let args: GrantSitePermissionArgs = serde_json::from_value(json!({
            "site_id": "s1",
            "app_id": "app-1",
            "app_display_name": "Backup"
        }))
        .expect("args");
        let request = args.request();
        assert_eq!(request.path, "sites/s1/permissions");
        assert_eq!(
            request.body.expect("body"),
            json!({
                "roles": ["read"],
                "grantedToIdentities": [
                    {"application": {"id": "app-1", "displayName": "Backup"}}
                ]
            })
        );
    }

    #[test]
    fn grant_permission_accepts_fullcontrol() {
        let args: GrantSitePermissionArgs = serde_json::from_value(json!({
            "site_id": "s1",
            "app_id": "app-1",
            "app_display_name": "Backup",
            "role": "fullcontrol"
        }))
        .expect("args");
        assert_eq!(args.role, SitePermissionRole::FullControl);
    }

    #[test]
    fn remove_permission_deletes_by_id() {
        let args = RemoveSitePermissionArgs {
            site_id: "s1".to_string(),
            permission_id: "p1".to_string(),
        };
        let request = args.request();
        assert_eq!(request.method, GraphMethod::Delete);
        assert_eq!(request.path, "sites/s1/permissions/p1");
        assert!(request.body.is_none());
    }
}
