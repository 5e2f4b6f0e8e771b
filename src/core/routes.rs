use crate::domain::ports::HttpMethod;
use serde::{Deserialize, Serialize};

pub const DETAILS_ROUTE_NAME: &str = "dellserver.details.view";

/// A web route the host registers on behalf of this module. The controller
/// behind it lives in the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDescriptor {
    pub name: String,
    pub method: HttpMethod,
    pub path: String,
    pub middleware: Vec<String>,
    pub controller: String,
}

impl RouteDescriptor {
    /// 以訂單編號展開 `{order}` 參數
    pub fn url_for(&self, order_id: u64) -> String {
        self.path.replace("{order}", &order_id.to_string())
    }
}

/// What the host should load for this module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceProvider {
    pub routes: bool,
    pub views: bool,
}

pub fn service_provider() -> ServiceProvider {
    ServiceProvider {
        routes: true,
        views: true,
    }
}

pub fn details_route() -> RouteDescriptor {
    RouteDescriptor {
        name: DETAILS_ROUTE_NAME.to_string(),
        method: HttpMethod::Get,
        path: "/dellserver/details/{order}".to_string(),
        middleware: vec!["web".to_string(), "auth".to_string()],
        controller: "ServerController@view".to_string(),
    }
}

pub fn routes() -> Vec<RouteDescriptor> {
    vec![details_route()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_details_route() {
        let route = details_route();
        assert_eq!(route.name, "dellserver.details.view");
        assert_eq!(route.method, HttpMethod::Get);
        assert_eq!(route.middleware, vec!["web", "auth"]);
        assert_eq!(route.url_for(9), "/dellserver/details/9");
    }

    #[test]
    fn test_provider_registers_routes_and_views() {
        let provider = service_provider();
        assert!(provider.routes && provider.views);
        assert_eq!(routes().len(), 1);
    }
}
