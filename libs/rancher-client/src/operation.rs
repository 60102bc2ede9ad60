//! Routing table for the Rancher `v2-beta` resource operations.
//!
//! Every resource method on [`RancherClient`](crate::RancherClient) is one
//! [`Operation`]; [`Operation::route`] is the single place that knows which
//! verb, collection, identifier rule, sub-resource, action and body each one
//! uses. Paths are rendered as
//!
//! ```text
//! /v2-beta/projects/{environment}/{collection}[/{id}][/{subresource}][/?action={action}]
//! ```
//!
//! Lifecycle actions (`purge`, `remove`, `logs`, ...) are `POST` with an
//! `action` query parameter; only `remove_container` uses `DELETE`. Updates
//! are `POST` to the resource path, never `PUT`.

use http::Method;

/// Prefix shared by every environment-scoped path.
pub const API_ROOT: &str = "/v2-beta/projects";

/// Resource collection segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Container,
    Stack,
    Services,
    Hosts,
    Ports,
}

impl Collection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Collection::Container => "container",
            Collection::Stack => "stack",
            Collection::Services => "services",
            Collection::Hosts => "hosts",
            Collection::Ports => "ports",
        }
    }
}

/// Value of the `action` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Stop,
    Start,
    Restart,
    Remove,
    Purge,
    Logs,
    Deactivate,
    Activate,
}

impl Action {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Action::Stop => "stop",
            Action::Start => "start",
            Action::Restart => "restart",
            Action::Remove => "remove",
            Action::Purge => "purge",
            Action::Logs => "logs",
            Action::Deactivate => "deactivate",
            Action::Activate => "activate",
        }
    }
}

/// Where the resource identifier comes from and whether it is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdRule {
    /// The path targets the collection itself.
    None,
    /// Caller-supplied identifier; must be non-empty. Carries the role named
    /// in the validation message.
    Required(&'static str),
    /// Read from the payload's `id` field; a non-empty string or a number.
    FromPayload(&'static str),
    /// Caller-supplied identifier inserted as-is.
    Unchecked,
}

/// Whether the operation sends a JSON request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyRule {
    Empty,
    Json,
}

/// Resolved routing entry for an [`Operation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub method: Method,
    pub collection: Collection,
    pub id: IdRule,
    pub subresource: Option<&'static str>,
    pub action: Option<Action>,
    pub body: BodyRule,
}

impl Route {
    fn new(method: Method, collection: Collection, id: IdRule) -> Self {
        Self {
            method,
            collection,
            id,
            subresource: None,
            action: None,
            body: BodyRule::Empty,
        }
    }

    fn action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    fn subresource(mut self, segment: &'static str) -> Self {
        self.subresource = Some(segment);
        self
    }

    fn json(mut self) -> Self {
        self.body = BodyRule::Json;
        self
    }

    /// Render the request path for `environment` and an already validated `id`.
    ///
    /// `id` is ignored for [`IdRule::None`] routes; for the other rules a
    /// missing id renders as an empty segment.
    #[must_use]
    pub fn path(&self, environment: &str, id: Option<&str>) -> String {
        let mut path = format!("{API_ROOT}/{environment}/{}", self.collection.as_str());
        if self.id != IdRule::None {
            path.push('/');
            path.push_str(id.unwrap_or_default());
        }
        if let Some(segment) = self.subresource {
            path.push('/');
            path.push_str(segment);
        }
        if let Some(action) = self.action {
            path.push_str("/?action=");
            path.push_str(action.as_str());
        }
        path
    }
}

/// Every resource operation exposed by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Operation {
    CreateContainer,
    GetContainer,
    UpdateContainer,
    StopContainer,
    StartContainer,
    RestartContainer,
    RemoveContainer,
    PurgeContainer,
    GetContainerLogs,
    CreateStack,
    GetStack,
    GetStackServices,
    RemoveStack,
    GetPorts,
    GetHosts,
    GetHost,
    GetService,
    StopService,
    StartService,
    RestartService,
}

impl Operation {
    /// All operations, in declaration order.
    pub const ALL: [Operation; 20] = [
        Operation::CreateContainer,
        Operation::GetContainer,
        Operation::UpdateContainer,
        Operation::StopContainer,
        Operation::StartContainer,
        Operation::RestartContainer,
        Operation::RemoveContainer,
        Operation::PurgeContainer,
        Operation::GetContainerLogs,
        Operation::CreateStack,
        Operation::GetStack,
        Operation::GetStackServices,
        Operation::RemoveStack,
        Operation::GetPorts,
        Operation::GetHosts,
        Operation::GetHost,
        Operation::GetService,
        Operation::StopService,
        Operation::StartService,
        Operation::RestartService,
    ];

    /// Routing entry for this operation.
    #[must_use]
    pub fn route(self) -> Route {
        use Collection::{Container, Hosts, Ports, Services, Stack};
        use IdRule::{FromPayload, Required, Unchecked};

        const CONTAINER: IdRule = Required("container");
        const STACK: IdRule = Required("stack");
        const SERVICE: IdRule = Required("service");

        match self {
            Operation::CreateContainer => Route::new(Method::POST, Container, IdRule::None).json(),
            Operation::GetContainer => Route::new(Method::GET, Container, CONTAINER),
            Operation::UpdateContainer => {
                Route::new(Method::POST, Container, FromPayload("container")).json()
            }
            Operation::StopContainer => Route::new(Method::POST, Container, CONTAINER)
                .action(Action::Stop)
                .json(),
            Operation::StartContainer => {
                Route::new(Method::POST, Container, CONTAINER).action(Action::Start)
            }
            Operation::RestartContainer => {
                Route::new(Method::POST, Container, CONTAINER).action(Action::Restart)
            }
            Operation::RemoveContainer => Route::new(Method::DELETE, Container, CONTAINER),
            Operation::PurgeContainer => {
                Route::new(Method::POST, Container, CONTAINER).action(Action::Purge)
            }
            Operation::GetContainerLogs => {
                Route::new(Method::POST, Container, CONTAINER).action(Action::Logs)
            }
            Operation::CreateStack => Route::new(Method::POST, Stack, IdRule::None).json(),
            Operation::GetStack => Route::new(Method::GET, Stack, STACK),
            Operation::GetStackServices => {
                Route::new(Method::GET, Stack, STACK).subresource("services")
            }
            Operation::RemoveStack => Route::new(Method::POST, Stack, STACK).action(Action::Remove),
            Operation::GetPorts => Route::new(Method::GET, Ports, IdRule::None),
            Operation::GetHosts => Route::new(Method::GET, Hosts, IdRule::None),
            Operation::GetHost => Route::new(Method::GET, Hosts, Unchecked),
            Operation::GetService => Route::new(Method::GET, Services, SERVICE),
            Operation::StopService => {
                Route::new(Method::POST, Services, SERVICE).action(Action::Deactivate)
            }
            Operation::StartService => {
                Route::new(Method::POST, Services, SERVICE).action(Action::Activate)
            }
            Operation::RestartService => Route::new(Method::POST, Services, SERVICE)
                .action(Action::Restart)
                .json(),
        }
    }
}
