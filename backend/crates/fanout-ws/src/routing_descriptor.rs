use std::fmt;

/// Endpoint coordinates of the transport that owns the target connections.
///
/// Taken from the inbound request, never from ambient state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingDescriptor {
    pub domain_name: String,
    pub stage: String,
}

impl RoutingDescriptor {
    pub fn new(domain_name: impl Into<String>, stage: impl Into<String>) -> Self {
        Self {
            domain_name: domain_name.into(),
            stage: stage.into(),
        }
    }
}

impl fmt::Display for RoutingDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.domain_name, self.stage)
    }
}
