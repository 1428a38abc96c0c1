//! Request addressing embedded in nearly every outgoing request.
//!
//! Three alternative modes select what an operation acts on: explicit
//! names, a label selector, or every resource in the namespace. The caller
//! decides precedence when several are populated; this type only carries
//! whatever was populated, unchanged, onto the wire.

use serde::{Deserialize, Serialize};

use crate::error::AddressingError;
use crate::CLIENT_VERSION;

/// Which addressing mode a request uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    Names,
    Selector,
    All,
}

/// Namespace, target and version tag shared by request messages.
///
/// Request structs embed this with `#[serde(flatten)]` so the fields sit at
/// the top level of the JSON body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addressing {
    #[serde(rename = "Namespace")]
    pub namespace: String,

    #[serde(rename = "Args", default, deserialize_with = "crate::de::nullable")]
    pub names: Vec<String>,

    #[serde(rename = "Selector", default)]
    pub selector: String,

    #[serde(rename = "AllFlag", default)]
    pub all: bool,

    #[serde(rename = "ClientVersion")]
    pub client_version: String,
}

impl Addressing {
    /// Addressing for `namespace` with no target yet, tagged with this
    /// client's version.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            names: Vec::new(),
            selector: String::new(),
            all: false,
            client_version: CLIENT_VERSION.to_string(),
        }
    }

    #[must_use]
    pub fn with_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = selector.into();
        self
    }

    #[must_use]
    pub fn with_all(mut self, all: bool) -> Self {
        self.all = all;
        self
    }

    /// A copy addressed at exactly one name, keeping namespace and version.
    #[must_use]
    pub fn for_name(&self, name: impl Into<String>) -> Self {
        Self {
            namespace: self.namespace.clone(),
            names: vec![name.into()],
            selector: String::new(),
            all: false,
            client_version: self.client_version.clone(),
        }
    }

    /// Populated addressing modes, in the order names, selector, all.
    pub fn modes(&self) -> Vec<AddressingMode> {
        let mut modes = Vec::with_capacity(3);
        if !self.names.is_empty() {
            modes.push(AddressingMode::Names);
        }
        if !self.selector.trim().is_empty() {
            modes.push(AddressingMode::Selector);
        }
        if self.all {
            modes.push(AddressingMode::All);
        }
        modes
    }

    /// Check that at least one target mode is populated and names are sane.
    pub fn validate(&self) -> Result<(), AddressingError> {
        if self.names.iter().any(|name| name.trim().is_empty()) {
            return Err(AddressingError::EmptyName);
        }
        if self.modes().is_empty() {
            return Err(AddressingError::NoTarget);
        }
        Ok(())
    }

    /// Check that the namespace is set, for operations scoped to one.
    pub fn validate_namespace(&self) -> Result<(), AddressingError> {
        if self.namespace.trim().is_empty() {
            return Err(AddressingError::EmptyNamespace);
        }
        Ok(())
    }

    /// Query-string form for read operations issued as GET.
    ///
    /// Names are carried in the path by those endpoints, so only the
    /// selector, namespace, version and all flag appear here.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("selector", self.selector.clone()),
            ("namespace", self.namespace.clone()),
            ("version", self.client_version.clone()),
        ];
        if self.all {
            pairs.push(("all", "true".to_string()));
        }
        pairs
    }
}

/// Cluster targeting used by the pgBouncer and pgAdmin show and update
/// requests, which name clusters as `ClusterNames` and have no all flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSelection {
    #[serde(rename = "Namespace")]
    pub namespace: String,

    #[serde(rename = "ClusterNames", default, deserialize_with = "crate::de::nullable")]
    pub cluster_names: Vec<String>,

    #[serde(rename = "Selector", default)]
    pub selector: String,

    #[serde(rename = "ClientVersion")]
    pub client_version: String,
}

impl From<Addressing> for ClusterSelection {
    fn from(addressing: Addressing) -> Self {
        Self {
            namespace: addressing.namespace,
            cluster_names: addressing.names,
            selector: addressing.selector,
            client_version: addressing.client_version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_addressing_carries_client_version() {
        let addressing = Addressing::new("pgo");
        assert_eq!(addressing.client_version, CLIENT_VERSION);
        assert_eq!(addressing.validate(), Err(AddressingError::NoTarget));
    }

    #[test]
    fn any_single_mode_is_enough() {
        let ns = Addressing::new("pgo");
        assert!(ns.clone().with_names(["hippo"]).validate().is_ok());
        assert!(ns.clone().with_selector("env=prod").validate().is_ok());
        assert!(ns.with_all(true).validate().is_ok());
    }

    #[test]
    fn blank_selector_does_not_count() {
        let addressing = Addressing::new("pgo").with_selector("   ");
        assert_eq!(addressing.validate(), Err(AddressingError::NoTarget));
    }

    #[test]
    fn empty_name_is_rejected() {
        let addressing = Addressing::new("pgo").with_names(["hippo", ""]);
        assert_eq!(addressing.validate(), Err(AddressingError::EmptyName));
    }

    #[test]
    fn all_populated_modes_are_transmitted() {
        let addressing = Addressing::new("pgo")
            .with_names(["a", "b"])
            .with_selector("env=prod")
            .with_all(true);

        assert_eq!(
            addressing.modes(),
            vec![
                AddressingMode::Names,
                AddressingMode::Selector,
                AddressingMode::All
            ]
        );

        let value = serde_json::to_value(&addressing).unwrap();
        assert_eq!(value["Namespace"], "pgo");
        assert_eq!(value["Args"], serde_json::json!(["a", "b"]));
        assert_eq!(value["Selector"], "env=prod");
        assert_eq!(value["AllFlag"], true);
        assert_eq!(value["ClientVersion"], CLIENT_VERSION);
    }

    #[test]
    fn for_name_drops_other_modes() {
        let base = Addressing::new("pgo").with_selector("x=y").with_all(true);
        let single = base.for_name("hippo");

        assert_eq!(single.names, vec!["hippo".to_string()]);
        assert!(single.selector.is_empty());
        assert!(!single.all);
        assert_eq!(single.namespace, "pgo");
    }

    #[test]
    fn query_pairs_include_version() {
        let pairs = Addressing::new("pgo").with_all(true).query_pairs();
        assert!(pairs.contains(&("version", CLIENT_VERSION.to_string())));
        assert!(pairs.contains(&("namespace", "pgo".to_string())));
        assert!(pairs.contains(&("all", "true".to_string())));
    }

    #[test]
    fn cluster_selection_renames_names() {
        let selection =
            ClusterSelection::from(Addressing::new("pgo").with_names(["hippo"]).with_selector("x=y"));
        let value = serde_json::to_value(&selection).unwrap();

        assert_eq!(value["ClusterNames"], serde_json::json!(["hippo"]));
        assert_eq!(value["Selector"], "x=y");
        assert!(value.get("Args").is_none());
        assert_eq!(value["ClientVersion"], CLIENT_VERSION);
    }

    proptest::proptest! {
        #[test]
        fn explicit_names_alone_always_validate(
            names in proptest::collection::vec("[a-z][a-z0-9-]{0,20}", 1..8)
        ) {
            let addressing = Addressing::new("pgo").with_names(names.clone());
            proptest::prop_assert!(addressing.validate().is_ok());
            proptest::prop_assert_eq!(addressing.modes(), vec![AddressingMode::Names]);
            proptest::prop_assert_eq!(addressing.names, names);
        }
    }
}
