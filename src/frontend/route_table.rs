use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RouteTableError {
    #[error("duplicate route path: {0}")]
    DuplicatePath(String),
    #[error("fallback path {0} is not a configured route")]
    UnknownFallback(String),
}

/// One client view: the path it answers, the template it renders and the
/// controller (if any) instantiated with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteEntry {
    pub path: String,
    pub template_url: String,
    pub controller: Option<String>,
}

impl RouteEntry {
    pub fn new(path: &str, template_url: &str) -> Self {
        Self {
            path: path.to_string(),
            template_url: template_url.to_string(),
            controller: None,
        }
    }

    pub fn with_controller(mut self, controller: &str) -> Self {
        self.controller = Some(controller.to_string());
        self
    }
}

/// Result of resolving a path against the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution<'a> {
    pub requested: String,
    #[serde(flatten)]
    pub route: &'a RouteEntry,
    pub redirected: bool,
}

/// Immutable, ordered route table with exactly one fallback entry.
#[derive(Debug, Clone, Serialize)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    fallback: usize,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl RouteTable {
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    /// The application's views. `/` is the fallback for every unknown path.
    pub fn default_views() -> Self {
        Self::builder()
            .when(RouteEntry::new("/", "/views/frontpage.html"))
            .when(RouteEntry::new("/login", "/views/login.html").with_controller("LoginController"))
            .when(
                RouteEntry::new("/signup", "/views/signup.html").with_controller("SignupController"),
            )
            .when(
                RouteEntry::new("/profile", "/views/profile.html")
                    .with_controller("ProfileController"),
            )
            .otherwise("/")
            .build()
            .expect("built-in view table is well formed")
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn fallback(&self) -> &RouteEntry {
        &self.entries[self.fallback]
    }

    /// Exact-match lookup, `None` for unconfigured paths.
    pub fn get(&self, path: &str) -> Option<&RouteEntry> {
        self.index.get(path).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    /// Unknown paths resolve to the fallback entry and are flagged as redirected.
    pub fn resolve(&self, path: &str) -> Resolution<'_> {
        match self.get(path) {
            Some(route) => Resolution {
                requested: path.to_string(),
                route,
                redirected: false,
            },
            None => Resolution {
                requested: path.to_string(),
                route: self.fallback(),
                redirected: true,
            },
        }
    }
}

#[derive(Debug, Default)]
pub struct RouteTableBuilder {
    entries: Vec<RouteEntry>,
    otherwise: Option<String>,
}

impl RouteTableBuilder {
    pub fn when(mut self, entry: RouteEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn otherwise(mut self, redirect_to: &str) -> Self {
        self.otherwise = Some(redirect_to.to_string());
        self
    }

    pub fn build(self) -> Result<RouteTable, RouteTableError> {
        let mut index = HashMap::with_capacity(self.entries.len());
        for (i, entry) in self.entries.iter().enumerate() {
            if index.insert(entry.path.clone(), i).is_some() {
                return Err(RouteTableError::DuplicatePath(entry.path.clone()));
            }
        }

        let fallback_path = self.otherwise.unwrap_or_else(|| "/".to_string());
        let fallback = *index
            .get(&fallback_path)
            .ok_or(RouteTableError::UnknownFallback(fallback_path))?;

        Ok(RouteTable {
            entries: self.entries,
            fallback,
            index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_path_rejected() {
        let err = RouteTable::builder()
            .when(RouteEntry::new("/", "/a.html"))
            .when(RouteEntry::new("/", "/b.html"))
            .build()
            .unwrap_err();
        assert_eq!(err, RouteTableError::DuplicatePath("/".to_string()));
    }

    #[test]
    fn test_fallback_must_be_configured() {
        let err = RouteTable::builder()
            .when(RouteEntry::new("/login", "/views/login.html"))
            .otherwise("/")
            .build()
            .unwrap_err();
        assert_eq!(err, RouteTableError::UnknownFallback("/".to_string()));
    }

    #[test]
    fn test_table_serializes_in_declaration_order() {
        let json = serde_json::to_value(RouteTable::default_views()).unwrap();
        let paths: Vec<&str> = json["entries"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["path"].as_str().unwrap())
            .collect();
        assert_eq!(paths, vec!["/", "/login", "/signup", "/profile"]);
        assert_eq!(json["fallback"], 0);
    }
}
