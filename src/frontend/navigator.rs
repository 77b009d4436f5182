use super::route_table::{RouteEntry, RouteTable};
use std::sync::Arc;
use tracing::debug;

/// Outcome of one navigation event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Render(RouteEntry),
    Redirect { from: String, to: RouteEntry },
}

impl Navigation {
    pub fn route(&self) -> &RouteEntry {
        match self {
            Navigation::Render(route) => route,
            Navigation::Redirect { to, .. } => to,
        }
    }
}

/// Holds the currently active route. Every navigation transitions it.
#[derive(Debug, Clone)]
pub struct Navigator {
    table: Arc<RouteTable>,
    active: Option<RouteEntry>,
}

impl Navigator {
    pub fn new(table: Arc<RouteTable>) -> Self {
        Self {
            table,
            active: None,
        }
    }

    pub fn active(&self) -> Option<&RouteEntry> {
        self.active.as_ref()
    }

    pub fn navigate(&mut self, path: &str) -> Navigation {
        let resolution = self.table.resolve(path);
        let route = resolution.route.clone();
        let navigation = if resolution.redirected {
            debug!("No view for {}, redirecting to {}", path, route.path);
            Navigation::Redirect {
                from: path.to_string(),
                to: route.clone(),
            }
        } else {
            Navigation::Render(route.clone())
        };
        self.active = Some(route);
        navigation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_route_follows_navigation() {
        let mut nav = Navigator::new(Arc::new(RouteTable::default_views()));
        assert!(nav.active().is_none());

        nav.navigate("/login");
        assert_eq!(nav.active().unwrap().path, "/login");

        let outcome = nav.navigate("/nowhere");
        assert!(matches!(outcome, Navigation::Redirect { ref from, .. } if from == "/nowhere"));
        assert_eq!(nav.active().unwrap().path, "/");
    }
}
