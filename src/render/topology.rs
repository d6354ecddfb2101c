//! Self-documentation of which service calls which.
//!
//! The tree is only ever rendered; routing never consults it.

use serde::Serialize;

use super::escape_html;

const TABLE_CLASS: &str = "table table-condensed table-bordered table-hover";

/// A service and the services it calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceTopology {
    pub name: &'static str,
    pub endpoint: &'static str,
    pub children: Vec<ServiceTopology>,
}

impl ServiceTopology {
    pub fn leaf(name: &'static str, endpoint: &'static str) -> Self {
        Self {
            name,
            endpoint,
            children: Vec::new(),
        }
    }

    /// productpage → {details, reviews → ratings}
    pub fn bookinfo() -> Self {
        let ratings = Self::leaf("ratings", "ratings");
        let reviews = Self {
            name: "reviews",
            endpoint: "reviews",
            children: vec![ratings],
        };
        Self {
            name: "productpage",
            endpoint: "productpage",
            children: vec![Self::leaf("details", "details"), reviews],
        }
    }

    /// Number of services in the tree, this one included.
    #[cfg(test)]
    pub fn service_count(&self) -> usize {
        1 + self.children.iter().map(Self::service_count).sum::<usize>()
    }

    /// Render as nested key/value tables.
    pub fn to_html_table(&self) -> String {
        let children = if self.children.is_empty() {
            String::new()
        } else {
            let rows: String = self
                .children
                .iter()
                .map(|child| format!("<tr><td>{}</td></tr>", child.to_html_table()))
                .collect();
            format!("<table class=\"{}\">{}</table>", TABLE_CLASS, rows)
        };

        format!(
            "<table class=\"{}\"><tr><th>name</th><td>{}</td></tr><tr><th>endpoint</th><td>{}</td></tr><tr><th>children</th><td>{}</td></tr></table>",
            TABLE_CLASS,
            escape_html(self.name),
            escape_html(self.endpoint),
            children
        )
    }
}
