//! In-memory output tree.

use serde::{Deserialize, Serialize};

/// One element of the output document. Children keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentNode {
    pub name: String,
    pub text: Option<String>,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<DocumentNode>,
}

impl DocumentNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn push_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.push((name.into(), value.into()));
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Removes an attribute, returning its value.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let idx = self.attributes.iter().position(|(key, _)| key == name)?;
        Some(self.attributes.remove(idx).1)
    }

    /// First child named `name`.
    pub fn child(&self, name: &str) -> Option<&DocumentNode> {
        self.children.iter().find(|child| child.name == name)
    }

    /// All children named `name`.
    pub fn children_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a DocumentNode> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Follows first-match children along `path`.
    pub fn path(&self, path: &[&str]) -> Option<&DocumentNode> {
        path.iter().try_fold(self, |node, name| node.child(name))
    }

    /// Text of the node at `path`, if it exists and has text.
    pub fn text_at(&self, path: &[&str]) -> Option<&str> {
        self.path(path).and_then(|node| node.text.as_deref())
    }

    /// Last child named `name`, created and appended when missing.
    pub fn last_child_or_insert(&mut self, name: &str) -> &mut DocumentNode {
        let idx = match self.children.iter().rposition(|child| child.name == name) {
            Some(idx) => idx,
            None => {
                self.children.push(DocumentNode::new(name));
                self.children.len() - 1
            }
        };
        &mut self.children[idx]
    }

    /// Total number of nodes in the subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(DocumentNode::node_count).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reuses_last_container_of_same_name() {
        let mut root = DocumentNode::new("Root");
        root.last_child_or_insert("A")
            .children
            .push(DocumentNode::with_text("X", "1"));
        root.last_child_or_insert("A")
            .children
            .push(DocumentNode::with_text("Y", "2"));
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.text_at(&["A", "Y"]), Some("2"));
        assert_eq!(root.node_count(), 4);
    }

    #[test]
    fn removes_attributes() {
        let mut node = DocumentNode::new("Root");
        node.push_attribute("a", "1");
        node.push_attribute("b", "2");
        assert_eq!(node.remove_attribute("a").as_deref(), Some("1"));
        assert_eq!(node.attribute("a"), None);
        assert_eq!(node.attribute("b"), Some("2"));
    }
}
