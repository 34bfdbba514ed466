use std::collections::HashMap;

use super::CollectionNode;

/// Maps object names to the dotted package path of the container holding them.
///
/// Objects directly in the root map to an empty prefix; each nested
/// container adds `<name>.`, so `GenericBrowser/P_Gameplay/SpringBoard`
/// yields `P_Gameplay.SpringBoard.` for its objects.
#[derive(Debug, Clone, Default)]
pub struct CollectionPaths {
    paths: HashMap<String, String>,
}

impl CollectionPaths {
    /// Walk the subtree named `root`. A missing root leaves every path empty.
    pub fn build(collections: &[CollectionNode], root: &str) -> Self {
        let mut paths = CollectionPaths::default();
        match collections.iter().find_map(|c| c.find(root)) {
            Some(node) => paths.walk(node, String::new()),
            None => log::warn!("Collection does not exist: {root}"),
        }
        paths
    }

    fn walk(&mut self, node: &CollectionNode, prefix: String) {
        for name in &node.objects {
            self.paths.insert(name.clone(), prefix.clone());
        }
        for child in &node.children {
            self.walk(child, format!("{prefix}{}.", child.name));
        }
    }

    /// Package prefix for `name`, empty when unknown.
    pub fn get(&self, name: &str) -> &str {
        self.paths.get(name).map(String::as_str).unwrap_or("")
    }

    /// Fully qualified reference, `<prefix><name>`.
    pub fn qualify(&self, name: &str) -> String {
        format!("{}{}", self.get(name), name)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str, objects: &[&str], children: Vec<CollectionNode>) -> CollectionNode {
        CollectionNode {
            name: name.to_string(),
            selected: false,
            objects: objects.iter().map(|s| s.to_string()).collect(),
            children,
        }
    }

    fn tree() -> Vec<CollectionNode> {
        vec![
            node("Scene", &["Camera"], vec![]),
            node(
                "GenericBrowser",
                &["Loose"],
                vec![node(
                    "P_Gameplay",
                    &[],
                    vec![node("SpringBoard", &["SpringBoardHigh_ColMesh"], vec![])],
                )],
            ),
        ]
    }

    #[test]
    fn nested_containers_form_dotted_prefix() {
        let paths = CollectionPaths::build(&tree(), "GenericBrowser");
        assert_eq!(paths.get("SpringBoardHigh_ColMesh"), "P_Gameplay.SpringBoard.");
        assert_eq!(
            paths.qualify("SpringBoardHigh_ColMesh"),
            "P_Gameplay.SpringBoard.SpringBoardHigh_ColMesh"
        );
        assert_eq!(paths.get("Loose"), "");
        assert_eq!(paths.len(), 2);
    }

    #[test]
    fn objects_outside_root_and_unknown_names_are_unqualified() {
        let paths = CollectionPaths::build(&tree(), "GenericBrowser");
        assert_eq!(paths.qualify("Camera"), "Camera");
        assert_eq!(paths.qualify("Nope"), "Nope");
    }

    #[test]
    fn missing_root_gives_empty_map() {
        let paths = CollectionPaths::build(&tree(), "Elsewhere");
        assert!(paths.is_empty());
    }
}
