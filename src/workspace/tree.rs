use std::collections::HashSet;

/// Kind of project tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Folder,
    File,
}

/// A node in the static project tree.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub name: String,
    pub kind: NodeKind,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn file(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: NodeKind::File,
            children: Vec::new(),
        }
    }

    pub fn folder(name: &str, children: Vec<TreeNode>) -> Self {
        Self {
            name: name.to_string(),
            kind: NodeKind::Folder,
            children,
        }
    }
}

/// Join a parent path and a child name the way every tree path is built.
pub fn join_path(base: &str, name: &str) -> String {
    if base.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", base, name)
    }
}

/// The fixed sample project shown by the editor.
pub fn sample_tree() -> Vec<TreeNode> {
    vec![
        TreeNode::folder(
            "src",
            vec![
                TreeNode::folder(
                    "app",
                    vec![TreeNode::file("layout.tsx"), TreeNode::file("page.tsx")],
                ),
                TreeNode::folder(
                    "components",
                    vec![
                        TreeNode::file("Button.tsx"),
                        TreeNode::file("Card.tsx"),
                        TreeNode::file("Input.tsx"),
                        TreeNode::file("Modal.tsx"),
                    ],
                ),
                TreeNode::folder("lib", vec![TreeNode::file("utils.ts")]),
            ],
        ),
        TreeNode::folder(
            "public",
            vec![TreeNode::file("favicon.ico"), TreeNode::file("logo.svg")],
        ),
        TreeNode::file("package.json"),
        TreeNode::file("tsconfig.json"),
    ]
}

/// A visible sidebar row produced by walking the expanded part of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub name: String,
    pub path: String,
    pub kind: NodeKind,
    pub depth: usize,
    pub is_expanded: bool,
    pub is_last_sibling: bool,
}

/// Static project listing plus the set of expanded folders.
#[derive(Debug)]
pub struct ProjectTree {
    roots: Vec<TreeNode>,
    expanded: HashSet<String>,
    /// Sidebar cursor into `visible_rows()`.
    pub selected_index: usize,
    /// First visible sidebar row.
    pub scroll_offset: usize,
}

impl ProjectTree {
    pub fn new(roots: Vec<TreeNode>) -> Self {
        Self {
            roots,
            expanded: HashSet::new(),
            selected_index: 0,
            scroll_offset: 0,
        }
    }

    /// The sample project with `src` and `src/components` expanded.
    pub fn sample() -> Self {
        let mut tree = Self::new(sample_tree());
        tree.expanded.insert("src".to_string());
        tree.expanded.insert("src/components".to_string());
        tree
    }

    /// Flip the expanded state of `path`. Unknown paths are stored but never rendered.
    pub fn toggle_folder(&mut self, path: &str) {
        if !self.expanded.remove(path) {
            self.expanded.insert(path.to_string());
        }
        tracing::debug!(path, expanded = self.is_expanded(path), "toggle folder");
        self.clamp_selection();
    }

    pub fn is_expanded(&self, path: &str) -> bool {
        self.expanded.contains(path)
    }

    /// All file paths in depth-first pre-order.
    pub fn flatten(&self) -> Vec<String> {
        let mut paths = Vec::new();
        Self::collect_files(&self.roots, "", &mut paths);
        paths
    }

    fn collect_files(nodes: &[TreeNode], base: &str, out: &mut Vec<String>) {
        for node in nodes {
            let path = join_path(base, &node.name);
            match node.kind {
                NodeKind::File => out.push(path),
                NodeKind::Folder => Self::collect_files(&node.children, &path, out),
            }
        }
    }

    /// Whether `path` names a file in the tree.
    pub fn contains_file(&self, path: &str) -> bool {
        let mut nodes = self.roots.as_slice();
        let mut parts = path.split('/').peekable();
        while let Some(part) = parts.next() {
            let Some(node) = nodes.iter().find(|n| n.name == part) else {
                return false;
            };
            if parts.peek().is_none() {
                return node.kind == NodeKind::File;
            }
            nodes = &node.children;
        }
        false
    }

    /// Rows currently visible in the sidebar.
    pub fn visible_rows(&self) -> Vec<TreeRow> {
        let mut rows = Vec::new();
        self.collect_rows(&self.roots, "", 0, &mut rows);
        rows
    }

    fn collect_rows(&self, nodes: &[TreeNode], base: &str, depth: usize, out: &mut Vec<TreeRow>) {
        for (i, node) in nodes.iter().enumerate() {
            let path = join_path(base, &node.name);
            let is_expanded = node.kind == NodeKind::Folder && self.is_expanded(&path);
            out.push(TreeRow {
                name: node.name.clone(),
                path: path.clone(),
                kind: node.kind,
                depth,
                is_expanded,
                is_last_sibling: i + 1 == nodes.len(),
            });
            if is_expanded {
                self.collect_rows(&node.children, &path, depth + 1, out);
            }
        }
    }

    /// The row under the sidebar cursor.
    pub fn selected_row(&self) -> Option<TreeRow> {
        self.visible_rows().into_iter().nth(self.selected_index)
    }

    pub fn select_next(&mut self) {
        let len = self.visible_rows().len();
        if len > 0 && self.selected_index < len - 1 {
            self.selected_index += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    pub fn select_last(&mut self) {
        self.selected_index = self.visible_rows().len().saturating_sub(1);
    }

    /// Move the sidebar cursor onto `path` if that row is visible.
    pub fn select_path(&mut self, path: &str) {
        if let Some(idx) = self.visible_rows().iter().position(|r| r.path == path) {
            self.selected_index = idx;
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_rows().len();
        if len > 0 && self.selected_index >= len {
            self.selected_index = len - 1;
        }
    }

    /// Keep the selected row inside a viewport of `visible_height` rows.
    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.selected_index >= self.scroll_offset + visible_height {
            self.scroll_offset = self.selected_index - visible_height + 1;
        }
    }
}
