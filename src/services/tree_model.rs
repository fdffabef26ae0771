//! Trädmodell: släktlinjen som ett hopfällbart träd
//!
//! Varje nod bär personen plus härlett tillstånd: om etiketterna visas
//! (`revealed`) och om barnen är synliga. Barnens synlighet är en
//! uppräkning, så en nod kan aldrig ha både synliga och dolda barn.
//! Varje växling ger en ny ögonblicksbild av trädet; den gamla lämnas orörd.

use std::sync::Arc;

use crate::models::Person;

/// Barnens synlighet för en nod
#[derive(Debug, Clone, PartialEq)]
pub enum Branch {
    /// Personen har inga barn
    Leaf,
    /// Barnen finns men visas inte
    Collapsed(Vec<TreeNode>),
    /// Barnen visas
    Expanded(Vec<TreeNode>),
}

/// En nod i släktträdet
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    /// Personposten. Barnen representeras av `branch`, inte av `person.children`.
    pub person: Arc<Person>,
    pub revealed: bool,
    pub branch: Branch,
}

impl TreeNode {
    pub fn id(&self) -> &str {
        &self.person.id
    }

    pub fn has_children(&self) -> bool {
        !matches!(self.branch, Branch::Leaf)
    }

    pub fn is_expanded(&self) -> bool {
        matches!(self.branch, Branch::Expanded(_))
    }

    pub fn is_collapsed(&self) -> bool {
        matches!(self.branch, Branch::Collapsed(_))
    }

    /// Barn som syns just nu
    pub fn visible_children(&self) -> &[TreeNode] {
        match &self.branch {
            Branch::Expanded(children) => children,
            _ => &[],
        }
    }

    /// Barn som är dolda just nu
    pub fn hidden_children(&self) -> &[TreeNode] {
        match &self.branch {
            Branch::Collapsed(children) => children,
            _ => &[],
        }
    }

    /// Alla barn oavsett synlighet
    pub fn children(&self) -> &[TreeNode] {
        match &self.branch {
            Branch::Leaf => &[],
            Branch::Collapsed(children) | Branch::Expanded(children) => children,
        }
    }

    fn children_mut(&mut self) -> &mut [TreeNode] {
        match &mut self.branch {
            Branch::Leaf => &mut [],
            Branch::Collapsed(children) | Branch::Expanded(children) => children,
        }
    }

    fn collapse(&mut self) {
        if let Branch::Expanded(children) = &mut self.branch {
            let children = std::mem::take(children);
            self.branch = Branch::Collapsed(children);
        }
    }

    fn expand(&mut self) {
        if let Branch::Collapsed(children) = &mut self.branch {
            let children = std::mem::take(children);
            self.branch = Branch::Expanded(children);
        }
    }

    /// Antal noder i delträdet, dolda inräknade
    pub fn count(&self) -> usize {
        1 + self.children().iter().map(TreeNode::count).sum::<usize>()
    }

    /// Sök nod i hela delträdet
    pub fn find(&self, id: &str) -> Option<&TreeNode> {
        if self.id() == id {
            return Some(self);
        }
        self.children().iter().find_map(|c| c.find(id))
    }

    /// Index-väg från denna nod till noden med givet id
    fn path_to(&self, id: &str) -> Option<Vec<usize>> {
        if self.id() == id {
            return Some(Vec::new());
        }

        for (i, child) in self.children().iter().enumerate() {
            if let Some(mut path) = child.path_to(id) {
                path.insert(0, i);
                return Some(path);
            }
        }

        None
    }

    fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut TreeNode> {
        match path.split_first() {
            None => Some(self),
            Some((&i, rest)) => self.children_mut().get_mut(i)?.node_at_mut(rest),
        }
    }
}

/// Bygg en trädnod från en person. Endast roten blir synlig;
/// alla barnlistor börjar hopfällda.
pub fn build(root: &Person) -> TreeNode {
    let mut node = build_node(root);
    node.revealed = true;
    node
}

fn build_node(person: &Person) -> TreeNode {
    let branch = if person.children.is_empty() {
        Branch::Leaf
    } else {
        Branch::Collapsed(person.children.iter().map(build_node).collect())
    };

    TreeNode {
        person: Arc::new(person.clone()),
        revealed: false,
        branch,
    }
}

/// Vad en växling gjorde
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Noden fälldes ut; syskon som var utfällda fälldes ihop
    Expanded { collapsed_siblings: Vec<String> },
    Collapsed,
    /// Noden saknar barn, trädet är oförändrat
    Unchanged,
}

/// Ögonblicksbild av ett släktträd
#[derive(Debug, Clone, PartialEq)]
pub struct AncestryTree {
    root: TreeNode,
    revision: u64,
}

impl AncestryTree {
    pub fn build(root: &Person) -> Self {
        Self {
            root: build(root),
            revision: 0,
        }
    }

    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    /// Ökar för varje växling sedan trädet byggdes
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn find(&self, id: &str) -> Option<&TreeNode> {
        self.root.find(id)
    }

    pub fn node_count(&self) -> usize {
        self.root.count()
    }

    /// Växla en nods barn och returnera en ny ögonblicksbild.
    ///
    /// Utfällning markerar noden och dess direkta barn som synliga och fäller
    /// ihop varje utfällt syskon. `None` om id:t saknas i trädet.
    pub fn toggle(&self, id: &str) -> Option<(AncestryTree, Transition)> {
        let path = self.root.path_to(id)?;
        let mut next = self.clone();
        next.revision += 1;

        let transition = match path.split_last() {
            None => toggle_node(&mut next.root),
            Some((&index, parent_path)) => {
                let parent = next.root.node_at_mut(parent_path)?;
                toggle_in_siblings(parent.children_mut(), index)
            }
        };

        Some((next, transition))
    }
}

fn toggle_node(node: &mut TreeNode) -> Transition {
    match node.branch {
        Branch::Leaf => Transition::Unchanged,
        Branch::Expanded(_) => {
            node.collapse();
            Transition::Collapsed
        }
        Branch::Collapsed(_) => {
            node.expand();
            node.revealed = true;
            for child in node.children_mut() {
                child.revealed = true;
            }
            Transition::Expanded {
                collapsed_siblings: Vec::new(),
            }
        }
    }
}

fn toggle_in_siblings(siblings: &mut [TreeNode], index: usize) -> Transition {
    let Some(node) = siblings.get_mut(index) else {
        return Transition::Unchanged;
    };

    let transition = toggle_node(node);
    let Transition::Expanded { .. } = transition else {
        return transition;
    };

    let mut collapsed_siblings = Vec::new();
    for (i, sibling) in siblings.iter_mut().enumerate() {
        if i != index && sibling.is_expanded() {
            sibling.collapse();
            collapsed_siblings.push(sibling.id().to_string());
        }
    }

    Transition::Expanded { collapsed_siblings }
}
