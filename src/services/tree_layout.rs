//! Layoutmotor för släktträdet
//!
//! Beräknar positioner för alla synliga noder: roten plus allt som nås via
//! utfällda barn. Djupet ger y med fast avstånd per generation. x sätts med
//! en tidy-tree-placering där delträdens konturer packas från vänster till
//! höger och föräldern centreras över första och sista barnet.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::models::Person;
use crate::services::camera::ViewTransform;
use crate::services::tree_model::TreeNode;

/// Bredd under vilken det smala läget används
pub const NARROW_BREAKPOINT: f32 = 768.0;

/// Storlek på ritytan
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
}

impl ViewportSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Noll, negativ eller ogiltig storlek går inte att lägga ut på
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }

    pub fn is_narrow(&self) -> bool {
        self.width < NARROW_BREAKPOINT
    }
}

/// Avstånd och startzoom för ett visningsläge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSpacing {
    pub horizontal_gap: f32,
    pub vertical_gap: f32,
    pub initial_zoom: f32,
    pub node_radius: f32,
    pub spouse_offset: f32,
}

impl LayoutSpacing {
    pub const NARROW: Self = Self {
        horizontal_gap: 450.0,
        vertical_gap: 250.0,
        initial_zoom: 0.45,
        node_radius: 50.0,
        spouse_offset: 90.0,
    };

    pub const WIDE: Self = Self {
        horizontal_gap: 850.0,
        vertical_gap: 400.0,
        initial_zoom: 0.65,
        node_radius: 70.0,
        spouse_offset: 130.0,
    };

    pub fn for_viewport(viewport: ViewportSize) -> Self {
        if viewport.is_narrow() {
            Self::NARROW
        } else {
            Self::WIDE
        }
    }
}

/// En synlig nod med beräknad position
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub id: String,
    pub person: Arc<Person>,
    pub x: f32,
    pub y: f32,
    pub depth: usize,
    /// Index till föräldern i `TreeLayout::nodes`
    pub parent: Option<usize>,
    pub revealed: bool,
    pub has_children: bool,
    pub expanded: bool,
}

/// Kant från förälder till barn (index i `TreeLayout::nodes`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutEdge {
    pub parent: usize,
    pub child: usize,
}

/// Resultatet av ett layoutpass. Noderna ligger i bredden-först-ordning med roten först.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeLayout {
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
    pub spacing: LayoutSpacing,
}

impl TreeLayout {
    fn empty(spacing: LayoutSpacing) -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            spacing,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> Option<&LayoutNode> {
        self.nodes.first()
    }

    pub fn find(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Djupaste noden; vid lika djup den som kommer först
    pub fn deepest(&self) -> Option<&LayoutNode> {
        self.nodes
            .iter()
            .fold(None, |best: Option<&LayoutNode>, node| match best {
                Some(b) if node.depth <= b.depth => Some(b),
                _ => Some(node),
            })
    }

    pub fn max_depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// (min_x, min_y, max_x, max_y)
    pub fn bounds(&self) -> Option<(f32, f32, f32, f32)> {
        if self.nodes.is_empty() {
            return None;
        }

        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        let mut max_x = f32::MIN;
        let mut max_y = f32::MIN;

        for node in &self.nodes {
            min_x = min_x.min(node.x);
            min_y = min_y.min(node.y);
            max_x = max_x.max(node.x);
            max_y = max_y.max(node.y);
        }

        Some((min_x, min_y, max_x, max_y))
    }
}

/// Relativ placering av ett delträd
struct Placement {
    /// Barnens x relativt denna nod
    child_offsets: Vec<f32>,
    children: Vec<Placement>,
    /// (vänster, höger) per djup relativt denna nod, djup 0 är noden själv
    contour: Vec<(f32, f32)>,
}

fn place(node: &TreeNode, gap: f32) -> Placement {
    let children: Vec<Placement> = node
        .visible_children()
        .iter()
        .map(|c| place(c, gap))
        .collect();

    if children.is_empty() {
        return Placement {
            child_offsets: Vec::new(),
            children,
            contour: vec![(0.0, 0.0)],
        };
    }

    let mut offsets = Vec::with_capacity(children.len());
    let mut merged: Vec<(f32, f32)> = Vec::new();

    for child in &children {
        let shift = if merged.is_empty() {
            0.0
        } else {
            separation_shift(&merged, &child.contour, gap)
        };

        for (depth, &(left, right)) in child.contour.iter().enumerate() {
            match merged.get_mut(depth) {
                Some(level) => {
                    level.0 = level.0.min(shift + left);
                    level.1 = level.1.max(shift + right);
                }
                None => merged.push((shift + left, shift + right)),
            }
        }

        offsets.push(shift);
    }

    // Centrera föräldern över första och sista barnet
    let first = offsets.first().copied().unwrap_or(0.0);
    let last = offsets.last().copied().unwrap_or(0.0);
    let mid = (first + last) / 2.0;

    for offset in &mut offsets {
        *offset -= mid;
    }

    let mut contour = Vec::with_capacity(merged.len() + 1);
    contour.push((0.0, 0.0));
    contour.extend(merged.into_iter().map(|(l, r)| (l - mid, r - mid)));

    Placement {
        child_offsets: offsets,
        children,
        contour,
    }
}

/// Minsta förskjutning så att nästa delträd inte överlappar de redan placerade.
/// Syskon skiljs med ett avstånd, kusiner och längre bort med två.
fn separation_shift(placed: &[(f32, f32)], next: &[(f32, f32)], gap: f32) -> f32 {
    placed
        .iter()
        .zip(next.iter())
        .enumerate()
        .map(|(depth, (&(_, right), &(left, _)))| {
            let separation = if depth == 0 { 1.0 } else { 2.0 };
            right - left + separation * gap
        })
        .fold(f32::MIN, f32::max)
}

/// Beräkna layout för de synliga noderna
pub fn compute_layout(tree: &TreeNode, viewport: ViewportSize) -> TreeLayout {
    let spacing = LayoutSpacing::for_viewport(viewport);
    if viewport.is_degenerate() {
        return TreeLayout::empty(spacing);
    }

    let placement = place(tree, spacing.horizontal_gap);

    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    let mut queue: VecDeque<(&TreeNode, &Placement, Option<usize>, f32, usize)> = VecDeque::new();
    queue.push_back((tree, &placement, None, 0.0, 0));

    while let Some((node, placed, parent, x, depth)) = queue.pop_front() {
        let index = nodes.len();
        nodes.push(LayoutNode {
            id: node.id().to_string(),
            person: Arc::clone(&node.person),
            x,
            y: depth as f32 * spacing.vertical_gap,
            depth,
            parent,
            revealed: node.revealed,
            has_children: node.has_children(),
            expanded: node.is_expanded(),
        });

        if let Some(parent) = parent {
            edges.push(LayoutEdge { parent, child: index });
        }

        for ((child, child_placement), offset) in node
            .visible_children()
            .iter()
            .zip(&placed.children)
            .zip(&placed.child_offsets)
        {
            queue.push_back((child, child_placement, Some(index), x + offset, depth + 1));
        }
    }

    TreeLayout {
        nodes,
        edges,
        spacing,
    }
}

/// Startvy: roten överst i mitten med lägets startzoom
pub fn initial_transform(viewport: ViewportSize) -> ViewTransform {
    let spacing = LayoutSpacing::for_viewport(viewport);
    ViewTransform::new(viewport.width / 2.0, viewport.height / 3.0, spacing.initial_zoom)
}

/// Resultat av ett pass genom `LayoutEngine`
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPass {
    pub layout: TreeLayout,
    /// Satt endast på första riktiga passet efter att trädet byggts
    pub initial_camera: Option<ViewTransform>,
}

/// Layoutmotor som minns om startkameran redan begärts för aktuellt träd
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    initial_camera_pending: bool,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self {
            initial_camera_pending: true,
        }
    }

    /// Nytt träd: nästa pass begär startkameran igen
    pub fn reset(&mut self) {
        self.initial_camera_pending = true;
    }

    pub fn run(&mut self, tree: &TreeNode, viewport: ViewportSize) -> LayoutPass {
        let layout = compute_layout(tree, viewport);

        let initial_camera = if self.initial_camera_pending && !layout.is_empty() {
            self.initial_camera_pending = false;
            Some(initial_transform(viewport))
        } else {
            None
        };

        LayoutPass {
            layout,
            initial_camera,
        }
    }
}
