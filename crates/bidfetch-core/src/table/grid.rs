//! Ruled ("lattice") table reconstruction from page geometry.
//!
//! Coordinates are PDF user space: x grows to the right, y grows upward.
//! Rules that touch each other form one table; the distinct rule positions
//! of that group define its row and column boundaries, and text is dropped
//! into cells by the centre of its bounding box.

use super::{Row, Table};

/// A horizontal or vertical rule on the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Edge {
    Horizontal { y: f32, x0: f32, x1: f32 },
    Vertical { x: f32, y0: f32, y1: f32 },
}

impl Edge {
    pub fn horizontal(y: f32, xa: f32, xb: f32) -> Self {
        Edge::Horizontal {
            y,
            x0: xa.min(xb),
            x1: xa.max(xb),
        }
    }

    pub fn vertical(x: f32, ya: f32, yb: f32) -> Self {
        Edge::Vertical {
            x,
            y0: ya.min(yb),
            y1: ya.max(yb),
        }
    }

    /// Classifies a straight segment; diagonals yield `None`.
    pub fn from_segment(ax: f32, ay: f32, bx: f32, by: f32, tolerance: f32) -> Option<Self> {
        if (ay - by).abs() <= tolerance && (ax - bx).abs() > tolerance {
            Some(Edge::horizontal((ay + by) / 2.0, ax, bx))
        } else if (ax - bx).abs() <= tolerance && (ay - by).abs() > tolerance {
            Some(Edge::vertical((ax + bx) / 2.0, ay, by))
        } else {
            None
        }
    }

    /// Edges drawn by a rectangle. Thin rectangles are rules themselves.
    pub fn from_rect(x: f32, y: f32, width: f32, height: f32, tolerance: f32) -> Vec<Self> {
        let (x0, x1) = (x.min(x + width), x.max(x + width));
        let (y0, y1) = (y.min(y + height), y.max(y + height));
        let (w, h) = (x1 - x0, y1 - y0);
        if w <= tolerance && h <= tolerance {
            return Vec::new();
        }
        if h <= tolerance {
            return vec![Edge::horizontal((y0 + y1) / 2.0, x0, x1)];
        }
        if w <= tolerance {
            return vec![Edge::vertical((x0 + x1) / 2.0, y0, y1)];
        }
        vec![
            Edge::horizontal(y0, x0, x1),
            Edge::horizontal(y1, x0, x1),
            Edge::vertical(x0, y0, y1),
            Edge::vertical(x1, y0, y1),
        ]
    }

    fn length(&self) -> f32 {
        match *self {
            Edge::Horizontal { x0, x1, .. } => x1 - x0,
            Edge::Vertical { y0, y1, .. } => y1 - y0,
        }
    }

    fn touches(&self, other: &Edge, tol: f32) -> bool {
        match (*self, *other) {
            (Edge::Horizontal { y, x0, x1 }, Edge::Vertical { x, y0, y1 })
            | (Edge::Vertical { x, y0, y1 }, Edge::Horizontal { y, x0, x1 }) => {
                x >= x0 - tol && x <= x1 + tol && y >= y0 - tol && y <= y1 + tol
            }
            (
                Edge::Horizontal { y: ya, x0: a0, x1: a1 },
                Edge::Horizontal { y: yb, x0: b0, x1: b1 },
            ) => (ya - yb).abs() <= tol && a0 <= b1 + tol && b0 <= a1 + tol,
            (
                Edge::Vertical { x: xa, y0: a0, y1: a1 },
                Edge::Vertical { x: xb, y0: b0, y1: b1 },
            ) => (xa - xb).abs() <= tol && a0 <= b1 + tol && b0 <= a1 + tol,
        }
    }
}

/// A run of text with its bounding box (`y0` bottom, `y1` top).
#[derive(Debug, Clone, PartialEq)]
pub struct TextFragment {
    pub text: String,
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl TextFragment {
    pub fn new(text: impl Into<String>, x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            text: text.into(),
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    fn center(&self) -> (f32, f32) {
        ((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }
}

/// Tolerances for grid reconstruction, in points.
#[derive(Debug, Clone, Copy)]
pub struct GridSettings {
    /// Rule positions closer than this are the same boundary.
    pub snap_tolerance: f32,
    /// Rules closer than this are considered connected.
    pub join_tolerance: f32,
    /// Shorter rules are ignored (underlines, bullets).
    pub min_edge_length: f32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            snap_tolerance: 3.0,
            join_tolerance: 3.0,
            min_edge_length: 3.0,
        }
    }
}

struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = i;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[rb] = ra;
        }
    }
}

/// Groups sorted-able positions into clusters no wider than `tol` between
/// neighbours; returns the cluster means in ascending order.
fn cluster_positions(mut values: Vec<f32>, tol: f32) -> Vec<f32> {
    values.sort_by(|a, b| a.total_cmp(b));
    let mut out = Vec::new();
    let mut group: Vec<f32> = Vec::new();
    for v in values {
        if let Some(&last) = group.last() {
            if v - last > tol {
                out.push(group.iter().sum::<f32>() / group.len() as f32);
                group.clear();
            }
        }
        group.push(v);
    }
    if !group.is_empty() {
        out.push(group.iter().sum::<f32>() / group.len() as f32);
    }
    out
}

/// Index `i` such that `bounds[i] <= v < bounds[i + 1]` (ascending bounds).
fn slot(bounds: &[f32], v: f32) -> Option<usize> {
    bounds.windows(2).position(|w| v >= w[0] && v < w[1])
}

struct Grid {
    /// Column boundaries, ascending.
    xs: Vec<f32>,
    /// Row boundaries, ascending (last row of the table is slot 0).
    ys: Vec<f32>,
    cells: Vec<Vec<Vec<TextFragment>>>,
}

impl Grid {
    fn new(xs: Vec<f32>, ys: Vec<f32>) -> Self {
        let rows = ys.len() - 1;
        let cols = xs.len() - 1;
        Self {
            cells: vec![vec![Vec::new(); cols]; rows],
            xs,
            ys,
        }
    }

    fn top(&self) -> f32 {
        self.ys.last().copied().unwrap_or(0.0)
    }

    /// Places `fragment` if its centre falls inside the grid.
    fn place(&mut self, fragment: &TextFragment) -> bool {
        let (cx, cy) = fragment.center();
        match (slot(&self.xs, cx), slot(&self.ys, cy)) {
            (Some(col), Some(row)) => {
                self.cells[row][col].push(fragment.clone());
                true
            }
            _ => false,
        }
    }

    fn into_table(self) -> Table {
        let rows = self
            .cells
            .into_iter()
            .rev()
            .map(|row| Row::new(row.into_iter().map(cell_text).collect()))
            .collect();
        Table::new(rows)
    }
}

/// Joins a cell's fragments: top line first, left to right within a line.
fn cell_text(mut fragments: Vec<TextFragment>) -> Option<String> {
    fragments.retain(|f| !f.text.trim().is_empty());
    if fragments.is_empty() {
        return None;
    }
    fragments.sort_by(|a, b| b.center().1.total_cmp(&a.center().1));

    let mut lines: Vec<Vec<TextFragment>> = Vec::new();
    for f in fragments {
        let (_, cy) = f.center();
        let same_line = lines.last().and_then(|line| line.first()).map_or(false, |first| {
            let half = ((first.y1 - first.y0).max(f.y1 - f.y0) / 2.0).max(1.0);
            (first.center().1 - cy).abs() <= half
        });
        if same_line {
            if let Some(line) = lines.last_mut() {
                line.push(f);
            }
        } else {
            lines.push(vec![f]);
        }
    }

    let text = lines
        .into_iter()
        .map(|mut line| {
            line.sort_by(|a, b| a.x0.total_cmp(&b.x0));
            line.iter()
                .map(|f| f.text.trim())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n");
    Some(text)
}

/// Reconstructs the ruled tables described by `edges`, filled with `fragments`.
/// Tables come back ordered top to bottom.
pub fn find_tables(
    edges: &[Edge],
    fragments: &[TextFragment],
    settings: &GridSettings,
) -> Vec<Table> {
    let edges: Vec<Edge> = edges
        .iter()
        .copied()
        .filter(|e| e.length() >= settings.min_edge_length)
        .collect();

    let mut sets = DisjointSet::new(edges.len());
    for i in 0..edges.len() {
        for j in (i + 1)..edges.len() {
            if edges[i].touches(&edges[j], settings.join_tolerance) {
                sets.union(i, j);
            }
        }
    }

    let mut groups: Vec<(usize, Vec<Edge>)> = Vec::new();
    for (i, edge) in edges.iter().enumerate() {
        let root = sets.find(i);
        match groups.iter_mut().find(|(r, _)| *r == root) {
            Some((_, group)) => group.push(*edge),
            None => groups.push((root, vec![*edge])),
        }
    }

    let mut grids: Vec<Grid> = groups
        .into_iter()
        .filter_map(|(_, group)| {
            let xs = cluster_positions(
                group
                    .iter()
                    .filter_map(|e| match *e {
                        Edge::Vertical { x, .. } => Some(x),
                        Edge::Horizontal { .. } => None,
                    })
                    .collect(),
                settings.snap_tolerance,
            );
            let ys = cluster_positions(
                group
                    .iter()
                    .filter_map(|e| match *e {
                        Edge::Horizontal { y, .. } => Some(y),
                        Edge::Vertical { .. } => None,
                    })
                    .collect(),
                settings.snap_tolerance,
            );
            (xs.len() >= 2 && ys.len() >= 2).then(|| Grid::new(xs, ys))
        })
        .collect();

    grids.sort_by(|a, b| b.top().total_cmp(&a.top()));

    for fragment in fragments {
        for grid in grids.iter_mut() {
            if grid.place(fragment) {
                break;
            }
        }
    }

    grids.into_iter().map(Grid::into_table).collect()
}
