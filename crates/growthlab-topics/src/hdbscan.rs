//! Hierarchical density-based clustering (HDBSCAN) with excess-of-mass selection
//!
//! Pipeline: core distances, mutual reachability graph, minimum spanning tree,
//! single-linkage hierarchy, condensed tree, cluster stability, selection,
//! labelling. Points outside every selected cluster are labelled -1.

use petgraph::algo::min_spanning_tree;
use petgraph::data::Element;
use petgraph::graph::UnGraph;
use std::collections::{HashMap, HashSet, VecDeque};

pub const NOISE: i64 = -1;

#[derive(Debug, Clone, Copy)]
pub struct Hdbscan {
    pub min_cluster_size: usize,
    pub min_samples: usize,
    pub allow_single_cluster: bool,
}

#[derive(Debug, Clone, Copy)]
struct MergeStep {
    left: usize,
    right: usize,
    distance: f64,
    size: usize,
}

#[derive(Debug, Clone, Copy)]
struct CondensedEdge {
    parent: usize,
    child: usize,
    lambda: f64,
    size: usize,
}

impl Hdbscan {
    pub fn new(min_cluster_size: usize, min_samples: usize, allow_single_cluster: bool) -> Self {
        Self {
            min_cluster_size: min_cluster_size.max(2),
            min_samples: min_samples.max(1),
            allow_single_cluster,
        }
    }

    /// Cluster labels per point, dense from 0 in cluster-creation order; -1 is noise
    pub fn fit_predict(&self, points: &[Vec<f32>]) -> Vec<i64> {
        let n = points.len();
        if n < 2 {
            return vec![NOISE; n];
        }

        let distances = pairwise_distances(points);
        let core = self.core_distances(&distances);
        let mst = mutual_reachability_mst(&distances, &core);
        let hierarchy = single_linkage(n, mst);
        let condensed = self.condense(n, &hierarchy);
        let selected = self.select_clusters(n, &condensed);
        self.label_points(n, &condensed, &selected)
    }

    /// Distance to the k-th nearest other point, k = min(min_samples, n - 1)
    fn core_distances(&self, distances: &[Vec<f64>]) -> Vec<f64> {
        let n = distances.len();
        let k = self.min_samples.min(n - 1).max(1);
        distances
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let mut others: Vec<f64> = row
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != i)
                    .map(|(_, &d)| d)
                    .collect();
                others.sort_by(|a, b| a.total_cmp(b));
                others[k - 1]
            })
            .collect()
    }

    fn condense(&self, n: usize, hierarchy: &[MergeStep]) -> Vec<CondensedEdge> {
        let root = 2 * n - 2;
        let mut relabel = vec![0usize; 2 * n - 1];
        relabel[root] = n;
        let mut next_label = n + 1;
        let mut ignore = vec![false; 2 * n - 1];
        let mut out = Vec::new();

        let node_size = |node: usize| {
            if node < n {
                1
            } else {
                hierarchy[node - n].size
            }
        };

        for node in bfs_hierarchy(n, hierarchy, root) {
            if node < n || ignore[node] {
                continue;
            }
            let step = hierarchy[node - n];
            let lambda = lambda_of(step.distance);
            let parent = relabel[node];
            let left_size = node_size(step.left);
            let right_size = node_size(step.right);
            let left_big = left_size >= self.min_cluster_size;
            let right_big = right_size >= self.min_cluster_size;

            let mut spill = |branch: usize, out: &mut Vec<CondensedEdge>| {
                for sub in bfs_hierarchy(n, hierarchy, branch) {
                    if sub < n {
                        out.push(CondensedEdge {
                            parent,
                            child: sub,
                            lambda,
                            size: 1,
                        });
                    }
                    ignore[sub] = true;
                }
            };

            match (left_big, right_big) {
                (true, true) => {
                    for (branch, size) in [(step.left, left_size), (step.right, right_size)] {
                        relabel[branch] = next_label;
                        out.push(CondensedEdge {
                            parent,
                            child: next_label,
                            lambda,
                            size,
                        });
                        next_label += 1;
                    }
                }
                (false, false) => {
                    spill(step.left, &mut out);
                    spill(step.right, &mut out);
                }
                (false, true) => {
                    relabel[step.right] = parent;
                    spill(step.left, &mut out);
                }
                (true, false) => {
                    relabel[step.left] = parent;
                    spill(step.right, &mut out);
                }
            }
        }
        out
    }

    /// Excess-of-mass selection over the condensed tree
    fn select_clusters(&self, n: usize, condensed: &[CondensedEdge]) -> Vec<usize> {
        let root = n;
        let max_label = condensed
            .iter()
            .map(|e| e.parent.max(e.child))
            .max()
            .unwrap_or(root);

        let mut births = vec![0.0f64; max_label + 1];
        for e in condensed.iter().filter(|e| e.child >= n) {
            births[e.child] = e.lambda;
        }
        let mut stability = vec![0.0f64; max_label + 1];
        for e in condensed {
            stability[e.parent] += (e.lambda - births[e.parent]) * e.size as f64;
        }

        let mut children: HashMap<usize, Vec<usize>> = HashMap::new();
        for e in condensed.iter().filter(|e| e.child >= n) {
            children.entry(e.parent).or_default().push(e.child);
        }

        let first = if self.allow_single_cluster { root } else { root + 1 };
        let mut is_cluster = vec![false; max_label + 1];
        for flag in is_cluster.iter_mut().skip(first) {
            *flag = true;
        }

        for node in (first..=max_label).rev() {
            let kids = children.get(&node).map(Vec::as_slice).unwrap_or(&[]);
            let child_stability: f64 = kids.iter().map(|&c| stability[c]).sum();
            if child_stability > stability[node] {
                is_cluster[node] = false;
                stability[node] = child_stability;
            } else {
                let mut queue: VecDeque<usize> = kids.iter().copied().collect();
                while let Some(sub) = queue.pop_front() {
                    is_cluster[sub] = false;
                    if let Some(grand) = children.get(&sub) {
                        queue.extend(grand.iter().copied());
                    }
                }
            }
        }

        (first..=max_label).filter(|&c| is_cluster[c]).collect()
    }

    fn label_points(&self, n: usize, condensed: &[CondensedEdge], selected: &[usize]) -> Vec<i64> {
        let root = n;
        let selected_set: HashSet<usize> = selected.iter().copied().collect();
        let dense: HashMap<usize, i64> = selected
            .iter()
            .enumerate()
            .map(|(i, &c)| (c, i as i64))
            .collect();

        let mut parent_of: HashMap<usize, usize> = HashMap::new();
        let mut point_lambda = vec![0.0f64; n];
        for e in condensed {
            parent_of.insert(e.child, e.parent);
            if e.child < n {
                point_lambda[e.child] = e.lambda;
            }
        }
        let root_max_lambda = condensed
            .iter()
            .filter(|e| e.parent == root)
            .map(|e| e.lambda)
            .fold(0.0f64, f64::max);
        let single_root = self.allow_single_cluster && selected == [root];

        (0..n)
            .map(|point| {
                let mut cluster = parent_of.get(&point).copied().unwrap_or(root);
                while cluster != root && !selected_set.contains(&cluster) {
                    cluster = parent_of.get(&cluster).copied().unwrap_or(root);
                }
                if cluster != root {
                    return dense[&cluster];
                }
                if single_root && point_lambda[point] >= root_max_lambda {
                    dense[&root]
                } else {
                    NOISE
                }
            })
            .collect()
    }
}

impl From<&growthlab_core::TopicConfig> for Hdbscan {
    fn from(cfg: &growthlab_core::TopicConfig) -> Self {
        Self::new(cfg.min_cluster_size, cfg.min_samples, cfg.allow_single_cluster)
    }
}

fn lambda_of(distance: f64) -> f64 {
    1.0 / distance.max(1e-12)
}

fn pairwise_distances(points: &[Vec<f32>]) -> Vec<Vec<f64>> {
    let n = points.len();
    let mut out = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = points[i]
                .iter()
                .zip(&points[j])
                .map(|(a, b)| f64::from(a - b).powi(2))
                .sum::<f64>()
                .sqrt();
            out[i][j] = d;
            out[j][i] = d;
        }
    }
    out
}

/// Minimum spanning tree of the complete mutual-reachability graph,
/// edges sorted by weight ascending
fn mutual_reachability_mst(distances: &[Vec<f64>], core: &[f64]) -> Vec<(usize, usize, f64)> {
    let n = distances.len();
    let mut graph: UnGraph<usize, f64> = UnGraph::with_capacity(n, n * (n - 1) / 2);
    let nodes: Vec<_> = (0..n).map(|i| graph.add_node(i)).collect();
    for i in 0..n {
        for j in (i + 1)..n {
            let weight = distances[i][j].max(core[i]).max(core[j]);
            graph.add_edge(nodes[i], nodes[j], weight);
        }
    }

    let mut edges: Vec<(usize, usize, f64)> = min_spanning_tree(&graph)
        .filter_map(|element| match element {
            Element::Edge {
                source,
                target,
                weight,
            } => Some((source, target, weight)),
            Element::Node { .. } => None,
        })
        .collect();
    edges.sort_by(|a, b| a.2.total_cmp(&b.2));
    edges
}

/// Merge MST edges in weight order into a binary hierarchy. Step `i`
/// creates node `n + i`.
fn single_linkage(n: usize, mst: Vec<(usize, usize, f64)>) -> Vec<MergeStep> {
    let mut parent: Vec<usize> = (0..2 * n - 1).collect();
    let mut size = vec![1usize; 2 * n - 1];
    let mut steps = Vec::with_capacity(n - 1);

    fn find(parent: &mut [usize], mut x: usize) -> usize {
        while parent[x] != x {
            parent[x] = parent[parent[x]];
            x = parent[x];
        }
        x
    }

    for (a, b, distance) in mst {
        let left = find(&mut parent, a);
        let right = find(&mut parent, b);
        let node = n + steps.len();
        parent[left] = node;
        parent[right] = node;
        size[node] = size[left] + size[right];
        steps.push(MergeStep {
            left,
            right,
            distance,
            size: size[node],
        });
    }
    steps
}

fn bfs_hierarchy(n: usize, hierarchy: &[MergeStep], start: usize) -> Vec<usize> {
    let mut order = Vec::new();
    let mut queue = VecDeque::from([start]);
    while let Some(node) = queue.pop_front() {
        order.push(node);
        if node >= n {
            let step = hierarchy[node - n];
            queue.push_back(step.left);
            queue.push_back(step.right);
        }
    }
    order
}
