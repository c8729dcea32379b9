use std::collections::HashSet;

use failure::Error;

use crate::utils::{a2i, i2a};

/// The menu: an undirected graph pairing ciphertext and crib letters.
///
/// Nodes are letters; an edge records the crib offset at which the two
/// letters encode into each other, so traversing it means running a
/// scrambler with the right rotation advanced by that offset. Construction
/// keeps only the connected subgraph with the most loops (ties broken by
/// node count), because loops are what let the Bombe feed contradictions
/// back on themselves. The most connected letter of the surviving subgraph
/// becomes the test register.
pub(crate) struct Menu {
    edges: [[Option<usize>; 26]; 26],
    adjacency: Vec<Vec<u8>>,
    most_connected: u8,
}

#[derive(Clone, Copy, PartialEq)]
enum NodeState {
    Absent,
    Present,
    Visited,
    Doomed,
}

struct DfsResult {
    loops: usize,
    nodes: usize,
    most_connected: u8,
}

impl Menu {
    pub(crate) fn new(cipher_text: &str, crib: &str) -> Result<Menu, Error> {
        let cipher_text = cipher_text.to_lowercase();
        let crib = crib.to_lowercase();

        if cipher_text.chars().count() != crib.chars().count() {
            bail!("cipher text and crib must be the same length");
        }

        let mut edges = [[None; 26]; 26];
        let mut marks = [NodeState::Absent; 26];

        for (k, (t, b)) in cipher_text.chars().zip(crib.chars()).enumerate() {
            if !t.is_ascii_lowercase() || !b.is_ascii_lowercase() {
                bail!("cipher text and crib may only contain letters a-z");
            }
            if t == b {
                bail!(
                    "position {}: '{}' cannot encode to itself, crib does not fit here",
                    k,
                    t
                );
            }

            let t = a2i(t) as usize;
            let b = a2i(b) as usize;

            edges[t][b] = Some(k + 1);
            edges[b][t] = Some(k + 1);

            marks[t] = NodeState::Present;
            marks[b] = NodeState::Present;
        }

        // Walk every subgraph once; keep the best by (loops, nodes) and tear
        // the losers out of the matrix as soon as they are beaten, before any
        // later walk can disturb their markers.
        let mut explored = HashSet::new();
        let mut best: Option<DfsResult> = None;

        for i in 0..26 {
            if marks[i] != NodeState::Present {
                continue;
            }

            let result = dfs(&edges, &mut marks, &mut explored, i);

            let beats_best = match &best {
                None => true,
                Some(b) => {
                    result.loops > b.loops
                        || (result.loops == b.loops && result.nodes > b.nodes)
                }
            };

            if beats_best {
                if let Some(b) = &best {
                    destroy(&mut edges, &mut marks, b.most_connected as usize);
                }
                best = Some(result);
            } else {
                destroy(&mut edges, &mut marks, i);
            }
        }

        let best = match best {
            Some(best) => best,
            None => bail!("menu does not contain any connected letters"),
        };

        debug!(
            "menu subgraph: {} loops, {} nodes, test register {}",
            best.loops,
            best.nodes,
            i2a(best.most_connected)
        );

        let mut adjacency = Vec::with_capacity(26);
        for i in 0..26 {
            let mut neighbors = Vec::new();
            for j in 0..26 {
                if j != i && edges[i][j].is_some() {
                    neighbors.push(j as u8);
                }
            }
            adjacency.push(neighbors);
        }

        Ok(Menu {
            edges,
            adjacency,
            most_connected: best.most_connected,
        })
    }

    /// The rotation to add to the right rotor when traversing the edge
    /// between two adjacent letters.
    pub(crate) fn crib_offset(&self, a: u8, b: u8) -> usize {
        self.edges[a as usize][b as usize].expect("no menu edge between adjacent letters")
    }

    pub(crate) fn adjacent(&self, letter: u8) -> &[u8] {
        &self.adjacency[letter as usize]
    }

    pub(crate) fn most_connected(&self) -> u8 {
        self.most_connected
    }
}

/// Walks the subgraph containing `start`, counting nodes, loop-closing edges
/// and the node with the most connections.
fn dfs(
    edges: &[[Option<usize>; 26]; 26],
    marks: &mut [NodeState; 26],
    explored: &mut HashSet<usize>,
    start: usize,
) -> DfsResult {
    let mut loops = 0;
    let mut nodes = 0;
    let mut most_connected = start as u8;
    let mut max_connections = 0;

    let mut chain = vec![start];
    marks[start] = NodeState::Visited;

    while let Some(u) = chain.pop() {
        nodes += 1;

        let mut connections = 0;

        for v in 0..26 {
            let offset = match edges[u][v] {
                Some(offset) if v != u => offset,
                _ => continue,
            };

            connections += 1;

            if !explored.insert(offset) {
                continue;
            }

            match marks[v] {
                NodeState::Present => {
                    marks[v] = NodeState::Visited;
                    chain.push(v);
                }
                // an edge into an already visited node closes a loop
                NodeState::Visited => loops += 1,
                _ => {}
            }
        }

        if connections > max_connections {
            max_connections = connections;
            most_connected = u as u8;
        }
    }

    DfsResult {
        loops,
        nodes,
        most_connected,
    }
}

/// Removes the whole subgraph containing `seed` from the matrix.
fn destroy(edges: &mut [[Option<usize>; 26]; 26], marks: &mut [NodeState; 26], seed: usize) {
    let mut chain = vec![seed];
    marks[seed] = NodeState::Doomed;

    while let Some(u) = chain.pop() {
        for v in 0..26 {
            if v == u || edges[u][v].is_none() {
                continue;
            }
            if marks[v] == NodeState::Visited {
                marks[v] = NodeState::Doomed;
                chain.push(v);
            }
        }
    }

    for i in 0..26 {
        if marks[i] == NodeState::Doomed {
            for j in 0..26 {
                edges[i][j] = None;
                edges[j][i] = None;
            }
            marks[i] = NodeState::Absent;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Menu;

    #[test]
    fn rejects_self_encoding() {
        assert!(Menu::new("a", "a").is_err());
        assert!(Menu::new("xAx", "ppX").is_err());
    }

    #[test]
    fn rejects_length_mismatch() {
        assert!(Menu::new("abc", "de").is_err());
    }

    #[test]
    fn rejects_non_letters() {
        assert!(Menu::new("a1", "bc").is_err());
    }

    #[test]
    fn rejects_empty_input() {
        assert!(Menu::new("", "").is_err());
    }

    #[test]
    fn symmetry() {
        let menu = Menu::new("abad", "bcce").unwrap();
        for i in 0..26u8 {
            for &j in menu.adjacent(i) {
                assert_eq!(menu.crib_offset(i, j), menu.crib_offset(j, i));
            }
        }
    }

    #[test]
    fn keeps_subgraph_with_most_loops() {
        // a-b-c forms a triangle (one loop), d-e is a lone edge
        let menu = Menu::new("abad", "bcce").unwrap();

        assert_eq!(0, menu.most_connected());
        assert_eq!(&[1, 2], menu.adjacent(0));
        assert_eq!(1, menu.crib_offset(0, 1));
        assert_eq!(2, menu.crib_offset(1, 2));
        assert_eq!(3, menu.crib_offset(0, 2));

        // the losing subgraph is gone
        assert!(menu.adjacent(3).is_empty());
        assert!(menu.adjacent(4).is_empty());
    }

    #[test]
    fn node_count_breaks_loop_ties() {
        // {a,b} has two nodes, {c,d,e} has three; neither has a loop
        let menu = Menu::new("acc", "bde").unwrap();

        assert_eq!(2, menu.most_connected());
        assert_eq!(2, menu.adjacent(2).len());
        assert!(menu.adjacent(0).is_empty());
        assert!(menu.adjacent(1).is_empty());
    }

    #[test]
    fn later_position_wins_between_same_letters() {
        // the pair (a,b) appears at offsets 1 and 3; the matrix keeps 3
        let menu = Menu::new("aba", "bcb").unwrap();
        assert_eq!(3, menu.crib_offset(0, 1));
    }
}
