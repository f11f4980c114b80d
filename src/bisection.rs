use crate::{CenterSearch, Graph, Group};

/// Two-sided split of one component, mirrored by the vertices' [`Group`] tags.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Bisection {
    pub component: u32,
    /// Vertices grown from the center, tagged [`Group::Grown`].
    pub grown: Vec<u32>,
    /// The rest of the component, tagged [`Group::Remainder`].
    pub remainder: Vec<u32>,
}

impl Bisection {
    /// Absolute difference between the two side sizes.
    pub fn size_difference(&self) -> usize {
        self.grown.len().abs_diff(self.remainder.len())
    }
}

impl Graph {
    /// Splits the searched component in two by growing a side from its center.
    ///
    /// Growth keeps a stack of frontier vertices. The top vertex adds its unvisited neighbour
    /// with the largest eccentricity (lowest id on ties) and both go back on the stack; a
    /// vertex without such a neighbour is dropped. Growth stops at half the component or when
    /// the stack runs dry. Components with fewer than two vertices cannot be bisected.
    pub fn bisect(&mut self, search: &CenterSearch) -> Option<Bisection> {
        let component = search.component;
        let size = search.component_size();
        if size < 2 {
            return None;
        }
        let target = size / 2;

        let mut visited = vec![false; self.vertices.len()];
        let mut grown = vec![search.center];
        let mut stack = vec![search.center];
        visited[search.center as usize] = true;
        self.set_group(search.center, Group::Grown);

        while grown.len() < target {
            let Some(current) = stack.pop() else {
                break;
            };

            let mut next: Option<u32> = None;
            for &n in self.neighbours(current) {
                if visited[n as usize] || self.vertices[n as usize].component != component {
                    continue;
                }
                let better = match next {
                    None => true,
                    Some(best) => {
                        let (ecc, best_ecc) = (search.eccentricity(n), search.eccentricity(best));
                        ecc > best_ecc || (ecc == best_ecc && n < best)
                    }
                };
                if better {
                    next = Some(n);
                }
            }

            if let Some(n) = next {
                stack.push(current);
                stack.push(n);
                visited[n as usize] = true;
                grown.push(n);
                self.set_group(n, Group::Grown);
                log::trace!("grew {n} from {current}");
            }
        }

        let mut remainder = Vec::with_capacity(size - grown.len());
        for vx in 0..self.vertices.len() as u32 {
            if !visited[vx as usize] && self.vertices[vx as usize].component == component {
                remainder.push(vx);
                self.set_group(vx, Group::Remainder);
            }
        }

        Some(Bisection {
            component,
            grown,
            remainder,
        })
    }

    /// Makes the remainder side connected by keeping its largest piece and handing every other
    /// piece to the grown side. Of equally large pieces the one holding the lowest id is kept.
    /// Returns how many vertices changed sides.
    pub fn repair_remainder(&mut self, bisection: &mut Bisection) -> usize {
        let mut pieces = self.group_pieces(&bisection.remainder, Group::Remainder);
        if pieces.len() <= 1 {
            return 0;
        }

        // Pieces start at their smallest member, so the first of the largest wins the tie.
        let mut keep = 0;
        for (i, piece) in pieces.iter().enumerate() {
            if piece.len() > pieces[keep].len() {
                keep = i;
            }
        }

        let mut kept = pieces.remove(keep);
        kept.sort_unstable();

        let mut moved = 0;
        for vx in pieces.into_iter().flatten() {
            self.set_group(vx, Group::Grown);
            bisection.grown.push(vx);
            moved += 1;
        }
        bisection.remainder = kept;

        log::debug!(
            "component {}: moved {moved} disconnected remainder vertices to the grown side",
            bisection.component
        );
        moved
    }
}
