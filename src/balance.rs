use crate::{Bisection, CenterSearch, Graph, Group};

/// Largest size difference tolerated between the two sides of a component with
/// `component_size` vertices.
pub fn allowed_margin(margin_percent: u32, component_size: usize) -> usize {
    margin_percent as usize * component_size / 100
}

impl Graph {
    /// Migrates vertices from the larger side to the smaller one until the size difference is
    /// within `allowed_margin`.
    ///
    /// Candidates are tried by ascending eccentricity (then id). A move is accepted only if
    /// the vertex touches the receiving side and the donor stays connected without it. Each
    /// accepted move shrinks the difference by two, so the loop gives up once the difference
    /// is one or no candidate qualifies. Returns false when the margin cannot be met; the tags
    /// are then left mid-migration and the caller must discard the bisection.
    pub fn balance(
        &mut self,
        bisection: &mut Bisection,
        search: &CenterSearch,
        allowed_margin: usize,
    ) -> bool {
        while bisection.size_difference() > allowed_margin {
            if bisection.size_difference() <= 1 {
                log::debug!(
                    "component {}: difference of 1 exceeds margin {allowed_margin}",
                    bisection.component
                );
                return false;
            }

            // A fresh bisection never has the larger remainder here; hand-built ones can.
            let (from, to) = if bisection.grown.len() > bisection.remainder.len() {
                (Group::Grown, Group::Remainder)
            } else {
                (Group::Remainder, Group::Grown)
            };
            let (donor, receiver) = match from {
                Group::Grown => (&bisection.grown, &bisection.remainder),
                _ => (&bisection.remainder, &bisection.grown),
            };

            let mut candidates = donor.clone();
            candidates.sort_unstable_by_key(|&vx| (search.eccentricity(vx), vx));
            let donor_len = donor.len();
            let receiver_empty = receiver.is_empty();

            let Some(vx) = candidates
                .into_iter()
                .find(|&vx| self.can_migrate(vx, from, to, donor_len, receiver_empty))
            else {
                log::debug!(
                    "component {}: no vertex can move without disconnecting a side (sizes {} / {})",
                    bisection.component,
                    bisection.grown.len(),
                    bisection.remainder.len()
                );
                return false;
            };

            self.set_group(vx, to);
            let (donor, receiver) = match from {
                Group::Grown => (&mut bisection.grown, &mut bisection.remainder),
                _ => (&mut bisection.remainder, &mut bisection.grown),
            };
            if let Some(pos) = donor.iter().position(|&d| d == vx) {
                donor.swap_remove(pos);
            }
            receiver.push(vx);
            log::trace!("moved {vx} to {to:?}, difference now {}", bisection.size_difference());
        }
        true
    }

    fn can_migrate(
        &self,
        vx: u32,
        from: Group,
        to: Group,
        donor_len: usize,
        receiver_empty: bool,
    ) -> bool {
        // The receiving side is connected, so it stays connected iff `vx` touches it.
        let touches = receiver_empty
            || self
                .neighbours(vx)
                .iter()
                .any(|&n| self.vertices[n as usize].group == to);
        if !touches {
            return false;
        }
        donor_len <= 2 || self.group_connected_without(vx, from)
    }
}
