//! Persistent planned routes: circular or ping-pong.

use crate::network::VertiportId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteKind {
    /// First stop equals last stop; indices wrap around.
    Circular,
    /// Open route traversed forward then backward, re-flying the end edges.
    PingPong,
}

/// Ordered stop list with a cursor.
///
/// `peek_next` and `advance` share one index rule, so a preview always
/// matches the commit that follows it.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedRoute {
    stops: Vec<VertiportId>,
    kind: RouteKind,
    index: usize,
    reversed: bool,
}

impl PlannedRoute {
    /// Returns `None` for fewer than two stops.
    pub fn new(stops: Vec<VertiportId>) -> Option<Self> {
        if stops.len() < 2 {
            return None;
        }
        let kind = if stops.first() == stops.last() {
            RouteKind::Circular
        } else {
            RouteKind::PingPong
        };
        Some(Self {
            stops,
            kind,
            index: 0,
            reversed: false,
        })
    }

    pub fn kind(&self) -> RouteKind {
        self.kind
    }

    pub fn stops(&self) -> &[VertiportId] {
        &self.stops
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    pub fn current_stop(&self) -> VertiportId {
        self.stops[self.index]
    }

    fn next_position(&self) -> (usize, bool) {
        let n = self.stops.len();
        let i = self.index;
        match self.kind {
            RouteKind::Circular => ((i + 1) % n, self.reversed),
            RouteKind::PingPong if !self.reversed => {
                if i + 1 == n {
                    (i - 1, true)
                } else {
                    (i + 1, false)
                }
            }
            RouteKind::PingPong => {
                if i == 0 {
                    (1, false)
                } else {
                    (i - 1, true)
                }
            }
        }
    }

    /// Stop the next `advance` will move to, without moving.
    pub fn peek_next(&self) -> VertiportId {
        self.stops[self.next_position().0]
    }

    /// Move the cursor to the next stop and return it.
    pub fn advance(&mut self) -> VertiportId {
        let (index, reversed) = self.next_position();
        self.index = index;
        self.reversed = reversed;
        self.stops[index]
    }
}
