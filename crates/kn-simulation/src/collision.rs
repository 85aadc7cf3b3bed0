use kn_core::Position;

/// A static point that can be gathered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Item {
    /// Where the item lies.
    pub position: Position,
    /// Hit radius of the item.
    pub radius: f64,
}

/// A moving hit-test segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gatherer {
    /// Position at the start of the tick.
    pub start: Position,
    /// Position at the end of the tick.
    pub end: Position,
    /// Hit radius of the gatherer.
    pub radius: f64,
}

/// Source of items and gatherers for [`find_gather_events`].
pub trait ItemGathererProvider {
    /// Number of items.
    fn item_count(&self) -> usize;
    /// The item at `idx`, for `idx < item_count()`.
    fn item(&self, idx: usize) -> Item;
    /// Number of gatherers.
    fn gatherer_count(&self) -> usize;
    /// The gatherer at `idx`, for `idx < gatherer_count()`.
    fn gatherer(&self, idx: usize) -> Gatherer;
}

/// A gatherer passing close enough to an item to collect it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GatherEvent {
    /// Index of the gatherer in the provider.
    pub gatherer_id: usize,
    /// Index of the item in the provider.
    pub item_id: usize,
    /// Squared distance from the item to the gatherer's path.
    pub sq_distance: f64,
    /// Fraction of the gatherer's path travelled at the closest approach, in `0.0..=1.0`.
    pub time: f64,
}

/// Closest approach of a point to a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollectionResult {
    /// Squared distance from the point to the segment's supporting line.
    pub sq_distance: f64,
    /// Projection of the point onto the segment, as a fraction of its length.
    pub proj_ratio: f64,
}

impl CollectionResult {
    /// The point is collected when its projection falls on the segment and it
    /// lies within `collect_radius` of it.
    pub fn is_collected(&self, collect_radius: f64) -> bool {
        (0.0..=1.0).contains(&self.proj_ratio)
            && self.sq_distance <= collect_radius * collect_radius
    }
}

/// Project `c` onto the segment `a`-`b`. The segment must have non-zero length.
pub fn try_collect_point(a: Position, b: Position, c: Position) -> CollectionResult {
    let u_x = c.x - a.x;
    let u_y = c.y - a.y;
    let v_x = b.x - a.x;
    let v_y = b.y - a.y;
    let u_dot_v = u_x * v_x + u_y * v_y;
    let u_len2 = u_x * u_x + u_y * u_y;
    let v_len2 = v_x * v_x + v_y * v_y;

    CollectionResult {
        sq_distance: u_len2 - (u_dot_v * u_dot_v) / v_len2,
        proj_ratio: u_dot_v / v_len2,
    }
}

/// Find every (gatherer, item) pair that meets during the tick.
///
/// Stationary gatherers never collect anything. Events are ordered by the
/// time of closest approach along each gatherer's own path; equal times keep
/// discovery order. The same item may appear in several events: deciding
/// who actually gets it is up to the caller.
pub fn find_gather_events(provider: &impl ItemGathererProvider) -> Vec<GatherEvent> {
    let mut events = Vec::new();

    for gatherer_id in 0..provider.gatherer_count() {
        let gatherer = provider.gatherer(gatherer_id);
        if gatherer.start == gatherer.end {
            continue;
        }

        for item_id in 0..provider.item_count() {
            let item = provider.item(item_id);
            let result = try_collect_point(gatherer.start, gatherer.end, item.position);
            if result.is_collected(gatherer.radius + item.radius) {
                events.push(GatherEvent {
                    gatherer_id,
                    item_id,
                    sq_distance: result.sq_distance,
                    time: result.proj_ratio,
                });
            }
        }
    }

    events.sort_by(|lhs, rhs| lhs.time.total_cmp(&rhs.time));
    events
}

/// A provider backed by two vectors.
#[derive(Debug, Clone, Default)]
pub struct VecProvider {
    items: Vec<Item>,
    gatherers: Vec<Gatherer>,
}

impl VecProvider {
    /// Wrap the given items and gatherers.
    pub fn new(items: Vec<Item>, gatherers: Vec<Gatherer>) -> Self {
        Self { items, gatherers }
    }
}

impl ItemGathererProvider for VecProvider {
    fn item_count(&self) -> usize {
        self.items.len()
    }

    fn item(&self, idx: usize) -> Item {
        self.items[idx]
    }

    fn gatherer_count(&self) -> usize {
        self.gatherers.len()
    }

    fn gatherer(&self, idx: usize) -> Gatherer {
        self.gatherers[idx]
    }
}
