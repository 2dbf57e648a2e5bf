use nalgebra::Vector2;

// ---------------------------------------------------------------------------
// Course: cyclic list of position references
// ---------------------------------------------------------------------------

/// Ordered waypoints flown in a loop. After the last waypoint the course
/// wraps back to the first.
#[derive(Debug, Clone)]
pub struct Course {
    pub name: String,
    waypoints: Vec<Vector2<f64>>,
    index: usize,
}

impl Course {
    /// Returns `None` for an empty waypoint list.
    pub fn new(name: impl Into<String>, waypoints: Vec<Vector2<f64>>) -> Option<Self> {
        if waypoints.is_empty() {
            return None;
        }
        Some(Self { name: name.into(), waypoints, index: 0 })
    }

    /// Waypoint currently used as the position reference.
    pub fn current(&self) -> Vector2<f64> {
        self.waypoints[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Move to the next waypoint, wrapping around, and return it.
    pub fn advance(&mut self) -> Vector2<f64> {
        self.index = (self.index + 1) % self.waypoints.len();
        self.current()
    }
}

// ---------------------------------------------------------------------------
// Arena: rectangular flight volume
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Arena {
    pub fn contains(&self, p: &Vector2<f64>) -> bool {
        p.x > self.x_min && p.x < self.x_max && p.y > self.y_min && p.y < self.y_max
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self { x_min: -40.0, x_max: 40.0, y_min: -5.0, y_max: 18.0 }
    }
}

// ---------------------------------------------------------------------------
// Preset courses
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;

    /// Six-point tour of the default arena starting at the origin.
    pub fn tour() -> Course {
        let points = [
            (0.0, 0.0),
            (0.0, 10.0),
            (25.0, 10.0),
            (-30.0, 2.0),
            (0.0, 15.0),
            (30.0, 0.0),
        ];
        Course {
            name: "Tour".into(),
            waypoints: points.iter().map(|&(x, y)| Vector2::new(x, y)).collect(),
            index: 0,
        }
    }

    /// Climb to 10 m and hold.
    pub fn hover() -> Course {
        Course {
            name: "Hover".into(),
            waypoints: vec![Vector2::new(0.0, 10.0)],
            index: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_course_rejected() {
        assert!(Course::new("none", vec![]).is_none());
    }

    #[test]
    fn tour_wraps_after_last_waypoint() {
        let mut c = presets::tour();
        assert_eq!(c.current(), Vector2::new(0.0, 0.0));
        for _ in 0..c.len() - 1 {
            c.advance();
        }
        assert_eq!(c.current(), Vector2::new(30.0, 0.0));
        assert_eq!(c.advance(), Vector2::new(0.0, 0.0));
        assert_eq!(c.index(), 0);
    }

    #[test]
    fn arena_bounds() {
        let a = Arena::default();
        assert!(a.contains(&Vector2::new(0.0, 0.0)));
        assert!(a.contains(&Vector2::new(-39.0, 17.0)));
        assert!(!a.contains(&Vector2::new(41.0, 5.0)));
        assert!(!a.contains(&Vector2::new(0.0, -6.0)));
    }
}
