//! Touch Gesture Recognition
//!
//! Recognizes scene gestures from raw touch events:
//! - Tap: quick touch + release → click the entity under the finger
//! - Double-tap: two taps within 300ms → reset the camera
//! - Drag: one finger moving → orbit the camera
//! - Pinch: two fingers → zoom
//!
//! Timestamps are seconds from the host clock (egui's `input.time`), so the
//! recognizer stays deterministic under test.

/// Touch point
#[derive(Debug, Clone, Copy)]
pub struct TouchPoint {
    pub x: f32,
    pub y: f32,
    pub id: u64,
    pub time: f64,
}

/// Recognized gesture
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    /// Single tap at position
    Tap { x: f32, y: f32 },
    /// Double-tap at position
    DoubleTap { x: f32, y: f32 },
    /// One-finger drag delta since the previous move
    Drag { dx: f32, dy: f32 },
    /// Incremental pinch scale since the previous move (> 1 = fingers apart)
    Pinch { scale: f32, center_x: f32, center_y: f32 },
    /// No gesture detected yet
    None,
}

/// Touch gesture state machine.
pub struct GestureRecognizer {
    /// Current active touches
    touches: Vec<TouchPoint>,
    /// First touch point (for gesture start)
    start_point: Option<TouchPoint>,
    /// Last tap time and position (for double-tap detection)
    last_tap: Option<(f64, f32, f32)>,
    /// Finger spread at the previous pinch move
    pinch_distance: Option<f32>,
    /// Double tap threshold in seconds
    double_tap_secs: f64,
    /// Taps longer than this are ignored
    tap_max_secs: f64,
    /// Movement below this stays a tap
    tap_slop: f32,
    /// Whether a drag is in progress
    is_dragging: bool,
    /// A second finger touched down during this gesture
    was_multi_touch: bool,
    /// Total drag distance (for distinguishing tap from drag)
    drag_distance: f32,
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureRecognizer {
    pub fn new() -> Self {
        Self {
            touches: Vec::with_capacity(4),
            start_point: None,
            last_tap: None,
            pinch_distance: None,
            double_tap_secs: 0.3,
            tap_max_secs: 0.5,
            tap_slop: 10.0,
            is_dragging: false,
            was_multi_touch: false,
            drag_distance: 0.0,
        }
    }

    /// Process touch start event
    pub fn touch_start(&mut self, x: f32, y: f32, id: u64, time: f64) {
        let point = TouchPoint { x, y, id, time };
        self.touches.retain(|t| t.id != id);
        self.touches.push(point);
        match self.touches.len() {
            1 => {
                self.start_point = Some(point);
                self.is_dragging = false;
                self.was_multi_touch = false;
                self.drag_distance = 0.0;
                self.pinch_distance = None;
            }
            2 => {
                self.was_multi_touch = true;
                self.pinch_distance = Some(self.spread());
            }
            _ => self.was_multi_touch = true,
        }
    }

    fn spread(&self) -> f32 {
        let t0 = self.touches[0];
        let t1 = self.touches[1];
        ((t0.x - t1.x).powi(2) + (t0.y - t1.y).powi(2)).sqrt()
    }

    /// Process touch move event.
    pub fn touch_move(&mut self, x: f32, y: f32, id: u64) -> Gesture {
        let Some(touch) = self.touches.iter_mut().find(|t| t.id == id) else {
            return Gesture::None;
        };
        let dx = x - touch.x;
        let dy = y - touch.y;
        touch.x = x;
        touch.y = y;

        if self.touches.len() >= 2 {
            let current = self.spread();
            let previous = self.pinch_distance.replace(current);
            return match previous {
                Some(prev) if prev > 1.0 => {
                    let t0 = self.touches[0];
                    let t1 = self.touches[1];
                    Gesture::Pinch {
                        scale: current / prev,
                        center_x: (t0.x + t1.x) * 0.5,
                        center_y: (t0.y + t1.y) * 0.5,
                    }
                }
                _ => Gesture::None,
            };
        }

        self.drag_distance += (dx * dx + dy * dy).sqrt();
        if self.was_multi_touch {
            return Gesture::None;
        }
        if self.is_dragging || self.drag_distance > self.tap_slop {
            self.is_dragging = true;
            return Gesture::Drag { dx, dy };
        }
        Gesture::None
    }

    /// Process touch end event. Returns the recognized gesture.
    pub fn touch_end(&mut self, x: f32, y: f32, id: u64, time: f64) -> Gesture {
        self.touches.retain(|t| t.id != id);
        if self.touches.len() < 2 {
            self.pinch_distance = None;
        }
        if !self.touches.is_empty() {
            return Gesture::None;
        }

        let Some(start) = self.start_point.take() else {
            return Gesture::None;
        };
        if self.was_multi_touch || self.is_dragging {
            return Gesture::None;
        }

        let dist = ((x - start.x).powi(2) + (y - start.y).powi(2)).sqrt();
        if dist >= self.tap_slop || time - start.time > self.tap_max_secs {
            return Gesture::None;
        }

        if let Some((last_time, lx, ly)) = self.last_tap {
            let pos_dist = ((x - lx).powi(2) + (y - ly).powi(2)).sqrt();
            if time - last_time < self.double_tap_secs && pos_dist < 50.0 {
                self.last_tap = None;
                return Gesture::DoubleTap { x, y };
            }
        }

        self.last_tap = Some((time, x, y));
        Gesture::Tap { x, y }
    }

    /// Drop all in-flight touches (host lost focus, touch cancelled).
    pub fn cancel(&mut self) {
        self.touches.clear();
        self.start_point = None;
        self.pinch_distance = None;
        self.is_dragging = false;
    }
}
